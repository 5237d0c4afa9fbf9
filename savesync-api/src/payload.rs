use serde::{Serialize, Deserialize};

/// success envelope, every JSON response from the backend is `{"data": T}`
#[derive(Debug, Serialize, Deserialize)]
pub struct Payload<T> {
    data: T
}

impl<T> Payload<T> {
    pub fn into_payload(self) -> T {
        self.data
    }
}
