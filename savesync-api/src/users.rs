use savesync_lib::ids;

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

use crate::{Validator, FieldErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: ids::UserId,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password: String,
}

impl Validator for CreateUser {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut invalid = FieldErrors::new();

        if self.email.is_empty() {
            invalid.missing("email");
        } else if !savesync_lib::users::email_valid(&self.email) {
            invalid.invalid("email");
        }

        if self.password.is_empty() {
            invalid.missing("password");
        } else if !savesync_lib::users::password_valid(&self.password) {
            invalid.invalid("password");
        }

        invalid.into_result()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetAdmin {
    pub is_admin: bool,
}
