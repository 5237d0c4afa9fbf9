pub mod error;
pub use error::{ApiError, ApiErrorKind, Detail, FieldError, FieldErrors, FieldReason};

pub mod traits;
pub use traits::Validator;

mod serde;

pub mod status;
pub use status::Status;

pub mod auth;
pub mod users;
pub mod sources;
pub mod targets;
pub mod snapshots;
pub mod jobs;
pub mod settings;
pub mod system;

mod payload;
pub use payload::Payload;

#[cfg(feature = "client")]
pub mod client;
