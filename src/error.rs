use std::sync::Arc;

use savesync_api::{ApiError, ApiErrorKind, FieldErrors};
use savesync_api::client::error::RequestError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("session is not authenticated")]
    Authentication,

    #[error("invalid fields: {0}")]
    Validation(FieldErrors),

    #[error("registration is disabled on this server")]
    RegistrationDisabled,

    #[error(transparent)]
    Api(ApiError),

    #[error("request failed: {0}")]
    Transport(Arc<reqwest::Error>),

    #[error("token storage failed: {0}")]
    Storage(Arc<std::io::Error>),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn storage<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>
    {
        Error::Storage(Arc::new(std::io::Error::new(std::io::ErrorKind::Other, err)))
    }

    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.api()
            .map(|e| *e.kind() == ApiErrorKind::NotFound)
            .unwrap_or(false)
    }
}

impl From<RequestError> for Error {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::Api(err) => match err.kind() {
                ApiErrorKind::Unauthenticated => Error::Authentication,
                ApiErrorKind::RegistrationDisabled => Error::RegistrationDisabled,
                _ => Error::Api(err),
            },
            RequestError::Validation(fields) => Error::Validation(fields),
            RequestError::Reqwest(err) => Error::Transport(Arc::new(err)),
            RequestError::Url(err) => Error::Config(format!("invalid request url: {}", err)),
        }
    }
}

impl From<FieldErrors> for Error {
    fn from(err: FieldErrors) -> Self {
        Error::Validation(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(Arc::new(err))
    }
}
