use crate::{ApiError, FieldErrors};

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error("invalid fields: {0}")]
    Validation(#[from] FieldErrors),

    #[error(transparent)]
    Url(#[from] url::ParseError),
}

impl RequestError {
    pub fn as_api(self) -> Result<ApiError, Self> {
        match self {
            RequestError::Api(v) => Ok(v),
            v => Err(v)
        }
    }

    pub fn api(&self) -> Option<&ApiError> {
        match self {
            RequestError::Api(v) => Some(v),
            _ => None
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        self.api().map(|e| e.is_unauthenticated()).unwrap_or(false)
    }
}
