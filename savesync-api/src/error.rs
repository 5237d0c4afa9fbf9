use http::StatusCode;
use serde::{Serialize, Deserialize};
use strum::{AsRefStr as StrumAsRefStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq,
    StrumAsRefStr,
    Serialize, Deserialize
)]
pub enum ApiErrorKind {
    InternalFailure,
    Unavailable,

    Unauthenticated,
    PermissionDenied,
    RegistrationDisabled,

    NotFound,
    AlreadyExists,

    InvalidRequest,
    ValidationFailed,

    Unknown,
}

impl ApiErrorKind {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ApiErrorKind::Unauthenticated,
            StatusCode::FORBIDDEN => ApiErrorKind::PermissionDenied,
            StatusCode::NOT_FOUND => ApiErrorKind::NotFound,
            StatusCode::CONFLICT => ApiErrorKind::AlreadyExists,
            StatusCode::BAD_REQUEST |
            StatusCode::UNPROCESSABLE_ENTITY => ApiErrorKind::InvalidRequest,
            StatusCode::BAD_GATEWAY |
            StatusCode::SERVICE_UNAVAILABLE |
            StatusCode::GATEWAY_TIMEOUT => ApiErrorKind::Unavailable,
            status if status.is_server_error() => ApiErrorKind::InternalFailure,
            _ => ApiErrorKind::Unknown,
        }
    }
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self.as_ref(), f)
    }
}

/// the `{"error": {"message": ..., "code": ...}}` body returned by the
/// backend for every failed request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Detail {
    Keys(Vec<String>),
}

impl Detail {
    pub fn mult_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Detail::Keys(keys.into_iter().map(Into::into).collect())
    }
}

impl std::fmt::Display for Detail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Detail::Keys(list) => {
                let mut iter = list.iter();

                if let Some(first) = iter.next() {
                    write!(f, "{}", first)?;

                    for key in iter {
                        write!(f, ",{}", key)?;
                    }
                }
            },
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ApiError {
    kind: ApiErrorKind,
    detail: Option<Detail>,
    msg: Option<String>,
    code: Option<String>,
}

impl ApiError {
    pub fn new() -> Self {
        ApiError {
            kind: ApiErrorKind::InternalFailure,
            detail: None,
            msg: None,
            code: None,
        }
    }

    pub fn from_body(status: StatusCode, body: ErrorBody) -> Self {
        ApiError {
            kind: ApiErrorKind::from_status(status),
            detail: None,
            msg: Some(body.error.message),
            code: body.error.code,
        }
    }

    pub fn with_kind<K>(mut self, kind: K) -> Self
    where
        K: Into<ApiErrorKind>
    {
        self.kind = kind.into();
        self
    }

    pub fn with_message<M>(mut self, msg: M) -> Self
    where
        M: Into<String>
    {
        self.msg = Some(msg.into());
        self
    }

    pub fn kind(&self) -> &ApiErrorKind {
        &self.kind
    }

    pub fn detail(&self) -> Option<&Detail> {
        self.detail.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.msg.as_deref()
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn is_unauthenticated(&self) -> bool {
        self.kind == ApiErrorKind::Unauthenticated
    }
}

impl std::default::Default for ApiError {
    fn default() -> Self {
        ApiError::new()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(detail) = &self.detail {
            write!(f, ": {}", detail)?;
        }

        if let Some(msg) = &self.msg {
            write!(f, ": {}", msg)?;
        }

        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl From<ApiErrorKind> for ApiError {
    fn from(kind: ApiErrorKind) -> Self {
        ApiError {
            kind,
            detail: None,
            msg: None,
            code: None,
        }
    }
}

impl<M> From<(ApiErrorKind, M)> for ApiError
where
    M: Into<String>,
{
    fn from((kind, msg): (ApiErrorKind, M)) -> Self {
        ApiError {
            kind,
            detail: None,
            msg: Some(msg.into()),
            code: None,
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError {
            kind: ApiErrorKind::ValidationFailed,
            detail: Some(Detail::mult_keys(errors.iter().map(|e| e.field.clone()))),
            msg: None,
            code: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumAsRefStr)]
pub enum FieldReason {
    Missing,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub reason: FieldReason,
}

/// client side validation failures, keyed by the wire name of the field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        FieldErrors(Vec::new())
    }

    pub fn push<F>(&mut self, field: F, reason: FieldReason)
    where
        F: Into<String>
    {
        self.0.push(FieldError {
            field: field.into(),
            reason,
        });
    }

    pub fn missing<F>(&mut self, field: F)
    where
        F: Into<String>
    {
        self.push(field, FieldReason::Missing);
    }

    pub fn invalid<F>(&mut self, field: F)
    where
        F: Into<String>
    {
        self.push(field, FieldReason::Invalid);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<FieldReason> {
        self.0.iter()
            .find(|e| e.field == field)
            .map(|e| e.reason)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    pub fn merge(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;

        for error in &self.0 {
            if first {
                first = false;
            } else {
                write!(f, ", ")?;
            }

            write!(f, "{} ({})", error.field, error.reason.as_ref())?;
        }

        Ok(())
    }
}

impl std::error::Error for FieldErrors {}
