use serde::{Serialize, Deserialize};

use crate::{Validator, FieldErrors};
use crate::users::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
}

impl AuthRequest {
    pub fn new<E, P>(email: E, password: P) -> Self
    where
        E: Into<String>,
        P: Into<String>,
    {
        AuthRequest {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// login only checks presence, the backend decides if the pair is valid
impl Validator for AuthRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut invalid = FieldErrors::new();

        if self.email.trim().is_empty() {
            invalid.missing("email");
        }

        if self.password.is_empty() {
            invalid.missing("password");
        }

        invalid.into_result()
    }
}

/// registration applies the same rules the backend enforces
pub struct Registration<'a>(pub &'a AuthRequest);

impl<'a> Validator for Registration<'a> {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut invalid = FieldErrors::new();

        if self.0.email.trim().is_empty() {
            invalid.missing("email");
        } else if !savesync_lib::users::email_valid(&self.0.email) {
            invalid.invalid("email");
        }

        if self.0.password.is_empty() {
            invalid.missing("password");
        } else if !savesync_lib::users::password_valid(&self.0.password) {
            invalid.invalid("password");
        }

        invalid.into_result()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::FieldReason;

    #[test]
    fn login_requires_both_fields() {
        let errors = AuthRequest::new("", "").validate().unwrap_err();

        assert_eq!(errors.get("email"), Some(FieldReason::Missing));
        assert_eq!(errors.get("password"), Some(FieldReason::Missing));
        assert!(AuthRequest::new("a@b.c", "x").validate().is_ok());
    }

    #[test]
    fn registration_checks_password_length() {
        let creds = AuthRequest::new("ops@savesync.local", "1234567");
        let errors = Registration(&creds).validate().unwrap_err();

        assert_eq!(errors.get("password"), Some(FieldReason::Invalid));
        assert!(!errors.contains("email"));
    }
}
