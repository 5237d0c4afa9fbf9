use reqwest::StatusCode;

use crate::client::error::RequestError;
use crate::client::{ApiClient, error_from, payload};
use crate::{Validator, ApiErrorKind};
use crate::auth::{AuthRequest, Registration, AuthSession};
use crate::users::User;

pub struct Login {
    body: AuthRequest
}

impl Login {
    pub fn new<E, P>(email: E, password: P) -> Self
    where
        E: Into<String>,
        P: Into<String>,
    {
        Login {
            body: AuthRequest::new(email, password)
        }
    }

    pub async fn send(self, client: &ApiClient) -> Result<AuthSession, RequestError> {
        self.body.validate()?;

        let res = client.send(client.post("auth/login")?.json(&self.body)).await?;

        match res.status() {
            StatusCode::OK => payload(res).await,
            _ => Err(error_from(res).await)
        }
    }
}

pub struct Register {
    body: AuthRequest
}

impl Register {
    pub fn new<E, P>(email: E, password: P) -> Self
    where
        E: Into<String>,
        P: Into<String>,
    {
        Register {
            body: AuthRequest::new(email, password)
        }
    }

    /// a 403 means the instance has registration turned off and is
    /// reported as [`ApiErrorKind::RegistrationDisabled`]
    pub async fn send(self, client: &ApiClient) -> Result<AuthSession, RequestError> {
        Registration(&self.body).validate()?;

        let res = client.send(client.post("auth/register")?.json(&self.body)).await?;

        match res.status() {
            StatusCode::OK |
            StatusCode::CREATED => payload(res).await,
            StatusCode::FORBIDDEN => match error_from(res).await.as_api() {
                Ok(err) => Err(err.with_kind(ApiErrorKind::RegistrationDisabled).into()),
                Err(err) => Err(err),
            },
            _ => Err(error_from(res).await)
        }
    }
}

pub struct WhoAmI {}

impl WhoAmI {
    pub fn new() -> Self {
        WhoAmI {}
    }

    pub async fn send(self, client: &ApiClient) -> Result<User, RequestError> {
        let res = client.send(client.get("auth/me")?).await?;

        match res.status() {
            StatusCode::OK => payload(res).await,
            _ => Err(error_from(res).await)
        }
    }
}
