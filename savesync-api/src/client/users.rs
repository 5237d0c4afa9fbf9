use savesync_lib::ids;
use reqwest::StatusCode;

use crate::client::error::RequestError;
use crate::client::{ApiClient, error_from, payload};
use crate::Validator;
use crate::users::{
    User,
    CreateUser as CreateUserBody,
    SetAdmin as SetAdminBody,
};

pub struct QueryUsers {}

impl QueryUsers {
    pub fn new() -> Self {
        QueryUsers {}
    }

    pub async fn send(self, client: &ApiClient) -> Result<Vec<User>, RequestError> {
        let res = client.send(client.get("users")?).await?;

        match res.status() {
            StatusCode::OK => payload(res).await,
            _ => Err(error_from(res).await)
        }
    }
}

pub struct CreateUser {
    body: CreateUserBody
}

impl CreateUser {
    pub fn new<E, P>(email: E, password: P) -> Self
    where
        E: Into<String>,
        P: Into<String>,
    {
        CreateUser {
            body: CreateUserBody {
                email: email.into(),
                password: password.into(),
            }
        }
    }

    pub async fn send(self, client: &ApiClient) -> Result<User, RequestError> {
        self.body.validate()?;

        let res = client.send(client.post("users")?.json(&self.body)).await?;

        match res.status() {
            StatusCode::OK |
            StatusCode::CREATED => payload(res).await,
            _ => Err(error_from(res).await)
        }
    }
}

pub struct SetAdmin {
    id: ids::UserId,
    body: SetAdminBody,
}

impl SetAdmin {
    pub fn new(id: ids::UserId, is_admin: bool) -> Self {
        SetAdmin {
            id,
            body: SetAdminBody { is_admin }
        }
    }

    pub async fn send(self, client: &ApiClient) -> Result<(), RequestError> {
        let res = client.send(
            client.patch(format!("users/{}/admin", self.id))?.json(&self.body)
        ).await?;

        match res.status() {
            StatusCode::OK |
            StatusCode::NO_CONTENT => Ok(()),
            _ => Err(error_from(res).await)
        }
    }
}

pub struct DeleteUser {
    id: ids::UserId,
}

impl DeleteUser {
    pub fn id(id: ids::UserId) -> Self {
        DeleteUser { id }
    }

    pub async fn send(self, client: &ApiClient) -> Result<(), RequestError> {
        let res = client.send(client.delete(format!("users/{}", self.id))?).await?;

        match res.status() {
            StatusCode::OK |
            StatusCode::NO_CONTENT => Ok(()),
            _ => Err(error_from(res).await)
        }
    }
}
