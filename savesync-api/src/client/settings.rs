use reqwest::StatusCode;

use crate::client::error::RequestError;
use crate::client::{ApiClient, error_from, payload};
use crate::Validator;
use crate::settings::{Settings, UpdateSetting as UpdateSettingBody};

pub struct RetrieveSettings {}

impl RetrieveSettings {
    pub fn new() -> Self {
        RetrieveSettings {}
    }

    pub async fn send(self, client: &ApiClient) -> Result<Settings, RequestError> {
        let res = client.send(client.get("settings")?).await?;

        match res.status() {
            StatusCode::OK => payload(res).await,
            _ => Err(error_from(res).await)
        }
    }
}

pub struct UpdateSetting {
    body: UpdateSettingBody
}

impl UpdateSetting {
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        UpdateSetting {
            body: UpdateSettingBody {
                key: key.into(),
                value: value.into(),
            }
        }
    }

    pub async fn send(self, client: &ApiClient) -> Result<(), RequestError> {
        self.body.validate()?;

        let res = client.send(client.put("settings")?.json(&self.body)).await?;

        match res.status() {
            StatusCode::OK |
            StatusCode::NO_CONTENT => Ok(()),
            _ => Err(error_from(res).await)
        }
    }
}

impl From<UpdateSettingBody> for UpdateSetting {
    fn from(body: UpdateSettingBody) -> Self {
        UpdateSetting { body }
    }
}
