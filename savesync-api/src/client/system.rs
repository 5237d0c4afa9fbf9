use reqwest::StatusCode;

use crate::client::error::RequestError;
use crate::client::{ApiClient, error_from, payload};
use crate::system::DirectoryListing;

pub struct ListDirectory {
    path: Option<String>
}

impl ListDirectory {
    /// lists the backend's default directory, its home or `/`
    pub fn default_path() -> Self {
        ListDirectory { path: None }
    }

    pub fn path<P>(path: P) -> Self
    where
        P: Into<String>
    {
        ListDirectory { path: Some(path.into()) }
    }

    pub async fn send(self, client: &ApiClient) -> Result<DirectoryListing, RequestError> {
        let mut builder = client.get("system/files")?;

        if let Some(path) = &self.path {
            builder = builder.query(&[("path", path)]);
        }

        let res = client.send(builder).await?;

        match res.status() {
            StatusCode::OK => payload(res).await,
            _ => Err(error_from(res).await)
        }
    }
}
