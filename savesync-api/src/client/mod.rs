use std::default::Default;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::{Payload, ApiError, ApiErrorKind};
use crate::error::ErrorBody;

pub mod error;
pub mod auth;
pub mod users;
pub mod sources;
pub mod targets;
pub mod snapshots;
pub mod jobs;
pub mod settings;
pub mod system;

use error::RequestError;

pub const DEFAULT_URL: &str = "http://localhost:8080/api/";

/// source of the bearer token attached to every request.
///
/// the token is asked for on each request so a logout or an expired session
/// takes effect immediately. `unauthorized` is called whenever the backend
/// answers with a 401, before the error is handed back to the caller.
pub trait Credentials: Send + Sync {
    fn token(&self) -> Option<String>;

    fn unauthorized(&self) {}
}

pub struct NoCredentials;

impl Credentials for NoCredentials {
    fn token(&self) -> Option<String> {
        None
    }
}

pub struct Info {
    pub url: Url
}

#[derive(Clone)]
pub struct ApiClient {
    pub(crate) client: reqwest::Client,
    pub(crate) credentials: Arc<dyn Credentials>,
    pub(crate) info: Arc<Info>,
}

impl ApiClient {
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder {
            url: None,
            agent: None,
            timeout: None,
            credentials: None,
        }
    }

    pub fn url(&self) -> &Url {
        &self.info.url
    }

    pub(crate) fn request<U>(&self, method: Method, path: U) -> Result<RequestBuilder, RequestError>
    where
        U: AsRef<str>
    {
        let url = self.info.url.join(path.as_ref())?;

        tracing::debug!(%method, %url, "api request");

        let builder = self.client.request(method, url);

        if let Some(token) = self.credentials.token() {
            Ok(builder.bearer_auth(token))
        } else {
            Ok(builder)
        }
    }

    pub(crate) fn get<U>(&self, path: U) -> Result<RequestBuilder, RequestError>
    where
        U: AsRef<str>
    {
        self.request(Method::GET, path)
    }

    pub(crate) fn post<U>(&self, path: U) -> Result<RequestBuilder, RequestError>
    where
        U: AsRef<str>
    {
        self.request(Method::POST, path)
    }

    pub(crate) fn put<U>(&self, path: U) -> Result<RequestBuilder, RequestError>
    where
        U: AsRef<str>
    {
        self.request(Method::PUT, path)
    }

    pub(crate) fn patch<U>(&self, path: U) -> Result<RequestBuilder, RequestError>
    where
        U: AsRef<str>
    {
        self.request(Method::PATCH, path)
    }

    pub(crate) fn delete<U>(&self, path: U) -> Result<RequestBuilder, RequestError>
    where
        U: AsRef<str>
    {
        self.request(Method::DELETE, path)
    }

    /// sends the request and runs the unauthorized hook on a 401. every
    /// other status is left for the endpoint to match on.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Response, RequestError> {
        let res = builder.send().await?;

        tracing::debug!(status = %res.status(), url = %res.url(), "api response");

        if res.status() == StatusCode::UNAUTHORIZED {
            tracing::info!("backend rejected credentials");

            self.credentials.unauthorized();

            return Err(error_from(res).await);
        }

        Ok(res)
    }
}

/// decodes the `{"error": ...}` body of a failed response. bodies that are
/// not the expected json fall back to the status text.
pub(crate) async fn error_from(res: Response) -> RequestError {
    let status = res.status();

    let bytes = match res.bytes().await {
        Ok(bytes) => bytes,
        Err(err) => return err.into(),
    };

    match serde_json::from_slice::<ErrorBody>(&bytes) {
        Ok(body) => ApiError::from_body(status, body).into(),
        Err(_) => {
            let msg = status.canonical_reason()
                .map(String::from)
                .unwrap_or_else(|| format!("status {}", status.as_u16()));

            ApiError::from(ApiErrorKind::from_status(status))
                .with_message(msg)
                .into()
        }
    }
}

pub(crate) async fn payload<T>(res: Response) -> Result<T, RequestError>
where
    T: DeserializeOwned
{
    let payload: Payload<T> = res.json().await?;

    Ok(payload.into_payload())
}

pub struct ApiClientBuilder {
    url: Option<Url>,
    agent: Option<String>,
    timeout: Option<Duration>,
    credentials: Option<Arc<dyn Credentials>>,
}

impl ApiClientBuilder {
    /// base url every endpoint path is joined onto. a missing trailing
    /// slash is added so the last path segment is kept.
    pub fn url(&mut self, mut url: Url) {
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());

            url.set_path(&path);
        }

        self.url = Some(url);
    }

    pub fn user_agent<U>(&mut self, user_agent: U)
    where
        U: Into<String>
    {
        self.agent = Some(user_agent.into());
    }

    pub fn timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    pub fn credentials(&mut self, credentials: Arc<dyn Credentials>) {
        self.credentials = Some(credentials);
    }

    pub fn build(self) -> Result<ApiClient, RequestError> {
        let url = match self.url {
            Some(url) => url,
            None => Url::parse(DEFAULT_URL)?,
        };
        let user_agent = self.agent.unwrap_or(
            concat!("savesync-api-client/", env!("CARGO_PKG_VERSION")).into()
        );

        let mut builder = reqwest::Client::builder()
            .user_agent(user_agent);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build()?;

        Ok(ApiClient {
            client,
            credentials: self.credentials.unwrap_or_else(|| Arc::new(NoCredentials)),
            info: Arc::new(Info { url }),
        })
    }
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        ApiClient::builder()
    }
}
