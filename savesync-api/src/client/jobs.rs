use savesync_lib::ids;
use reqwest::StatusCode;

use crate::client::error::RequestError;
use crate::client::{ApiClient, error_from, payload};
use crate::jobs::Job;

pub struct QueryJobs {}

impl QueryJobs {
    pub fn new() -> Self {
        QueryJobs {}
    }

    pub async fn send(self, client: &ApiClient) -> Result<Vec<Job>, RequestError> {
        let res = client.send(client.get("jobs")?).await?;

        match res.status() {
            StatusCode::OK => payload(res).await,
            _ => Err(error_from(res).await)
        }
    }
}

pub struct RetrieveJob {
    id: ids::JobId
}

impl RetrieveJob {
    pub fn id(id: ids::JobId) -> Self {
        RetrieveJob { id }
    }

    pub async fn send(self, client: &ApiClient) -> Result<Option<Job>, RequestError> {
        let res = client.send(client.get(format!("jobs/{}", self.id))?).await?;

        match res.status() {
            StatusCode::OK => Ok(Some(payload(res).await?)),
            StatusCode::NOT_FOUND => Ok(None),
            _ => Err(error_from(res).await)
        }
    }
}
