use savesync_lib::ids;
use reqwest::StatusCode;

use crate::client::error::RequestError;
use crate::client::{ApiClient, error_from, payload};
use crate::Validator;
use crate::targets::{
    Target,
    CreateTarget as CreateTargetBody,
    UpdateTarget as UpdateTargetBody,
};

pub struct QueryTargets {}

impl QueryTargets {
    pub fn new() -> Self {
        QueryTargets {}
    }

    /// records that do not resolve into a known target config are logged
    /// and left out of the list
    pub async fn send(self, client: &ApiClient) -> Result<Vec<Target>, RequestError> {
        let res = client.send(client.get("targets")?).await?;

        match res.status() {
            StatusCode::OK => Ok(resolvable(payload(res).await?)),
            _ => Err(error_from(res).await)
        }
    }
}

fn resolvable(records: Vec<serde_json::Value>) -> Vec<Target> {
    let mut list = Vec::with_capacity(records.len());

    for record in records {
        let id = record.get("id").cloned();

        match serde_json::from_value::<Target>(record) {
            Ok(target) => list.push(target),
            Err(err) => {
                tracing::warn!(?id, "skipping unresolvable target: {}", err);
            }
        }
    }

    list
}

pub struct RetrieveTarget {
    id: ids::TargetId
}

impl RetrieveTarget {
    pub fn id(id: ids::TargetId) -> Self {
        RetrieveTarget { id }
    }

    pub async fn send(self, client: &ApiClient) -> Result<Option<Target>, RequestError> {
        let res = client.send(client.get(format!("targets/{}", self.id))?).await?;

        match res.status() {
            StatusCode::OK => Ok(Some(payload(res).await?)),
            StatusCode::NOT_FOUND => Ok(None),
            _ => Err(error_from(res).await)
        }
    }
}

pub struct CreateTarget {
    body: CreateTargetBody
}

impl CreateTarget {
    pub fn new(body: CreateTargetBody) -> Self {
        CreateTarget { body }
    }

    pub async fn send(self, client: &ApiClient) -> Result<Target, RequestError> {
        self.body.validate()?;

        let res = client.send(client.post("targets")?.json(&self.body)).await?;

        match res.status() {
            StatusCode::OK |
            StatusCode::CREATED => payload(res).await,
            _ => Err(error_from(res).await)
        }
    }
}

pub struct UpdateTarget {
    id: ids::TargetId,
    body: UpdateTargetBody
}

impl UpdateTarget {
    pub fn new(id: ids::TargetId, body: UpdateTargetBody) -> Self {
        UpdateTarget { id, body }
    }

    pub async fn send(self, client: &ApiClient) -> Result<Target, RequestError> {
        self.body.validate()?;

        let res = client.send(
            client.put(format!("targets/{}", self.id))?.json(&self.body)
        ).await?;

        match res.status() {
            StatusCode::OK => payload(res).await,
            _ => Err(error_from(res).await)
        }
    }
}

pub struct DeleteTarget {
    id: ids::TargetId
}

impl DeleteTarget {
    pub fn id(id: ids::TargetId) -> Self {
        DeleteTarget { id }
    }

    pub async fn send(self, client: &ApiClient) -> Result<(), RequestError> {
        let res = client.send(client.delete(format!("targets/{}", self.id))?).await?;

        match res.status() {
            StatusCode::OK |
            StatusCode::NO_CONTENT => Ok(()),
            _ => Err(error_from(res).await)
        }
    }
}
