use savesync_lib::ids;
use bytes::Bytes;
use reqwest::StatusCode;

use crate::client::error::RequestError;
use crate::client::{ApiClient, error_from, payload};
use crate::snapshots::{Snapshot, FileNode};

pub struct QuerySnapshots {}

impl QuerySnapshots {
    pub fn new() -> Self {
        QuerySnapshots {}
    }

    pub async fn send(self, client: &ApiClient) -> Result<Vec<Snapshot>, RequestError> {
        let res = client.send(client.get("snapshots")?).await?;

        match res.status() {
            StatusCode::OK => payload(res).await,
            _ => Err(error_from(res).await)
        }
    }
}

pub struct RetrieveSnapshot {
    id: ids::SnapshotId
}

impl RetrieveSnapshot {
    pub fn id(id: ids::SnapshotId) -> Self {
        RetrieveSnapshot { id }
    }

    pub async fn send(self, client: &ApiClient) -> Result<Option<Snapshot>, RequestError> {
        let res = client.send(client.get(format!("snapshots/{}", self.id))?).await?;

        match res.status() {
            StatusCode::OK => Ok(Some(payload(res).await?)),
            StatusCode::NOT_FOUND => Ok(None),
            _ => Err(error_from(res).await)
        }
    }
}

pub struct RetrieveFiles {
    id: ids::SnapshotId
}

impl RetrieveFiles {
    pub fn id(id: ids::SnapshotId) -> Self {
        RetrieveFiles { id }
    }

    pub async fn send(self, client: &ApiClient) -> Result<FileNode, RequestError> {
        let res = client.send(client.get(format!("snapshots/{}/files", self.id))?).await?;

        match res.status() {
            StatusCode::OK => payload(res).await,
            _ => Err(error_from(res).await)
        }
    }
}

/// the manifest is served as a file download, not inside the data envelope
pub struct DownloadManifest {
    id: ids::SnapshotId
}

impl DownloadManifest {
    pub fn id(id: ids::SnapshotId) -> Self {
        DownloadManifest { id }
    }

    pub fn file_name(&self) -> String {
        format!("manifest-{}.json", self.id)
    }

    pub async fn send(self, client: &ApiClient) -> Result<Bytes, RequestError> {
        let res = client.send(client.get(format!("snapshots/{}/manifest", self.id))?).await?;

        match res.status() {
            StatusCode::OK => Ok(res.bytes().await?),
            _ => Err(error_from(res).await)
        }
    }
}

pub struct RestoreSnapshot {
    id: ids::SnapshotId
}

impl RestoreSnapshot {
    pub fn id(id: ids::SnapshotId) -> Self {
        RestoreSnapshot { id }
    }

    pub async fn send(self, client: &ApiClient) -> Result<(), RequestError> {
        let res = client.send(client.post(format!("snapshots/{}/restore", self.id))?).await?;

        match res.status() {
            StatusCode::OK |
            StatusCode::ACCEPTED |
            StatusCode::NO_CONTENT => Ok(()),
            _ => Err(error_from(res).await)
        }
    }
}
