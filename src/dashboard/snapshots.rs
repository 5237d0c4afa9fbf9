use std::sync::Arc;

use bytes::Bytes;
use savesync_lib::ids;
use savesync_api::snapshots::{Snapshot, FileNode};
use savesync_api::client::ApiClient;
use savesync_api::client::snapshots as requests;

use crate::cache::{Cache, CacheKey, Collection, Mutation};
use crate::error::Result;

pub struct Snapshots<'a> {
    client: &'a ApiClient,
    cache: &'a Cache,
}

impl<'a> Snapshots<'a> {
    pub(super) fn new(client: &'a ApiClient, cache: &'a Cache) -> Self {
        Snapshots { client, cache }
    }

    pub async fn list(&self) -> Result<Arc<Vec<Snapshot>>> {
        let client = self.client.clone();

        self.cache.fetch(CacheKey::list(Collection::Snapshots), move || {
            let client = client.clone();

            async move {
                Ok(requests::QuerySnapshots::new().send(&client).await?)
            }
        }).await
    }

    pub async fn get(&self, id: ids::SnapshotId) -> Result<Option<Snapshot>> {
        let client = self.client.clone();

        let found = self.cache.fetch(CacheKey::entry(Collection::Snapshots, id), move || {
            let client = client.clone();

            async move {
                Ok(requests::RetrieveSnapshot::id(id).send(&client).await?)
            }
        }).await?;

        Ok(Option::clone(&found))
    }

    /// file tree of a snapshot, fetched once per id
    pub async fn files(&self, id: ids::SnapshotId) -> Result<Arc<FileNode>> {
        let client = self.client.clone();

        self.cache.fetch(CacheKey::files(id), move || {
            let client = client.clone();

            async move {
                Ok(requests::RetrieveFiles::id(id).send(&client).await?)
            }
        }).await
    }

    pub async fn manifest(&self, id: ids::SnapshotId) -> Result<Bytes> {
        Ok(requests::DownloadManifest::id(id).send(self.client).await?)
    }

    pub async fn restore(&self, id: ids::SnapshotId) -> Result<()> {
        self.cache.mutate(Mutation::RestoreSnapshot(id), async {
            Ok(requests::RestoreSnapshot::id(id).send(self.client).await?)
        }).await
    }
}
