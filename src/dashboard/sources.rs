use std::sync::Arc;

use savesync_lib::ids;
use savesync_api::sources::{Source, CreateSource, UpdateSource, BackupStarted};
use savesync_api::targets::Target;
use savesync_api::client::ApiClient;
use savesync_api::client::sources as requests;

use crate::cache::{Cache, CacheKey, Collection, Mutation};
use crate::error::Result;

use super::Targets;

pub struct Sources<'a> {
    client: &'a ApiClient,
    cache: &'a Cache,
}

impl<'a> Sources<'a> {
    pub(super) fn new(client: &'a ApiClient, cache: &'a Cache) -> Self {
        Sources { client, cache }
    }

    pub async fn list(&self) -> Result<Arc<Vec<Source>>> {
        let client = self.client.clone();

        self.cache.fetch(CacheKey::list(Collection::Sources), move || {
            let client = client.clone();

            async move {
                Ok(requests::QuerySources::new().send(&client).await?)
            }
        }).await
    }

    pub async fn get(&self, id: ids::SourceId) -> Result<Option<Source>> {
        let client = self.client.clone();

        let found = self.cache.fetch(CacheKey::entry(Collection::Sources, id), move || {
            let client = client.clone();

            async move {
                Ok(requests::RetrieveSource::id(id).send(&client).await?)
            }
        }).await?;

        Ok(Option::clone(&found))
    }

    pub fn peek_list(&self) -> Option<Arc<Vec<Source>>> {
        self.cache.peek(&CacheKey::list(Collection::Sources))
    }

    pub fn peek(&self, id: ids::SourceId) -> Option<Source> {
        self.cache.peek::<Option<Source>>(&CacheKey::entry(Collection::Sources, id))
            .and_then(|found| Option::clone(&found))
    }

    /// the target a source points at. a missing or deleted target is `None`
    pub async fn target_of(&self, source: &Source) -> Result<Option<Target>> {
        let Some(target_id) = source.target_id else {
            return Ok(None);
        };

        Targets::new(self.client, self.cache).get(target_id).await
    }

    pub async fn create(&self, body: CreateSource) -> Result<Source> {
        self.cache.mutate(Mutation::CreateSource, async {
            Ok(requests::CreateSource::from(body).send(self.client).await?)
        }).await
    }

    pub async fn update(&self, id: ids::SourceId, body: UpdateSource) -> Result<Source> {
        self.cache.mutate(Mutation::UpdateSource(id), async {
            Ok(requests::UpdateSource::new(id, body).send(self.client).await?)
        }).await
    }

    pub async fn delete(&self, id: ids::SourceId) -> Result<()> {
        self.cache.mutate(Mutation::DeleteSource(id), async {
            Ok(requests::DeleteSource::id(id).send(self.client).await?)
        }).await
    }

    /// starts a backup, jobs and snapshots are stale afterwards
    pub async fn run(&self, id: ids::SourceId) -> Result<BackupStarted> {
        self.cache.mutate(Mutation::RunSource(id), async {
            Ok(requests::RunSource::id(id).send(self.client).await?)
        }).await
    }
}
