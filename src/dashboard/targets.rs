use std::sync::Arc;

use savesync_lib::ids;
use savesync_api::targets::{Target, CreateTarget, UpdateTarget};
use savesync_api::client::ApiClient;
use savesync_api::client::targets as requests;

use crate::cache::{Cache, CacheKey, Collection, Mutation};
use crate::error::Result;

pub struct Targets<'a> {
    client: &'a ApiClient,
    cache: &'a Cache,
}

impl<'a> Targets<'a> {
    pub(super) fn new(client: &'a ApiClient, cache: &'a Cache) -> Self {
        Targets { client, cache }
    }

    pub async fn list(&self) -> Result<Arc<Vec<Target>>> {
        let client = self.client.clone();

        self.cache.fetch(CacheKey::list(Collection::Targets), move || {
            let client = client.clone();

            async move {
                Ok(requests::QueryTargets::new().send(&client).await?)
            }
        }).await
    }

    pub async fn get(&self, id: ids::TargetId) -> Result<Option<Target>> {
        let client = self.client.clone();

        let found = self.cache.fetch(CacheKey::entry(Collection::Targets, id), move || {
            let client = client.clone();

            async move {
                Ok(requests::RetrieveTarget::id(id).send(&client).await?)
            }
        }).await?;

        Ok(Option::clone(&found))
    }

    pub fn peek_list(&self) -> Option<Arc<Vec<Target>>> {
        self.cache.peek(&CacheKey::list(Collection::Targets))
    }

    pub async fn create(&self, body: CreateTarget) -> Result<Target> {
        self.cache.mutate(Mutation::CreateTarget, async {
            Ok(requests::CreateTarget::new(body).send(self.client).await?)
        }).await
    }

    pub async fn update(&self, id: ids::TargetId, body: UpdateTarget) -> Result<Target> {
        self.cache.mutate(Mutation::UpdateTarget(id), async {
            Ok(requests::UpdateTarget::new(id, body).send(self.client).await?)
        }).await
    }

    pub async fn delete(&self, id: ids::TargetId) -> Result<()> {
        self.cache.mutate(Mutation::DeleteTarget(id), async {
            Ok(requests::DeleteTarget::id(id).send(self.client).await?)
        }).await
    }
}
