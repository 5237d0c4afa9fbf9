use std::sync::Arc;

use savesync_lib::ids;
use savesync_api::jobs::Job;
use savesync_api::client::ApiClient;
use savesync_api::client::jobs as requests;

use crate::cache::{Cache, CacheKey, Collection};
use crate::error::Result;

pub struct Jobs<'a> {
    client: &'a ApiClient,
    cache: &'a Cache,
}

impl<'a> Jobs<'a> {
    pub(super) fn new(client: &'a ApiClient, cache: &'a Cache) -> Self {
        Jobs { client, cache }
    }

    pub async fn list(&self) -> Result<Arc<Vec<Job>>> {
        let client = self.client.clone();

        self.cache.fetch(CacheKey::list(Collection::Jobs), move || {
            let client = client.clone();

            async move {
                Ok(requests::QueryJobs::new().send(&client).await?)
            }
        }).await
    }

    pub async fn get(&self, id: ids::JobId) -> Result<Option<Job>> {
        let client = self.client.clone();

        let found = self.cache.fetch(CacheKey::entry(Collection::Jobs, id), move || {
            let client = client.clone();

            async move {
                Ok(requests::RetrieveJob::id(id).send(&client).await?)
            }
        }).await?;

        Ok(Option::clone(&found))
    }

    /// jobs that have not reached success or failed
    pub async fn active(&self) -> Result<Vec<Job>> {
        let jobs = self.list().await?;

        Ok(jobs.iter()
            .filter(|job| !job.is_terminal())
            .cloned()
            .collect())
    }
}
