use std::sync::Arc;

use savesync_api::settings::{Settings, UpdateSetting};
use savesync_api::client::ApiClient;
use savesync_api::client::settings as requests;

use crate::cache::{Cache, CacheKey, Collection, Mutation};
use crate::error::Result;

pub struct SettingsHandle<'a> {
    client: &'a ApiClient,
    cache: &'a Cache,
}

impl<'a> SettingsHandle<'a> {
    pub(super) fn new(client: &'a ApiClient, cache: &'a Cache) -> Self {
        SettingsHandle { client, cache }
    }

    pub async fn get(&self) -> Result<Arc<Settings>> {
        let client = self.client.clone();

        self.cache.fetch(CacheKey::list(Collection::Settings), move || {
            let client = client.clone();

            async move {
                Ok(requests::RetrieveSettings::new().send(&client).await?)
            }
        }).await
    }

    pub async fn registration_enabled(&self) -> Result<bool> {
        Ok(self.get().await?.registration_enabled())
    }

    pub async fn update<K, V>(&self, key: K, value: V) -> Result<()>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let request = requests::UpdateSetting::new(key, value);

        self.cache.mutate(Mutation::UpdateSetting, async {
            Ok(request.send(self.client).await?)
        }).await
    }

    pub async fn set_registration(&self, enabled: bool) -> Result<()> {
        let request = requests::UpdateSetting::from(UpdateSetting::registration(enabled));

        self.cache.mutate(Mutation::UpdateSetting, async {
            Ok(request.send(self.client).await?)
        }).await
    }
}
