use std::sync::Arc;

use savesync_api::users::User;
use savesync_api::system::DirectoryListing;
use savesync_api::client::{ApiClient, ApiClientBuilder};
use savesync_api::client::system::ListDirectory;

use crate::cache::Cache;
use crate::error::Result;
use crate::session::{Session, SessionState, TokenStore};

mod sources;
mod targets;
mod snapshots;
mod jobs;
mod users;
mod settings;

pub use sources::Sources;
pub use targets::Targets;
pub use snapshots::Snapshots;
pub use jobs::Jobs;
pub use users::Users;
pub use settings::SettingsHandle;

/// everything a front end needs, handed to consumers instead of globals.
///
/// the client reads its token from the session and a 401 on any request
/// clears both the session and the cache.
#[derive(Clone)]
pub struct Dashboard {
    client: ApiClient,
    session: Session,
    cache: Cache,
}

impl Dashboard {
    pub fn new(mut builder: ApiClientBuilder, store: Arc<dyn TokenStore>) -> Result<Self> {
        let session = Session::new(store);
        let cache = Cache::new();

        builder.credentials(Arc::new(session.clone()));

        let client = builder.build()?;

        {
            let cache = cache.clone();

            session.on_clear(move || cache.clear());
        }

        Ok(Dashboard {
            client,
            session,
            cache,
        })
    }

    /// restores a persisted session, if any
    pub async fn init(&self) -> SessionState {
        self.session.restore(&self.client).await
    }

    pub async fn login<E, P>(&self, email: E, password: P) -> Result<User>
    where
        E: Into<String>,
        P: Into<String>,
    {
        let user = self.session.login(&self.client, email, password).await?;

        self.cache.clear();

        Ok(user)
    }

    pub async fn register<E, P>(&self, email: E, password: P) -> Result<User>
    where
        E: Into<String>,
        P: Into<String>,
    {
        let user = self.session.register(&self.client, email, password).await?;

        self.cache.clear();

        Ok(user)
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn sources(&self) -> Sources<'_> {
        Sources::new(&self.client, &self.cache)
    }

    pub fn targets(&self) -> Targets<'_> {
        Targets::new(&self.client, &self.cache)
    }

    pub fn snapshots(&self) -> Snapshots<'_> {
        Snapshots::new(&self.client, &self.cache)
    }

    pub fn jobs(&self) -> Jobs<'_> {
        Jobs::new(&self.client, &self.cache)
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(&self.client, &self.cache, &self.session)
    }

    pub fn settings(&self) -> SettingsHandle<'_> {
        SettingsHandle::new(&self.client, &self.cache)
    }

    /// server side directory browser, not cached
    pub async fn list_directory(&self, path: Option<&str>) -> Result<DirectoryListing> {
        let request = match path {
            Some(path) => ListDirectory::path(path),
            None => ListDirectory::default_path(),
        };

        Ok(request.send(&self.client).await?)
    }
}
