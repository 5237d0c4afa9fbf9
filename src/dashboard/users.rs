use std::sync::Arc;

use savesync_lib::ids;
use savesync_api::FieldErrors;
use savesync_api::users::User;
use savesync_api::client::ApiClient;
use savesync_api::client::users as requests;

use crate::cache::{Cache, CacheKey, Collection, Mutation};
use crate::error::{Error, Result};
use crate::session::Session;

/// admin user management
pub struct Users<'a> {
    client: &'a ApiClient,
    cache: &'a Cache,
    session: &'a Session,
}

impl<'a> Users<'a> {
    pub(super) fn new(client: &'a ApiClient, cache: &'a Cache, session: &'a Session) -> Self {
        Users { client, cache, session }
    }

    pub async fn list(&self) -> Result<Arc<Vec<User>>> {
        let client = self.client.clone();

        self.cache.fetch(CacheKey::list(Collection::Users), move || {
            let client = client.clone();

            async move {
                Ok(requests::QueryUsers::new().send(&client).await?)
            }
        }).await
    }

    pub async fn create<E, P>(&self, email: E, password: P) -> Result<User>
    where
        E: Into<String>,
        P: Into<String>,
    {
        let request = requests::CreateUser::new(email, password);

        self.cache.mutate(Mutation::CreateUser, async {
            Ok(request.send(self.client).await?)
        }).await
    }

    /// the current user can not remove their own admin flag
    pub async fn set_admin(&self, id: ids::UserId, is_admin: bool) -> Result<()> {
        if !is_admin && self.session.is_current_user(id) {
            return Err(self_modification());
        }

        self.cache.mutate(Mutation::SetAdmin(id), async {
            Ok(requests::SetAdmin::new(id, is_admin).send(self.client).await?)
        }).await
    }

    /// the current user can not delete themselves
    pub async fn delete(&self, id: ids::UserId) -> Result<()> {
        if self.session.is_current_user(id) {
            return Err(self_modification());
        }

        self.cache.mutate(Mutation::DeleteUser(id), async {
            Ok(requests::DeleteUser::id(id).send(self.client).await?)
        }).await
    }
}

fn self_modification() -> Error {
    let mut errors = FieldErrors::new();
    errors.invalid("id");

    Error::Validation(errors)
}
