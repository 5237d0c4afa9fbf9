use std::sync::{Arc, Mutex};

use savesync_lib::ids;
use savesync_api::Validator;
use savesync_api::auth::{AuthRequest, Registration, AuthSession};
use savesync_api::users::User;
use savesync_api::client::{ApiClient, Credentials};
use savesync_api::client::error::RequestError;
use savesync_api::client::auth::{Login, Register, WhoAmI};
use tokio::sync::watch;

use crate::error::{Error, Result};

pub mod storage;

pub use storage::{TokenStore, FileTokenStore, MemoryTokenStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticating,
    Authenticated(User),
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None
        }
    }
}

type ClearHook = Box<dyn Fn() + Send + Sync>;

struct Inner {
    store: Arc<dyn TokenStore>,
    state: watch::Sender<SessionState>,
    on_clear: Mutex<Vec<ClearHook>>,
}

/// current authentication token and user.
///
/// every transition back to anonymous, whether from a logout, a failed
/// restore or a 401 from the backend, goes through the same path that
/// removes the persisted token and runs the registered clear hooks.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(SessionState::Anonymous);

        Session {
            inner: Arc::new(Inner {
                store,
                state,
                on_clear: Mutex::new(Vec::new()),
            })
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(*self.inner.state.borrow(), SessionState::Authenticated(_))
    }

    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user().cloned()
    }

    pub fn is_admin(&self) -> bool {
        self.inner.state.borrow()
            .user()
            .map(|user| user.is_admin)
            .unwrap_or(false)
    }

    pub fn is_current_user(&self, id: ids::UserId) -> bool {
        self.inner.state.borrow()
            .user()
            .map(|user| user.id == id)
            .unwrap_or(false)
    }

    /// registers a callback that runs every time the session is cleared
    pub fn on_clear<F>(&self, hook: F)
    where
        F: Fn() + Send + Sync + 'static
    {
        let mut hooks = self.inner.on_clear.lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        hooks.push(Box::new(hook));
    }

    fn set_state(&self, state: SessionState) {
        self.inner.state.send_replace(state);
    }

    fn clear(&self) {
        if let Err(err) = self.inner.store.clear() {
            tracing::warn!("failed to remove persisted token: {}", err);
        }

        self.set_state(SessionState::Anonymous);

        let hooks = self.inner.on_clear.lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        for hook in hooks.iter() {
            hook();
        }
    }

    fn accept(&self, auth: AuthSession) -> Result<User> {
        if let Err(err) = self.inner.store.save(&auth.token) {
            self.set_state(SessionState::Anonymous);

            return Err(err);
        }

        tracing::info!(user_id = auth.user.id, "session authenticated");

        self.set_state(SessionState::Authenticated(auth.user.clone()));

        Ok(auth.user)
    }

    pub async fn login<E, P>(&self, client: &ApiClient, email: E, password: P) -> Result<User>
    where
        E: Into<String>,
        P: Into<String>,
    {
        let email = email.into();
        let password = password.into();

        AuthRequest::new(email.as_str(), password.as_str()).validate()?;

        self.set_state(SessionState::Authenticating);

        match Login::new(email, password).send(client).await {
            Ok(auth) => self.accept(auth),
            Err(err) => {
                self.set_state(SessionState::Anonymous);

                Err(rejected(err))
            }
        }
    }

    pub async fn register<E, P>(&self, client: &ApiClient, email: E, password: P) -> Result<User>
    where
        E: Into<String>,
        P: Into<String>,
    {
        let email = email.into();
        let password = password.into();

        Registration(&AuthRequest::new(email.as_str(), password.as_str())).validate()?;

        self.set_state(SessionState::Authenticating);

        match Register::new(email, password).send(client).await {
            Ok(auth) => self.accept(auth),
            Err(err) => {
                self.set_state(SessionState::Anonymous);

                Err(rejected(err))
            }
        }
    }

    /// drops the session locally, the backend is not contacted
    pub fn logout(&self) {
        tracing::info!("session logout");

        self.clear();
    }

    /// checks a previously persisted token against the backend. a rejected
    /// or unreadable token leaves the session anonymous.
    pub async fn restore(&self, client: &ApiClient) -> SessionState {
        let token = match self.inner.store.load() {
            Ok(Some(token)) => token,
            Ok(None) => {
                self.set_state(SessionState::Anonymous);

                return SessionState::Anonymous;
            },
            Err(err) => {
                tracing::warn!("failed to read persisted token: {}", err);

                self.clear();

                return SessionState::Anonymous;
            }
        };

        tracing::debug!(token_len = token.len(), "restoring session");

        self.set_state(SessionState::Authenticating);

        match WhoAmI::new().send(client).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "session restored");

                self.set_state(SessionState::Authenticated(user));
            },
            Err(err) => {
                tracing::info!("persisted token rejected: {}", err);

                self.clear();
            }
        }

        self.state()
    }
}

impl Credentials for Session {
    fn token(&self) -> Option<String> {
        match self.inner.store.load() {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!("failed to read token for request: {}", err);

                None
            }
        }
    }

    fn unauthorized(&self) {
        tracing::info!("session expired");

        self.clear();
    }
}

/// a 401 from login or register rejects the submitted credentials, not a
/// session. the backend message is handed back as is.
fn rejected(err: RequestError) -> Error {
    match err.as_api() {
        Ok(api) if api.is_unauthenticated() => Error::Api(api),
        Ok(api) => RequestError::Api(api).into(),
        Err(err) => err.into(),
    }
}
