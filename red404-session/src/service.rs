//! The session service: one shared handle over session state and its operations.
//!
//! Consumers receive a clone of [`SessionService`] at construction time and
//! either read [`SessionService::snapshot`] or await changes through
//! [`SessionService::subscribe`]. All mutation goes through the service, and
//! all persistence goes through its [`SessionStore`].

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use shared::{
    config::Config,
    models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, User},
};
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use crate::{
    endpoints::{self, AuthEndpoints, LOGIN_FALLBACK},
    error::{AuthError, SessionError},
    http::ApiClient,
    storage::{FileStorage, SessionStorage},
    store::{Restored, SessionStore},
};

/// Observable authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub is_initialized: bool,
    pub error: Option<String>,
}

struct Inner<C> {
    client: C,
    endpoints: AuthEndpoints,
    store: SessionStore,
    state: watch::Sender<SessionState>,
    login_in_flight: AtomicBool,
    initialized: AtomicBool,
}

/// Cloneable handle to the session of this process.
pub struct SessionService<C = ApiClient> {
    inner: Arc<Inner<C>>,
}

impl<C> Clone for SessionService<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> std::fmt::Debug for SessionService<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService")
            .field("state", &*self.inner.state.borrow())
            .field("endpoints", &self.inner.endpoints)
            .finish_non_exhaustive()
    }
}

/// Marks `is_loading` for as long as it lives.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<SessionState>,
}

impl<'a> LoadingGuard<'a> {
    fn start(state: &'a watch::Sender<SessionState>) -> Self {
        state.send_modify(|state| state.is_loading = true);
        Self { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|state| state.is_loading = false);
    }
}

/// Holds the single login slot; released on drop.
struct LoginSlot<'a>(&'a AtomicBool);

impl<'a> LoginSlot<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for LoginSlot<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SessionService<ApiClient> {
    /// Build the production service: file-backed storage and a `reqwest` client
    /// that reads its bearer token from that storage.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let storage: Arc<dyn SessionStorage> =
            Arc::new(FileStorage::new(config.resolved_storage_path()));
        Self::with_storage(config, storage)
    }

    /// Like [`SessionService::from_config`] with caller-supplied storage.
    #[must_use]
    pub fn with_storage(config: &Config, storage: Arc<dyn SessionStorage>) -> Self {
        let store = SessionStore::new(storage);
        let client = ApiClient::new(&config.api_url).with_token_provider(Arc::new(store.clone()));
        Self::new(client, store, config.endpoints.clone().into())
    }
}

impl<C> SessionService<C>
where
    C: crate::http::HttpClient,
{
    /// Assemble a service from its parts. The session starts uninitialized.
    pub fn new(client: C, store: SessionStore, endpoints: AuthEndpoints) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            inner: Arc::new(Inner {
                client,
                endpoints,
                store,
                state,
                login_in_flight: AtomicBool::new(false),
                initialized: AtomicBool::new(false),
            }),
        }
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Receive every subsequent state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// The HTTP client, for calls beyond the credential endpoints.
    #[must_use]
    pub fn client(&self) -> &C {
        &self.inner.client
    }

    /// Restore the cached session. Runs once; later calls return the current state.
    ///
    /// A missing token leaves the session signed out. A token whose cached
    /// user is missing or unreadable is discarded together with that user.
    #[instrument(skip(self))]
    pub fn initialize(&self) -> SessionState {
        if self.inner.initialized.swap(true, Ordering::AcqRel) {
            return self.snapshot();
        }

        {
            let _loading = LoadingGuard::start(&self.inner.state);
            match self.inner.store.restore() {
                Restored::NoToken => {
                    info!("no stored session");
                    self.inner.state.send_modify(|state| {
                        state.user = None;
                        state.is_authenticated = false;
                    });
                }
                Restored::User(user) => {
                    info!(user_id = %user.id, "restored stored session");
                    self.inner.state.send_modify(|state| {
                        state.user = Some(user);
                        state.is_authenticated = true;
                    });
                }
                Restored::Corrupt(reason) => {
                    warn!(%reason, "discarding stored session");
                    if let Err(err) = self.inner.store.clear() {
                        warn!(error = %err, "failed to clear stored session");
                    }
                    self.inner.state.send_modify(|state| {
                        state.user = None;
                        state.is_authenticated = false;
                    });
                }
            }
        }

        self.inner
            .state
            .send_modify(|state| state.is_initialized = true);
        self.snapshot()
    }

    /// Sign in and persist the session.
    ///
    /// Only one login may be in flight; a concurrent call fails with
    /// [`SessionError::LoginInFlight`] without touching state.
    ///
    /// # Errors
    /// Returns the endpoint or storage failure after recording its message in
    /// [`SessionState::error`].
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, SessionError> {
        let Some(_slot) = LoginSlot::acquire(&self.inner.login_in_flight) else {
            warn!("rejecting login while another is in flight");
            return Err(SessionError::LoginInFlight);
        };
        let _loading = LoadingGuard::start(&self.inner.state);
        self.inner.state.send_modify(|state| state.error = None);

        match self.authenticate(LoginRequest::new(email, password)).await {
            Ok(response) => {
                let user = response.data.user.clone();
                info!(user_id = %user.id, "signed in");
                self.inner.state.send_modify(|state| {
                    state.user = Some(user);
                    state.is_authenticated = true;
                });
                Ok(response)
            }
            Err(err) => {
                let message = err.to_string();
                warn!(%message, "sign in failed");
                self.inner
                    .state
                    .send_modify(|state| state.error = Some(message));
                Err(err)
            }
        }
    }

    async fn authenticate(&self, request: LoginRequest) -> Result<LoginResponse, SessionError> {
        let response =
            endpoints::login_user(&self.inner.client, &self.inner.endpoints, &request).await?;

        if response.data.token.is_empty() {
            return Err(AuthError::Rejected {
                message: LOGIN_FALLBACK.to_string(),
            }
            .into());
        }
        self.inner
            .store
            .persist(&response.data.token, &response.data.user)?;
        Ok(response)
    }

    /// Sign out locally. No request is sent.
    ///
    /// # Errors
    /// Returns a storage failure; the in-memory session is reset regardless.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), SessionError> {
        self.inner.state.send_modify(|state| {
            state.user = None;
            state.error = None;
            state.is_authenticated = false;
        });
        info!("signed out");
        self.inner.store.clear().map_err(|err| {
            warn!(error = %err, "failed to clear stored session");
            err.into()
        })
    }

    /// Forget the last error message.
    pub fn clear_error(&self) {
        self.inner.state.send_if_modified(|state| state.error.take().is_some());
    }

    /// Create an account. The session itself is left untouched.
    ///
    /// # Errors
    /// Returns the endpoint failure.
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, AuthError> {
        endpoints::register_user(&self.inner.client, &self.inner.endpoints, request).await
    }
}

#[cfg(test)]
#[path = "service_test.rs"]
mod service_test;
