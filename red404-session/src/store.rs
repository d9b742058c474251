//! Ownership of the persisted session keys.

use std::sync::Arc;

use shared::models::User;
use tracing::{debug, warn};

use crate::{error::StorageError, http::TokenProvider, storage::SessionStorage};

/// Storage key holding the raw bearer token.
pub const TOKEN_KEY: &str = "auth_token";
/// Storage key holding the JSON-serialized [`User`].
pub const USER_KEY: &str = "user_data";

/// What the durable cache held at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restored {
    /// No token stored; the user never signed in or signed out.
    NoToken,
    /// Token and a well-formed user record.
    User(User),
    /// A token exists but the cache around it is unusable.
    Corrupt(String),
}

/// The only component that reads or writes the session keys.
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// Write the token and user after a successful login.
    ///
    /// # Errors
    /// Returns an error if either key cannot be written. A token written
    /// before the user write failed is removed again.
    pub fn persist(&self, token: &str, user: &User) -> Result<(), StorageError> {
        let user_json = serde_json::to_string(user)?;
        self.storage.set(TOKEN_KEY, token)?;
        if let Err(err) = self.storage.set(USER_KEY, &user_json) {
            if let Err(cleanup) = self.storage.remove(TOKEN_KEY) {
                warn!(error = %cleanup, "failed to roll back token after user write failure");
            }
            return Err(err);
        }
        debug!(user_id = %user.id, "session persisted");
        Ok(())
    }

    /// Read the cached session without touching the network.
    #[must_use]
    pub fn restore(&self) -> Restored {
        let token = match self.storage.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => return Restored::NoToken,
            Err(err) => return Restored::Corrupt(format!("token unreadable: {err}")),
        };
        debug!(token_len = token.len(), "found cached token");

        match self.storage.get(USER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Restored::User(user),
                Err(err) => Restored::Corrupt(format!("user record unparseable: {err}")),
            },
            Ok(None) => Restored::Corrupt("user record missing".to_string()),
            Err(err) => Restored::Corrupt(format!("user record unreadable: {err}")),
        }
    }

    /// Remove both keys.
    ///
    /// Both removals are attempted even if the first fails.
    ///
    /// # Errors
    /// Returns the first removal error.
    pub fn clear(&self) -> Result<(), StorageError> {
        let token = self.storage.remove(TOKEN_KEY);
        let user = self.storage.remove(USER_KEY);
        token.and(user)
    }

    /// Whether a non-empty token is currently stored.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.bearer_token().is_some()
    }
}

impl TokenProvider for SessionStore {
    fn bearer_token(&self) -> Option<String> {
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|token| !token.is_empty()),
            Err(err) => {
                warn!(error = %err, "failed to read bearer token");
                None
            }
        }
    }
}
