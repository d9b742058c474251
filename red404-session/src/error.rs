//! Error taxonomy for the session client.
//!
//! Transport-level failures ([`ApiError`]) are wrapped by the credential
//! endpoints into [`AuthError`], which always carries a message fit for display.
//! [`SessionError`] adds the failures that only the session service can hit.

use reqwest::StatusCode;
use thiserror::Error;

/// Failures of a single HTTP exchange.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("server responded with {status}")]
    Status {
        status: StatusCode,
        /// The body's `message` field, when the body had one.
        message: Option<String>,
    },

    /// The response body was not the JSON shape the caller asked for.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// The backend-supplied message, if any.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of the failed exchange, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            Self::Decode(_) => None,
        }
    }
}

/// Failures of the login and registration endpoints.
///
/// `Display` is the user-facing message.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Credentials failed local validation; nothing was sent.
    #[error("{0}")]
    InvalidCredentials(String),

    /// The backend declined the request with its own message.
    #[error("{message}")]
    Rejected { message: String },

    /// The request failed without a usable backend message.
    #[error("{fallback}")]
    Request {
        fallback: &'static str,
        #[source]
        source: ApiError,
    },
}

impl AuthError {
    /// Message suitable for showing next to the form.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Failures of the durable key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Failures surfaced by [`crate::service::SessionService`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("could not persist session: {0}")]
    Storage(#[from] StorageError),

    /// Another login is still waiting for the backend.
    #[error("a login request is already in progress")]
    LoginInFlight,
}
