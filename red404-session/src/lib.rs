#![cfg_attr(not(test), forbid(unsafe_code))]

//! Client-side authentication for red404.
//!
//! [`SessionService`] owns the observable session, [`SessionStore`] owns the
//! persisted `auth_token`/`user_data` keys, and [`RouteGuard`] decides what a
//! protected route shows for a given [`SessionState`].

pub mod endpoints;
pub mod error;
pub mod guard;
pub mod http;
pub mod routes;
pub mod service;
pub mod storage;
pub mod store;

#[cfg(test)]
mod test_support;

pub use endpoints::{AuthEndpoints, login_user, register_user, validate_credentials};
pub use error::{ApiError, AuthError, SessionError, StorageError};
pub use guard::{GuardDecision, RouteGuard};
pub use http::{ApiClient, HttpClient, TokenProvider};
pub use routes::{AppRoute, GoogleAuthMode};
pub use service::{SessionService, SessionState};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use store::{Restored, SessionStore, TOKEN_KEY, USER_KEY};
