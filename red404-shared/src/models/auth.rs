use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use super::User;

/// Email/password pair submitted to `POST /api/login`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Plaintext password; only ever sent over the wire.
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /api/register`.
///
/// Unknown fields are carried in `extra` and flattened into the JSON object,
/// so new sign-up fields can be sent without a client release.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRequest {
    /// Account email.
    pub email: String,
    /// Plaintext password; only ever sent over the wire.
    pub password: String,
    /// Additional string-valued sign-up fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl RegisterRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Attach an extra sign-up field. `email` and `password` cannot be shadowed.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        if key != "email" && key != "password" {
            self.extra.insert(key, value.into());
        }
        self
    }

    /// The credential part of the registration.
    #[must_use]
    pub fn credentials(&self) -> LoginRequest {
        LoginRequest::new(self.email.clone(), self.password.clone())
    }
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("extra", &self.extra)
            .finish()
    }
}

/// The `{success, message, data}` wrapper every backend response uses.
///
/// Missing fields decode as absent so partially specified bodies still
/// decode; use [`ApiEnvelope::into_outcome`] instead of reaching into the fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

/// Tagged view of an [`ApiEnvelope`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiOutcome<T> {
    /// The backend accepted the request and returned a payload.
    Ok { data: T, message: Option<String> },
    /// The backend declined the request.
    Err { message: Option<String> },
}

impl<T> ApiEnvelope<T> {
    /// Collapse the envelope into an explicit success or failure.
    ///
    /// Success requires both `success: true` and a `data` payload.
    pub fn into_outcome(self) -> ApiOutcome<T> {
        let message = self.message.filter(|message| !message.trim().is_empty());
        match (self.success, self.data) {
            (true, Some(data)) => ApiOutcome::Ok { data, message },
            _ => ApiOutcome::Err { message },
        }
    }
}

/// Payload of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginData {
    /// Opaque bearer token.
    pub token: String,
    /// The account that signed in.
    pub user: User,
}

/// A successful login as handed back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub data: LoginData,
}

/// Raw registration response; the payload shape is backend-defined.
pub type RegisterResponse = ApiEnvelope<serde_json::Value>;
