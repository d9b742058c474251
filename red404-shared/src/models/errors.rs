use serde::Deserialize;

/// Error body returned by the backend on non-2xx responses.
///
/// The backend may answer with an empty object, a bare `{"message": ...}`, or
/// a full envelope; only `message` is read.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Human readable failure reason.
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// Parse an error body, tolerating anything that is not JSON.
    ///
    /// Returns the non-blank `message` field when one is present.
    #[must_use]
    pub fn message_from_body(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<Self>(body)
            .ok()
            .and_then(|error| error.message)
            .filter(|message| !message.trim().is_empty())
    }
}
