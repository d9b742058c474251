//! JSON-over-HTTP client used by the credential endpoints.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use reqwest::{
    Client, Method, RequestBuilder,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Serialize, de::DeserializeOwned};
use shared::models::ErrorResponse;
use tracing::{debug, warn};

use crate::error::ApiError;

/// Source of the bearer token attached to outgoing requests.
pub trait TokenProvider: Send + Sync {
    /// The current token, or `None` when signed out.
    fn bearer_token(&self) -> Option<String>;
}

/// Minimal REST surface the session layer depends on.
///
/// Every method resolves `path` against the client's base URL, sends and
/// receives JSON, and treats non-2xx responses as [`ApiError::Status`].
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send;

    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send,
        B: Serialize + Sync + ?Sized;

    async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send,
        B: Serialize + Sync + ?Sized;

    async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send,
        B: Serialize + Sync + ?Sized;

    async fn delete<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send;
}

/// `reqwest`-backed [`HttpClient`].
///
/// There is no retry, timeout or backoff; failures go straight to the caller.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
    token_provider: Option<Arc<dyn TokenProvider>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("has_token_provider", &self.token_provider.is_some())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client with the provided base URL.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            token_provider: None,
        }
    }

    /// Attach the source of bearer tokens.
    #[must_use]
    pub fn with_token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `base_url + path`, with exactly one slash between them.
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self
            .client
            .request(method, self.api_url(path))
            .header(CONTENT_TYPE, "application/json");

        match self
            .token_provider
            .as_ref()
            .and_then(|provider| provider.bearer_token())
        {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    async fn send<T>(&self, method: Method, path: &str, request: RequestBuilder) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(|err| {
            warn!(%method, path, error = %err, "request failed before a response");
            ApiError::Transport(err)
        })?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(%method, path, status = status.as_u16(), bytes = body.len(), "response received");

        if !status.is_success() {
            return Err(ApiError::Status {
                status,
                message: ErrorResponse::message_from_body(&body),
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl HttpClient for ApiClient {
    async fn get<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send,
    {
        let request = self.request(Method::GET, path);
        self.send(Method::GET, path, request).await
    }

    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send,
        B: Serialize + Sync + ?Sized,
    {
        let request = self.request(Method::POST, path).json(body);
        self.send(Method::POST, path, request).await
    }

    async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send,
        B: Serialize + Sync + ?Sized,
    {
        let request = self.request(Method::PUT, path).json(body);
        self.send(Method::PUT, path, request).await
    }

    async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send,
        B: Serialize + Sync + ?Sized,
    {
        let request = self.request(Method::PATCH, path).json(body);
        self.send(Method::PATCH, path, request).await
    }

    async fn delete<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send,
    {
        let request = self.request(Method::DELETE, path);
        self.send(Method::DELETE, path, request).await
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;
