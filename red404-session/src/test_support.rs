//! Fixtures shared by the unit tests of this crate.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::Router;
use reqwest::{Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tokio::{net::TcpListener, sync::Notify};

use crate::{error::ApiError, http::HttpClient};

/// Serve `router` on an ephemeral local port and return its origin.
pub async fn spawn_backend(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Body of a successful login for `user_id`/`email` carrying `token`.
pub fn login_success(token: &str, user_id: &str, email: &str) -> Value {
    json!({
        "success": true,
        "message": "ok",
        "data": {"token": token, "user": {"id": user_id, "email": email}}
    })
}

/// A request observed by [`ScriptedClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// In-process [`HttpClient`] replaying canned responses in order.
///
/// An optional gate holds every response until [`ScriptedClient::release`] is
/// called, which lets tests observe in-flight state.
#[derive(Clone, Default)]
pub struct ScriptedClient {
    responses: Arc<Mutex<VecDeque<Result<Value, (StatusCode, Option<String>)>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every response until released.
    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Notify::new())),
            ..Self::default()
        }
    }

    pub fn respond(self, body: Value) -> Self {
        self.responses.lock().unwrap().push_back(Ok(body));
        self
    }

    pub fn fail(self, status: StatusCode, message: Option<&str>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err((status, message.map(str::to_string))));
        self
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    async fn exchange<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            path: path.to_string(),
            body,
        });
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted response left");
        match next {
            Ok(value) => Ok(serde_json::from_value(value)?),
            Err((status, message)) => Err(ApiError::Status { status, message }),
        }
    }
}

#[async_trait]
impl HttpClient for ScriptedClient {
    async fn get<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send,
    {
        self.exchange(Method::GET, path, None).await
    }

    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send,
        B: Serialize + Sync + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.exchange(Method::POST, path, Some(body)).await
    }

    async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send,
        B: Serialize + Sync + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.exchange(Method::PUT, path, Some(body)).await
    }

    async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send,
        B: Serialize + Sync + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.exchange(Method::PATCH, path, Some(body)).await
    }

    async fn delete<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send,
    {
        self.exchange(Method::DELETE, path, None).await
    }
}
