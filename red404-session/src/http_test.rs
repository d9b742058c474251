use std::sync::Arc;

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode as AxumStatus},
    routing::{get, post},
};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use super::*;
use crate::test_support::spawn_backend;

struct FixedToken(Option<&'static str>);

impl TokenProvider for FixedToken {
    fn bearer_token(&self) -> Option<String> {
        self.0.map(str::to_string)
    }
}

#[derive(Debug, Deserialize)]
struct Echo {
    method: String,
    authorization: Option<String>,
    content_type: Option<String>,
    body: Option<Value>,
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

async fn echo_router() -> String {
    async fn echo_without_body(method: axum::http::Method, headers: HeaderMap) -> Json<Value> {
        Json(json!({
            "method": method.as_str(),
            "authorization": header(&headers, "authorization"),
            "content_type": header(&headers, "content-type"),
            "body": null,
        }))
    }

    async fn echo_with_body(
        method: axum::http::Method,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        Json(json!({
            "method": method.as_str(),
            "authorization": header(&headers, "authorization"),
            "content_type": header(&headers, "content-type"),
            "body": body,
        }))
    }

    let router = Router::new()
        .route(
            "/echo",
            get(echo_without_body)
                .delete(echo_without_body)
                .post(echo_with_body)
                .put(echo_with_body)
                .patch(echo_with_body),
        )
        .route(
            "/api/fail",
            post(|| async {
                (
                    AxumStatus::UNAUTHORIZED,
                    Json(json!({"success": false, "message": "invalid password"})),
                )
            }),
        )
        .route(
            "/api/broken",
            get(|| async { (AxumStatus::BAD_GATEWAY, "upstream down") }),
        )
        .route("/api/not-json", get(|| async { "plain text" }));

    spawn_backend(router).await
}

#[test]
fn test_api_url_joins_with_single_slash() {
    let client = ApiClient::new("http://localhost:8080/");
    assert_eq!(client.base_url(), "http://localhost:8080");
    assert_eq!(
        client.api_url("/api/login"),
        "http://localhost:8080/api/login"
    );
    assert_eq!(
        client.api_url("api/register"),
        "http://localhost:8080/api/register"
    );
}

#[tokio::test]
async fn test_get_without_token_sends_json_content_type_only() {
    let origin = echo_router().await;
    let client = ApiClient::new(&origin);

    let echo: Echo = client.get("/echo").await.unwrap();
    assert_eq!(echo.method, "GET");
    assert_eq!(echo.authorization, None);
    assert_eq!(echo.content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn test_bearer_token_attached_when_present() {
    let origin = echo_router().await;
    let client = ApiClient::new(&origin).with_token_provider(Arc::new(FixedToken(Some("tok-1"))));

    let echo: Echo = client.delete("/echo").await.unwrap();
    assert_eq!(echo.method, "DELETE");
    assert_eq!(echo.authorization.as_deref(), Some("Bearer tok-1"));
}

#[tokio::test]
async fn test_provider_without_token_sends_no_authorization() {
    let origin = echo_router().await;
    let client = ApiClient::new(&origin).with_token_provider(Arc::new(FixedToken(None)));

    let echo: Echo = client.get("/echo").await.unwrap();
    assert_eq!(echo.authorization, None);
}

#[tokio::test]
async fn test_body_methods_serialize_json() {
    let origin = echo_router().await;
    let client = ApiClient::new(&origin);
    let payload = json!({"email": "a@b.com", "password": "pw123456"});

    let posted: Echo = client.post("/echo", &payload).await.unwrap();
    let put: Echo = client.put("/echo", &payload).await.unwrap();
    let patched: Echo = client.patch("/echo", &payload).await.unwrap();

    assert_eq!(posted.method, "POST");
    assert_eq!(put.method, "PUT");
    assert_eq!(patched.method, "PATCH");
    for echo in [posted, put, patched] {
        assert_eq!(echo.body.as_ref(), Some(&payload));
        assert_eq!(echo.content_type.as_deref(), Some("application/json"));
    }
}

#[tokio::test]
async fn test_non_success_status_carries_backend_message() {
    let origin = echo_router().await;
    let client = ApiClient::new(&origin);

    let result: Result<Value, ApiError> = client.post("/api/fail", &json!({})).await;
    let error = result.unwrap_err();
    assert_eq!(error.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(error.backend_message(), Some("invalid password"));
}

#[tokio::test]
async fn test_non_json_error_body_has_no_message() {
    let origin = echo_router().await;
    let client = ApiClient::new(&origin);

    let result: Result<Value, ApiError> = client.get("/api/broken").await;
    let error = result.unwrap_err();
    assert_eq!(error.status(), Some(StatusCode::BAD_GATEWAY));
    assert_eq!(error.backend_message(), None);
}

#[tokio::test]
async fn test_unparseable_success_body_is_decode_error() {
    let origin = echo_router().await;
    let client = ApiClient::new(&origin);

    let result: Result<Value, ApiError> = client.get("/api/not-json").await;
    let error = result.unwrap_err();
    assert!(matches!(error, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let origin = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = ApiClient::new(&origin);
    let result: Result<Value, ApiError> = client.get("/echo").await;
    let error = result.unwrap_err();
    assert!(matches!(error, ApiError::Transport(_)));
}
