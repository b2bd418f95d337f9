//! Shared fixtures for middleware integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header, HeaderMap, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Extension, Json, Router,
};
use tower::ServiceExt;

use problem_chain::config::AppConfig;
use problem_chain::http::build_router;
use problem_chain::http::middleware::{add_service_links, ServiceLinks};

/// Application routes exercised by the tests, without any middleware.
pub fn routes() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/test", get(|| async { "Hello, test" }))
        .route(
            "/non200",
            get(|| async { (StatusCode::BAD_REQUEST, "Error details") }),
        )
        .route("/created", get(|| async { (StatusCode::CREATED, "made it") }))
        .route("/empty", get(|| async { StatusCode::NO_CONTENT }))
        .route("/panic", get(panic_with_str).put(panic_after_body))
        .route("/panic-error", get(panic_with_error))
}

/// Routes wrapped in the middleware chain with default configuration.
pub fn app() -> Router {
    app_with(&AppConfig::default())
}

pub fn app_with(config: &AppConfig) -> Router {
    build_router(routes(), config)
}

async fn root(Extension(links): Extension<Arc<ServiceLinks>>) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(header::LINK, HeaderValue::from_static("<>; rel=self"));
    add_service_links(&mut headers, &links);
    (StatusCode::OK, headers, "Hello").into_response()
}

async fn panic_with_str() -> &'static str {
    panic!("Some error")
}

async fn panic_with_error() -> &'static str {
    let err: Box<dyn std::error::Error + Send + Sync> = "Some error".into();
    std::panic::panic_any(err)
}

async fn panic_after_body(Json(_body): Json<HashMap<String, String>>) -> &'static str {
    panic!("Some error")
}

/// Send a request through `app`, returning status, headers and the full body.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let (parts, body) = response.into_parts();
    let body = to_bytes(body, usize::MAX).await.expect("Failed to read body");
    (parts.status, parts.headers, body)
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn content_type(headers: &HeaderMap) -> &str {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

pub fn link(headers: &HeaderMap) -> &str {
    headers
        .get(header::LINK)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
