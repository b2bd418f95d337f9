//! Fallback for requests no route matched.

use axum::{
    http::{Method, Uri},
    response::{IntoResponse, Response},
};

use crate::http::problem::ProblemResponse;

/// Terminal handler: always a `404` problem response.
pub async fn not_found(method: Method, uri: Uri) -> Response {
    tracing::debug!(method = %method, path = %uri.path(), "No route matched");
    ProblemResponse::not_found()
        .with_instance(uri.path())
        .into_response()
}
