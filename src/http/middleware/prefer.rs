//! `Prefer: return=minimal` negotiation.
//!
//! Successful (2xx) responses to requests that ask for a minimal return are
//! replaced by an empty `204 No Content`. Everything else, including error
//! responses, is passed through untouched: error bodies are what the client
//! needs to see even when it asked for brevity.

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::http::buffer::ResponseBuffer;

pub const PREFER: HeaderName = HeaderName::from_static("prefer");
pub const PREFERENCE_APPLIED: HeaderName = HeaderName::from_static("preference-applied");

const RETURN_MINIMAL: &str = "return=minimal";

/// True if any `Prefer` line carries the `return=minimal` preference.
pub fn prefers_minimal(headers: &HeaderMap) -> bool {
    headers
        .get_all(PREFER)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .any(is_return_minimal)
}

fn is_return_minimal(preference: &str) -> bool {
    // Parameters after `;` do not change the preference itself.
    let token = preference.split(';').next().unwrap_or_default();
    match token.split_once('=') {
        Some((name, value)) => {
            name.trim().eq_ignore_ascii_case("return") && value.trim().trim_matches('"') == "minimal"
        }
        None => false,
    }
}

pub async fn prefer_minimal_middleware(req: Request<Body>, next: Next) -> Response {
    let minimal = prefers_minimal(req.headers());
    let mut buffer = ResponseBuffer::new(next.run(req).await);

    add_vary_prefer(buffer.headers_mut());

    if minimal && buffer.status().is_success() {
        tracing::debug!(status = %buffer.status(), "Honoring return=minimal, dropping body");
        buffer.discard_body();
        buffer
            .headers_mut()
            .insert(PREFERENCE_APPLIED, HeaderValue::from_static(RETURN_MINIMAL));
    }

    buffer.commit()
}

fn add_vary_prefer(headers: &mut HeaderMap) {
    let already = headers
        .get_all(header::VARY)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .any(|v| v == "*" || v.eq_ignore_ascii_case(PREFER.as_str()));
    if !already {
        headers.append(header::VARY, HeaderValue::from_static("prefer"));
    }
}
