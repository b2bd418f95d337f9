//! Panic recovery boundary.
//!
//! # Responsibilities
//! - Catch panics raised anywhere downstream while producing a response
//! - Log the panic message and, optionally, a bounded prefix of the request body
//! - Replace the lost response with a `500` problem response
//!
//! # Design Decisions
//! - The request body is tee'd while the handler reads it, never pre-read,
//!   so large uploads are not buffered and the handler sees them unchanged
//! - Panic detail reaches the client only when `expose_detail` is set
//! - Body logging problems are logged and otherwise ignored

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use bytes::{Bytes, BytesMut};
use futures_util::FutureExt;
use http_body::{Body as HttpBody, Frame, SizeHint};

use crate::config::RecoveryConfig;
use crate::http::problem::ProblemResponse;

pub async fn recovery_middleware(
    State(config): State<Arc<RecoveryConfig>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let (req, capture) = if config.log_body && has_body(&req) {
        let capture = Arc::new(Mutex::new(Captured::default()));
        let limit = config.max_logged_body_bytes;
        let tee = Arc::clone(&capture);
        let req = req.map(|body| Body::new(CaptureBody::new(body, tee, limit)));
        (req, Some(capture))
    } else {
        (req, None)
    };

    let payload = match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(response) => return response,
        Err(payload) => payload,
    };

    let detail = panic_message(&*payload);
    tracing::error!(
        method = %method,
        path = %path,
        detail = %detail,
        "Recovered from panic in request handler"
    );

    if let Some(capture) = capture {
        log_captured_body(&capture);
    }

    let mut problem = ProblemResponse::internal_server_error().with_instance(path);
    if config.expose_detail {
        problem = problem.with_detail(detail);
    }
    problem.into_response()
}

fn has_body(req: &Request<Body>) -> bool {
    let body = req.body();
    !body.is_end_stream() && body.size_hint().exact() != Some(0)
}

/// Human-readable message for a panic payload.
///
/// Understands `panic!` messages and error values raised with
/// `std::panic::panic_any(Box<dyn Error + Send + Sync>)`.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(e) = payload.downcast_ref::<Box<dyn std::error::Error + Send + Sync>>() {
        e.to_string()
    } else {
        "unknown panic payload".to_string()
    }
}

fn log_captured_body(capture: &Mutex<Captured>) {
    let captured = match capture.lock() {
        Ok(captured) => captured,
        Err(_) => {
            tracing::warn!("Request body capture unavailable, skipping body log");
            return;
        }
    };
    if captured.total == 0 {
        return;
    }
    tracing::error!(
        body = %String::from_utf8_lossy(&captured.bytes),
        body_bytes_read = captured.total,
        truncated = captured.total > captured.bytes.len(),
        "Request body of failed request"
    );
}

#[derive(Debug, Default)]
struct Captured {
    bytes: BytesMut,
    /// Bytes the handler read, including those past the limit.
    total: usize,
}

/// Request body wrapper copying the first `limit` bytes it yields.
struct CaptureBody {
    inner: Body,
    capture: Arc<Mutex<Captured>>,
    limit: usize,
}

impl CaptureBody {
    fn new(inner: Body, capture: Arc<Mutex<Captured>>, limit: usize) -> Self {
        Self {
            inner,
            capture,
            limit,
        }
    }

    fn record(&self, data: &Bytes) {
        let Ok(mut captured) = self.capture.lock() else {
            return;
        };
        captured.total += data.len();
        let room = self.limit.saturating_sub(captured.bytes.len());
        let take = room.min(data.len());
        captured.bytes.extend_from_slice(&data[..take]);
    }
}

impl HttpBody for CaptureBody {
    type Data = Bytes;
    type Error = axum::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        let poll = Pin::new(&mut this.inner).poll_frame(cx);
        if let Poll::Ready(Some(Ok(frame))) = &poll {
            if let Some(data) = frame.data_ref() {
                this.record(data);
            }
        }
        poll
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}
