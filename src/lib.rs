//! Problem-details middleware chain for axum services.
//!
//! Wraps an application [`axum::Router`] so that:
//! - panics in handlers become `500 application/problem+json` responses,
//! - `Prefer: return=minimal` turns successful responses into `204 No Content`,
//! - unmatched routes get a `404 application/problem+json` response,
//! - every response advertises `service-desc` / `service-doc` links.
//!
//! ```rust,no_run
//! use axum::{routing::get, Router};
//! use problem_chain::{config::AppConfig, http::build_router};
//!
//! let app = Router::new().route("/hello", get(|| async { "hello" }));
//! let app = build_router(app, &AppConfig::default());
//! ```

pub mod config;
pub mod http;
pub mod observability;

pub use config::AppConfig;
pub use http::HttpServer;
