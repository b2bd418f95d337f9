//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Wrap an application Router in the middleware chain
//! - Install the problem-details 404 fallback
//! - Bind server to listener and serve until shutdown

use std::future::Future;
use std::sync::Arc;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::http::middleware::{
    not_found, prefer_minimal_middleware, recovery_middleware, service_links_middleware,
    ServiceLinks,
};

/// Wrap `app` in the middleware chain.
///
/// Layering, outermost first: request tracing, service links, panic
/// recovery, prefer-minimal, then the application routes or the 404
/// fallback. Service links sit outside the recovery boundary so that
/// recovered 500s advertise them too.
pub fn build_router(app: Router, config: &AppConfig) -> Router {
    let recovery = Arc::new(config.recovery.clone());
    let links = Arc::new(ServiceLinks::from(&config.service_links));

    app.fallback(not_found)
        .layer(from_fn(prefer_minimal_middleware))
        .layer(from_fn_with_state(recovery, recovery_middleware))
        .layer(from_fn_with_state(links, service_links_middleware))
        .layer(TraceLayer::new_for_http())
}

/// HTTP server running an application behind the middleware chain.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server for `app` with the given configuration.
    pub fn new(config: AppConfig, app: Router) -> Self {
        let router = build_router(app, &config);
        Self { router, config }
    }

    /// Run the server until `shutdown` resolves, then drain in-flight requests.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            expose_detail = self.config.recovery.expose_detail,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The fully layered router, for driving without a listener.
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Resolves on Ctrl+C. Never resolves if the handler cannot be installed.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
