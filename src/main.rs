//! Demo service running behind the problem-details middleware chain.

use std::path::PathBuf;

use axum::{http::StatusCode, routing::get, Router};
use clap::Parser;
use tokio::net::TcpListener;

use problem_chain::config::{load_config, validation::validate_config, AppConfig, ConfigError};
use problem_chain::http::{server::shutdown_signal, HttpServer};
use problem_chain::observability::init_logging;

#[derive(Parser)]
#[command(name = "problem-chain")]
#[command(about = "HTTP service with problem-details error handling", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => {
            let config = AppConfig::default();
            validate_config(&config).map_err(ConfigError::Validation)?;
            config
        }
    };

    init_logging(&config.observability)?;

    tracing::info!(
        config_file = ?cli.config,
        bind_address = %config.listener.bind_address,
        service_desc = %config.service_links.description,
        service_doc = %config.service_links.documentation,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let app = Router::new()
        .route("/", get(|| async { StatusCode::NO_CONTENT }))
        .route("/healthz", get(|| async { "ok" }));

    HttpServer::new(config, app)
        .run(listener, shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
