//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! middleware and server produce:
//!     → tracing events with structured fields (method, path, status, detail)
//!     → tower_http TraceLayer request spans
//!
//! logging.rs installs the subscriber:
//!     → stdout, human-readable or JSON
//! ```
//!
//! # Design Decisions
//! - RUST_LOG overrides the configured level
//! - JSON format for production, pretty format for development

pub mod logging;

pub use logging::init_logging;
