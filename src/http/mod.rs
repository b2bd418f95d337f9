//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware wiring, graceful shutdown)
//!     → middleware/ (service links → recovery → prefer minimal)
//!     → application router, or middleware::not_found
//!     → problem.rs / link.rs / buffer.rs shape the outgoing response
//!     → Send to client
//! ```

pub mod buffer;
pub mod link;
pub mod middleware;
pub mod problem;
pub mod server;

pub use buffer::ResponseBuffer;
pub use link::{Link, LinkSet};
pub use problem::{ProblemResponse, PROBLEM_JSON};
pub use server::{build_router, HttpServer};
