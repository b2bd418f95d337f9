//! Middleware chain.
//!
//! # Data Flow
//! ```text
//! request
//!     → links.rs (service links on the way out)
//!     → recovery.rs (panic boundary)
//!     → prefer.rs (return=minimal negotiation)
//!     → application handler or not_found.rs
//! ```
//!
//! Each unit is a plain `async fn(.., Request, Next) -> Response` mounted with
//! `axum::middleware::from_fn{,_with_state}`; see [`crate::http::server::build_router`].

pub mod links;
pub mod not_found;
pub mod prefer;
pub mod recovery;

pub use links::{add_service_links, service_links_middleware, ServiceLinks, SERVICE_DESC, SERVICE_DOC};
pub use not_found::not_found;
pub use prefer::{prefer_minimal_middleware, prefers_minimal};
pub use recovery::{panic_message, recovery_middleware};
