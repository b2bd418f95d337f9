//! Service link advertisement.
//!
//! Every response passing through [`service_links_middleware`] carries
//! `service-desc` and `service-doc` relations in its `Link` header, merged
//! with whatever links the handler set itself. Handlers that want the links
//! in place before they finish can call [`add_service_links`] directly; the
//! [`ServiceLinks`] value is available to them as a request extension.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use crate::config::ServiceLinksConfig;
use crate::http::link::LinkSet;

/// Relation pointing at the machine-readable service description.
pub const SERVICE_DESC: &str = "service-desc";

/// Relation pointing at the human-readable service documentation.
pub const SERVICE_DOC: &str = "service-doc";

/// The two canonical link targets, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceLinks {
    pub description: String,
    pub documentation: String,
}

impl ServiceLinks {
    pub fn new(description: impl Into<String>, documentation: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            documentation: documentation.into(),
        }
    }
}

impl From<&ServiceLinksConfig> for ServiceLinks {
    fn from(config: &ServiceLinksConfig) -> Self {
        Self::new(&config.description, &config.documentation)
    }
}

/// Merge the canonical relations into `headers`.
///
/// Existing relations are left as they are, so calling this any number of
/// times produces the same header value as calling it once.
pub fn add_service_links(headers: &mut HeaderMap, links: &ServiceLinks) {
    let mut set = LinkSet::from_headers(headers);
    let added_desc = set.insert(&links.description, SERVICE_DESC);
    let added_doc = set.insert(&links.documentation, SERVICE_DOC);
    if added_desc || added_doc {
        set.write_to(headers);
    }
}

pub async fn service_links_middleware(
    State(links): State<Arc<ServiceLinks>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    req.extensions_mut().insert(Arc::clone(&links));

    let mut response = next.run(req).await;
    add_service_links(response.headers_mut(), &links);
    response
}
