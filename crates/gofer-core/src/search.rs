//! Index-search sub-client
//!
//! A search is an ordinary gopher request whose line is
//! `<selector>\t<terms>`. The reply is a directory listing and goes back
//! through the document model and renderer.

use crate::directory;
use crate::error::{GatewayError, Result};
use crate::item_type::ItemType;
use crate::locator::NavigationContext;
use crate::render;
use crate::transport::{Transport, TransportError};

/// Trim a submitted `query` form field; empty or missing is rejected
pub fn require_query(raw: Option<&str>) -> Result<String> {
    match raw.map(str::trim) {
        Some(query) if !query.is_empty() => Ok(query.to_string()),
        _ => Err(GatewayError::validation("Empty query")),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SearchClient {
    transport: Transport,
}

impl SearchClient {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub async fn search(
        &self,
        host: &str,
        port: &str,
        selector: &str,
        query: &str,
    ) -> std::result::Result<String, TransportError> {
        let reply = self
            .transport
            .fetch_text(host, port, &format!("{selector}\t{query}"))
            .await?;
        Ok(reply.trim().to_string())
    }
}

/// Render a search reply as an embedded listing
pub fn render_results(raw: &str, host: &str, port: &str, selector: &str) -> String {
    let context = NavigationContext::new(ItemType::Search, host, port, selector);
    let records = directory::parse(raw, &context);
    render::render_listing(&records, &context, true)
}
