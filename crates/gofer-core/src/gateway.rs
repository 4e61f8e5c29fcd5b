//! Top-level navigation dispatch
//!
//! The declared item type only selects the transport flavor: text and
//! directory targets are fetched as text, everything else as bytes. A failed
//! fetch becomes a one-record listing so the page stays navigable.

use tracing::{debug, warn};

use crate::content::{guess_content_type, TEXT_HTML, TEXT_PLAIN};
use crate::directory::{self, DirectoryRecord};
use crate::item_type::ItemType;
use crate::locator::NavigationContext;
use crate::render::render_listing;
use crate::transport::Transport;

/// What the HTTP layer sends back for a navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Rendered listing (or synthetic error listing)
    Html(String),
    /// Plain text file, streamed verbatim
    Text(String),
    /// Opaque payload with a guessed content type
    Bytes {
        content_type: &'static str,
        body: Vec<u8>,
    },
}

impl Reply {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Html(_) => TEXT_HTML,
            Self::Text(_) => TEXT_PLAIN,
            Self::Bytes { content_type, .. } => content_type,
        }
    }

    pub fn into_body(self) -> Vec<u8> {
        match self {
            Self::Html(body) | Self::Text(body) => body.into_bytes(),
            Self::Bytes { body, .. } => body,
        }
    }
}

/// Fetch `context` and shape the reply by its declared type
pub async fn navigate(transport: &Transport, context: &NavigationContext) -> Reply {
    debug!(
        "Navigating to {} (type {})",
        context.to_gopher_uri(),
        context.item_type
    );

    if context.item_type.is_transparent() {
        match transport
            .fetch_text(&context.host, &context.port, &context.selector)
            .await
        {
            Ok(text) if context.item_type == ItemType::Text => Reply::Text(text),
            Ok(text) => {
                let records = directory::parse(&text, context);
                Reply::Html(render_listing(&records, context, false))
            }
            Err(e) => failure_listing(context, &e),
        }
    } else {
        match transport
            .fetch_bytes(&context.host, &context.port, &context.selector)
            .await
        {
            Ok(body) => Reply::Bytes {
                content_type: guess_content_type(&body),
                body,
            },
            Err(e) => failure_listing(context, &e),
        }
    }
}

fn failure_listing(context: &NavigationContext, err: &dyn std::fmt::Display) -> Reply {
    warn!("Fetch of {} failed: {}", context.to_gopher_uri(), err);
    let record = DirectoryRecord::error(format!("Connection failed: {err}"), context);
    Reply::Html(render_listing(&[record], context, false))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::transport::test_server::{closed_addr, serve_once};

    fn transport() -> Transport {
        Transport::new(Duration::from_secs(2), Duration::from_millis(500))
    }

    fn local(item_type: ItemType, port: u16, selector: &str) -> NavigationContext {
        NavigationContext::new(item_type, "127.0.0.1", port.to_string(), selector)
    }

    #[tokio::test]
    async fn test_directory_is_rendered() {
        let (addr, request) = serve_once(
            None,
            b"1Sub\t/sub\t127.0.0.1\t70\r\n.\r\n".to_vec(),
            Duration::ZERO,
        )
        .await;

        let reply = navigate(&transport(), &local(ItemType::Directory, addr.port(), "/")).await;

        assert_eq!(request.await.unwrap(), "/\r\n");
        assert_eq!(reply.content_type(), TEXT_HTML);
        let Reply::Html(html) = reply else {
            panic!("expected html");
        };
        assert!(html.contains(">Sub</a>"));
    }

    #[tokio::test]
    async fn test_text_is_verbatim() {
        let (addr, _request) =
            serve_once(None, b"<not html>\r\n".to_vec(), Duration::ZERO).await;

        let reply = navigate(&transport(), &local(ItemType::Text, addr.port(), "/readme")).await;
        assert_eq!(reply, Reply::Text("<not html>\r\n".into()));
        assert_eq!(reply.content_type(), TEXT_PLAIN);
    }

    #[tokio::test]
    async fn test_opaque_types_keep_bytes() {
        let payload = b"GIF89a\x00\xff\x10".to_vec();
        let (addr, _request) = serve_once(None, payload.clone(), Duration::ZERO).await;

        let reply = navigate(&transport(), &local(ItemType::Info, addr.port(), "/x")).await;
        assert_eq!(
            reply,
            Reply::Bytes {
                content_type: "image/gif",
                body: payload
            }
        );
    }

    #[tokio::test]
    async fn test_failure_becomes_error_listing() {
        let addr = closed_addr().await;
        let context = local(ItemType::Directory, addr.port(), "/gone");

        let reply = navigate(&transport(), &context).await;

        let Reply::Html(html) = reply else {
            panic!("expected html");
        };
        assert!(html.contains("[ERR]"));
        assert!(html.contains("Connection failed"));
        assert!(html.contains(&format!("value=\"127.0.0.1:{}/1/gone\"", addr.port())));
    }
}
