//! Navigation context and gopher URI grammar
//!
//! A [`NavigationContext`] is the `(type, host, port, selector)` tuple of the
//! resource being fetched. It is threaded through parsing and rendering so
//! follow-up links can be built, and it converts to and from:
//! - gopher URIs, `gopher://host[:port]/<type><selector>`
//! - gateway-local navigation paths, `/?type=&host=&port=&selector=`

use serde::{Deserialize, Serialize};
use urlencoding::encode;

use crate::config::defaults::DEFAULT_SELECTOR;
use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::item_type::ItemType;
use crate::transport::join_host_port;

const GOPHER_SCHEME: &str = "gopher";

/// What is being fetched and how it was reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationContext {
    /// Type hint from the listing that linked here
    pub item_type: ItemType,
    pub host: String,
    pub port: String,
    pub selector: String,
}

impl NavigationContext {
    pub fn new(
        item_type: ItemType,
        host: impl Into<String>,
        port: impl Into<String>,
        selector: impl Into<String>,
    ) -> Self {
        Self {
            item_type,
            host: host.into(),
            port: port.into(),
            selector: selector.into(),
        }
    }

    /// The built-in default target: root directory of the default host
    pub fn default_target(config: &GatewayConfig) -> Self {
        Self::new(
            ItemType::Directory,
            config.default_host.clone(),
            config.default_port.clone(),
            DEFAULT_SELECTOR,
        )
    }

    /// Parse a URI that must carry the `gopher://` scheme
    pub fn from_gopher_uri(uri: &str, default_port: &str) -> Result<Self> {
        parse_uri(uri, default_port, true)
    }

    /// Parse the URI bar's input, where the scheme is optional
    pub fn from_uri_bar(input: &str, default_port: &str) -> Result<Self> {
        parse_uri(input, default_port, false)
    }

    pub fn addr(&self) -> String {
        join_host_port(&self.host, &self.port)
    }

    /// `host:port/<type><selector>`, the URI bar's form
    pub fn uri_bar_value(&self) -> String {
        let selector = if self.selector == DEFAULT_SELECTOR {
            ""
        } else {
            self.selector.as_str()
        };
        format!("{}/{}{}", self.addr(), self.item_type.as_char(), selector)
    }

    pub fn to_gopher_uri(&self) -> String {
        format!("{GOPHER_SCHEME}://{}", self.uri_bar_value())
    }

    /// Gateway-relative navigation path for this resource
    pub fn local_path(&self) -> String {
        navigation_path(self.item_type, &self.host, &self.port, &self.selector)
    }

    /// Absolute gateway URL, for handing to the browser
    pub fn local_url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.local_path())
    }
}

/// `/?type=..&host=..&port=..&selector=..` with every value percent-encoded
pub fn navigation_path(item_type: ItemType, host: &str, port: &str, selector: &str) -> String {
    let mut tag = [0u8; 4];
    format!(
        "/?type={}&host={}&port={}&selector={}",
        encode(item_type.as_char().encode_utf8(&mut tag)),
        encode(host),
        encode(port),
        encode(selector)
    )
}

fn parse_uri(raw: &str, default_port: &str, require_scheme: bool) -> Result<NavigationContext> {
    let raw = raw.trim();

    let rest = match raw.split_once("://") {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case(GOPHER_SCHEME) => rest,
        Some((scheme, _)) => {
            return Err(GatewayError::validation(format!(
                "unsupported scheme '{scheme}' in {raw}"
            )))
        }
        None if require_scheme => {
            return Err(GatewayError::validation(format!("not a gopher URI: {raw}")))
        }
        None => raw,
    };

    let (authority, path) = match rest.find('/') {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };

    let (host, port) = split_authority(authority, default_port)?;

    let path = path.strip_prefix('/').unwrap_or(path);
    let path = urlencoding::decode(path)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| path.to_string());

    let mut chars = path.chars();
    let (item_type, selector) = match chars.next() {
        None => (ItemType::Directory, DEFAULT_SELECTOR.to_string()),
        Some(tag) => {
            let selector = chars.as_str();
            let selector = if selector.is_empty() {
                DEFAULT_SELECTOR
            } else {
                selector
            };
            (ItemType::from_char(tag), selector.to_string())
        }
    };

    Ok(NavigationContext::new(item_type, host, port, selector))
}

fn split_authority(authority: &str, default_port: &str) -> Result<(String, String)> {
    let (host, port) = if let Some(bracketed) = authority.strip_prefix('[') {
        let (host, after) = bracketed
            .split_once(']')
            .ok_or_else(|| GatewayError::validation(format!("unterminated IPv6 host: {authority}")))?;
        (host, after.strip_prefix(':').unwrap_or(""))
    } else {
        match authority.split_once(':') {
            Some((host, port)) => (host, port),
            None => (authority, ""),
        }
    };

    if host.is_empty() {
        return Err(GatewayError::validation(format!(
            "missing host in '{authority}'"
        )));
    }

    let port = if port.is_empty() { default_port } else { port };
    if port.parse::<u16>().is_err() {
        return Err(GatewayError::validation(format!("invalid port '{port}'")));
    }

    Ok((host.to_string(), port.to_string()))
}

/// Query parameters of a top-level navigation request
///
/// Either `uri` (the single-field bar) or the separate fields select the
/// target. Separate fields fall back to the default target piecewise.
///
/// An absent `host` or `selector` takes the default, but a present empty one
/// is kept: an empty selector names a server's root menu and differs from `/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NavigationRequest {
    pub uri: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub host: Option<String>,
    pub port: Option<String>,
    pub selector: Option<String>,
}

impl NavigationRequest {
    pub fn resolve(&self, config: &GatewayConfig) -> Result<NavigationContext> {
        if let Some(uri) = non_empty(&self.uri) {
            return NavigationContext::from_uri_bar(uri, &config.default_port);
        }

        let item_type = non_empty(&self.item_type)
            .and_then(ItemType::from_hint)
            .unwrap_or(ItemType::Directory);
        let host = self.host.as_deref().unwrap_or(&config.default_host);
        let port = non_empty(&self.port).unwrap_or(&config.default_port);
        let selector = self.selector.as_deref().unwrap_or(DEFAULT_SELECTOR);

        Ok(NavigationContext::new(item_type, host, port, selector))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_uri() {
        let ctx = NavigationContext::from_gopher_uri("gopher://example.org:7070/1/users", "70").unwrap();
        assert_eq!(ctx.item_type, ItemType::Directory);
        assert_eq!(ctx.host, "example.org");
        assert_eq!(ctx.port, "7070");
        assert_eq!(ctx.selector, "/users");
    }

    #[test]
    fn test_parse_root_and_default_port() {
        let ctx = NavigationContext::from_gopher_uri("gopher://example.org", "70").unwrap();
        assert_eq!(ctx, NavigationContext::new(ItemType::Directory, "example.org", "70", "/"));

        let ctx = NavigationContext::from_gopher_uri("GOPHER://example.org/", "70").unwrap();
        assert_eq!(ctx.selector, "/");
    }

    #[test]
    fn test_parse_decodes_selector() {
        let ctx = NavigationContext::from_gopher_uri("gopher://h/0/a%20file.txt", "70").unwrap();
        assert_eq!(ctx.item_type, ItemType::Text);
        assert_eq!(ctx.selector, "/a file.txt");
    }

    #[test]
    fn test_parse_ipv6() {
        let ctx = NavigationContext::from_gopher_uri("gopher://[::1]:7070/1", "70").unwrap();
        assert_eq!(ctx.host, "::1");
        assert_eq!(ctx.port, "7070");
        assert_eq!(ctx.addr(), "[::1]:7070");
    }

    #[test]
    fn test_scheme_rules() {
        assert!(NavigationContext::from_gopher_uri("http://example.org/", "70").is_err());
        assert!(NavigationContext::from_gopher_uri("example.org:70/", "70").is_err());
        assert!(NavigationContext::from_uri_bar("example.org:70/", "70").is_ok());
        assert!(NavigationContext::from_uri_bar("https://example.org/", "70").is_err());
    }

    #[test]
    fn test_rejects_bad_authority() {
        assert!(NavigationContext::from_uri_bar("gopher:///1/x", "70").is_err());
        assert!(NavigationContext::from_uri_bar("example.org:port/", "70").is_err());
    }

    #[test]
    fn test_uri_bar_round_trip() {
        let ctx = NavigationContext::new(ItemType::Text, "example.org", "70", "/docs/readme");
        assert_eq!(ctx.uri_bar_value(), "example.org:70/0/docs/readme");
        assert_eq!(ctx.to_gopher_uri(), "gopher://example.org:70/0/docs/readme");
        assert_eq!(NavigationContext::from_uri_bar(&ctx.uri_bar_value(), "70").unwrap(), ctx);
        assert_eq!(NavigationContext::from_gopher_uri(&ctx.to_gopher_uri(), "70").unwrap(), ctx);

        let root = NavigationContext::new(ItemType::Directory, "example.org", "70", "/");
        assert_eq!(root.uri_bar_value(), "example.org:70/1");
        assert_eq!(NavigationContext::from_uri_bar(&root.uri_bar_value(), "70").unwrap(), root);
    }

    #[test]
    fn test_local_path_encoding() {
        let ctx = NavigationContext::new(ItemType::Directory, "example.org", "70", "/a b&c=d");
        assert_eq!(
            ctx.local_path(),
            "/?type=1&host=example.org&port=70&selector=%2Fa%20b%26c%3Dd"
        );
        assert_eq!(
            ctx.local_url("http://127.0.0.1:8000/"),
            "http://127.0.0.1:8000/?type=1&host=example.org&port=70&selector=%2Fa%20b%26c%3Dd"
        );
    }

    #[test]
    fn test_resolve_defaults() {
        let config = GatewayConfig::new();
        let ctx = NavigationRequest::default().resolve(&config).unwrap();
        assert_eq!(ctx, NavigationContext::default_target(&config));

        let request = NavigationRequest {
            item_type: Some("0".into()),
            host: Some("example.org".into()),
            ..Default::default()
        };
        let ctx = request.resolve(&config).unwrap();
        assert_eq!(ctx, NavigationContext::new(ItemType::Text, "example.org", "70", "/"));
    }

    #[test]
    fn test_resolve_keeps_present_empty_fields() {
        let config = GatewayConfig::new();
        let request = NavigationRequest {
            item_type: Some("1".into()),
            host: Some("gopher.floodgap.com".into()),
            port: Some("70".into()),
            selector: Some(String::new()),
            ..Default::default()
        };
        let ctx = request.resolve(&config).unwrap();
        assert_eq!(ctx.selector, "");

        let request = NavigationRequest {
            host: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(request.resolve(&config).unwrap().host, "");
    }

    #[test]
    fn test_resolve_prefers_uri() {
        let config = GatewayConfig::new();
        let request = NavigationRequest {
            uri: Some("example.org:7070/0/notes".into()),
            host: Some("ignored.org".into()),
            ..Default::default()
        };
        let ctx = request.resolve(&config).unwrap();
        assert_eq!(ctx, NavigationContext::new(ItemType::Text, "example.org", "7070", "/notes"));
    }
}
