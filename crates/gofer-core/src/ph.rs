//! CSO/ph directory-lookup sub-client
//!
//! ph servers greet with a banner line and then accept commands. The gateway
//! only needs two single-shot exchanges: read the banner, or send one
//! `query` after discarding the banner. Each call owns its connection.

use tracing::debug;

use crate::error::{GatewayError, Result};
use crate::transport::{Transport, TransportError};

/// Route segment of `/ph/<host>:<port>`, split into host and port
pub fn parse_route(target: &str, default_port: &str) -> Result<(String, String)> {
    let target = target.trim_matches('/');
    let (host, port) = match target.split_once(':') {
        Some((host, port)) => (host, port),
        None => (target, ""),
    };

    if host.is_empty() {
        return Err(GatewayError::route(format!("missing ph host in '{target}'")));
    }
    if port.contains(':') || port.contains('/') {
        return Err(GatewayError::route(format!("invalid ph route '{target}'")));
    }

    let port = if port.is_empty() { default_port } else { port };
    Ok((host.to_string(), port.to_string()))
}

#[derive(Debug, Clone, Copy)]
pub struct PhClient {
    transport: Transport,
}

impl PhClient {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Connect, read the server banner, close
    pub async fn greet(&self, host: &str, port: &str) -> std::result::Result<String, TransportError> {
        let mut conn = self.transport.connect(host, port).await?;
        let banner = conn.read_line().await?.ok_or_else(|| TransportError::NoGreeting {
            addr: conn.addr().to_string(),
        })?;
        Ok(banner.trim().to_string())
    }

    /// Connect, discard the banner, send `query <text>`, read to close
    pub async fn query(
        &self,
        host: &str,
        port: &str,
        text: &str,
    ) -> std::result::Result<String, TransportError> {
        let mut conn = self.transport.connect(host, port).await?;
        if conn.read_line().await?.is_none() {
            return Err(TransportError::NoGreeting {
                addr: conn.addr().to_string(),
            });
        }

        conn.send_line(&format!("query {text}")).await?;
        let reply = conn.read_to_close().await?;
        debug!("ph query on {} returned {} bytes", conn.addr(), reply.len());

        Ok(String::from_utf8_lossy(&reply).trim().to_string())
    }
}
