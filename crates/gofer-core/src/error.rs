//! Gateway-wide error types
//!
//! `GatewayError` is the taxonomy every request path reports through. The
//! HTTP layer decides the status code; this crate only says what went wrong.

use thiserror::Error;

use crate::transport::TransportError;

/// Gateway-wide error type
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A remote gopher/ph server could not be reached or read
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Missing or invalid request parameters
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Malformed sub-protocol route such as `/ph/<host>:<port>`
    #[error("Invalid route: {0}")]
    Route(String),

    /// HTTP method not accepted by an endpoint
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// A secondary instance could not hand its request to the primary
    #[error("Failed to reach running instance: {0}")]
    Forwarding(String),

    /// Local I/O failure (binding the service address, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn route(message: impl Into<String>) -> Self {
        Self::Route(message.into())
    }

    /// Whether the failure was caused by the request rather than the network
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Route(_) | Self::MethodNotAllowed(_)
        )
    }
}

impl From<GatewayError> for String {
    fn from(err: GatewayError) -> String {
        err.to_string()
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, GatewayError>;
