use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use super::defaults;

/// Process-wide gateway configuration
///
/// Built once at startup from the constants in [`defaults`]. The `with_*`
/// builders exist so tests can shrink timeouts and bind ephemeral ports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Loopback address the primary instance binds
    pub service_addr: SocketAddr,
    /// Target used when no URI is given
    pub default_host: String,
    pub default_port: String,
    /// Port assumed for ph routes that omit one
    pub default_ph_port: String,
    /// Idle time before the primary exits
    pub idle_timeout: Duration,
    /// Sampling period of the activity monitor
    pub monitor_interval: Duration,
    /// Remote connect bound
    pub connect_timeout: Duration,
    /// Remote read deadline
    pub read_deadline: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            service_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, defaults::DEFAULT_SERVICE_PORT)),
            default_host: defaults::DEFAULT_GOPHER_HOST.to_string(),
            default_port: defaults::DEFAULT_GOPHER_PORT.to_string(),
            default_ph_port: defaults::DEFAULT_PH_PORT.to_string(),
            idle_timeout: defaults::DEFAULT_IDLE_TIMEOUT,
            monitor_interval: defaults::DEFAULT_MONITOR_INTERVAL,
            connect_timeout: defaults::DEFAULT_CONNECT_TIMEOUT,
            read_deadline: defaults::DEFAULT_READ_DEADLINE,
        }
    }
}

impl GatewayConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service_addr(mut self, addr: SocketAddr) -> Self {
        self.service_addr = addr;
        self
    }

    pub fn with_default_target(mut self, host: impl Into<String>, port: impl Into<String>) -> Self {
        self.default_host = host.into();
        self.default_port = port.into();
        self
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration, monitor_interval: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self.monitor_interval = monitor_interval;
        self
    }

    pub fn with_remote_timeouts(mut self, connect: Duration, read: Duration) -> Self {
        self.connect_timeout = connect;
        self.read_deadline = read;
        self
    }

    /// Base URL the browser uses to reach this gateway
    pub fn local_base_url(&self) -> String {
        format!("http://{}", self.service_addr)
    }
}
