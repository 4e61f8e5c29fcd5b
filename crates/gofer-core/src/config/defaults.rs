use std::time::Duration;

/// Loopback port the gateway serves on; also the single-instance lock
pub const DEFAULT_SERVICE_PORT: u16 = 8000;

/// Host loaded when no gopher URI is supplied
pub const DEFAULT_GOPHER_HOST: &str = "freeshell.org";

/// Well-known gopher port
pub const DEFAULT_GOPHER_PORT: &str = "70";

/// Well-known CSO/ph port
pub const DEFAULT_PH_PORT: &str = "105";

/// Root selector
pub const DEFAULT_SELECTOR: &str = "/";

/// Idle time after which the primary instance exits
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// How often the activity monitor samples the idle time
pub const DEFAULT_MONITOR_INTERVAL: Duration = Duration::from_secs(5);

/// Bound on establishing a remote connection
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Absolute deadline for the rest of a remote exchange
pub const DEFAULT_READ_DEADLINE: Duration = Duration::from_secs(5);

/// Line terminator for every request sent to a remote server
pub const REQUEST_TERMINATOR: &str = "\r\n";

/// Interval of the in-page heartbeat script (milliseconds), kept below the idle timeout
pub const PAGE_HEARTBEAT_INTERVAL_MS: u64 = 55_000;

/// Interval of the heartmon page ping (milliseconds)
pub const HEARTMON_INTERVAL_MS: u64 = 30_000;
