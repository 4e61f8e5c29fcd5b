//! Single-instance coordination
//!
//! Whoever binds the service port first is the primary: it serves the
//! gateway, opens the browser and shuts itself down once idle. Any later
//! invocation finds the port taken and only forwards its URI to the primary
//! through `/focus`.

use std::future::IntoFuture;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use gofer_core::{
    ActivityMonitor, ActivityTracker, GatewayConfig, GatewayError, Launcher, NavigationContext,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::server::{self, GatewayState};

/// Outcome of trying to claim the service port
#[derive(Debug)]
pub enum Election {
    Primary(TcpListener),
    Secondary,
}

/// Bind `addr`; a port already in use means another instance is primary
pub async fn elect(addr: SocketAddr) -> Result<Election, GatewayError> {
    match TcpListener::bind(addr).await {
        Ok(listener) => Ok(Election::Primary(listener)),
        Err(e) if e.kind() == io::ErrorKind::AddrInUse => Ok(Election::Secondary),
        Err(e) => Err(e.into()),
    }
}

/// Where the primary should open its first page
///
/// An unparseable argument falls back to the default target.
pub fn initial_target(config: &GatewayConfig, uri: Option<&str>) -> NavigationContext {
    match uri {
        Some(uri) => NavigationContext::from_gopher_uri(uri, &config.default_port).unwrap_or_else(|e| {
            warn!("Ignoring '{}': {}", uri, e);
            NavigationContext::default_target(config)
        }),
        None => NavigationContext::default_target(config),
    }
}

/// Hand `uri` to the running primary
///
/// Any HTTP answer counts as delivered, including a 400 for a URI the
/// primary rejects. Only failing to reach the primary is an error.
pub async fn forward(config: &GatewayConfig, uri: Option<&str>) -> Result<(), GatewayError> {
    let client = reqwest::Client::builder()
        .timeout(config.connect_timeout + config.read_deadline)
        .build()
        .map_err(|e| GatewayError::Forwarding(e.to_string()))?;

    let mut request = client.get(format!("{}/focus", config.local_base_url()));
    if let Some(uri) = uri {
        request = request.query(&[("uri", uri)]);
    }

    let response = request
        .send()
        .await
        .map_err(|e| GatewayError::Forwarding(format!("could not reach primary: {e}")))?;

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    info!("Primary answered {}: {}", status, body.trim());
    Ok(())
}

/// Serve the gateway until idle shutdown or Ctrl-C
pub async fn run_primary(
    listener: TcpListener,
    config: GatewayConfig,
    initial: NavigationContext,
    launcher: Arc<dyn Launcher>,
) -> Result<(), GatewayError> {
    let config = config.with_service_addr(listener.local_addr()?);
    let base_url = config.local_base_url();

    let activity = ActivityTracker::new();
    let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);
    let monitor = ActivityMonitor::new(
        activity.clone(),
        config.idle_timeout,
        config.monitor_interval,
    )
    .spawn(shutdown_tx);

    let state = GatewayState::new(config, activity, launcher.clone());
    let app = server::router(state);

    info!("gofer (PID {}) serving on {}", std::process::id(), base_url);
    launcher.launch(&initial.local_url(&base_url));

    let result = tokio::select! {
        served = axum::serve(listener, app).into_future() => served.map_err(GatewayError::from),
        _ = shutdown_rx.recv() => Ok(()),
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
            Ok(())
        }
    };

    monitor.abort();
    result
}
