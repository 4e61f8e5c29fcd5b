//! System browser launcher

use gofer_core::Launcher;
use tracing::{debug, warn};

/// Opens URLs with the platform's default browser
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&self, url: &str) {
        debug!("Opening browser at {}", url);
        if let Err(e) = open::that_detached(url) {
            warn!("Could not open browser ({}); visit {} manually", e, url);
        }
    }
}
