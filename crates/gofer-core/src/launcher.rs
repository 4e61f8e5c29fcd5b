//! Browser launcher trait
//!
//! Opening the user's browser is an OS side effect owned by the binary. The
//! coordinator only needs "open this URL, don't wait, don't fail", so the
//! seam is a small trait with in-crate no-op and recording implementations.

use std::sync::{Arc, Mutex};

/// Fire-and-forget request to show a URL to the user
///
/// Implementations log their own failures; a failed launch is never fatal.
pub trait Launcher: Send + Sync {
    fn launch(&self, url: &str);
}

/// Launcher that does nothing (headless runs)
#[derive(Debug, Default, Clone)]
pub struct NoOpLauncher;

impl Launcher for NoOpLauncher {
    fn launch(&self, url: &str) {
        tracing::debug!("Browser launch suppressed for {}", url);
    }
}

/// Launcher that remembers every URL it was asked to open
#[derive(Debug, Default, Clone)]
pub struct RecordingLauncher {
    urls: Arc<Mutex<Vec<String>>>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launched(&self) -> Vec<String> {
        self.urls
            .lock()
            .map(|urls| urls.clone())
            .unwrap_or_default()
    }
}

impl Launcher for RecordingLauncher {
    fn launch(&self, url: &str) {
        if let Ok(mut urls) = self.urls.lock() {
            urls.push(url.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_launcher_shares_history_across_clones() {
        let launcher = RecordingLauncher::new();
        let handle: Arc<dyn Launcher> = Arc::new(launcher.clone());

        handle.launch("http://127.0.0.1:8000/");
        handle.launch("http://127.0.0.1:8000/?type=0");

        assert_eq!(
            launcher.launched(),
            vec!["http://127.0.0.1:8000/", "http://127.0.0.1:8000/?type=0"]
        );
    }

    #[test]
    fn test_noop_launcher() {
        NoOpLauncher.launch("http://127.0.0.1:8000/");
    }
}
