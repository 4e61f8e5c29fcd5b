//! Activity tracking and idle shutdown
//!
//! Every inbound request touches the shared last-activity timestamp. The
//! monitor samples it on a fixed period and, once the idle time reaches the
//! threshold, fires the shutdown signal. The lock guards only the timestamp
//! read or write and is never held across I/O.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Shared last-activity timestamp
#[derive(Debug, Clone)]
pub struct ActivityTracker {
    last_activity: Arc<Mutex<Instant>>,
}

impl Default for ActivityTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityTracker {
    /// Start tracking with "now" as the last activity
    pub fn new() -> Self {
        Self {
            last_activity: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Record activity now
    pub async fn touch(&self) {
        *self.last_activity.lock().await = Instant::now();
    }

    /// Time since the last recorded activity
    pub async fn idle_for(&self) -> Duration {
        let last = *self.last_activity.lock().await;
        last.elapsed()
    }
}

/// Periodic idle check
#[derive(Debug, Clone)]
pub struct ActivityMonitor {
    tracker: ActivityTracker,
    idle_timeout: Duration,
    interval: Duration,
}

impl ActivityMonitor {
    pub fn new(tracker: ActivityTracker, idle_timeout: Duration, interval: Duration) -> Self {
        Self {
            tracker,
            idle_timeout,
            interval,
        }
    }

    /// Run on a background task; `shutdown` fires once when idle
    pub fn spawn(self, shutdown: broadcast::Sender<()>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }

    pub async fn run(self, shutdown: broadcast::Sender<()>) {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let idle = self.tracker.idle_for().await;
            debug!("Idle for {:?}", idle);

            if idle >= self.idle_timeout {
                info!(
                    "No activity for {} seconds. Shutting down...",
                    self.idle_timeout.as_secs()
                );
                // Nobody listening just means the server is already gone
                let _ = shutdown.send(());
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDLE: Duration = Duration::from_secs(60);
    const INTERVAL: Duration = Duration::from_secs(5);

    #[tokio::test(start_paused = true)]
    async fn test_touch_resets_idle_time() {
        let tracker = ActivityTracker::new();
        time::advance(Duration::from_secs(42)).await;
        assert!(tracker.idle_for().await >= Duration::from_secs(42));

        tracker.touch().await;
        assert!(tracker.idle_for().await < Duration::from_millis(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_fires_within_one_interval_of_threshold() {
        let tracker = ActivityTracker::new();
        let started = Instant::now();
        let (tx, mut rx) = broadcast::channel(1);

        let handle = ActivityMonitor::new(tracker, IDLE, INTERVAL).spawn(tx);
        rx.recv().await.unwrap();

        let elapsed = started.elapsed();
        assert!(elapsed >= IDLE, "fired early: {elapsed:?}");
        assert!(elapsed < IDLE + INTERVAL, "fired late: {elapsed:?}");
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_activity_postpones_shutdown() {
        let tracker = ActivityTracker::new();
        let started = Instant::now();
        let (tx, mut rx) = broadcast::channel(1);
        ActivityMonitor::new(tracker.clone(), IDLE, INTERVAL).spawn(tx);

        time::sleep(Duration::from_secs(50)).await;
        tracker.touch().await;
        let last_touch = Instant::now();

        rx.recv().await.unwrap();
        assert!(last_touch.elapsed() >= IDLE);
        assert!(last_touch.elapsed() < IDLE + INTERVAL);
        assert!(started.elapsed() >= Duration::from_secs(110));
    }
}
