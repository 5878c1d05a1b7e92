//! Shutdown coordination for the checker.

use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time;

/// Coordinator for orderly shutdown.
///
/// Every probe worker, the resolver and the HTTP server subscribe once at
/// spawn time and drop their receiver when they exit, so the receiver count
/// doubles as the number of tasks still running.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal all subscribers. Returns how many were notified.
    pub fn trigger(&self) -> usize {
        let notified = self.tx.send(()).unwrap_or(0);
        tracing::info!(tasks = notified, "Shutdown triggered");
        notified
    }

    /// Number of subscribed tasks that have not exited yet.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Wait for every subscriber to exit, up to `deadline`.
    ///
    /// Returns false if tasks were still running when the deadline passed.
    pub async fn drain(&self, deadline: Duration) -> bool {
        let wait = async {
            while self.tx.receiver_count() > 0 {
                time::sleep(Duration::from_millis(20)).await;
            }
        };

        match time::timeout(deadline, wait).await {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!(remaining = self.receiver_count(), "Shutdown deadline exceeded");
                false
            }
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_drain_waits_for_subscribers() {
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();
        let task = tokio::spawn(async move {
            let _ = rx.recv().await;
        });

        assert_eq!(shutdown.receiver_count(), 1);
        assert_eq!(shutdown.trigger(), 1);
        assert!(shutdown.drain(Duration::from_secs(1)).await);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_drain_deadline() {
        let shutdown = Shutdown::new();
        let _stuck = shutdown.subscribe();
        assert!(!shutdown.drain(Duration::from_millis(50)).await);
    }

    #[test]
    fn test_trigger_without_subscribers() {
        assert_eq!(Shutdown::new().trigger(), 0);
    }
}
