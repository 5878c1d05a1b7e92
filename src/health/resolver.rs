//! Measurement consumer and cluster verdict aggregation.
//!
//! The resolver is the only writer of [`ClusterState`]. It drains the probe
//! queue in arrival order, merges every measurement, recomputes the cluster
//! health code, and publishes an immutable copy for readers.

use std::sync::Arc;
use arc_swap::ArcSwap;
use tokio::sync::{broadcast, mpsc};

use crate::config::HealthCodes;
use crate::health::snapshot::SnapshotHandle;
use crate::health::state::{ClusterState, Measurement, VerdictTransition};
use crate::observability::metrics;

pub struct StateResolver {
    queue: mpsc::Receiver<Measurement>,
    state: ClusterState,
    codes: HealthCodes,
    published: Arc<ArcSwap<ClusterState>>,
}

impl StateResolver {
    /// Create a resolver owning a fresh state with `monitor_count` slots.
    pub fn new(queue: mpsc::Receiver<Measurement>, monitor_count: usize, codes: HealthCodes) -> Self {
        let state = ClusterState::new(monitor_count);
        let published = Arc::new(ArcSwap::from_pointee(state.clone()));
        Self {
            queue,
            state,
            codes,
            published,
        }
    }

    /// Read handle over the published snapshots.
    pub fn snapshots(&self, use_cached_results: bool) -> SnapshotHandle {
        SnapshotHandle::new(self.published.clone(), use_cached_results)
    }

    /// Merge one measurement and publish the result.
    pub fn apply(&mut self, measurement: Measurement) -> Option<VerdictTransition> {
        let transition = match self.state.merge(measurement) {
            Ok(transition) => transition,
            Err(e) => {
                tracing::warn!(error = %e, "Dropping measurement");
                return None;
            }
        };

        if let Some(t) = &transition {
            tracing::info!(
                monitor_id = t.monitor_id,
                display_name = ?t.display_name,
                from = %t.from,
                to = %t.to,
                "Server state changed"
            );
            metrics::record_verdict_transition(t.from, t.to);
        }

        let previous = self.state.health_code;
        let code = self.state.recompute(&self.codes);
        if code != previous {
            tracing::info!(
                previous,
                current = code,
                verdict = %self.state.worst_verdict(),
                "Cluster health code changed"
            );
        }
        metrics::record_cluster_health(code);

        self.published.store(Arc::new(self.state.clone()));
        transition
    }

    /// Drain the queue until every producer is gone or shutdown is signalled.
    ///
    /// On shutdown, measurements already queued are still merged.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) -> ClusterState {
        tracing::info!(slots = self.state.servers.len(), "State resolver started");

        loop {
            tokio::select! {
                next = self.queue.recv() => match next {
                    Some(measurement) => {
                        self.apply(measurement);
                    }
                    None => {
                        tracing::info!("All probe workers stopped, resolver exiting");
                        break;
                    }
                },
                _ = shutdown.recv() => {
                    self.queue.close();
                    let mut drained = 0usize;
                    while let Ok(measurement) = self.queue.try_recv() {
                        self.apply(measurement);
                        drained += 1;
                    }
                    tracing::info!(drained, "State resolver received shutdown signal, exiting loop");
                    break;
                }
            }
        }

        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::config::schema::FALLBACK_HEALTH_CODE;
    use crate::health::verdict::Verdict;
    use crate::lifecycle::Shutdown;

    const CODES: HealthCodes = HealthCodes {
        code_healthy: 200,
        code_degraded: 299,
        code_failed: 500,
    };

    fn measurement(id: usize, total: u64, failed: u64, verdict: Verdict) -> Measurement {
        Measurement {
            monitor_id: id,
            display_name: None,
            total,
            failed,
            succeeded: total - failed,
            verdict_code: 200,
            verdict,
        }
    }

    #[test]
    fn test_apply_publishes_snapshot() {
        let (_tx, rx) = mpsc::channel(10);
        let mut resolver = StateResolver::new(rx, 2, CODES);
        let handle = resolver.snapshots(true);

        let before = handle.snapshot().unwrap();
        assert_eq!(before.health_code, FALLBACK_HEALTH_CODE);
        assert!(before.servers.iter().all(Option::is_none));

        resolver.apply(measurement(0, 3, 0, Verdict::Ok));
        let after = handle.snapshot().unwrap();
        assert_eq!(after.health_code, 200);
        assert_eq!(after.servers[0].as_ref().unwrap().total, 3);

        // Earlier snapshots are immutable.
        assert!(before.servers[0].is_none());
    }

    #[test]
    fn test_apply_reports_transitions() {
        let (_tx, rx) = mpsc::channel(10);
        let mut resolver = StateResolver::new(rx, 1, CODES);

        assert!(resolver.apply(measurement(0, 1, 0, Verdict::Ok)).is_none());
        let t = resolver.apply(measurement(0, 1, 1, Verdict::Degraded)).unwrap();
        assert_eq!((t.from, t.to), (Verdict::Ok, Verdict::Degraded));
        assert_eq!(resolver.snapshots(true).snapshot().unwrap().health_code, 299);
    }

    #[test]
    fn test_apply_ignores_unknown_monitor() {
        let (_tx, rx) = mpsc::channel(10);
        let mut resolver = StateResolver::new(rx, 1, CODES);

        assert!(resolver.apply(measurement(5, 1, 1, Verdict::Failed)).is_none());
        let snapshot = resolver.snapshots(true).snapshot().unwrap();
        assert_eq!(snapshot.health_code, FALLBACK_HEALTH_CODE);
        assert!(snapshot.servers[0].is_none());
    }

    #[tokio::test]
    async fn test_run_processes_in_order() {
        let (tx, rx) = mpsc::channel(10);
        let shutdown = Shutdown::new();
        let resolver = StateResolver::new(rx, 1, CODES);

        tx.send(measurement(0, 1, 0, Verdict::Ok)).await.unwrap();
        tx.send(measurement(0, 1, 1, Verdict::Failed)).await.unwrap();
        tx.send(measurement(0, 2, 1, Verdict::Degraded)).await.unwrap();
        drop(tx);

        let state = tokio::time::timeout(Duration::from_secs(1), resolver.run(shutdown.subscribe()))
            .await
            .unwrap();
        let record = state.servers[0].as_ref().unwrap();
        assert_eq!((record.total, record.failed, record.succeeded), (4, 2, 2));
        assert_eq!(record.verdict, Verdict::Degraded);
        assert_eq!(state.health_code, 299);
    }

    #[tokio::test]
    async fn test_shutdown_drains_queue() {
        let (tx, rx) = mpsc::channel(10);
        let shutdown = Shutdown::new();
        let resolver = StateResolver::new(rx, 2, CODES);
        let handle = resolver.snapshots(true);
        let signal = shutdown.subscribe();

        tx.send(measurement(0, 1, 1, Verdict::Failed)).await.unwrap();
        tx.send(measurement(1, 1, 0, Verdict::Ok)).await.unwrap();
        shutdown.trigger();

        let state = tokio::time::timeout(Duration::from_secs(1), resolver.run(signal))
            .await
            .unwrap();
        assert_eq!(state.records().count(), 2);
        assert_eq!(state.health_code, 500);
        assert_eq!(handle.snapshot().unwrap().health_code, 500);
        assert!(tx.is_closed());
    }
}
