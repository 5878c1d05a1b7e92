//! Startup orchestration.
//!
//! # Responsibilities
//! - Create the measurement queue and the state resolver
//! - Spawn one probe worker per runnable monitor
//! - Hand a snapshot handle back to the HTTP layer
//!
//! # Design Decisions
//! - A monitor with unusable loop settings is skipped, never fatal
//! - The resolver exits on its own once every worker is gone

use futures_util::future::join_all;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::CheckerConfig;
use crate::health::{
    ClusterState, ProbeWorker, SnapshotHandle, StateResolver, MEASUREMENT_QUEUE_CAPACITY,
};
use crate::lifecycle::Shutdown;

/// Handles to the running probe engine.
pub struct RunningChecker {
    snapshots: SnapshotHandle,
    workers: Vec<JoinHandle<()>>,
    resolver: JoinHandle<ClusterState>,
}

impl RunningChecker {
    pub fn snapshots(&self) -> SnapshotHandle {
        self.snapshots.clone()
    }

    /// Number of probe workers that were spawned.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Wait for every task to exit and return the resolver's final state.
    pub async fn join(self) -> Option<ClusterState> {
        for result in join_all(self.workers).await {
            if let Err(e) = result {
                tracing::error!(error = %e, "Probe worker task failed");
            }
        }
        match self.resolver.await {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::error!(error = %e, "State resolver task failed");
                None
            }
        }
    }
}

/// Spawn the resolver and the probe workers. Must run inside a Tokio runtime.
pub fn start_checker(config: &CheckerConfig, shutdown: &Shutdown) -> RunningChecker {
    let (tx, rx) = mpsc::channel(MEASUREMENT_QUEUE_CAPACITY);
    let resolver = StateResolver::new(rx, config.servers.len(), config.codes);
    let snapshots = resolver.snapshots(config.use_cached_results);

    if !config.use_cached_results {
        tracing::warn!("use_cached_results is off; on-demand checks are not implemented");
    }

    let mut workers = Vec::with_capacity(config.servers.len());
    for (monitor_id, spec) in config.servers.iter().enumerate() {
        match ProbeWorker::new(monitor_id, spec.clone(), tx.clone()) {
            Ok(worker) => workers.push(tokio::spawn(worker.run(shutdown.subscribe()))),
            Err(e) => tracing::warn!(monitor_id, error = %e, "Skipping server"),
        }
    }
    // Workers hold the only senders from here on.
    drop(tx);

    tracing::info!(
        configured = config.servers.len(),
        running = workers.len(),
        "Probe workers started"
    );

    let resolver = tokio::spawn(resolver.run(shutdown.subscribe()));

    RunningChecker {
        snapshots,
        workers,
        resolver,
    }
}
