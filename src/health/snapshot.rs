//! Read-only access to the latest cluster state.

use std::sync::Arc;
use arc_swap::ArcSwap;
use thiserror::Error;

use crate::health::state::ClusterState;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("on-demand checks are not implemented; set use_cached_results = true")]
    OnDemandUnsupported,
}

/// Cloneable handle given to the HTTP layer.
#[derive(Clone)]
pub struct SnapshotHandle {
    current: Arc<ArcSwap<ClusterState>>,
    use_cached_results: bool,
}

impl SnapshotHandle {
    pub fn new(current: Arc<ArcSwap<ClusterState>>, use_cached_results: bool) -> Self {
        Self {
            current,
            use_cached_results,
        }
    }

    /// The most recently published state.
    ///
    /// The returned value never changes; later merges publish a new one.
    pub fn snapshot(&self) -> Result<Arc<ClusterState>, SnapshotError> {
        if !self.use_cached_results {
            return Err(SnapshotError::OnDemandUnsupported);
        }
        Ok(self.current.load_full())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_snapshot() {
        let current = Arc::new(ArcSwap::from_pointee(ClusterState::new(3)));
        let handle = SnapshotHandle::new(current.clone(), true);
        assert_eq!(handle.snapshot().unwrap().servers.len(), 3);

        let mut next = ClusterState::new(3);
        next.health_code = 503;
        current.store(Arc::new(next));
        assert_eq!(handle.snapshot().unwrap().health_code, 503);
    }

    #[test]
    fn test_on_demand_is_unsupported() {
        let current = Arc::new(ArcSwap::from_pointee(ClusterState::new(1)));
        let handle = SnapshotHandle::new(current, false);
        assert_eq!(handle.snapshot().unwrap_err(), SnapshotError::OnDemandUnsupported);
    }
}
