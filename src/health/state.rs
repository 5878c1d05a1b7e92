//! Aggregated cluster health state.
//!
//! # Merge rules
//! ```text
//! first Measurement for a slot  → record initialized from it
//! later Measurements            → counters add, verdict code/label replaced
//! after every merge             → health code = worst verdict across records
//! ```
//!
//! # Design Decisions
//! - Counters are commutative, verdicts are last-write-wins
//! - Slots are never removed; an empty slot means "no cycle finished yet"
//! - Only the resolver mutates a `ClusterState`; readers get published copies

use serde::{Deserialize, Serialize};

use crate::config::HealthCodes;
use crate::config::schema::FALLBACK_HEALTH_CODE;
use crate::health::verdict::Verdict;

/// Outcome of one probe cycle, as a delta to merge into a [`ServerRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    pub monitor_id: usize,
    pub display_name: Option<String>,
    pub total: u64,
    pub failed: u64,
    pub succeeded: u64,
    pub verdict_code: u16,
    pub verdict: Verdict,
}

impl Measurement {
    /// Empty measurement for the start of a cycle.
    pub fn new(monitor_id: usize, display_name: Option<String>) -> Self {
        Self {
            monitor_id,
            display_name,
            total: 0,
            failed: 0,
            succeeded: 0,
            verdict_code: 0,
            verdict: Verdict::Unknown,
        }
    }
}

/// Running aggregate for one monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRecord {
    #[serde(rename = "server_id")]
    pub monitor_id: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "server_tests")]
    pub total: u64,
    #[serde(rename = "failed_tests")]
    pub failed: u64,
    #[serde(rename = "succeeded_tests")]
    pub succeeded: u64,
    pub verdict_code: u16,
    #[serde(rename = "verdict_string")]
    pub verdict: Verdict,
}

impl From<Measurement> for ServerRecord {
    fn from(m: Measurement) -> Self {
        Self {
            monitor_id: m.monitor_id,
            display_name: m.display_name,
            total: m.total,
            failed: m.failed,
            succeeded: m.succeeded,
            verdict_code: m.verdict_code,
            verdict: m.verdict,
        }
    }
}

/// A verdict label change observed while merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerdictTransition {
    pub monitor_id: usize,
    pub display_name: Option<String>,
    pub from: Verdict,
    pub to: Verdict,
}

/// Reasons a measurement could not be merged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    #[error("measurement for monitor {monitor_id} is out of range ({slots} slots)")]
    UnknownMonitor { monitor_id: usize, slots: usize },
}

/// Cluster-wide health: the derived code plus one slot per monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterState {
    #[serde(rename = "healthcode")]
    pub health_code: u16,
    pub servers: Vec<Option<ServerRecord>>,
}

impl ClusterState {
    /// Allocate empty slots for `monitor_count` monitors.
    pub fn new(monitor_count: usize) -> Self {
        Self {
            health_code: FALLBACK_HEALTH_CODE,
            servers: vec![None; monitor_count],
        }
    }

    /// Merge a measurement into its slot.
    ///
    /// Returns the verdict transition, if the label changed on an already
    /// initialized record.
    pub fn merge(&mut self, m: Measurement) -> Result<Option<VerdictTransition>, MergeError> {
        let slots = self.servers.len();
        let slot = self
            .servers
            .get_mut(m.monitor_id)
            .ok_or(MergeError::UnknownMonitor { monitor_id: m.monitor_id, slots })?;

        match slot {
            None => {
                *slot = Some(ServerRecord::from(m));
                Ok(None)
            }
            Some(record) => {
                record.total += m.total;
                record.failed += m.failed;
                record.succeeded += m.succeeded;

                let transition = (record.verdict != m.verdict).then(|| VerdictTransition {
                    monitor_id: record.monitor_id,
                    display_name: record.display_name.clone(),
                    from: record.verdict,
                    to: m.verdict,
                });

                record.verdict_code = m.verdict_code;
                record.verdict = m.verdict;

                Ok(transition)
            }
        }
    }

    /// Worst verdict over initialized records.
    pub fn worst_verdict(&self) -> Verdict {
        Verdict::worst(self.records().map(|r| r.verdict))
    }

    /// Recompute the health code from the current records.
    pub fn recompute(&mut self, codes: &HealthCodes) -> u16 {
        self.health_code = self.worst_verdict().health_code(codes);
        self.health_code
    }

    /// Initialized records, in monitor order.
    pub fn records(&self) -> impl Iterator<Item = &ServerRecord> {
        self.servers.iter().flatten()
    }
}
