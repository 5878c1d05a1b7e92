//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Probe workers (active.rs), one task per monitor:
//!     probe.rs transport → evaluate response → Measurement
//!     → bounded queue (capacity 10, blocks when full)
//!
//! State resolver (resolver.rs), single task:
//!     Measurement → state.rs merge → recompute health code
//!     → publish immutable ClusterState
//!
//! Readers (snapshot.rs):
//!     HTTP handler → latest published ClusterState
//! ```
//!
//! # Design Decisions
//! - Resolver is the sole writer; readers never observe a half-applied merge
//! - Configuration errors disable one monitor, never the process
//! - Transport errors cost one failed test and end the current cycle

pub mod active;
pub mod error;
pub mod probe;
pub mod resolver;
pub mod snapshot;
pub mod state;
pub mod verdict;

pub use active::ProbeWorker;
pub use resolver::StateResolver;
pub use snapshot::{SnapshotError, SnapshotHandle};
pub use state::{ClusterState, Measurement, ServerRecord};
pub use verdict::Verdict;

/// Capacity of the queue between probe workers and the resolver.
pub const MEASUREMENT_QUEUE_CAPACITY: usize = 10;
