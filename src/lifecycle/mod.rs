//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Spawn resolver → Spawn probe workers → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Broadcast → Workers/resolver/server exit → Drain
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT/SIGQUIT/SIGHUP → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then probing, then listeners
//! - Shutdown has a deadline: forced exit after it passes

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{start_checker, RunningChecker};
