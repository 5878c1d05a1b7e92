//! Network State Checker Library
//!
//! Probes a set of upstream targets, aggregates their verdicts into one
//! cluster health code, and serves the latest snapshot over HTTP.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::schema::CheckerConfig;
pub use health::{ClusterState, SnapshotHandle, Verdict};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
