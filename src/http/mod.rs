//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → "/"        → latest ClusterState, status = health code
//!     → otherwise  → response.rs (redirect or 403)
//! ```

pub mod response;
pub mod server;

pub use server::HttpServer;
