//! Network layer subsystem.
//!
//! TLS is optional; when configured, certificates are loaded here before the
//! HTTP server binds.

pub mod tls;
