//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, or JSON for check.json compatibility)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CheckerConfig (validated, immutable)
//!     → monitors handed to the probe workers, codes to the resolver
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::CheckerConfig;
pub use schema::HealthCodes;
pub use schema::ListenerConfig;
pub use schema::MonitorSpec;
pub use schema::ObservabilityConfig;
pub use schema::ProbeProtocol;
