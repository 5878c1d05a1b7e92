//! Probe and monitor error definitions.

use thiserror::Error;

/// A monitor that can never be probed as configured.
///
/// Terminates the affected worker permanently; other monitors keep running.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("server {monitor_id} is missing a url")]
    MissingTarget { monitor_id: usize },

    #[error("server {monitor_id} has an invalid url {url:?}: {source}")]
    InvalidTarget {
        monitor_id: usize,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("type for server {monitor_id} was not set")]
    MissingProtocol { monitor_id: usize },

    #[error("type {protocol:?} for server {monitor_id} is not supported")]
    UnsupportedProtocol { monitor_id: usize, protocol: String },

    #[error("server {monitor_id} has no check period")]
    MissingCheckPeriod { monitor_id: usize },

    #[error("server {monitor_id} runs {test_count} tests per cycle but has no test delay")]
    MissingTestDelay { monitor_id: usize, test_count: u32 },

    #[error("check status code flag was set for server {monitor_id}, but no valid status codes were defined")]
    MissingSuccessCodes { monitor_id: usize },

    #[error("could not build http client for server {monitor_id}: {source}")]
    Client {
        monitor_id: usize,
        #[source]
        source: reqwest::Error,
    },
}

/// A single probe that did not produce a usable response.
///
/// Counted as one failed test; the rest of the cycle is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("error making http request: {0}")]
    Transport(String),

    #[error("could not read response body: {0}")]
    BodyRead(String),
}
