//! Probe transports.
//!
//! A [`Probe`] performs one request against a monitored target and reports
//! the response status. [`ProbeTransport`] selects the implementation from
//! the monitor's configured protocol.

use std::future::Future;
use reqwest::redirect::Policy;
use url::Url;

use crate::config::{MonitorSpec, ProbeProtocol};
use crate::health::error::{ConfigurationError, ProbeError};

const USER_AGENT: &str = concat!("network-state-checker/", env!("CARGO_PKG_VERSION"));

/// One request against a monitored target.
pub trait Probe: Send + Sync {
    /// Perform the request, read the full body, and return the status code.
    fn execute(&self) -> impl Future<Output = Result<u16, ProbeError>> + Send;
}

/// HTTP/HTTPS GET probe.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
    url: Url,
}

impl HttpProbe {
    /// Build a probe for `url`.
    ///
    /// With `follow_redirects == false` the first response is returned as-is.
    pub fn new(monitor_id: usize, url: &str, follow_redirects: bool) -> Result<Self, ConfigurationError> {
        let parsed = Url::parse(url).map_err(|source| ConfigurationError::InvalidTarget {
            monitor_id,
            url: url.to_string(),
            source,
        })?;

        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if !follow_redirects {
            builder = builder.redirect(Policy::none());
        }
        let client = builder
            .build()
            .map_err(|source| ConfigurationError::Client { monitor_id, source })?;

        Ok(Self { client, url: parsed })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Probe for HttpProbe {
    async fn execute(&self) -> Result<u16, ProbeError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| ProbeError::Transport(e.to_string()))?;

        let status = response.status().as_u16();

        // Drain the body so a truncated response counts as a failure.
        response
            .bytes()
            .await
            .map_err(|e| ProbeError::BodyRead(e.to_string()))?;

        Ok(status)
    }
}

/// Probe implementation selected by protocol.
#[derive(Debug, Clone)]
pub enum ProbeTransport {
    Http(HttpProbe),
}

impl ProbeTransport {
    /// Resolve the transport for a monitor.
    pub fn from_spec(monitor_id: usize, spec: &MonitorSpec) -> Result<Self, ConfigurationError> {
        match &spec.protocol {
            Some(ProbeProtocol::Http) | Some(ProbeProtocol::Https) => {
                let url = spec
                    .url
                    .as_deref()
                    .ok_or(ConfigurationError::MissingTarget { monitor_id })?;
                let follow = spec.follow_redirects.unwrap_or(true);
                Ok(ProbeTransport::Http(HttpProbe::new(monitor_id, url, follow)?))
            }
            Some(ProbeProtocol::Unsupported(protocol)) => Err(ConfigurationError::UnsupportedProtocol {
                monitor_id,
                protocol: protocol.clone(),
            }),
            None => Err(ConfigurationError::MissingProtocol { monitor_id }),
        }
    }
}

impl Probe for ProbeTransport {
    async fn execute(&self) -> Result<u16, ProbeError> {
        match self {
            ProbeTransport::Http(probe) => probe.execute().await,
        }
    }
}
