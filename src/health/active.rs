//! Active health checking.
//!
//! # Responsibilities
//! - Periodically probe one monitored target
//! - Classify each response into succeeded/failed and a batch verdict
//! - Emit one Measurement per cycle onto the resolver queue
//!
//! # Cycle
//! ```text
//! repeat test_count times:
//!     probe → evaluate → sleep(test_delay)      (early exit ends the batch)
//! push Measurement (blocks while the queue is full)
//! sleep(check_period)
//! ```

use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::time;

use crate::config::MonitorSpec;
use crate::health::error::ConfigurationError;
use crate::health::probe::{Probe, ProbeTransport};
use crate::health::state::Measurement;
use crate::health::verdict::Verdict;
use crate::observability::metrics;

/// Timing of a monitor's probe cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub test_count: u32,
    pub test_delay: Duration,
    pub period: Duration,
}

impl Schedule {
    /// Derive the schedule, rejecting monitors whose loop cannot be run.
    pub fn from_spec(monitor_id: usize, spec: &MonitorSpec) -> Result<Self, ConfigurationError> {
        let period = spec
            .check_period_seconds
            .ok_or(ConfigurationError::MissingCheckPeriod { monitor_id })?;
        let test_count = spec.test_count.unwrap_or(1);
        let test_delay_ms = match spec.test_delay_ms {
            Some(ms) => ms,
            None if test_count > 1 => {
                return Err(ConfigurationError::MissingTestDelay { monitor_id, test_count });
            }
            None => 0,
        };

        Ok(Self {
            test_count,
            test_delay: Duration::from_millis(test_delay_ms),
            period: Duration::from_secs(period),
        })
    }
}

/// What to do after evaluating one response.
#[derive(Debug)]
enum Step {
    Continue,
    EndBatch,
    Terminate(ConfigurationError),
}

/// Result of one cycle.
#[derive(Debug)]
struct Cycle {
    measurement: Measurement,
    fatal: Option<ConfigurationError>,
}

/// Probes one monitor forever and reports a Measurement per cycle.
pub struct ProbeWorker {
    monitor_id: usize,
    spec: MonitorSpec,
    schedule: Schedule,
    queue: mpsc::Sender<Measurement>,
}

impl ProbeWorker {
    /// Create a worker. Fails if the monitor has no usable loop settings.
    pub fn new(
        monitor_id: usize,
        spec: MonitorSpec,
        queue: mpsc::Sender<Measurement>,
    ) -> Result<Self, ConfigurationError> {
        let schedule = Schedule::from_spec(monitor_id, &spec)?;
        if spec.protocol.is_none() {
            return Err(ConfigurationError::MissingProtocol { monitor_id });
        }

        Ok(Self {
            monitor_id,
            spec,
            schedule,
            queue,
        })
    }

    pub fn monitor_id(&self) -> usize {
        self.monitor_id
    }

    /// Resolve the transport for the configured protocol and run.
    pub async fn run(self, shutdown: broadcast::Receiver<()>) {
        match ProbeTransport::from_spec(self.monitor_id, &self.spec) {
            Ok(probe) => self.run_with(probe, shutdown).await,
            Err(e) => {
                tracing::error!(monitor_id = self.monitor_id, error = %e, "Probe worker terminated");
            }
        }
    }

    /// Run probe cycles with the given transport until terminated or shut down.
    pub async fn run_with<P: Probe>(self, probe: P, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            monitor_id = self.monitor_id,
            display_name = ?self.spec.display_name,
            test_count = self.schedule.test_count,
            period = ?self.schedule.period,
            "Probe worker starting"
        );

        loop {
            let cycle = tokio::select! {
                cycle = self.run_cycle(&probe) => cycle,
                _ = shutdown.recv() => break,
            };

            metrics::record_measurement(&cycle.measurement);
            tracing::debug!(
                monitor_id = self.monitor_id,
                total = cycle.measurement.total,
                failed = cycle.measurement.failed,
                verdict = %cycle.measurement.verdict,
                "Cycle complete"
            );

            tokio::select! {
                sent = self.queue.send(cycle.measurement) => {
                    if sent.is_err() {
                        tracing::warn!(monitor_id = self.monitor_id, "State resolver gone, stopping probe worker");
                        return;
                    }
                }
                _ = shutdown.recv() => break,
            }

            if let Some(e) = cycle.fatal {
                tracing::error!(monitor_id = self.monitor_id, error = %e, "Probe worker terminated");
                return;
            }

            tokio::select! {
                _ = time::sleep(self.schedule.period) => {}
                _ = shutdown.recv() => break,
            }
        }

        tracing::info!(monitor_id = self.monitor_id, "Probe worker received shutdown signal, exiting loop");
    }

    async fn run_cycle<P: Probe>(&self, probe: &P) -> Cycle {
        let mut measurement = Measurement::new(self.monitor_id, self.spec.display_name.clone());

        for _ in 0..self.schedule.test_count {
            measurement.total += 1;

            let status = match probe.execute().await {
                Ok(status) => status,
                Err(e) => {
                    tracing::warn!(monitor_id = self.monitor_id, error = %e, "Probe failed");
                    metrics::record_probe(self.monitor_id, "error");
                    measurement.failed += 1;
                    break;
                }
            };

            match self.evaluate(status, &mut measurement) {
                Step::Continue => {}
                Step::EndBatch => break,
                Step::Terminate(e) => {
                    return Cycle {
                        measurement,
                        fatal: Some(e),
                    };
                }
            }

            time::sleep(self.schedule.test_delay).await;
        }

        Cycle {
            measurement,
            fatal: None,
        }
    }

    fn evaluate(&self, status: u16, measurement: &mut Measurement) -> Step {
        if !self.spec.check_code {
            metrics::record_probe(self.monitor_id, "success");
            measurement.succeeded += 1;
            return Step::Continue;
        }

        // An empty list is still configured: nothing matches it.
        let codes = match self.spec.success_codes.as_deref() {
            Some(codes) => codes,
            None => {
                metrics::record_probe(self.monitor_id, "failure");
                measurement.failed += 1;
                return Step::Terminate(ConfigurationError::MissingSuccessCodes {
                    monitor_id: self.monitor_id,
                });
            }
        };

        if codes.contains(&status) {
            metrics::record_probe(self.monitor_id, "success");
            measurement.succeeded += 1;
            // A success cannot lift a batch that has already been downgraded.
            if !matches!(measurement.verdict, Verdict::Ok | Verdict::Unknown) {
                return Step::EndBatch;
            }
            measurement.verdict_code = status;
            measurement.verdict = Verdict::Ok;
            Step::Continue
        } else {
            metrics::record_probe(self.monitor_id, "failure");
            tracing::debug!(monitor_id = self.monitor_id, status, "Unexpected status code");
            measurement.failed += 1;
            measurement.verdict_code = status;
            measurement.verdict = if self.spec.critical {
                Verdict::Failed
            } else {
                Verdict::Degraded
            };
            Step::EndBatch
        }
    }
}
