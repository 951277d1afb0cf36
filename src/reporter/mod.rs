//! # Reporter Module
//!
//! The sense-and-report cycle.
//!
//! Every cycle:
//!
//! 1. Suspend for the sample interval
//! 2. Sample the sensor
//! 3. Skip the cycle if either value is NaN or infinite
//! 4. Compute the heat index (Celsius mode)
//! 5. Skip the cycle if the link is down
//! 6. Truncate, serialize, POST once as `application/json`
//! 7. Log the status code and response body
//!
//! Nothing is buffered, retried, or escalated. Each failure ends the current
//! cycle and the next one starts after a full interval.

use std::convert::Infallible;

use tracing::{error, info, warn};

use crate::config::ReporterSettings;
use crate::network::{LinkState, NetworkSession};
use crate::sensor::{self, compute_heat_index, SensorReader};
use crate::telemetry::{DerivedMetrics, CONTENT_TYPE_JSON};
use crate::transport::{HttpTransport, PostRequest};

/// Result of one cycle
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Collector answered with a 2xx status
    Sent { status: u16 },
    /// Collector answered with any other status
    SentButRejected { status: u16 },
    /// No HTTP response was obtained, including a payload that failed to
    /// serialize
    TransportFailed { reason: String },
    /// Sensor produced a NaN or infinity, nothing computed or sent
    SkippedSensorFault,
    /// Link was down; the heat index was computed and then dropped
    SkippedLinkDown { heat_index: f32 },
}

/// Periodic telemetry reporter
///
/// Owns the sensor, the link, and the transport. Holds no state between
/// cycles.
pub struct Reporter<N, S, T> {
    settings: ReporterSettings,
    network: N,
    sensor: S,
    transport: T,
}

impl<N, S, T> Reporter<N, S, T>
where
    N: NetworkSession,
    S: SensorReader,
    T: HttpTransport,
{
    /// Create a reporter
    ///
    /// The network session is expected to be connected already; the
    /// reporter only polls its status.
    pub fn new(settings: ReporterSettings, network: N, sensor: S, transport: T) -> Self {
        Self {
            settings,
            network,
            sensor,
            transport,
        }
    }

    pub fn settings(&self) -> &ReporterSettings {
        &self.settings
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    /// Run forever: suspend, then run one cycle
    ///
    /// Never returns; `Infallible` stands in for `!`, which is not allowed as
    /// an async return type on stable.
    pub async fn run(mut self) -> Infallible {
        info!(
            "Reporting to {} every {:?} as product {}",
            self.settings.endpoint_url, self.settings.sample_interval, self.settings.product_id
        );

        loop {
            self.tick().await;
        }
    }

    /// Suspend for the sample interval, then run one cycle
    pub async fn tick(&mut self) -> CycleOutcome {
        tokio::time::sleep(self.settings.sample_interval).await;
        self.run_cycle()
    }

    /// Sample, compute, and send once, without suspending
    pub fn run_cycle(&mut self) -> CycleOutcome {
        let reading = match sensor::sample(&mut self.sensor) {
            Some(reading) => reading,
            None => {
                warn!("Failed to read from sensor, skipping cycle");
                return CycleOutcome::SkippedSensorFault;
            }
        };

        let heat_index = compute_heat_index(reading.temperature(), reading.humidity(), false);

        if self.network.status() != LinkState::Connected {
            warn!("WiFi disconnected, dropping reading");
            return CycleOutcome::SkippedLinkDown { heat_index };
        }

        let metrics = DerivedMetrics::from_reading(&reading, heat_index, self.settings.product_id);
        let payload = match metrics.to_payload() {
            Ok(payload) => payload,
            // Folded into TransportFailed: nothing was sent. Integer fields
            // cannot fail to serialize, so this arm is unreachable in practice.
            Err(e) => {
                error!("Failed to build payload: {}", e);
                return CycleOutcome::TransportFailed {
                    reason: e.to_string(),
                };
            }
        };

        info!("Sending: {}", payload);

        let request = PostRequest::new(&self.settings.endpoint_url)
            .header("Content-Type", CONTENT_TYPE_JSON)
            .body(payload.into_string());

        match self.transport.post(&request) {
            Ok(response) if response.is_success() => {
                info!("Response {}: {}", response.status, response.body);
                CycleOutcome::Sent {
                    status: response.status,
                }
            }
            Ok(response) => {
                warn!("Response {}: {}", response.status, response.body);
                CycleOutcome::SentButRejected {
                    status: response.status,
                }
            }
            Err(e) => {
                warn!("POST to {} failed: {}", request.url, e);
                CycleOutcome::TransportFailed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
