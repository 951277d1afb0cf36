//! # Climate Reporter
//!
//! Sample a DHT humidity/temperature sensor and push readings with heat index
//! to an HTTP collector.
//!
//! # Control Flow
//!
//! 1. **Startup**
//!    - Set up logging with tracing subscriber
//!    - Parse the compiled-in configuration
//!    - Wait for the network link (no timeout, no failure path)
//!    - Locate the sensor
//!
//! 2. **Main Loop**
//!    - Every 5 seconds: sample, compute heat index, POST as JSON
//!    - Sensor faults and link loss skip the cycle
//!    - Status code and body of every POST are logged
//!
//! The loop never exits; the process runs until it is killed or the device
//! resets.
//!
//! Expected output:
//! ```text
//! INFO climate_reporter: Climate Reporter v0.1.0 starting...
//! INFO climate_reporter::network::route: Connecting to WiFi network Mobile
//! INFO climate_reporter::network: Connected! IP Address: 10.136.239.20
//! INFO climate_reporter::sensor::iio: Found Dht11 sensor on pin 4 at /sys/bus/iio/devices/iio:device0
//! INFO climate_reporter::reporter: Sending: {"temp":30,"humidity":70,"heatindex":35,"pid":2}
//! INFO climate_reporter::reporter: Response 200: {"status":"ok"}
//! ```

use anyhow::{Context, Result};
use tracing::info;

use climate_reporter::config::Config;
use climate_reporter::network::{NetworkSession, RouteProbeSession};
use climate_reporter::reporter::Reporter;
use climate_reporter::sensor::IioHumiditySensor;
use climate_reporter::transport::UreqTransport;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Climate Reporter v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::embedded().context("invalid compiled-in configuration")?;

    let mut network = RouteProbeSession::new(
        config.endpoint.host.clone(),
        config.endpoint.port,
        config.retry_interval(),
    );
    network
        .connect(&config.network.ssid, &config.network.password)
        .await;

    let sensor = IioHumiditySensor::discover(
        &config.sensor.iio_root,
        config.sensor.kind,
        config.sensor.pin,
    )
    .context("sensor unavailable")?;

    let reporter = Reporter::new(
        config.reporter_settings(),
        network,
        sensor,
        UreqTransport::new(),
    );
    match reporter.run().await {}
}
