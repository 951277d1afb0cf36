//! # Climate Reporter Library
//!
//! Periodically sample a DHT humidity/temperature sensor and push the reading
//! with its heat index to an HTTP collector.
//!
//! The three hardware-facing capabilities are traits, each with a Linux host
//! implementation:
//!
//! - [`network::NetworkSession`]: [`network::RouteProbeSession`]
//! - [`sensor::SensorReader`]: [`sensor::IioHumiditySensor`]
//! - [`transport::HttpTransport`]: [`transport::UreqTransport`]
//!
//! [`reporter::Reporter`] ties them together.

pub mod config;
pub mod error;
pub mod network;
pub mod reporter;
pub mod sensor;
pub mod telemetry;
pub mod transport;
