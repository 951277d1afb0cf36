//! # Configuration Module
//!
//! Compiled-in configuration for the reporter.
//!
//! The TOML document in `config/default.toml` is embedded at build time and
//! parsed once at startup. There is no runtime configuration: no config file
//! lookup, no command line flags, no environment variables.

use serde::de::Error;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ReporterError, Result};
use crate::sensor::SensorKind;

/// Configuration document compiled into the binary
const EMBEDDED_CONFIG: &str = include_str!("../config/default.toml");

/// Longest interval accepted for any timing field (one hour)
const MAX_INTERVAL_MS: u64 = 3_600_000;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub network: NetworkConfig,
    pub endpoint: EndpointConfig,
    pub sensor: SensorConfig,
    pub reporter: ReporterConfig,
}

/// Wireless network configuration
#[derive(Deserialize, Clone, PartialEq)]
pub struct NetworkConfig {
    pub ssid: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,
}

// Keep the password out of debug output
impl std::fmt::Debug for NetworkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkConfig")
            .field("ssid", &self.ssid)
            .field("retry_interval_ms", &self.retry_interval_ms)
            .finish_non_exhaustive()
    }
}

/// Collector endpoint configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EndpointConfig {
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_path")]
    pub path: String,
}

/// Sensor configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SensorConfig {
    #[serde(default)]
    pub kind: SensorKind,

    #[serde(default = "default_pin")]
    pub pin: u8,

    #[serde(default = "default_iio_root")]
    pub iio_root: PathBuf,
}

/// Reporter loop configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ReporterConfig {
    #[serde(default = "default_product_id")]
    pub product_id: i32,

    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,
}

/// Immutable settings handed to the [`crate::reporter::Reporter`]
#[derive(Debug, Clone, PartialEq)]
pub struct ReporterSettings {
    /// Full collector URL, e.g. `http://10.0.0.2:5000/product/data`
    pub endpoint_url: String,
    /// Identifier sent as `pid` in every payload
    pub product_id: i32,
    /// Suspend time before each cycle
    pub sample_interval: Duration,
}

// Default value functions
fn default_retry_interval_ms() -> u64 { 500 }

fn default_port() -> u16 { 5000 }
fn default_path() -> String { "/product/data".to_string() }

fn default_pin() -> u8 { 4 }
fn default_iio_root() -> PathBuf { PathBuf::from("/sys/bus/iio/devices") }

fn default_product_id() -> i32 { 2 }
fn default_sample_interval_ms() -> u64 { 5000 }

impl EndpointConfig {
    /// Build the collector URL: `http://<host>:<port><path>`
    pub fn url(&self) -> String {
        format!("http://{}:{}{}", self.host, self.port, self.path)
    }
}

impl Config {
    /// Parse the configuration compiled into the binary
    ///
    /// # Errors
    ///
    /// Returns error if the embedded document does not parse or validate.
    /// This can only happen after editing `config/default.toml`.
    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(EMBEDDED_CONFIG)
    }

    /// Parse and validate a configuration document
    ///
    /// # Examples
    ///
    /// ```
    /// use climate_reporter::config::Config;
    ///
    /// let config = Config::from_toml_str(r#"
    /// [network]
    /// ssid = "lab"
    ///
    /// [endpoint]
    /// host = "10.0.0.2"
    ///
    /// [sensor]
    ///
    /// [reporter]
    /// "#)?;
    /// assert_eq!(config.endpoint.url(), "http://10.0.0.2:5000/product/data");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Settings for the reporter loop
    pub fn reporter_settings(&self) -> ReporterSettings {
        ReporterSettings {
            endpoint_url: self.endpoint.url(),
            product_id: self.reporter.product_id,
            sample_interval: Duration::from_millis(self.reporter.sample_interval_ms),
        }
    }

    /// Delay between association checks at startup
    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.network.retry_interval_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.network.ssid.is_empty() {
            return Err(invalid("network ssid cannot be empty"));
        }

        if self.endpoint.host.is_empty() {
            return Err(invalid("endpoint host cannot be empty"));
        }

        if self.endpoint.port == 0 {
            return Err(invalid("endpoint port must be greater than 0"));
        }

        if !self.endpoint.path.starts_with('/') {
            return Err(invalid("endpoint path must start with '/'"));
        }

        for (name, value) in [
            ("retry_interval_ms", self.network.retry_interval_ms),
            ("sample_interval_ms", self.reporter.sample_interval_ms),
        ] {
            if value == 0 || value > MAX_INTERVAL_MS {
                return Err(invalid(&format!(
                    "{} must be between 1 and {}",
                    name, MAX_INTERVAL_MS
                )));
            }
        }

        Ok(())
    }
}

fn invalid(msg: &str) -> ReporterError {
    ReporterError::Config(toml::de::Error::custom(msg))
}
