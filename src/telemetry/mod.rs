//! # Telemetry Module
//!
//! Builds the JSON document pushed to the collector on every successful cycle.
//!
//! Wire format, compact with fixed key order:
//!
//! ```text
//! {"temp":<int>,"humidity":<int>,"heatindex":<int>,"pid":<int>}
//! ```
//!
//! All three measured values are truncated toward zero, never rounded.

use serde::Serialize;
use std::fmt;

use crate::error::Result;
use crate::sensor::Reading;

/// Content type sent with every payload
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Integer view of one reading, ready to serialize
///
/// Field order here is the key order on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DerivedMetrics {
    #[serde(rename = "temp")]
    pub temperature: i32,
    pub humidity: i32,
    #[serde(rename = "heatindex")]
    pub heat_index: i32,
    #[serde(rename = "pid")]
    pub product_id: i32,
}

impl DerivedMetrics {
    /// Truncate a reading and its heat index
    ///
    /// # Examples
    ///
    /// ```
    /// use climate_reporter::sensor::Reading;
    /// use climate_reporter::telemetry::DerivedMetrics;
    ///
    /// let reading = Reading::new(23.9, 55.2).unwrap();
    /// let metrics = DerivedMetrics::from_reading(&reading, 24.7, 2);
    /// assert_eq!(metrics.temperature, 23);
    /// assert_eq!(metrics.heat_index, 24);
    /// ```
    pub fn from_reading(reading: &Reading, heat_index: f32, product_id: i32) -> Self {
        Self {
            temperature: truncate(reading.temperature()),
            humidity: truncate(reading.humidity()),
            heat_index: truncate(heat_index),
            product_id,
        }
    }

    /// Serialize to the wire format
    pub fn to_payload(&self) -> Result<TelemetryPayload> {
        Ok(TelemetryPayload(serde_json::to_string(self)?))
    }
}

/// Serialized telemetry document, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryPayload(String);

impl TelemetryPayload {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TelemetryPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Truncate toward zero (`as` saturates outside the `i32` range)
fn truncate(value: f32) -> i32 {
    value as i32
}
