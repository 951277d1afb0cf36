//! # Sensor Module
//!
//! Humidity/temperature sampling and the derived heat index.
//!
//! This module handles:
//! - The [`SensorReader`] capability (NaN signals a failed read)
//! - Turning two raw values into a validated [`Reading`]
//! - Heat index computation ([`heat_index`])
//! - Reading a DHT sensor through the Linux IIO subsystem ([`iio`])

pub mod heat_index;
pub mod iio;

use serde::Deserialize;
use tracing::debug;

pub use heat_index::compute_heat_index;
pub use iio::IioHumiditySensor;

/// Capability to sample a humidity/temperature sensor
///
/// Both methods return `f32::NAN` on any transient failure. Failures are not
/// enumerated; a NaN is the single opaque failure signal.
pub trait SensorReader {
    /// Relative humidity in percent, or NaN
    fn read_humidity(&mut self) -> f32;

    /// Temperature in degrees Celsius, or NaN
    fn read_temperature(&mut self) -> f32;
}

/// Supported DHT sensor variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    #[default]
    Dht11,
    Dht22,
}

impl SensorKind {
    /// Kernel driver name used for the IIO device (`dht11` handles both)
    pub fn driver_name(self) -> &'static str {
        match self {
            SensorKind::Dht11 | SensorKind::Dht22 => "dht11",
        }
    }
}

/// One validated sample
///
/// A `Reading` can only be built from two finite values, so holding one means
/// the whole sample is usable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    temperature: f32,
    humidity: f32,
}

impl Reading {
    /// Validate a raw sample
    ///
    /// Returns `None` if either value is NaN or infinite.
    ///
    /// # Examples
    ///
    /// ```
    /// use climate_reporter::sensor::Reading;
    ///
    /// assert!(Reading::new(22.5, 50.0).is_some());
    /// assert!(Reading::new(f32::NAN, 50.0).is_none());
    /// assert!(Reading::new(f32::INFINITY, 50.0).is_none());
    /// ```
    #[must_use]
    pub fn new(temperature: f32, humidity: f32) -> Option<Self> {
        if !temperature.is_finite() || !humidity.is_finite() {
            return None;
        }
        Some(Self { temperature, humidity })
    }

    /// Temperature in degrees Celsius
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Relative humidity in percent
    pub fn humidity(&self) -> f32 {
        self.humidity
    }
}

/// Read humidity then temperature and validate the pair
pub fn sample<S: SensorReader + ?Sized>(reader: &mut S) -> Option<Reading> {
    let humidity = reader.read_humidity();
    let temperature = reader.read_temperature();
    debug!("Raw sample: temperature={} humidity={}", temperature, humidity);
    Reading::new(temperature, humidity)
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::collections::VecDeque;

    /// Sensor that replays scripted `(temperature, humidity)` samples
    ///
    /// Once the script is exhausted every read returns NaN.
    #[derive(Debug, Default)]
    pub struct ScriptedSensor {
        samples: VecDeque<(f32, f32)>,
        pending_temperature: Option<f32>,
        pub reads: usize,
    }

    impl ScriptedSensor {
        pub fn new(samples: &[(f32, f32)]) -> Self {
            Self {
                samples: samples.iter().copied().collect(),
                pending_temperature: None,
                reads: 0,
            }
        }
    }

    impl SensorReader for ScriptedSensor {
        fn read_humidity(&mut self) -> f32 {
            self.reads += 1;
            match self.samples.pop_front() {
                Some((temperature, humidity)) => {
                    self.pending_temperature = Some(temperature);
                    humidity
                }
                None => f32::NAN,
            }
        }

        fn read_temperature(&mut self) -> f32 {
            self.reads += 1;
            self.pending_temperature.take().unwrap_or(f32::NAN)
        }
    }
}
