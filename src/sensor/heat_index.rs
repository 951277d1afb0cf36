//! # Heat Index
//!
//! Apparent temperature from dry-bulb temperature and relative humidity.
//!
//! The computation follows the NWS procedure used by the common DHT sensor
//! libraries:
//!
//! 1. Steadman's simple formula:
//!    `HI = 0.5 * (T + 61 + (T - 68) * 1.2 + RH * 0.094)`
//! 2. If that exceeds 79 °F, the Rothfusz regression replaces it, with the
//!    low-humidity (RH < 13 %, 80..=112 °F) and high-humidity
//!    (RH > 85 %, 80..=87 °F) adjustments.
//!
//! The formula is defined in Fahrenheit. In Celsius mode the input is
//! converted to Fahrenheit first and the result converted back.
//!
//! Inputs are clamped to physical bounds (absolute zero to 1000 °F, 0 to
//! 100 %RH) before evaluation, so the polynomial cannot overflow.

/// Threshold above which the Rothfusz regression is used (°F)
const ROTHFUSZ_THRESHOLD_F: f32 = 79.0;

/// Absolute zero (°F)
const MIN_TEMPERATURE_F: f32 = -459.67;

/// Upper temperature bound (°F)
const MAX_TEMPERATURE_F: f32 = 1000.0;

/// Convert degrees Celsius to degrees Fahrenheit
pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 1.8 + 32.0
}

/// Convert degrees Fahrenheit to degrees Celsius
pub fn fahrenheit_to_celsius(fahrenheit: f32) -> f32 {
    (fahrenheit - 32.0) * 0.55555
}

/// Compute the heat index
///
/// # Arguments
///
/// * `temperature` - Dry-bulb temperature, Celsius unless `is_fahrenheit`
/// * `humidity` - Relative humidity in percent
/// * `is_fahrenheit` - Unit of both `temperature` and the result
///
/// # Returns
///
/// Heat index in the same unit as `temperature`. Finite for every non-NaN
/// input, infinities included; only meaningful for a validated reading.
///
/// # Examples
///
/// ```
/// use climate_reporter::sensor::heat_index::compute_heat_index;
///
/// let hic = compute_heat_index(30.0, 70.0, false);
/// assert_eq!(hic as i32, 35);
/// ```
pub fn compute_heat_index(temperature: f32, humidity: f32, is_fahrenheit: bool) -> f32 {
    let t = if is_fahrenheit {
        temperature
    } else {
        celsius_to_fahrenheit(temperature)
    };
    let t = t.clamp(MIN_TEMPERATURE_F, MAX_TEMPERATURE_F);
    let rh = humidity.clamp(0.0, 100.0);

    let mut hi = 0.5 * (t + 61.0 + ((t - 68.0) * 1.2) + (rh * 0.094));

    if hi > ROTHFUSZ_THRESHOLD_F {
        hi = -42.379
            + 2.049_015_2 * t
            + 10.143_331 * rh
            - 0.224_755_41 * t * rh
            - 0.006_837_83 * t.powi(2)
            - 0.054_817_17 * rh.powi(2)
            + 0.001_228_74 * t.powi(2) * rh
            + 0.000_852_82 * t * rh.powi(2)
            - 0.000_001_99 * t.powi(2) * rh.powi(2);

        if rh < 13.0 && (80.0..=112.0).contains(&t) {
            // 17 - |t - 95| >= 0 inside this range
            hi -= ((13.0 - rh) * 0.25) * ((17.0 - (t - 95.0).abs()) * 0.058_82).sqrt();
        } else if rh > 85.0 && (80.0..=87.0).contains(&t) {
            hi += ((rh - 85.0) * 0.1) * ((87.0 - t) * 0.2);
        }
    }

    if is_fahrenheit {
        hi
    } else {
        fahrenheit_to_celsius(hi)
    }
}
