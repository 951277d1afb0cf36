//! # Error Types
//!
//! Custom error types for Climate Reporter using `thiserror`.
//!
//! Only startup can fail. Once the reporter loop is running every fault is
//! reported as a [`crate::reporter::CycleOutcome`] instead.

use thiserror::Error;

/// Main error type for Climate Reporter
#[derive(Debug, Error)]
pub enum ReporterError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// No IIO device matched the configured sensor
    #[error("Sensor not found: {0}")]
    SensorNotFound(String),

    /// Payload serialization errors
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to complete one HTTP exchange
///
/// A response with a non-2xx status is not a transport error.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, DNS or protocol failure before a status line was received
    #[error("Request failed: {0}")]
    Request(String),

    /// The status line arrived but the body could not be read
    #[error("Failed to read response body: {0}")]
    Body(#[from] std::io::Error),
}

/// Result type alias for Climate Reporter
pub type Result<T> = std::result::Result<T, ReporterError>;
