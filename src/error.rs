//! # Error Module
//!
//! This module provides custom error types for the `serial_datetime` application.
//! It uses the `thiserror` crate for ergonomic error handling.

use thiserror::Error;

/// Result type alias for `serial_datetime` operations.
pub type Result<T> = std::result::Result<T, SerialDateError>;

/// Main error type for the `serial_datetime` application.
#[derive(Debug, Error)]
pub enum SerialDateError {
    /// Failed to open serial port.
    #[error("Failed to open serial port '{port_name}': {reason}")]
    PortOpen { port_name: String, reason: String },

    /// A send was requested while no port is open.
    #[error("Please connect to the serial port first.")]
    NotConnected,

    /// Failed to write to serial port.
    #[error("Failed to write to serial port: {0}")]
    PortWrite(String),

    /// Payload serialization error.
    #[error("Data encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Calendar text that is not `YYYY-MM-DD`.
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SerialDateError {
    /// Creates a new port open error.
    #[must_use]
    pub fn port_open(port_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PortOpen {
            port_name: port_name.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new port write error.
    #[must_use]
    pub fn port_write(msg: impl Into<String>) -> Self {
        Self::PortWrite(msg.into())
    }

    /// Creates a new invalid date error.
    #[must_use]
    pub fn invalid_date(text: impl Into<String>) -> Self {
        Self::InvalidDate(text.into())
    }

    /// Creates a new invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
