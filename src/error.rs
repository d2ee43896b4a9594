//! Error types for sensor and reporting collaborators.
//!
//! None of these are fatal. The control loop absorbs all of them: sensor errors
//! fall back to retained or sentinel values, report errors drop the report.

use core::fmt;

/// Sensor-side failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The spectral sensor is not initialised or stopped responding.
    Unavailable,
    /// The ultrasonic echo did not return in time.
    Timeout,
}

/// Reporting-side failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportError {
    /// No network link is up.
    NetworkUnavailable,
    /// The link is up but the send did not go through.
    SendFailure,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorError::Unavailable => write!(f, "sensor unavailable"),
            SensorError::Timeout => write!(f, "sensor timeout"),
        }
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::NetworkUnavailable => write!(f, "network unavailable"),
            ReportError::SendFailure => write!(f, "report send failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SensorError {}

#[cfg(feature = "std")]
impl std::error::Error for ReportError {}
