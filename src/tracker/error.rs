//! Tracker error types
//!
//! Errors raised while decoding room codes, sensor reports and
//! time distributions.

use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur in the tracking layer
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Room code outside the closed enumeration (-1..=3)
    #[error("Unknown room code: {0}")]
    UnknownRoomCode(i32),

    /// Time distribution does not cover the indoor rooms exactly
    #[error("Malformed distribution: expected {expected} non-negative values, got {actual:?}")]
    MalformedDistribution { expected: usize, actual: Vec<f64> },

    /// Sensor report or recording line could not be parsed
    #[error("Malformed report at line {line}: {reason}")]
    MalformedReport { line: usize, reason: String },

    /// Report received from an address that is not a configured room sensor
    #[error("Unknown sensor: {0}")]
    UnknownSensor(IpAddr),

    /// Sensor connected but sent nothing before the read deadline
    #[error("No report within {0:?}")]
    ReportTimeout(Duration),

    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TrackerError::UnknownRoomCode(7);
        assert_eq!(err.to_string(), "Unknown room code: 7");

        let err = TrackerError::MalformedReport {
            line: 3,
            reason: "missing rssi".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed report at line 3: missing rssi");
    }
}
