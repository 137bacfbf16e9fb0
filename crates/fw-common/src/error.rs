//! Error types for Frostwatch.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for automation
//!
//! Errors serialize to structured JSON for machine consumers:
//! ```json
//! {
//!   "code": 21,
//!   "category": "ingest",
//!   "message": "non-finite temperature rejected: NaN",
//!   "recoverable": true
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for Frostwatch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration file and validation errors.
    Config,
    /// Frame parsing and reading validation errors.
    Ingest,
    /// Telemetry storage errors.
    Storage,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Ingest => write!(f, "ingest"),
            ErrorCategory::Storage => write!(f, "storage"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for Frostwatch.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid settings file: {0}")]
    InvalidSettings(String),

    #[error("settings validation failed: {0}")]
    SettingsValidation(String),

    // Ingest errors (20-29)
    #[error("malformed frame at line {line}: {reason}")]
    MalformedFrame { line: u64, reason: String },

    #[error("non-finite temperature rejected: {value}")]
    NonFiniteTemperature { value: f64 },

    #[error("out-of-order timestamp: {timestamp} after {last_accepted}")]
    OutOfOrderTimestamp { timestamp: f64, last_accepted: f64 },

    // Storage errors (30-39)
    #[error("telemetry write failed: {0}")]
    TelemetryWrite(String),

    #[error("retention enforcement failed: {0}")]
    Retention(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Ingest errors
    /// - 30-39: Storage errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidSettings(_) => 11,
            Error::SettingsValidation(_) => 12,
            Error::MalformedFrame { .. } => 20,
            Error::NonFiniteTemperature { .. } => 21,
            Error::OutOfOrderTimestamp { .. } => 22,
            Error::TelemetryWrite(_) => 30,
            Error::Retention(_) => 31,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::InvalidSettings(_) | Error::SettingsValidation(_) => {
                ErrorCategory::Config
            }

            Error::MalformedFrame { .. }
            | Error::NonFiniteTemperature { .. }
            | Error::OutOfOrderTimestamp { .. } => ErrorCategory::Ingest,

            Error::TelemetryWrite(_) | Error::Retention(_) => ErrorCategory::Storage,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable.
    ///
    /// Recoverable errors may be resolved by fixing configuration, by the
    /// device sending well-formed frames again, or by retrying I/O. Ingest
    /// rejections are always recoverable: the stream continues past them.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_) => true,
            Error::InvalidSettings(_) => true,
            Error::SettingsValidation(_) => true,

            Error::MalformedFrame { .. } => true,
            Error::NonFiniteTemperature { .. } => true,
            Error::OutOfOrderTimestamp { .. } => true,

            Error::TelemetryWrite(_) => true,
            Error::Retention(_) => true,

            Error::Io(_) => true,
            Error::Json(_) => true,
        }
    }

    /// Serialize to the structured JSON shape used by machine consumers.
    pub fn to_structured_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.code(),
            "category": self.category(),
            "message": self.to_string(),
            "recoverable": self.is_recoverable(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_category_ranges() {
        let cases: Vec<(Error, ErrorCategory, std::ops::Range<u32>)> = vec![
            (Error::Config("x".into()), ErrorCategory::Config, 10..20),
            (
                Error::NonFiniteTemperature { value: f64::NAN },
                ErrorCategory::Ingest,
                20..30,
            ),
            (
                Error::TelemetryWrite("disk full".into()),
                ErrorCategory::Storage,
                30..40,
            ),
            (
                Error::Io(std::io::Error::other("boom")),
                ErrorCategory::Io,
                60..70,
            ),
        ];
        for (err, category, range) in cases {
            assert_eq!(err.category(), category);
            assert!(range.contains(&err.code()), "code {} out of range", err.code());
        }
    }

    #[test]
    fn test_structured_json_shape() {
        let err = Error::OutOfOrderTimestamp {
            timestamp: 5.0,
            last_accepted: 10.0,
        };
        let value = err.to_structured_json();
        assert_eq!(value["code"], 22);
        assert_eq!(value["category"], "ingest");
        assert_eq!(value["recoverable"], true);
    }

    #[test]
    fn test_display_carries_detail() {
        let err = Error::MalformedFrame {
            line: 7,
            reason: "missing field `temperature`".into(),
        };
        let text = err.to_string();
        assert!(text.contains("line 7"));
        assert!(text.contains("temperature"));
    }
}
