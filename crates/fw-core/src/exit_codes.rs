//! Exit codes for the frostwatch CLI.
//!
//! Exit codes communicate run outcome without requiring output parsing.
//!
//! Exit code ranges:
//! - 0-6: Success/operational outcomes (parse outcome from code, not output)
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors (bugs, should be reported)

/// Exit codes for frostwatch operations.
///
/// These codes are a stable contract for automation. Changes require
/// a major version bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    // ========================================================================
    // Success / Operational Outcomes (0-6)
    // ========================================================================
    /// Clean run: stream consumed, no alerts raised
    Clean = 0,

    /// Stream consumed; one or more alerts were raised
    AlertsRaised = 1,

    // ========================================================================
    // User / Environment Errors (10-19)
    // ========================================================================
    /// Invalid arguments
    ArgsError = 10,

    /// Configuration missing, unparsable, or semantically invalid
    ConfigError = 11,

    /// Input stream missing or unreadable
    InputError = 12,

    /// Telemetry storage failure
    StorageError = 13,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Whether this code indicates the stream was fully processed.
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Clean | ExitCode::AlertsRaised)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code.as_i32()
    }
}
