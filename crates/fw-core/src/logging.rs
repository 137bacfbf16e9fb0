//! Structured logging foundation for fw-core.
//!
//! Provides dual-mode logging:
//! - Human-readable console output for interactive use
//! - Machine-parseable JSON lines for service/agent workflows
//!
//! stdout is reserved for command payloads (summaries, alert streams);
//! all log output goes to stderr. Level and format come from the
//! environment (`FW_LOG`, `RUST_LOG`, `FW_LOG_FORMAT`) or CLI flags.

use std::io::IsTerminal;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console format (default).
    #[default]
    Human,
    /// Machine-parseable JSON lines.
    Jsonl,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "console" | "pretty" => Ok(LogFormat::Human),
            "jsonl" | "json" | "structured" | "machine" => Ok(LogFormat::Jsonl),
            _ => Err(format!("unknown log format: {}", s)),
        }
    }
}

/// Logging configuration resolved from environment and flags.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Filter directive, e.g. "info" or "fw_core=debug".
    pub level: String,
    pub format: LogFormat,
    /// Disable ANSI colors even on a terminal.
    pub no_color: bool,
}

impl LogConfig {
    /// Build from CLI verbosity flags plus the environment.
    ///
    /// `-v` raises the level to debug, `-vv` to trace; `--quiet` drops
    /// to errors only. `FW_LOG_FORMAT` selects the output format.
    pub fn from_flags(verbose: u8, quiet: bool, no_color: bool) -> Self {
        let level = if quiet {
            "error"
        } else {
            match verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        };
        let format = std::env::var("FW_LOG_FORMAT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();
        LogConfig {
            level: level.to_string(),
            format,
            no_color,
        }
    }
}

/// Initialize the logging subsystem.
///
/// Must be called once at startup before any logging occurs. Respects
/// `FW_LOG` and `RUST_LOG` over the configured level.
pub fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::try_from_env("FW_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(format!("fw_core={}", config.level)));

    match config.format {
        LogFormat::Human => {
            let use_ansi = !config.no_color && std::io::stderr().is_terminal();
            // try_init: tests and repeated invocations may have installed a
            // subscriber already.
            let _ = fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_ansi(use_ansi)
                .with_target(false)
                .try_init();
        }
        LogFormat::Jsonl => {
            let _ = fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .json()
                .try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing_aliases() {
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Human);
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Jsonl);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_verbosity_mapping() {
        assert_eq!(LogConfig::from_flags(0, false, false).level, "info");
        assert_eq!(LogConfig::from_flags(1, false, false).level, "debug");
        assert_eq!(LogConfig::from_flags(3, false, false).level, "trace");
        assert_eq!(LogConfig::from_flags(2, true, false).level, "error");
    }
}
