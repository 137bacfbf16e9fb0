//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG path → defaults.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::settings::Settings;

/// Environment variable naming an explicit config file.
const ENV_CONFIG_PATH: &str = "FW_CONFIG";
/// Environment variable naming the config directory.
const ENV_CONFIG_DIR: &str = "FW_CONFIG_DIR";

/// Standard config file name.
const CONFIG_FILENAME: &str = "frostwatch.toml";

/// Application name for XDG directories.
const APP_NAME: &str = "frostwatch";

/// Errors from config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Where the configuration was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in the XDG config directory.
    XdgConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Discovered configuration file path.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// Path to frostwatch.toml, or None for built-in defaults.
    pub file: Option<PathBuf>,
    /// Source of the path (for diagnostics and snapshots).
    pub source: ConfigSource,
}

/// Resolve the configuration file path using the standard order:
///
/// 1. Explicit CLI path (if provided)
/// 2. `FW_CONFIG` environment variable
/// 3. `FW_CONFIG_DIR` environment variable + standard filename
/// 4. XDG config directory (`~/.config/frostwatch/frostwatch.toml`)
/// 5. Built-in defaults (None)
///
/// Paths from steps 1-2 are returned whether or not the file exists, so
/// a typo surfaces as an error rather than silently using defaults.
/// Steps 3-4 fall through when the file is absent.
pub fn resolve_config(cli_path: Option<&Path>) -> ConfigPaths {
    if let Some(path) = cli_path {
        return ConfigPaths {
            file: Some(path.to_path_buf()),
            source: ConfigSource::CliArgument,
        };
    }

    if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
        return ConfigPaths {
            file: Some(PathBuf::from(path)),
            source: ConfigSource::Environment,
        };
    }

    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let candidate = PathBuf::from(dir).join(CONFIG_FILENAME);
        if candidate.is_file() {
            return ConfigPaths {
                file: Some(candidate),
                source: ConfigSource::Environment,
            };
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let candidate = config_dir.join(APP_NAME).join(CONFIG_FILENAME);
        if candidate.is_file() {
            return ConfigPaths {
                file: Some(candidate),
                source: ConfigSource::XdgConfig,
            };
        }
    }

    ConfigPaths::default()
}

/// Load settings from a resolved path.
///
/// A `BuiltinDefault` resolution yields `Settings::default()`. An explicit
/// path (CLI or env) that does not exist is an error.
pub fn load_settings(paths: &ConfigPaths) -> Result<Settings, ConfigError> {
    let Some(path) = &paths.file else {
        return Ok(Settings::default());
    };
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.clone()));
    }
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    toml::from_str(&raw).map_err(|e| ConfigError::Parse {
        path: path.clone(),
        message: e.to_string(),
    })
}

/// Read the raw config file contents, for snapshot hashing.
pub fn read_raw(paths: &ConfigPaths) -> Option<String> {
    let path = paths.file.as_ref()?;
    fs::read_to_string(path).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_path_wins() {
        let paths = resolve_config(Some(Path::new("/tmp/custom.toml")));
        assert_eq!(paths.source, ConfigSource::CliArgument);
        assert_eq!(paths.file.as_deref(), Some(Path::new("/tmp/custom.toml")));
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let paths = ConfigPaths {
            file: Some(PathBuf::from("/definitely/not/here/frostwatch.toml")),
            source: ConfigSource::CliArgument,
        };
        assert!(matches!(
            load_settings(&paths),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_no_file_loads_defaults() {
        let paths = ConfigPaths::default();
        let settings = load_settings(&paths).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
