//! Configuration snapshots for run telemetry and reproducibility.
//!
//! A snapshot captures the exact configuration state at the start of a
//! run, allowing alerts to be audited against the thresholds that were
//! in force when they fired.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::resolve::ConfigPaths;
use crate::settings::Settings;
use crate::CONFIG_SCHEMA_VERSION;

/// A frozen snapshot of configuration state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Schema version of the configuration.
    pub schema_version: String,

    /// Path the config was loaded from, if any.
    #[serde(default)]
    pub config_path: Option<String>,

    /// Source of the configuration (CLI / env / XDG / defaults).
    pub config_source: String,

    /// SHA-256 hash of the raw file contents, if a file was read.
    #[serde(default)]
    pub config_hash: Option<String>,

    /// The fully resolved settings in force.
    pub settings: Settings,
}

impl ConfigSnapshot {
    /// Capture a snapshot of the resolved configuration.
    ///
    /// `raw` is the file's original text, used only for hashing; pass
    /// `None` when running on built-in defaults.
    pub fn capture(paths: &ConfigPaths, settings: &Settings, raw: Option<&str>) -> Self {
        ConfigSnapshot {
            timestamp: Utc::now(),
            schema_version: CONFIG_SCHEMA_VERSION.to_string(),
            config_path: paths
                .file
                .as_ref()
                .map(|p| p.display().to_string()),
            config_source: paths.source.to_string(),
            config_hash: raw.map(hash_content),
            settings: settings.clone(),
        }
    }
}

fn hash_content(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ConfigSource;

    #[test]
    fn test_snapshot_on_defaults_has_no_hash() {
        let snapshot = ConfigSnapshot::capture(&ConfigPaths::default(), &Settings::default(), None);
        assert!(snapshot.config_path.is_none());
        assert!(snapshot.config_hash.is_none());
        assert_eq!(snapshot.config_source, ConfigSource::BuiltinDefault.to_string());
    }

    #[test]
    fn test_snapshot_hash_is_content_addressed() {
        let paths = ConfigPaths {
            file: Some("/etc/frostwatch/frostwatch.toml".into()),
            source: ConfigSource::Environment,
        };
        let a = ConfigSnapshot::capture(&paths, &Settings::default(), Some("[detector]\n"));
        let b = ConfigSnapshot::capture(&paths, &Settings::default(), Some("[detector]\n"));
        let c = ConfigSnapshot::capture(&paths, &Settings::default(), Some("[liveness]\n"));
        assert_eq!(a.config_hash, b.config_hash);
        assert_ne!(a.config_hash, c.config_hash);
    }

    #[test]
    fn test_snapshot_round_trips_through_json() {
        let snapshot = ConfigSnapshot::capture(&ConfigPaths::default(), &Settings::default(), None);
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: ConfigSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.settings, snapshot.settings);
        assert_eq!(restored.schema_version, CONFIG_SCHEMA_VERSION);
    }
}
