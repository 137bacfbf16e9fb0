//! Typed settings for frostwatch.toml.
//!
//! Every field has a built-in default so an absent file, an empty file,
//! and a partial file all resolve to a runnable configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level settings, one section per subsystem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub detector: DetectorSettings,
    #[serde(default)]
    pub liveness: LivenessSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Anomaly detector tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetectorSettings {
    /// Sliding window capacity in readings (~5 min at one reading / 15 s).
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// Z-score magnitude above which the statistical signal fires.
    #[serde(default = "default_z_threshold")]
    pub z_threshold: f64,
    /// Seconds an anomaly must hold before it is considered sustained.
    #[serde(default = "default_sustained_secs")]
    pub sustained_secs: f64,
    /// Stream seconds between outlier-model refits.
    #[serde(default = "default_retrain_interval_secs")]
    pub retrain_interval_secs: f64,
    /// Model decision score below which the model signal fires.
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f64,
    /// Contamination fraction assumed when fitting the outlier model.
    #[serde(default = "default_contamination")]
    pub contamination: f64,
    /// EWMA smoothing factor.
    #[serde(default = "default_ewma_alpha")]
    pub ewma_alpha: f64,
    /// Isolation trees per model fit.
    #[serde(default = "default_forest_trees")]
    pub forest_trees: usize,
    /// RNG seed for model fitting; fixed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_window_size() -> usize {
    20
}
fn default_z_threshold() -> f64 {
    2.5
}
fn default_sustained_secs() -> f64 {
    120.0
}
fn default_retrain_interval_secs() -> f64 {
    60.0
}
fn default_score_threshold() -> f64 {
    -0.5
}
fn default_contamination() -> f64 {
    0.1
}
fn default_ewma_alpha() -> f64 {
    0.3
}
fn default_forest_trees() -> usize {
    100
}
fn default_seed() -> u64 {
    42
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            z_threshold: default_z_threshold(),
            sustained_secs: default_sustained_secs(),
            retrain_interval_secs: default_retrain_interval_secs(),
            score_threshold: default_score_threshold(),
            contamination: default_contamination(),
            ewma_alpha: default_ewma_alpha(),
            forest_trees: default_forest_trees(),
            seed: default_seed(),
        }
    }
}

/// Heartbeat liveness tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LivenessSettings {
    /// Seconds the device promises between heartbeats.
    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: f64,
    /// Seconds of silence after which the device is declared offline.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,
}

fn default_heartbeat_interval_secs() -> f64 {
    5.0
}
fn default_timeout_secs() -> f64 {
    10.0
}

impl Default for LivenessSettings {
    fn default() -> Self {
        Self {
            heartbeat_interval_secs: default_heartbeat_interval_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Telemetry storage tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageSettings {
    /// Telemetry directory; `None` resolves to the XDG data dir.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Days to keep telemetry files before pruning.
    #[serde(default = "default_ttl_days")]
    pub ttl_days: u32,
    /// Disk budget for the telemetry directory, in megabytes.
    #[serde(default = "default_disk_budget_mb")]
    pub disk_budget_mb: u64,
}

fn default_ttl_days() -> u32 {
    30
}
fn default_disk_budget_mb() -> u64 {
    512
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            ttl_days: default_ttl_days(),
            disk_budget_mb: default_disk_budget_mb(),
        }
    }
}
