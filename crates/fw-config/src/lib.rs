//! Frostwatch configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for frostwatch.toml
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation
//! - Config snapshots for run telemetry

pub mod resolve;
pub mod settings;
pub mod snapshot;
pub mod validate;

pub use resolve::{load_settings, read_raw, resolve_config, ConfigError, ConfigPaths, ConfigSource};
pub use settings::{DetectorSettings, LivenessSettings, Settings, StorageSettings};
pub use snapshot::ConfigSnapshot;
pub use validate::{validate_settings, ValidationError, ValidationReport};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
