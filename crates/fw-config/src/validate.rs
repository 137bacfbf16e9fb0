//! Semantic validation of resolved settings.
//!
//! Validation collects every violation rather than stopping at the first,
//! so one `frostwatch check` round-trip shows the whole repair list.

use thiserror::Error;

use crate::settings::Settings;

/// A single semantic violation.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid value for {field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Outcome of validating a full settings tree.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate settings semantically. Returns every violation found.
pub fn validate_settings(settings: &Settings) -> ValidationReport {
    let mut errors = Vec::new();
    let d = &settings.detector;

    if d.window_size < 2 {
        errors.push(ValidationError::new(
            "detector.window_size",
            format!("must be greater than 1, got {}", d.window_size),
        ));
    }
    if !(d.z_threshold.is_finite() && d.z_threshold > 0.0) {
        errors.push(ValidationError::new(
            "detector.z_threshold",
            format!("must be a positive finite number, got {}", d.z_threshold),
        ));
    }
    if !(d.sustained_secs.is_finite() && d.sustained_secs > 0.0) {
        errors.push(ValidationError::new(
            "detector.sustained_secs",
            format!("must be a positive finite number, got {}", d.sustained_secs),
        ));
    }
    if !(d.retrain_interval_secs.is_finite() && d.retrain_interval_secs > 0.0) {
        errors.push(ValidationError::new(
            "detector.retrain_interval_secs",
            format!(
                "must be a positive finite number, got {}",
                d.retrain_interval_secs
            ),
        ));
    }
    if !d.score_threshold.is_finite() {
        errors.push(ValidationError::new(
            "detector.score_threshold",
            format!("must be finite, got {}", d.score_threshold),
        ));
    }
    if !(d.ewma_alpha > 0.0 && d.ewma_alpha < 1.0) {
        errors.push(ValidationError::new(
            "detector.ewma_alpha",
            format!("must be in (0, 1), got {}", d.ewma_alpha),
        ));
    }
    if !(d.contamination > 0.0 && d.contamination <= 0.5) {
        errors.push(ValidationError::new(
            "detector.contamination",
            format!("must be in (0, 0.5], got {}", d.contamination),
        ));
    }
    if d.forest_trees == 0 {
        errors.push(ValidationError::new(
            "detector.forest_trees",
            "must be at least 1",
        ));
    }

    let l = &settings.liveness;
    if !(l.heartbeat_interval_secs.is_finite() && l.heartbeat_interval_secs > 0.0) {
        errors.push(ValidationError::new(
            "liveness.heartbeat_interval_secs",
            format!(
                "must be a positive finite number, got {}",
                l.heartbeat_interval_secs
            ),
        ));
    }
    if !(l.timeout_secs.is_finite() && l.timeout_secs > 0.0) {
        errors.push(ValidationError::new(
            "liveness.timeout_secs",
            format!("must be a positive finite number, got {}", l.timeout_secs),
        ));
    } else if l.timeout_secs <= l.heartbeat_interval_secs {
        errors.push(ValidationError::new(
            "liveness.timeout_secs",
            format!(
                "must exceed heartbeat_interval_secs ({} <= {})",
                l.timeout_secs, l.heartbeat_interval_secs
            ),
        ));
    }

    let s = &settings.storage;
    if s.ttl_days == 0 {
        errors.push(ValidationError::new("storage.ttl_days", "must be at least 1"));
    }

    ValidationReport { errors }
}
