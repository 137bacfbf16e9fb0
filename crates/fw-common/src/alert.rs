//! Alert and liveness event types.
//!
//! An [`AlertEvent`] is the detector's only output: a self-contained,
//! serializable record of one state-machine emission. The detector holds
//! no alert log; deduplication and presentation are the consumer's job.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity of a thermal alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    /// Brief excursion, possibly a door left open.
    Transient,
    /// Anomaly held past the sustained-duration threshold; critical.
    Sustained,
    /// Episode ended; temperature back in the normal band.
    Recovered,
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertSeverity::Transient => write!(f, "transient"),
            AlertSeverity::Sustained => write!(f, "sustained"),
            AlertSeverity::Recovered => write!(f, "recovered"),
        }
    }
}

/// One emission from the detector's phase machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Unique event ID.
    pub id: Uuid,
    pub severity: AlertSeverity,
    /// Stream timestamp of the reading that produced the emission.
    pub timestamp: f64,
    /// Temperature of that reading, degrees Celsius.
    pub temperature: f64,
    /// Statistical signal at emission time.
    pub z_score: f64,
    /// Model decision score at emission time (more negative = more anomalous).
    pub model_score: f64,
    /// Elapsed anomaly duration for `Sustained`, elapsed episode duration
    /// for `Recovered`; absent for `Transient`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
}

impl AlertEvent {
    pub fn new(
        severity: AlertSeverity,
        timestamp: f64,
        temperature: f64,
        z_score: f64,
        model_score: f64,
        duration_secs: Option<f64>,
    ) -> Self {
        AlertEvent {
            id: Uuid::new_v4(),
            severity,
            timestamp,
            temperature,
            z_score,
            model_score,
            duration_secs,
        }
    }

    /// One-line human-readable rendering for console sinks.
    pub fn summary(&self) -> String {
        match self.severity {
            AlertSeverity::Transient => format!(
                "transient excursion: {:.1}°C (z={:.2}, model={:.2})",
                self.temperature, self.z_score, self.model_score
            ),
            AlertSeverity::Sustained => format!(
                "SUSTAINED anomaly for {:.0}s: {:.1}°C (z={:.2}, model={:.2})",
                self.duration_secs.unwrap_or(0.0),
                self.temperature,
                self.z_score,
                self.model_score
            ),
            AlertSeverity::Recovered => format!(
                "recovered after {:.0}s: {:.1}°C",
                self.duration_secs.unwrap_or(0.0),
                self.temperature
            ),
        }
    }
}

/// Device liveness status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LivenessStatus {
    Online,
    Offline,
}

impl std::fmt::Display for LivenessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LivenessStatus::Online => write!(f, "online"),
            LivenessStatus::Offline => write!(f, "offline"),
        }
    }
}

/// Edge-triggered liveness transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LivenessEvent {
    pub status: LivenessStatus,
    /// Stream timestamp at which the transition was observed.
    pub timestamp: f64,
    /// Seconds since the last heartbeat when the transition fired.
    pub silence_secs: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_wire_names() {
        let json = serde_json::to_string(&AlertSeverity::Sustained).unwrap();
        assert_eq!(json, r#""sustained""#);
    }

    #[test]
    fn test_transient_has_no_duration_field() {
        let event = AlertEvent::new(AlertSeverity::Transient, 10.0, 25.0, 3.1, -0.7, None);
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("duration_secs"));
    }

    #[test]
    fn test_summary_mentions_duration_for_sustained() {
        let event = AlertEvent::new(AlertSeverity::Sustained, 10.0, 25.0, 3.1, -0.7, Some(130.0));
        assert!(event.summary().contains("130s"));
    }
}
