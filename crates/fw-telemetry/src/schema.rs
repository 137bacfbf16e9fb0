//! Row schemas for the telemetry tables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fw_common::{AlertEvent, AlertSeverity, DeviceId, SensorFrame, SCHEMA_VERSION};

/// Telemetry table names, used for file naming and retention priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableName {
    Readings,
    Alerts,
    Hourly,
}

impl TableName {
    /// File-name stem for this table.
    pub fn stem(&self) -> &'static str {
        match self {
            TableName::Readings => "readings",
            TableName::Alerts => "alerts",
            TableName::Hourly => "hourly",
        }
    }

    /// All tables, in pruning priority order: raw readings go first,
    /// alert history is kept longest.
    pub fn pruning_priority() -> [TableName; 3] {
        [TableName::Readings, TableName::Hourly, TableName::Alerts]
    }
}

impl std::fmt::Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.stem())
    }
}

/// Convert a stream timestamp to a wall-clock instant for row stamping.
pub fn epoch_to_datetime(ts: f64) -> DateTime<Utc> {
    let secs = ts.floor() as i64;
    let nanos = ((ts - ts.floor()) * 1e9) as u32;
    DateTime::from_timestamp(secs, nanos).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// One accepted reading, full device payload preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingRow {
    pub schema_version: String,
    pub device_id: DeviceId,
    pub recorded_at: DateTime<Utc>,
    pub timestamp: f64,
    pub temperature: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rssi: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ReadingRow {
    pub fn from_frame(frame: &SensorFrame) -> Self {
        ReadingRow {
            schema_version: SCHEMA_VERSION.to_string(),
            device_id: frame.device_id.clone(),
            recorded_at: epoch_to_datetime(frame.timestamp),
            timestamp: frame.timestamp,
            temperature: frame.temperature,
            pressure: frame.pressure,
            altitude: frame.altitude,
            rssi: frame.rssi,
            status: frame.status.clone(),
        }
    }
}

/// One emitted alert, tied back to the device that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRow {
    pub schema_version: String,
    pub device_id: DeviceId,
    pub recorded_at: DateTime<Utc>,
    pub severity: AlertSeverity,
    pub timestamp: f64,
    pub temperature: f64,
    pub z_score: f64,
    pub model_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
}

impl AlertRow {
    pub fn from_event(device_id: &DeviceId, event: &AlertEvent) -> Self {
        AlertRow {
            schema_version: SCHEMA_VERSION.to_string(),
            device_id: device_id.clone(),
            recorded_at: epoch_to_datetime(event.timestamp),
            severity: event.severity,
            timestamp: event.timestamp,
            temperature: event.temperature,
            z_score: event.z_score,
            model_score: event.model_score,
            duration_secs: event.duration_secs,
        }
    }
}

/// One archived temperature per clock hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyRow {
    pub schema_version: String,
    pub device_id: DeviceId,
    /// Start of the archived hour.
    pub hour: DateTime<Utc>,
    pub temperature: f64,
}

impl HourlyRow {
    pub fn new(device_id: &DeviceId, hour_start_secs: i64, temperature: f64) -> Self {
        HourlyRow {
            schema_version: SCHEMA_VERSION.to_string(),
            device_id: device_id.clone(),
            hour: DateTime::from_timestamp(hour_start_secs, 0)
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            temperature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_conversion_keeps_subseconds() {
        let dt = epoch_to_datetime(1754500000.5);
        assert_eq!(dt.timestamp(), 1754500000);
        assert_eq!(dt.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn test_reading_row_preserves_payload() {
        let frame = SensorFrame {
            device_id: DeviceId::from("esp32-fridge-001"),
            timestamp: 1754500000.0,
            temperature: 4.2,
            pressure: Some(1013.1),
            altitude: None,
            rssi: Some(-61),
            status: Some("ok".into()),
        };
        let row = ReadingRow::from_frame(&frame);
        assert_eq!(row.temperature, 4.2);
        assert_eq!(row.pressure, Some(1013.1));
        assert_eq!(row.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn test_pruning_priority_keeps_alerts_last() {
        let order = TableName::pruning_priority();
        assert_eq!(order[0], TableName::Readings);
        assert_eq!(order[2], TableName::Alerts);
    }
}
