//! Combined telemetry store: one writer per table plus the hourly archiver.

use std::path::Path;

use fw_common::{AlertEvent, DeviceId, SensorFrame};

use crate::hourly::{hour_bucket, hour_start_secs, HourlyArchiver};
use crate::schema::{AlertRow, HourlyRow, ReadingRow, TableName};
use crate::writer::{TableWriter, WriteError};

/// All telemetry tables for one monitoring run.
pub struct TelemetryStore {
    readings: TableWriter,
    alerts: TableWriter,
    hourly: TableWriter,
    archiver: HourlyArchiver,
}

impl TelemetryStore {
    /// Open (or create) the telemetry tables under `dir`.
    pub fn open(dir: &Path) -> Self {
        TelemetryStore {
            readings: TableWriter::new(TableName::Readings, dir),
            alerts: TableWriter::new(TableName::Alerts, dir),
            hourly: TableWriter::new(TableName::Hourly, dir),
            archiver: HourlyArchiver::new(),
        }
    }

    /// Record an accepted reading and, if it opens a new clock hour,
    /// archive it to the hourly table.
    pub fn record_reading(&mut self, frame: &SensorFrame) -> Result<(), WriteError> {
        self.readings
            .append(frame.timestamp, &ReadingRow::from_frame(frame))?;
        if self.archiver.observe(frame.timestamp) {
            let bucket = hour_bucket(frame.timestamp);
            let row = HourlyRow::new(&frame.device_id, hour_start_secs(bucket), frame.temperature);
            self.hourly.append(frame.timestamp, &row)?;
        }
        Ok(())
    }

    /// Record an emitted alert.
    pub fn record_alert(
        &mut self,
        device_id: &DeviceId,
        event: &AlertEvent,
    ) -> Result<(), WriteError> {
        self.alerts
            .append(event.timestamp, &AlertRow::from_event(device_id, event))
    }

    /// Flush all tables.
    pub fn flush(&mut self) -> Result<(), WriteError> {
        self.readings.flush()?;
        self.alerts.flush()?;
        self.hourly.flush()?;
        Ok(())
    }

    /// Rows written per table: (readings, alerts, hourly).
    pub fn row_counts(&self) -> (u64, u64, u64) {
        (
            self.readings.rows_written(),
            self.alerts.rows_written(),
            self.hourly.rows_written(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(ts: f64, temp: f64) -> SensorFrame {
        SensorFrame {
            device_id: DeviceId::from("esp32-fridge-001"),
            timestamp: ts,
            temperature: temp,
            pressure: None,
            altitude: None,
            rssi: None,
            status: Some("ok".into()),
        }
    }

    #[test]
    fn test_hourly_archive_deduplicates_within_hour() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TelemetryStore::open(dir.path());

        let base = 1786332800.0;
        store.record_reading(&frame(base, 4.0)).unwrap();
        store.record_reading(&frame(base + 15.0, 4.1)).unwrap();
        store.record_reading(&frame(base + 3600.0, 4.2)).unwrap();
        store.flush().unwrap();

        let (readings, alerts, hourly) = store.row_counts();
        assert_eq!(readings, 3);
        assert_eq!(alerts, 0);
        assert_eq!(hourly, 2);
    }

    #[test]
    fn test_alert_rows_land_in_alert_table() {
        use fw_common::AlertSeverity;

        let dir = tempfile::tempdir().unwrap();
        let mut store = TelemetryStore::open(dir.path());
        let device = DeviceId::from("esp32-fridge-001");
        let event = AlertEvent::new(AlertSeverity::Transient, 1786332800.0, 25.0, 3.2, -0.7, None);

        store.record_alert(&device, &event).unwrap();
        store.flush().unwrap();

        let (_, alerts, _) = store.row_counts();
        assert_eq!(alerts, 1);
    }
}
