//! Frame ingestion and validation.
//!
//! The detector assumes finite temperatures and non-decreasing
//! timestamps; this boundary is where those preconditions are enforced.
//! Rejections are structured errors that are counted and logged — the
//! stream continues past them.

pub mod simulate;
pub mod source;

pub use simulate::{SimulatedSource, SimulatorConfig};
pub use source::{FrameSource, JsonlSource};

use tracing::warn;

use fw_common::{Error, Frame, Reading, Result, SensorFrame};

/// Parse one JSONL line into a frame.
pub fn parse_frame(line: &str, line_no: u64) -> Result<Frame> {
    serde_json::from_str(line).map_err(|e| Error::MalformedFrame {
        line: line_no,
        reason: e.to_string(),
    })
}

/// Guards the detector's input contract over one stream.
#[derive(Debug, Clone, Default)]
pub struct ReadingValidator {
    last_timestamp: Option<f64>,
    rejected_non_finite: u64,
    rejected_out_of_order: u64,
}

impl ReadingValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a sensor frame, yielding the reading the detector may see.
    ///
    /// Non-finite temperatures and timestamps that run backwards are
    /// rejected; the offending frame never reaches the detector or the
    /// telemetry tables.
    pub fn validate(&mut self, frame: &SensorFrame) -> Result<Reading> {
        if !frame.temperature.is_finite() {
            self.rejected_non_finite += 1;
            warn!(
                device = %frame.device_id,
                value = frame.temperature,
                "rejected non-finite temperature"
            );
            return Err(Error::NonFiniteTemperature {
                value: frame.temperature,
            });
        }
        if let Some(last) = self.last_timestamp {
            if frame.timestamp < last {
                self.rejected_out_of_order += 1;
                warn!(
                    device = %frame.device_id,
                    timestamp = frame.timestamp,
                    last_accepted = last,
                    "rejected out-of-order reading"
                );
                return Err(Error::OutOfOrderTimestamp {
                    timestamp: frame.timestamp,
                    last_accepted: last,
                });
            }
        }
        self.last_timestamp = Some(frame.timestamp);
        Ok(Reading::from(frame))
    }

    /// Rejection counters: (non-finite, out-of-order).
    pub fn rejected(&self) -> (u64, u64) {
        (self.rejected_non_finite, self.rejected_out_of_order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fw_common::DeviceId;

    fn frame(ts: f64, temp: f64) -> SensorFrame {
        SensorFrame {
            device_id: DeviceId::from("esp32-fridge-001"),
            timestamp: ts,
            temperature: temp,
            pressure: None,
            altitude: None,
            rssi: None,
            status: None,
        }
    }

    #[test]
    fn test_accepts_ordered_finite_readings() {
        let mut v = ReadingValidator::new();
        assert!(v.validate(&frame(1.0, 4.0)).is_ok());
        assert!(v.validate(&frame(1.0, 4.1)).is_ok()); // equal timestamps allowed
        assert!(v.validate(&frame(2.0, 4.2)).is_ok());
        assert_eq!(v.rejected(), (0, 0));
    }

    #[test]
    fn test_rejects_non_finite() {
        let mut v = ReadingValidator::new();
        assert!(matches!(
            v.validate(&frame(1.0, f64::NAN)),
            Err(Error::NonFiniteTemperature { .. })
        ));
        assert!(matches!(
            v.validate(&frame(2.0, f64::INFINITY)),
            Err(Error::NonFiniteTemperature { .. })
        ));
        assert_eq!(v.rejected(), (2, 0));
    }

    #[test]
    fn test_rejects_out_of_order_without_corrupting_clock() {
        let mut v = ReadingValidator::new();
        v.validate(&frame(10.0, 4.0)).unwrap();
        assert!(matches!(
            v.validate(&frame(5.0, 4.1)),
            Err(Error::OutOfOrderTimestamp { .. })
        ));
        // The rejected frame did not advance the accepted clock.
        assert!(v.validate(&frame(10.5, 4.2)).is_ok());
        assert_eq!(v.rejected(), (0, 1));
    }

    #[test]
    fn test_non_finite_rejection_does_not_advance_clock() {
        let mut v = ReadingValidator::new();
        v.validate(&frame(10.0, 4.0)).unwrap();
        let _ = v.validate(&frame(20.0, f64::NAN));
        // 15.0 is still after the last *accepted* reading.
        assert!(v.validate(&frame(15.0, 4.1)).is_ok());
    }

    #[test]
    fn test_parse_frame_error_carries_line_number() {
        let err = parse_frame("{not json", 17).unwrap_err();
        match err {
            Error::MalformedFrame { line, .. } => assert_eq!(line, 17),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
