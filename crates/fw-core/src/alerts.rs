//! Alert routing.
//!
//! The detector returns alerts synchronously; sinks decide how they leave
//! the process. The detector itself never deduplicates sustained re-fires
//! — that is presentation policy, provided here as a throttle wrapper for
//! human-facing sinks.

use std::io::Write;

use serde::Serialize;

use fw_common::{AlertEvent, AlertSeverity, DeviceId, LivenessEvent, OutputFormat};

/// Consumer of emitted events. Implementations must not block
/// indefinitely; delivery happens inside the pipeline loop.
pub trait AlertSink {
    fn on_alert(&mut self, device: &DeviceId, event: &AlertEvent);
    fn on_liveness(&mut self, device: &DeviceId, event: &LivenessEvent);
}

#[derive(Serialize)]
struct AlertEnvelope<'a> {
    kind: &'static str,
    device_id: &'a DeviceId,
    #[serde(flatten)]
    event: &'a AlertEvent,
}

#[derive(Serialize)]
struct LivenessEnvelope<'a> {
    kind: &'static str,
    device_id: &'a DeviceId,
    #[serde(flatten)]
    event: &'a LivenessEvent,
}

/// Writes events to a stream in the selected output format.
///
/// `json`/`jsonl` emit one envelope per line; `summary`/`md` emit the
/// human one-liner.
pub struct StreamSink<W: Write> {
    writer: W,
    format: OutputFormat,
}

impl<W: Write> StreamSink<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        StreamSink { writer, format }
    }

    fn write_line(&mut self, line: &str) {
        // stdout delivery is best-effort; a closed pipe must not take the
        // detector down with it.
        let _ = writeln!(self.writer, "{}", line);
    }
}

/// Console sink on stdout.
pub type ConsoleSink = StreamSink<std::io::Stdout>;

impl ConsoleSink {
    pub fn stdout(format: OutputFormat) -> Self {
        StreamSink::new(std::io::stdout(), format)
    }
}

impl<W: Write> AlertSink for StreamSink<W> {
    fn on_alert(&mut self, device: &DeviceId, event: &AlertEvent) {
        match self.format {
            OutputFormat::Json | OutputFormat::Jsonl => {
                let envelope = AlertEnvelope {
                    kind: "alert",
                    device_id: device,
                    event,
                };
                if let Ok(line) = serde_json::to_string(&envelope) {
                    self.write_line(&line);
                }
            }
            OutputFormat::Summary => {
                let line = format!("[{}] {}", device, event.summary());
                self.write_line(&line);
            }
            OutputFormat::Md => {
                let line = format!("- **{}** `{}`: {}", event.severity, device, event.summary());
                self.write_line(&line);
            }
        }
    }

    fn on_liveness(&mut self, device: &DeviceId, event: &LivenessEvent) {
        match self.format {
            OutputFormat::Json | OutputFormat::Jsonl => {
                let envelope = LivenessEnvelope {
                    kind: "liveness",
                    device_id: device,
                    event,
                };
                if let Ok(line) = serde_json::to_string(&envelope) {
                    self.write_line(&line);
                }
            }
            OutputFormat::Summary => {
                let line = format!(
                    "[{}] device {} after {:.0}s of silence",
                    device, event.status, event.silence_secs
                );
                self.write_line(&line);
            }
            OutputFormat::Md => {
                let line = format!("- **{}** `{}`", event.status, device);
                self.write_line(&line);
            }
        }
    }
}

/// Suppresses sustained re-fires for human-facing sinks.
///
/// The detector intentionally re-emits `Sustained` on every anomalous
/// call so polling dashboards see current state; a console reader wants
/// one line per interval instead. Transient, recovery, and liveness
/// events always pass through.
pub struct SustainedThrottle<S: AlertSink> {
    inner: S,
    min_interval_secs: f64,
    last_sustained_at: Option<f64>,
}

impl<S: AlertSink> SustainedThrottle<S> {
    pub fn new(inner: S, min_interval_secs: f64) -> Self {
        SustainedThrottle {
            inner,
            min_interval_secs,
            last_sustained_at: None,
        }
    }
}

impl<S: AlertSink> AlertSink for SustainedThrottle<S> {
    fn on_alert(&mut self, device: &DeviceId, event: &AlertEvent) {
        match event.severity {
            AlertSeverity::Sustained => {
                if let Some(last) = self.last_sustained_at {
                    if event.timestamp - last < self.min_interval_secs {
                        return;
                    }
                }
                self.last_sustained_at = Some(event.timestamp);
            }
            AlertSeverity::Recovered => {
                self.last_sustained_at = None;
            }
            AlertSeverity::Transient => {}
        }
        self.inner.on_alert(device, event);
    }

    fn on_liveness(&mut self, device: &DeviceId, event: &LivenessEvent) {
        self.inner.on_liveness(device, event);
    }
}
