//! Pipeline runner.
//!
//! One single-threaded pull loop owns every piece of mutable state: the
//! detector, the liveness monitor, the validator, telemetry, and the
//! sinks. That structure *is* the serialization discipline the detector
//! requires — no locks, no second caller. Each accepted reading fans out
//! from here to every consumer; streams are never shared or re-enqueued.

use serde::Serialize;
use tracing::{info, warn};

use fw_common::{AlertEvent, AlertSeverity, DeviceId, Error, Frame, LivenessEvent, Result};
use fw_config::Settings;
use fw_telemetry::TelemetryStore;

use crate::alerts::AlertSink;
use crate::detector::AnomalyDetector;
use crate::ingest::{FrameSource, ReadingValidator};
use crate::liveness::HeartbeatMonitor;

/// Counters accumulated over one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStats {
    pub frames: u64,
    pub readings_accepted: u64,
    pub readings_rejected: u64,
    pub heartbeats: u64,
    pub transient_alerts: u64,
    pub sustained_alerts: u64,
    pub recovered_alerts: u64,
    pub liveness_transitions: u64,
}

impl RunStats {
    pub fn total_alerts(&self) -> u64 {
        self.transient_alerts + self.sustained_alerts + self.recovered_alerts
    }

    /// One-line rendering for the summary output format.
    pub fn summary(&self) -> String {
        format!(
            "frames={} accepted={} rejected={} heartbeats={} alerts={} (transient={} sustained={} recovered={}) liveness={}",
            self.frames,
            self.readings_accepted,
            self.readings_rejected,
            self.heartbeats,
            self.total_alerts(),
            self.transient_alerts,
            self.sustained_alerts,
            self.recovered_alerts,
            self.liveness_transitions,
        )
    }
}

/// Wires the detection engine to a frame source and its consumers.
pub struct Pipeline {
    detector: AnomalyDetector,
    liveness: HeartbeatMonitor,
    validator: ReadingValidator,
    telemetry: Option<TelemetryStore>,
    sinks: Vec<Box<dyn AlertSink>>,
    stats: RunStats,
    device: Option<DeviceId>,
}

impl Pipeline {
    pub fn new(settings: &Settings) -> Self {
        Pipeline {
            detector: AnomalyDetector::new(settings.detector.clone()),
            liveness: HeartbeatMonitor::new(settings.liveness.timeout_secs),
            validator: ReadingValidator::new(),
            telemetry: None,
            sinks: Vec::new(),
            stats: RunStats::default(),
            device: None,
        }
    }

    /// Attach telemetry tables; without them the run is detection-only.
    pub fn with_telemetry(mut self, store: TelemetryStore) -> Self {
        self.telemetry = Some(store);
        self
    }

    pub fn add_sink(&mut self, sink: Box<dyn AlertSink>) {
        self.sinks.push(sink);
    }

    /// Drain a source to the end of its stream.
    pub fn run(&mut self, source: &mut dyn FrameSource) -> Result<RunStats> {
        while let Some(frame) = source.next_frame()? {
            self.handle_frame(&frame)?;
        }
        if let Some(store) = &mut self.telemetry {
            store
                .flush()
                .map_err(|e| Error::TelemetryWrite(e.to_string()))?;
        }
        info!(summary = %self.stats.summary(), "stream drained");
        Ok(self.stats.clone())
    }

    /// Process a single frame.
    pub fn handle_frame(&mut self, frame: &Frame) -> Result<()> {
        self.stats.frames += 1;

        match frame {
            Frame::Reading(sensor) => {
                let device = self.device_for(&sensor.device_id);
                match self.validator.validate(sensor) {
                    Ok(reading) => {
                        self.stats.readings_accepted += 1;
                        if let Some(store) = &mut self.telemetry {
                            store
                                .record_reading(sensor)
                                .map_err(|e| Error::TelemetryWrite(e.to_string()))?;
                        }
                        if let Some(alert) =
                            self.detector.process_data(reading.temperature, reading.timestamp)
                        {
                            self.dispatch_alert(&device, &alert)?;
                        }
                    }
                    Err(_) => {
                        // The validator already logged the rejection.
                        self.stats.readings_rejected += 1;
                    }
                }
            }
            Frame::Heartbeat(heartbeat) => {
                self.stats.heartbeats += 1;
                let device = self.device_for(&heartbeat.device_id);
                if let Some(event) = self.liveness.observe_heartbeat(heartbeat.timestamp) {
                    self.dispatch_liveness(&device, &event);
                }
            }
        }

        // Silence is measured in stream time: every frame advances the
        // liveness clock, whichever kind it is.
        if let Some(event) = self.liveness.check(frame.timestamp()) {
            let device = self.device.clone().unwrap_or_else(|| DeviceId::from("unknown"));
            self.dispatch_liveness(&device, &event);
        }

        Ok(())
    }

    /// Stats so far; `run` returns the final copy.
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    fn device_for(&mut self, id: &DeviceId) -> DeviceId {
        match &self.device {
            None => {
                self.device = Some(id.clone());
                id.clone()
            }
            Some(known) if known != id => {
                // The pipeline watches exactly one logical stream.
                warn!(expected = %known, got = %id, "frame from unexpected device");
                known.clone()
            }
            Some(known) => known.clone(),
        }
    }

    fn dispatch_alert(&mut self, device: &DeviceId, alert: &AlertEvent) -> Result<()> {
        match alert.severity {
            AlertSeverity::Transient => self.stats.transient_alerts += 1,
            AlertSeverity::Sustained => self.stats.sustained_alerts += 1,
            AlertSeverity::Recovered => self.stats.recovered_alerts += 1,
        }
        if let Some(store) = &mut self.telemetry {
            store
                .record_alert(device, alert)
                .map_err(|e| Error::TelemetryWrite(e.to_string()))?;
        }
        for sink in &mut self.sinks {
            sink.on_alert(device, alert);
        }
        Ok(())
    }

    fn dispatch_liveness(&mut self, device: &DeviceId, event: &LivenessEvent) {
        self.stats.liveness_transitions += 1;
        for sink in &mut self.sinks {
            sink.on_liveness(device, event);
        }
    }
}
