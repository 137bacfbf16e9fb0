//! Device wire frames.
//!
//! The sensor publishes newline-delimited JSON frames tagged by `type`:
//! `reading` frames carry the full environmental payload, `heartbeat`
//! frames carry a liveness ping. The detector only consumes the
//! `(temperature, timestamp)` pair; the remaining fields ride along for
//! telemetry.

use serde::{Deserialize, Serialize};

use crate::id::DeviceId;

/// A single frame from the device stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    Reading(SensorFrame),
    Heartbeat(HeartbeatFrame),
}

impl Frame {
    /// Stream timestamp of the frame (seconds since epoch).
    pub fn timestamp(&self) -> f64 {
        match self {
            Frame::Reading(f) => f.timestamp,
            Frame::Heartbeat(f) => f.timestamp,
        }
    }
}

/// Full sensor payload as published by the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorFrame {
    pub device_id: DeviceId,
    /// Seconds since epoch, device clock.
    pub timestamp: f64,
    /// Temperature in degrees Celsius.
    pub temperature: f64,
    /// Barometric pressure in hPa, if the sensor reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    /// Altitude estimate in meters, if the sensor reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    /// WiFi signal strength in dBm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rssi: Option<i32>,
    /// Device-reported status string ("ok", degraded states, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Liveness ping from the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartbeatFrame {
    pub device_id: DeviceId,
    /// Seconds since epoch, device clock.
    pub timestamp: f64,
    /// Device-reported status; `"alive"` on a healthy ping.
    pub status: String,
}

/// The pair the detector consumes, stripped of transport detail.
///
/// Immutable once handed to the detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Temperature in degrees Celsius. Always finite once past the
    /// ingestion guard.
    pub temperature: f64,
    /// Seconds since epoch. Non-decreasing within an accepted stream.
    pub timestamp: f64,
}

impl From<&SensorFrame> for Reading {
    fn from(frame: &SensorFrame) -> Self {
        Reading {
            temperature: frame.temperature,
            timestamp: frame.timestamp,
        }
    }
}
