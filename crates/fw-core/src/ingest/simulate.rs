//! Seeded synthetic frame generation.
//!
//! Produces a fridge-like stream for demos, calibration, and end-to-end
//! tests: a stable band around the setpoint with injectable door-open
//! excursions (rapid rise while open, prompt recovery) and compressor
//! failure (unbounded ramp). Heartbeats interleave at their own cadence.
//! All randomness comes from the seed, so a given config replays
//! identically.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fw_common::{DeviceId, Frame, HeartbeatFrame, Result, SensorFrame};

use super::source::FrameSource;

/// Synthetic stream parameters.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub seed: u64,
    /// Reading frames to emit before ending the stream.
    pub count: usize,
    /// Stream epoch of the first reading.
    pub start_at: f64,
    pub reading_interval_secs: f64,
    pub heartbeat_interval_secs: f64,
    pub device_id: String,
    /// Fridge setpoint in degrees Celsius.
    pub base_temp: f64,
    /// Uniform noise half-width around the setpoint.
    pub noise: f64,
    /// Reading index at which the door opens.
    pub door_open_at: Option<usize>,
    /// Readings the door stays open.
    pub door_open_readings: usize,
    /// Reading index at which the compressor fails.
    pub failure_at: Option<usize>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig {
            seed: 42,
            count: 240,
            start_at: 0.0,
            reading_interval_secs: 15.0,
            heartbeat_interval_secs: 5.0,
            device_id: "esp32-fridge-001".to_string(),
            base_temp: 4.0,
            noise: 0.1,
            door_open_at: None,
            door_open_readings: 8,
            failure_at: None,
        }
    }
}

/// Frame source backed by the simulator.
pub struct SimulatedSource {
    config: SimulatorConfig,
    rng: StdRng,
    device_id: DeviceId,
    emitted_readings: usize,
    next_reading_at: f64,
    next_heartbeat_at: f64,
    failure_drift: f64,
}

impl SimulatedSource {
    pub fn new(config: SimulatorConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        let device_id = DeviceId::from(config.device_id.clone());
        let next_reading_at = config.start_at;
        let next_heartbeat_at = config.start_at + config.heartbeat_interval_secs;
        SimulatedSource {
            config,
            rng,
            device_id,
            emitted_readings: 0,
            next_reading_at,
            next_heartbeat_at,
            failure_drift: 0.0,
        }
    }

    fn jitter(&mut self, half_width: f64) -> f64 {
        if half_width > 0.0 {
            self.rng.random_range(-half_width..half_width)
        } else {
            0.0
        }
    }

    fn temperature_for(&mut self, index: usize) -> f64 {
        let mut temp = self.config.base_temp + self.jitter(self.config.noise);

        if let Some(open_at) = self.config.door_open_at {
            let close_at = open_at + self.config.door_open_readings;
            if (open_at..close_at).contains(&index) {
                // Warm air floods in fast, then the rise levels off.
                let open_for = (index - open_at + 1) as f64;
                temp += 8.0 * (1.0 - (-open_for / 3.0).exp());
            }
        }

        if let Some(failure_at) = self.config.failure_at {
            if index >= failure_at {
                self.failure_drift += 0.35;
            }
        }
        temp + self.failure_drift
    }
}

impl FrameSource for SimulatedSource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.emitted_readings >= self.config.count {
            return Ok(None);
        }

        if self.next_heartbeat_at <= self.next_reading_at {
            let timestamp = self.next_heartbeat_at;
            self.next_heartbeat_at += self.config.heartbeat_interval_secs;
            return Ok(Some(Frame::Heartbeat(HeartbeatFrame {
                device_id: self.device_id.clone(),
                timestamp,
                status: "alive".to_string(),
            })));
        }

        let index = self.emitted_readings;
        let timestamp = self.next_reading_at;
        let temperature = self.temperature_for(index);
        let pressure = 1013.25 + self.jitter(0.4);
        let rssi = -60 + self.rng.random_range(-6..=6);

        self.emitted_readings += 1;
        self.next_reading_at += self.config.reading_interval_secs;

        Ok(Some(Frame::Reading(SensorFrame {
            device_id: self.device_id.clone(),
            timestamp,
            temperature,
            pressure: Some(pressure),
            altitude: Some(12.0),
            rssi: Some(rssi),
            status: Some("ok".to_string()),
        })))
    }
}
