//! Streaming dual-method anomaly detection.
//!
//! The detector consumes one `(temperature, timestamp)` pair per call and
//! combines two independent signals over a sliding window:
//!
//! 1. Statistical: z-score of the new reading against the window's EWMA
//!    and population standard deviation.
//! 2. Model: decision score from a periodically refit outlier model.
//!
//! Both must agree before a reading counts as anomalous; the conjunction
//! suppresses false positives from either method alone. Decisions drive
//! the hysteresis phase machine in [`phase`], which owns alert emission
//! and deduplication.
//!
//! The detector is single-stream and synchronous: exactly one caller, in
//! arrival order, no internal locking. Out-of-order timestamps violate
//! the duration math and are rejected upstream at the ingestion boundary.

pub mod model;
pub mod phase;
pub mod window;

pub use model::{ForestModel, OutlierModel};
pub use phase::{Emission, Phase, PhaseState};
pub use window::SlidingWindow;

use tracing::{debug, info};

use fw_common::{AlertEvent, AlertSeverity};
use fw_config::DetectorSettings;
use fw_math::{ewma, population_std, z_score, ForestConfig};

/// Substitute spread when the window has zero variance, avoiding a
/// degenerate division.
const DEGENERATE_STD: f64 = 0.1;

/// Stateful anomaly detector for one reading stream.
pub struct AnomalyDetector<M = ForestModel> {
    settings: DetectorSettings,
    window: SlidingWindow,
    model: M,
    last_fit_at: Option<f64>,
    state: PhaseState,
}

impl AnomalyDetector<ForestModel> {
    /// Detector with the production isolation-forest model.
    pub fn new(settings: DetectorSettings) -> Self {
        let forest = ForestConfig {
            trees: settings.forest_trees,
            sample_size: None,
            contamination: settings.contamination,
            seed: settings.seed,
        };
        Self::with_model(settings, ForestModel::new(forest))
    }
}

impl<M: OutlierModel> AnomalyDetector<M> {
    /// Detector with an injected scoring backend.
    pub fn with_model(settings: DetectorSettings, model: M) -> Self {
        let window = SlidingWindow::new(settings.window_size);
        AnomalyDetector {
            settings,
            window,
            model,
            last_fit_at: None,
            state: PhaseState::new(),
        }
    }

    /// Process one reading; returns an alert when the phase machine emits.
    ///
    /// Preconditions (enforced by the ingestion boundary, not here):
    /// `temperature` is finite, `timestamp` is non-decreasing.
    pub fn process_data(&mut self, temperature: f64, timestamp: f64) -> Option<AlertEvent> {
        self.window.push(temperature, timestamp);

        if !self.window.is_full() {
            debug!(
                collected = self.window.len(),
                needed = self.window.capacity(),
                "warming up"
            );
            return None;
        }

        let values = self.window.temperatures();

        // Method 1: EWMA + z-score over the window.
        let center = ewma(&values, self.settings.ewma_alpha);
        let mut std = population_std(&values);
        if std == 0.0 {
            std = DEGENERATE_STD;
        }
        let z = z_score(temperature, center, std);
        let stat_anomaly = z.abs() > self.settings.z_threshold;

        // Method 2: outlier model, refit at most once per retrain interval
        // of stream time.
        let refit_due = match self.last_fit_at {
            None => true,
            Some(at) => timestamp - at > self.settings.retrain_interval_secs,
        };
        if refit_due {
            self.model.refit(&values);
            self.last_fit_at = Some(timestamp);
            debug!(timestamp, "outlier model refit");
        }
        let score = self.model.decision(temperature);
        let model_anomaly = score < self.settings.score_threshold;

        // Both methods must agree.
        let is_anomaly = stat_anomaly && model_anomaly;

        match self
            .state
            .advance(is_anomaly, timestamp, self.settings.sustained_secs)
        {
            Emission::None => None,
            Emission::Transient => {
                info!(temperature, z, score, "anomaly episode opened");
                Some(AlertEvent::new(
                    AlertSeverity::Transient,
                    timestamp,
                    temperature,
                    z,
                    score,
                    None,
                ))
            }
            Emission::Sustained { elapsed } => {
                info!(temperature, elapsed, "sustained anomaly");
                Some(AlertEvent::new(
                    AlertSeverity::Sustained,
                    timestamp,
                    temperature,
                    z,
                    score,
                    Some(elapsed),
                ))
            }
            Emission::Recovered { elapsed } => {
                info!(temperature, elapsed, "temperature normalized");
                Some(AlertEvent::new(
                    AlertSeverity::Recovered,
                    timestamp,
                    temperature,
                    z,
                    score,
                    Some(elapsed),
                ))
            }
        }
    }

    /// Current phase machine state.
    pub fn phase_state(&self) -> &PhaseState {
        &self.state
    }

    /// Readings currently held in the window.
    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// The scoring backend (primarily for tests and diagnostics).
    pub fn model(&self) -> &M {
        &self.model
    }
}
