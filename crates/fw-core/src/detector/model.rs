//! Outlier model seam.
//!
//! The detector scores each reading against a retrainable density model.
//! The trait keeps the scoring backend injectable; production uses the
//! fw-math isolation forest.

use tracing::warn;

use fw_math::{ForestConfig, IsolationForest};

/// A retrainable outlier model over scalar temperatures.
///
/// `refit` replaces the model wholesale with one trained on `values`
/// (a snapshot of the current window); there is no incremental update.
/// `decision` returns a score where more negative means more anomalous.
pub trait OutlierModel {
    fn refit(&mut self, values: &[f64]);
    fn decision(&self, value: f64) -> f64;
}

/// Isolation-forest backed model.
#[derive(Debug, Clone)]
pub struct ForestModel {
    config: ForestConfig,
    forest: Option<IsolationForest>,
}

impl ForestModel {
    pub fn new(config: ForestConfig) -> Self {
        ForestModel {
            config,
            forest: None,
        }
    }

    /// Whether at least one fit has completed.
    pub fn is_fitted(&self) -> bool {
        self.forest.is_some()
    }
}

impl OutlierModel for ForestModel {
    fn refit(&mut self, values: &[f64]) {
        match IsolationForest::fit(values, &self.config) {
            Ok(forest) => self.forest = Some(forest),
            // The detector only refits on a full window, so this cannot
            // trigger mid-stream; keep the previous model if it does.
            Err(e) => warn!(error = %e, "outlier model refit skipped"),
        }
    }

    fn decision(&self, value: f64) -> f64 {
        match &self.forest {
            Some(forest) => forest.decision_function(value),
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unfitted_model_scores_neutral() {
        let model = ForestModel::new(ForestConfig::default());
        assert!(!model.is_fitted());
        assert_eq!(model.decision(25.0), 0.0);
    }

    #[test]
    fn test_refit_replaces_model() {
        let mut model = ForestModel::new(ForestConfig::default());
        model.refit(&[4.0, 4.1, 3.9, 4.0, 4.2, 4.1, 4.0, 3.8, 4.0, 4.1]);
        assert!(model.is_fitted());
        let before = model.decision(25.0);

        // Retrain on a band that includes 25: it stops looking unusual.
        model.refit(&[24.0, 25.0, 26.0, 24.5, 25.5, 25.0, 24.8, 25.2, 24.9, 25.1]);
        let after = model.decision(25.0);
        assert!(after > before);
    }

    #[test]
    fn test_refit_on_empty_keeps_previous_model() {
        let mut model = ForestModel::new(ForestConfig::default());
        model.refit(&[4.0, 4.1, 3.9, 4.0]);
        let fitted_score = model.decision(4.0);
        model.refit(&[]);
        assert!(model.is_fitted());
        assert_eq!(model.decision(4.0), fitted_score);
    }
}
