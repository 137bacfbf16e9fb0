//! Seeded one-dimensional isolation forest.
//!
//! Scoring follows the scikit-learn convention so thresholds calibrated
//! against its `IsolationForest` carry over directly:
//!
//! - `score_samples(x) = -2^(-E[h(x)] / c(sample_size))`, in [-1, 0]
//! - `offset` = the contamination-quantile of the training scores
//! - `decision_function(x) = score_samples(x) - offset`
//!
//! More negative means more anomalous. All randomness comes from the
//! caller-supplied seed; identical seed and data produce an identical
//! model.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::moments::quantile;

/// Euler-Mascheroni constant, used in the average path length term.
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Default subsample cap per tree.
const DEFAULT_SAMPLE_CAP: usize = 256;

/// Errors from forest construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FitError {
    #[error("cannot fit isolation forest on an empty training set")]
    EmptyTrainingSet,
}

/// Isolation forest construction parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of isolation trees.
    pub trees: usize,
    /// Subsample size per tree; `None` means min(256, n).
    pub sample_size: Option<usize>,
    /// Expected fraction of outliers in training data (0, 0.5].
    pub contamination: f64,
    /// RNG seed for subsampling and split selection.
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            trees: 100,
            sample_size: None,
            contamination: 0.1,
            seed: 42,
        }
    }
}

/// Average path length of an unsuccessful BST search over `n` points.
///
/// This is the `c(n)` normalization term from Liu et al.; matches the
/// scikit-learn piecewise definition.
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Split {
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        size: usize,
    },
}

#[derive(Debug, Clone)]
struct IsoTree {
    nodes: Vec<Node>,
    root: usize,
}

impl IsoTree {
    fn path_length(&self, x: f64) -> f64 {
        let mut idx = self.root;
        let mut depth = 0.0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { size } => return depth + average_path_length(size),
                Node::Split {
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x < threshold { left } else { right };
                    depth += 1.0;
                }
            }
        }
    }
}

/// A fitted isolation forest over scalar values.
#[derive(Debug, Clone)]
pub struct IsolationForest {
    trees: Vec<IsoTree>,
    sample_size: usize,
    offset: f64,
}

impl IsolationForest {
    /// Fit a forest on `values`.
    ///
    /// The model snapshots the training distribution; refitting means
    /// building a new forest, not updating this one.
    pub fn fit(values: &[f64], config: &ForestConfig) -> Result<Self, FitError> {
        let n = values.len();
        if n == 0 {
            return Err(FitError::EmptyTrainingSet);
        }
        let sample_size = config
            .sample_size
            .unwrap_or(DEFAULT_SAMPLE_CAP)
            .clamp(1, n);
        // Height limit from the paper: trees deeper than log2(psi) carry
        // no isolation signal.
        let max_depth = (sample_size as f64).log2().ceil().max(1.0) as usize;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut trees = Vec::with_capacity(config.trees.max(1));
        for _ in 0..config.trees.max(1) {
            let sample: Vec<f64> = if sample_size < n {
                rand::seq::index::sample(&mut rng, n, sample_size)
                    .into_iter()
                    .map(|i| values[i])
                    .collect()
            } else {
                values.to_vec()
            };
            let mut nodes = Vec::new();
            let root = build_node(&mut nodes, sample, 0, max_depth, &mut rng);
            trees.push(IsoTree { nodes, root });
        }

        let mut forest = IsolationForest {
            trees,
            sample_size,
            offset: 0.0,
        };
        let train_scores: Vec<f64> = values.iter().map(|&v| forest.score_samples(v)).collect();
        forest.offset = quantile(&train_scores, config.contamination.clamp(0.0, 1.0));
        Ok(forest)
    }

    /// Raw anomaly score in [-1, 0]; closer to -1 is more anomalous.
    pub fn score_samples(&self, x: f64) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.path_length(x)).sum();
        let avg_path = total / self.trees.len() as f64;
        let denom = average_path_length(self.sample_size).max(1.0);
        -(2.0_f64).powf(-avg_path / denom)
    }

    /// Shifted score: negative values are more anomalous than the
    /// contamination-quantile of the training data.
    pub fn decision_function(&self, x: f64) -> f64 {
        self.score_samples(x) - self.offset
    }

    /// The contamination-derived offset subtracted by `decision_function`.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Subsample size the normalization term is based on.
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }
}

fn build_node(
    nodes: &mut Vec<Node>,
    values: Vec<f64>,
    depth: usize,
    max_depth: usize,
    rng: &mut StdRng,
) -> usize {
    let size = values.len();
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if depth >= max_depth || size <= 1 || min >= max {
        nodes.push(Node::Leaf { size });
        return nodes.len() - 1;
    }
    let threshold = rng.random_range(min..max);
    let (left_vals, right_vals): (Vec<f64>, Vec<f64>) =
        values.into_iter().partition(|v| *v < threshold);
    // threshold == min leaves one side empty; treat the partition as
    // unsplittable rather than recursing forever.
    if left_vals.is_empty() || right_vals.is_empty() {
        nodes.push(Node::Leaf { size });
        return nodes.len() - 1;
    }
    let left = build_node(nodes, left_vals, depth + 1, max_depth, rng);
    let right = build_node(nodes, right_vals, depth + 1, max_depth, rng);
    nodes.push(Node::Split {
        threshold,
        left,
        right,
    });
    nodes.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster() -> Vec<f64> {
        // Tight fridge-like band around 4°C.
        vec![
            4.0, 4.1, 3.9, 4.0, 4.2, 4.1, 4.0, 3.8, 4.0, 4.1, 4.0, 3.9, 4.1, 4.0, 4.2, 4.0, 3.9,
            4.0, 4.1, 4.0,
        ]
    }

    #[test]
    fn fit_empty_is_error() {
        let err = IsolationForest::fit(&[], &ForestConfig::default()).unwrap_err();
        assert_eq!(err, FitError::EmptyTrainingSet);
    }

    #[test]
    fn score_samples_bounded() {
        let forest = IsolationForest::fit(&cluster(), &ForestConfig::default()).unwrap();
        for x in [-50.0, 0.0, 4.0, 4.1, 25.0, 100.0] {
            let s = forest.score_samples(x);
            assert!((-1.0..=0.0).contains(&s), "score {} out of range", s);
        }
    }

    #[test]
    fn outlier_scores_below_inliers() {
        let forest = IsolationForest::fit(&cluster(), &ForestConfig::default()).unwrap();
        let inlier = forest.decision_function(4.0);
        let outlier = forest.decision_function(25.0);
        assert!(
            outlier < inlier,
            "outlier {} should score below inlier {}",
            outlier,
            inlier
        );
    }

    #[test]
    fn same_seed_same_model() {
        let config = ForestConfig::default();
        let a = IsolationForest::fit(&cluster(), &config).unwrap();
        let b = IsolationForest::fit(&cluster(), &config).unwrap();
        for x in [3.5, 4.0, 4.5, 10.0, 25.0] {
            assert_eq!(a.score_samples(x), b.score_samples(x));
            assert_eq!(a.decision_function(x), b.decision_function(x));
        }
    }

    #[test]
    fn different_seed_usually_differs() {
        let a = IsolationForest::fit(&cluster(), &ForestConfig::default()).unwrap();
        let b = IsolationForest::fit(
            &cluster(),
            &ForestConfig {
                seed: 7,
                ..Default::default()
            },
        )
        .unwrap();
        let differs = [3.5, 4.05, 25.0]
            .iter()
            .any(|&x| a.score_samples(x) != b.score_samples(x));
        assert!(differs);
    }

    #[test]
    fn constant_training_data_is_degenerate_not_fatal() {
        let forest = IsolationForest::fit(&[4.0; 20], &ForestConfig::default()).unwrap();
        // Every point isolates at the root leaf, so all scores collapse to
        // the same value and decisions sit at zero.
        assert!((forest.decision_function(4.0)).abs() < 1e-9);
        assert!((forest.decision_function(25.0)).abs() < 1e-9);
    }

    #[test]
    fn offset_tracks_contamination_quantile() {
        let values = cluster();
        let strict = IsolationForest::fit(
            &values,
            &ForestConfig {
                contamination: 0.01,
                ..Default::default()
            },
        )
        .unwrap();
        let loose = IsolationForest::fit(
            &values,
            &ForestConfig {
                contamination: 0.5,
                ..Default::default()
            },
        )
        .unwrap();
        // A larger contamination raises the offset, making more of the
        // training set score negative.
        assert!(loose.offset() > strict.offset());
    }

    #[test]
    fn average_path_length_known_values() {
        assert_eq!(average_path_length(0), 0.0);
        assert_eq!(average_path_length(1), 0.0);
        assert_eq!(average_path_length(2), 1.0);
        // c(3) = 2*(ln 2 + gamma) - 4/3
        let expected = 2.0 * (2.0_f64.ln() + EULER_GAMMA) - 4.0 / 3.0;
        assert!((average_path_length(3) - expected).abs() < 1e-12);
        assert!(average_path_length(256) > average_path_length(20));
    }
}
