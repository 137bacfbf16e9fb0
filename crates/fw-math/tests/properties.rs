//! Property-based tests for fw-math numerical functions.
//!
//! Uses proptest to verify mathematical properties hold across many random inputs.

use proptest::prelude::*;
use fw_math::{ewma, mean, population_std, population_variance, quantile, z_score};
use fw_math::{ForestConfig, IsolationForest};

/// Tolerance for floating point comparisons.
const TOL: f64 = 1e-9;

fn min_of(values: &[f64]) -> f64 {
    values.iter().cloned().fold(f64::INFINITY, f64::min)
}

fn max_of(values: &[f64]) -> f64 {
    values.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
}

// ============================================================================
// EWMA properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// EWMA is a convex combination: it stays within the value range.
    #[test]
    fn ewma_within_range(
        values in prop::collection::vec(-40.0..60.0f64, 1..50),
        alpha in 0.01..0.99f64,
    ) {
        let out = ewma(&values, alpha);
        let lo = min_of(&values);
        let hi = max_of(&values);
        prop_assert!(out >= lo - TOL && out <= hi + TOL,
            "ewma {} outside [{}, {}]", out, lo, hi);
    }

    /// EWMA of a constant sequence is that constant.
    #[test]
    fn ewma_constant_fixed_point(c in -40.0..60.0f64, n in 1usize..50, alpha in 0.01..0.99f64) {
        let values = vec![c; n];
        prop_assert!((ewma(&values, alpha) - c).abs() < TOL);
    }

    /// EWMA is deterministic in its inputs.
    #[test]
    fn ewma_deterministic(values in prop::collection::vec(-40.0..60.0f64, 1..50)) {
        prop_assert_eq!(ewma(&values, 0.3), ewma(&values, 0.3));
    }
}

// ============================================================================
// Moment properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Population variance is non-negative and std is its square root.
    #[test]
    fn variance_nonnegative(values in prop::collection::vec(-40.0..60.0f64, 1..50)) {
        let var = population_variance(&values);
        prop_assert!(var >= 0.0);
        prop_assert!((population_std(&values) - var.sqrt()).abs() < TOL);
    }

    /// Shifting every value shifts the mean and leaves the variance alone.
    #[test]
    fn variance_shift_invariant(
        values in prop::collection::vec(-40.0..60.0f64, 2..50),
        shift in -100.0..100.0f64,
    ) {
        let shifted: Vec<f64> = values.iter().map(|v| v + shift).collect();
        prop_assert!((mean(&shifted) - mean(&values) - shift).abs() < 1e-6);
        prop_assert!((population_variance(&shifted) - population_variance(&values)).abs() < 1e-6);
    }

    /// z-score inverts: value == center + z * std.
    #[test]
    fn z_score_inverts(value in -40.0..60.0f64, center in -40.0..60.0f64, std in 0.01..20.0f64) {
        let z = z_score(value, center, std);
        prop_assert!((center + z * std - value).abs() < 1e-6);
    }

    /// Quantiles stay within the sample range and are monotone in q.
    #[test]
    fn quantile_monotone(
        values in prop::collection::vec(-40.0..60.0f64, 1..50),
        q1 in 0.0..1.0f64,
        q2 in 0.0..1.0f64,
    ) {
        let (lo_q, hi_q) = if q1 <= q2 { (q1, q2) } else { (q2, q1) };
        let lo = quantile(&values, lo_q);
        let hi = quantile(&values, hi_q);
        prop_assert!(lo <= hi + TOL);
        prop_assert!(lo >= min_of(&values) - TOL);
        prop_assert!(hi <= max_of(&values) + TOL);
    }
}

// ============================================================================
// Isolation forest properties
// ============================================================================

proptest! {
    // Forest fitting is comparatively expensive; fewer cases.
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Raw scores are bounded in [-1, 0] for arbitrary probes.
    #[test]
    fn forest_scores_bounded(
        values in prop::collection::vec(-10.0..10.0f64, 2..40),
        probe in -100.0..100.0f64,
    ) {
        let config = ForestConfig { trees: 25, ..Default::default() };
        let forest = IsolationForest::fit(&values, &config).unwrap();
        let s = forest.score_samples(probe);
        prop_assert!((-1.0..=0.0).contains(&s), "score {} out of range", s);
        prop_assert!(forest.decision_function(probe).is_finite());
    }

    /// Identical seed and data reproduce identical scores.
    #[test]
    fn forest_seed_determinism(
        values in prop::collection::vec(-10.0..10.0f64, 2..40),
        probe in -100.0..100.0f64,
    ) {
        let config = ForestConfig { trees: 25, ..Default::default() };
        let a = IsolationForest::fit(&values, &config).unwrap();
        let b = IsolationForest::fit(&values, &config).unwrap();
        prop_assert_eq!(a.decision_function(probe), b.decision_function(probe));
    }
}
