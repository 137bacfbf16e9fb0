//! Numerical primitives: smoothing, moments, and outlier modeling.

pub mod ewma;
pub mod forest;
pub mod moments;
