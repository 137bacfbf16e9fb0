//! Frostwatch math utilities.

pub mod math;

pub use math::ewma::*;
pub use math::forest::*;
pub use math::moments::*;
