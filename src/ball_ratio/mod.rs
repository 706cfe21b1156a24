//! ball_ratio — nearest-neighbor-ball (histogram) density-ratio estimator.
//!
//! Purpose
//! -------
//! Estimate `w(x) = p_target(x) / p_source(x)` locally by the ratio of
//! empirical masses of a fixed-radius ball around `x`, and zero out every
//! estimate whose source mass falls below a reliability threshold.
//!
//! Key behaviors
//! -------------
//! - [`estimate`]: ball masses, [`BallRatio`] records, batch weights.
//! - [`rules`]: fixed or rate-based radius and threshold.
//! - [`model`]: [`BallRatioEstimator`], the fit/predict form.
//!
//! Invariants & assumptions
//! ------------------------
//! - Guarded weights are finite, ≥ 0, and exactly 0 wherever the source
//!   mass is zero or below the threshold.
//! - A query with no source point in its ball is reported, not hidden:
//!   `raw = +∞` together with `guarded = 0`.
//!
//! Testing notes
//! -------------
//! - Unit tests in each submodule; property and consistency checks live in
//!   `tests/integration_ratio_pipeline.rs`.

pub mod estimate;
pub mod model;
pub mod rules;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::estimate::{ball_mass, estimate_ratio, estimate_ratios, guarded_weights, BallRatio};
pub use self::model::{BallPrediction, BallRatioEstimator};
pub use self::rules::{RadiusRule, ThresholdRule};

pub mod prelude {
    pub use super::estimate::{estimate_ratio, guarded_weights, BallRatio};
    pub use super::model::BallRatioEstimator;
    pub use super::rules::{RadiusRule, ThresholdRule};
}
