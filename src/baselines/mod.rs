//! baselines — reference density-ratio estimators.
//!
//! Purpose
//! -------
//! Simple comparators for the ball-ratio and tilting estimators, all behind
//! the same [`DensityRatioModel`](crate::estimator::DensityRatioModel)
//! contract so a pipeline can swap them in.
//!
//! Key behaviors
//! -------------
//! - [`GaussianRatio`]: ratio of independent per-dimension normal fits.
//! - [`KdeRatio`]: ratio of product-Gaussian kernel density estimates.
//! - [`PropensityRatio`]: logistic domain classifier turned into weights.
//!
//! Invariants & assumptions
//! ------------------------
//! - `predict` output is sanitized: finite and `≥ 0` everywhere.

pub mod gaussian;
pub mod kde;
pub mod propensity;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::gaussian::GaussianRatio;
pub use self::kde::{Bandwidth, KdeRatio, KernelDensity};
pub use self::propensity::{PropensityFit, PropensityRatio};

pub mod prelude {
    pub use super::gaussian::GaussianRatio;
    pub use super::kde::{Bandwidth, KdeRatio};
    pub use super::propensity::PropensityRatio;
}
