//! tilt — exponential-tilting density-ratio estimation by profile likelihood.
//!
//! Purpose
//! -------
//! Model the density ratio parametrically as
//! `w(x) = g(x; θ) = exp(α + β·T(x))` and fit `θ` by maximizing the
//! empirical-likelihood profile over the pooled source and target samples.
//!
//! Key behaviors
//! -------------
//! - [`basis`]: the feature map `T(x)` ([`TiltBasis`]).
//! - [`params`]: [`TiltParameter`] and `g(x; θ)`.
//! - [`options`]: constraint form, multiplier policy, optimizer settings.
//! - [`objective`]: the profile cost, its domain guard, and its analytic
//!   gradient.
//! - [`model`]: [`fit_tilt`], [`TiltFit`], and [`TiltEstimator`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Outside the feasible region (non-finite `g`, non-positive constraint
//!   argument) the objective is `+∞`, never `NaN`, so line searches back off
//!   instead of failing.
//! - Every optimizer failure surfaces as a distinct [`TiltError`] variant.
//!
//! Conventions
//! -----------
//! - The `ln g` term of the profile runs over the target sample, so the
//!   fitted `g` estimates `p_target / p_source`.
//! - Optimizer vector layout: `[α, β₁, …, β_k]`, plus `λ` last when free.
//!
//! Downstream usage
//! ----------------
//! ```rust
//! use ndarray::array;
//! use rust_density_ratio::data::{Sample, SampleRole};
//! use rust_density_ratio::tilt::{fit_tilt, TiltBasis, TiltOptions};
//!
//! let source = Sample::from_values(array![0.1, 0.2, 0.3, 0.4, 0.5, 0.6], SampleRole::Source)?;
//! let target = Sample::from_values(array![0.3, 0.5, 0.6, 0.7, 0.8, 0.9], SampleRole::Target)?;
//! let fit = fit_tilt(&source, &target, None, &TiltOptions::profiled(TiltBasis::Linear))?;
//! let w = fit.evaluate(array![0.8].view())?;
//! assert!(w > fit.evaluate(array![0.2].view())?);
//! # Ok::<(), rust_density_ratio::tilt::TiltError>(())
//! ```

pub mod basis;
pub mod errors;
pub mod model;
pub mod objective;
pub mod options;
pub mod params;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::basis::TiltBasis;
pub use self::errors::{TiltError, TiltResult};
pub use self::model::{fit_tilt, StandardErrorKind, TiltEstimator, TiltFit};
pub use self::objective::{profile_cost, TiltData, TiltObjective};
pub use self::options::{ConstraintForm, Multiplier, TiltOptions};
pub use self::params::TiltParameter;

pub mod prelude {
    pub use super::basis::TiltBasis;
    pub use super::errors::{TiltError, TiltResult};
    pub use super::model::{fit_tilt, TiltEstimator, TiltFit};
    pub use super::options::{ConstraintForm, Multiplier, TiltOptions};
    pub use super::params::TiltParameter;
}
