//! optimization — MLE stack, numerical helpers, and unified error surface.
//!
//! Purpose
//! -------
//! Provide a cohesive optimization layer for the likelihood-based density
//! ratio estimators (exponential tilting, logistic propensity). It combines
//! an Argmin-backed log-likelihood maximizer, guarded scalar transforms, and
//! a single error/result surface.
//!
//! Key behaviors
//! -------------
//! - `loglik_optimizer`: maximize `ℓ(θ)` with L-BFGS and a configurable line
//!   search, tolerating a `-∞` domain sentinel from the model.
//! - `numerical_stability`: log floors and overflow-safe logistic helpers.
//! - `errors`: [`OptError`](errors::OptError) and `OptResult<T>`; Argmin
//!   errors never leak past this module.
//!
//! Invariants & assumptions
//! ------------------------
//! - Optimizers operate in an unconstrained parameter space `θ`. Models
//!   express "outside the feasible region" by returning `ℓ(θ) = -∞`, which
//!   the adapter turns into a `+∞` cost.
//! - Invalid configuration and numerical failures are reported as
//!   `OptError`, never as panics.
//!
//! Conventions
//! -----------
//! - Solvers maximize `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)`; outcomes are
//!   expressed in terms of `ℓ`.
//! - No I/O. Progress reporting is opt-in through the `obs_slog` feature.
//!
//! Downstream usage
//! ----------------
//! - `tilt` and `baselines::propensity` implement `LogLikelihood` and call
//!   `maximize`.
//! - `tilt::TiltFit::standard_errors` uses `finite_diff::compute_hessian`.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules cover solver wiring, sentinel handling,
//!   error conversion, and stable transforms on toy objectives.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_density_ratio::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
