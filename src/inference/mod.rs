//! inference — standard errors for fitted tilt parameters.
//!
//! Purpose
//! -------
//! Post-estimation uncertainty for parameters fitted by maximizing a smooth
//! objective: classical observed-information standard errors and the
//! sandwich variant built from per-observation scores.
//!
//! Key behaviors
//! -------------
//! - [`calc_standard_errors`]: finite-difference observed information plus
//!   an eigen-truncated pseudoinverse.
//! - [`score_covariance`]: IID outer product of per-observation scores.
//!
//! Conventions
//! -----------
//! - Everything is on the average-objective scale; callers rescale by `√n`.
//! - Errors surface as `OptError`, the same type the optimizer layer uses.

pub mod hessian;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::hessian::{calc_standard_errors, score_covariance};

pub mod prelude {
    pub use super::hessian::{calc_standard_errors, score_covariance};
}
