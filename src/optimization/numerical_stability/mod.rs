//! numerical_stability — floors, tolerances, and stable scalar transforms.
//!
//! Purpose
//! -------
//! Centralize the small numerical constants and guarded transforms that the
//! likelihood objectives share, so every estimator applies the same ε-floor
//! before logarithms and the same overflow guards around `exp`.
//!
//! Key behaviors
//! -------------
//! - [`LOG_FLOOR`] and [`floored_ln`] implement the additive floor used in
//!   the exponential-tilting profile likelihood.
//! - [`safe_softplus`], [`safe_logistic`] and [`log_sigmoid`] keep the
//!   logistic (propensity) likelihood finite for any linear predictor.
//! - [`GENERAL_TOL`] and [`EIGEN_EPS`] are shared tolerances for
//!   denominators and eigenvalue truncation.
//!
//! Conventions
//! -----------
//! - Pure functions on `f64`; no I/O, no logging, no global state.
//! - Domain validation happens upstream; non-finite outputs are treated as
//!   domain violations by the callers.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    floored_ln, log_sigmoid, safe_logistic, safe_softplus, EIGEN_EPS, GENERAL_TOL, LOG_FLOOR,
};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::transformations::{
        floored_ln, log_sigmoid, safe_logistic, safe_softplus, LOG_FLOOR,
    };
}
