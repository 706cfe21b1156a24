//! data — validated samples and input checks.
//!
//! Purpose
//! -------
//! Provide the shared data model of every estimator: a finite, non-empty
//! [`Sample`] of points in ℝ^d, the [`SampleError`] raised when inputs are
//! malformed, and small validators for radius, threshold, bandwidth, and
//! weight inputs.
//!
//! Invariants & assumptions
//! ------------------------
//! - Once a [`Sample`] exists its shape and finiteness never need checking
//!   again; estimators only check cross-sample dimension agreement.
//!
//! Downstream usage
//! ----------------
//! - Build one `Sample` per role (source, target, query) at the API edge.
//! - Estimators call [`validation`] helpers before doing numerical work.

pub mod errors;
pub mod sample;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{SampleError, SampleResult, SampleRole};
pub use self::sample::Sample;

pub mod prelude {
    pub use super::errors::{SampleError, SampleResult, SampleRole};
    pub use super::sample::Sample;
}
