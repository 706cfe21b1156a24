//! Errors for the exponential-tilting estimator.
//!
//! [`TiltError`] distinguishes the failure modes a caller may want to branch
//! on (retry from another start, change the basis, give up) without parsing
//! messages. Optimizer errors are mapped through `From<OptError>`.
use crate::{data::errors::SampleError, optimization::errors::OptError};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, PyErr};

/// Result alias for tilting operations.
pub type TiltResult<T> = Result<T, TiltError>;

#[derive(Debug, Clone, PartialEq)]
pub enum TiltError {
    // ---- Inputs ----
    /// Invalid samples.
    Sample(SampleError),

    /// A point lies outside the basis domain (e.g. `x ∉ [0, 1]` for the
    /// bounded log basis).
    InvalidBasisInput { row: usize, col: usize, value: f64, reason: &'static str },

    /// The basis cannot be used in this dimension.
    UnsupportedDimension { dim: usize, reason: &'static str },

    /// Initial coefficient vector has the wrong length for the basis.
    CoefficientLengthMismatch { expected: usize, found: usize },

    /// A tilt parameter is NaN/±∞.
    NonFiniteParameter { name: &'static str, value: f64 },

    // ---- Fit outcome ----
    /// The profile objective is `+∞` at the initial point.
    InfeasibleStart { cost: f64 },

    /// No finite objective value was seen during the run.
    NoFiniteObjective,

    /// Any other optimizer failure, with a human-readable status.
    OptimizationFailed { status: String },

    /// Model hasn't been fitted yet.
    ModelNotFitted,
}

impl std::error::Error for TiltError {}

impl std::fmt::Display for TiltError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Inputs ----
            TiltError::Sample(err) => write!(f, "{err}"),
            TiltError::InvalidBasisInput { row, col, value, reason } => {
                write!(f, "Basis input at ({row}, {col}) is {value}: {reason}")
            }
            TiltError::UnsupportedDimension { dim, reason } => {
                write!(f, "Tilt basis does not support dimension {dim}: {reason}")
            }
            TiltError::CoefficientLengthMismatch { expected, found } => {
                write!(f, "Tilt coefficients have length {found}; basis needs {expected}.")
            }
            TiltError::NonFiniteParameter { name, value } => {
                write!(f, "Tilt parameter '{name}' must be finite; got {value}")
            }

            // ---- Fit outcome ----
            TiltError::InfeasibleStart { cost } => {
                write!(f, "Initial tilt parameters are infeasible: profile objective is {cost}")
            }
            TiltError::NoFiniteObjective => {
                write!(f, "Optimizer found no parameters with a finite profile objective.")
            }
            TiltError::OptimizationFailed { status } => {
                write!(f, "Tilt optimization failed: {status}")
            }
            TiltError::ModelNotFitted => write!(f, "Tilt model has not been fitted yet."),
        }
    }
}

impl From<SampleError> for TiltError {
    fn from(err: SampleError) -> Self {
        TiltError::Sample(err)
    }
}

impl From<OptError> for TiltError {
    fn from(err: OptError) -> Self {
        match err {
            OptError::InfeasibleStart => TiltError::InfeasibleStart { cost: f64::INFINITY },
            OptError::NoFiniteObjective => TiltError::NoFiniteObjective,
            other => TiltError::OptimizationFailed { status: other.to_string() },
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<TiltError> for PyErr {
    fn from(err: TiltError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Optimizer failures map onto the distinct tilt variants.
    //
    // Given
    // -----
    // - OptError::InfeasibleStart, NoFiniteObjective, and a backend error.
    //
    // Expect
    // ------
    // - InfeasibleStart{+∞}, NoFiniteObjective, OptimizationFailed.
    fn from_opt_error_keeps_failure_kinds_distinct() {
        assert_eq!(
            TiltError::from(OptError::InfeasibleStart),
            TiltError::InfeasibleStart { cost: f64::INFINITY }
        );
        assert_eq!(TiltError::from(OptError::NoFiniteObjective), TiltError::NoFiniteObjective);
        assert!(matches!(
            TiltError::from(OptError::BackendError { text: "boom".into() }),
            TiltError::OptimizationFailed { .. }
        ));
    }
}
