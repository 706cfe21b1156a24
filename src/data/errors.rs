//! Errors for sample construction and estimator inputs.
//!
//! [`SampleError`] covers everything that can be wrong with the numbers a
//! caller hands to an estimator: empty or non-finite samples, dimension
//! mismatches, invalid radius/threshold/bandwidth values, and weight vectors
//! of the wrong length. These are surfaced immediately and never corrected
//! silently.
//!
//! ## Conventions
//! - **Indices are 0-based** (rows are observations, columns are features).
//! - Every variant that refers to a sample carries its [`SampleRole`] so a
//!   message tells the caller *which* input was rejected.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, PyErr};
use statrs::distribution::NormalError;

/// Result alias for input-validation paths that may produce [`SampleError`].
pub type SampleResult<T> = Result<T, SampleError>;

/// Which input a [`Sample`](super::Sample) plays in an estimation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleRole {
    Source,
    Target,
    Query,
    Reference,
}

impl std::fmt::Display for SampleRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SampleRole::Source => "source",
            SampleRole::Target => "target",
            SampleRole::Query => "query",
            SampleRole::Reference => "reference",
        };
        f.write_str(name)
    }
}

/// Invalid estimator input.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleError {
    // ---- Sample shape and values ----
    /// Sample has no observations.
    EmptySample { role: SampleRole },

    /// Sample has zero columns.
    ZeroDimension { role: SampleRole },

    /// Rows passed to `Sample::from_rows` have different lengths.
    RaggedRows { role: SampleRole, row: usize, expected: usize, found: usize },

    /// An entry is NaN/±inf.
    NonFiniteData { role: SampleRole, row: usize, col: usize, value: f64 },

    /// Two inputs disagree on the feature dimension.
    DimensionMismatch { role: SampleRole, expected: usize, found: usize },

    // ---- Ball-ratio configuration ----
    /// Radius must be finite and ≥ 0.
    NegativeRadius { value: f64, reason: &'static str },

    /// Reliability threshold must be finite and ≥ 0.
    NegativeThreshold { value: f64, reason: &'static str },

    /// Hölder exponent of the radius rate must lie in (0, 1].
    InvalidHolderExponent { value: f64 },

    /// Rate-rule scale constants must be finite and > 0.
    InvalidRateScale { value: f64 },

    // ---- Weights and kernels ----
    /// Weight vector length differs from the number of observations.
    WeightLengthMismatch { expected: usize, found: usize },

    /// A weight is negative or non-finite where a clean weight is required.
    InvalidWeight { index: usize, value: f64 },

    /// Kernel or KDE bandwidth must be finite and > 0.
    InvalidBandwidth { value: f64 },

    /// Kernel parameter outside its valid range.
    InvalidKernelParam { value: f64, reason: &'static str },

    /// A kernel statistic came out non-finite (kernel values overflowed).
    NonFiniteStatistic { name: &'static str, value: f64 },

    // ---- Distributions ----
    /// Wrapper for statrs::distribution::NormalError
    InvalidNormal { reason: String },
}

impl std::error::Error for SampleError {}

impl std::fmt::Display for SampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Sample shape and values ----
            SampleError::EmptySample { role } => {
                write!(f, "The {role} sample is empty.")
            }
            SampleError::ZeroDimension { role } => {
                write!(f, "The {role} sample has zero features; d must be at least 1.")
            }
            SampleError::RaggedRows { role, row, expected, found } => {
                write!(
                    f,
                    "Row {row} of the {role} sample has {found} entries; expected {expected}."
                )
            }
            SampleError::NonFiniteData { role, row, col, value } => {
                write!(f, "The {role} sample has a non-finite entry at ({row}, {col}): {value}")
            }
            SampleError::DimensionMismatch { role, expected, found } => {
                write!(
                    f,
                    "The {role} input has dimension {found}; expected dimension {expected}."
                )
            }

            // ---- Ball-ratio configuration ----
            SampleError::NegativeRadius { value, reason } => {
                write!(f, "Invalid radius {value}: {reason}")
            }
            SampleError::NegativeThreshold { value, reason } => {
                write!(f, "Invalid reliability threshold {value}: {reason}")
            }
            SampleError::InvalidHolderExponent { value } => {
                write!(f, "Hölder exponent must lie in (0, 1]; got {value}")
            }
            SampleError::InvalidRateScale { value } => {
                write!(f, "Rate scale must be finite and > 0; got {value}")
            }

            // ---- Weights and kernels ----
            SampleError::WeightLengthMismatch { expected, found } => {
                write!(f, "Weight vector has length {found}; expected {expected}.")
            }
            SampleError::InvalidWeight { index, value } => {
                write!(f, "Weight at index {index} must be finite and ≥ 0; got {value}")
            }
            SampleError::InvalidBandwidth { value } => {
                write!(f, "Bandwidth must be finite and > 0; got {value}")
            }
            SampleError::InvalidKernelParam { value, reason } => {
                write!(f, "Invalid kernel parameter {value}: {reason}")
            }
            SampleError::NonFiniteStatistic { name, value } => {
                write!(f, "{name} is not finite ({value}); check the kernel and data scale.")
            }

            // ---- Distributions ----
            SampleError::InvalidNormal { reason } => {
                write!(f, "Invalid normal distribution: {reason}")
            }
        }
    }
}

impl From<NormalError> for SampleError {
    fn from(err: NormalError) -> Self {
        SampleError::InvalidNormal { reason: err.to_string() }
    }
}

#[cfg(feature = "python-bindings")]
impl From<SampleError> for PyErr {
    fn from(err: SampleError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
