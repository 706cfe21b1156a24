//! Input checks shared by the estimators.
//!
//! Each helper returns the first violation as a [`SampleError`]; none of
//! them mutate or repair their input.
use crate::data::{
    errors::{SampleError, SampleResult, SampleRole},
    sample::Sample,
};
use ndarray::ArrayView1;

/// Require `other` to have the same feature dimension as `reference`.
///
/// # Errors
/// `SampleError::DimensionMismatch` labelled with `other`'s role.
pub fn ensure_same_dim(reference: &Sample, other: &Sample) -> SampleResult<()> {
    if reference.dim() != other.dim() {
        return Err(SampleError::DimensionMismatch {
            role: other.role(),
            expected: reference.dim(),
            found: other.dim(),
        });
    }
    Ok(())
}

/// Require a single query point to have dimension `dim` and finite entries.
///
/// # Errors
/// - `SampleError::DimensionMismatch` for a wrong length.
/// - `SampleError::NonFiniteData` for a NaN/±∞ coordinate.
pub fn ensure_query(x: ArrayView1<'_, f64>, dim: usize) -> SampleResult<()> {
    if x.len() != dim {
        return Err(SampleError::DimensionMismatch {
            role: SampleRole::Query,
            expected: dim,
            found: x.len(),
        });
    }
    for (col, &value) in x.iter().enumerate() {
        if !value.is_finite() {
            return Err(SampleError::NonFiniteData { role: SampleRole::Query, row: 0, col, value });
        }
    }
    Ok(())
}

/// Radius must be finite and ≥ 0.
///
/// # Errors
/// `SampleError::NegativeRadius`.
pub fn validate_radius(radius: f64) -> SampleResult<()> {
    if !radius.is_finite() {
        return Err(SampleError::NegativeRadius { value: radius, reason: "Radius must be finite." });
    }
    if radius < 0.0 {
        return Err(SampleError::NegativeRadius {
            value: radius,
            reason: "Radius must be non-negative.",
        });
    }
    Ok(())
}

/// Reliability threshold must be finite and ≥ 0.
///
/// # Errors
/// `SampleError::NegativeThreshold`.
pub fn validate_threshold(threshold: f64) -> SampleResult<()> {
    if !threshold.is_finite() {
        return Err(SampleError::NegativeThreshold {
            value: threshold,
            reason: "Threshold must be finite.",
        });
    }
    if threshold < 0.0 {
        return Err(SampleError::NegativeThreshold {
            value: threshold,
            reason: "Threshold must be non-negative.",
        });
    }
    Ok(())
}

/// Weights must match the sample length and be finite and ≥ 0.
///
/// # Errors
/// - `SampleError::WeightLengthMismatch`.
/// - `SampleError::InvalidWeight` for the first bad entry.
pub fn validate_weights(weights: ArrayView1<'_, f64>, n: usize) -> SampleResult<()> {
    if weights.len() != n {
        return Err(SampleError::WeightLengthMismatch { expected: n, found: weights.len() });
    }
    for (index, &value) in weights.iter().enumerate() {
        if !value.is_finite() || value < 0.0 {
            return Err(SampleError::InvalidWeight { index, value });
        }
    }
    Ok(())
}

/// Bandwidth must be finite and > 0.
///
/// # Errors
/// `SampleError::InvalidBandwidth`.
pub fn validate_bandwidth(bandwidth: f64) -> SampleResult<()> {
    if !bandwidth.is_finite() || bandwidth <= 0.0 {
        return Err(SampleError::InvalidBandwidth { value: bandwidth });
    }
    Ok(())
}
