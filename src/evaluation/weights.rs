//! evaluation::weights — post-processing and summaries of importance weights.
//!
//! - [`sanitize_weights`]: replace `NaN`, `±∞` and negative entries by 0.
//! - [`normalize_weights`]: rescale to mean one.
//! - [`effective_sample_size`]: Kish's `(Σw)² / Σw²`.
//! - [`weighted_mean`]: `Σ w_i x_i / Σ w_i` per dimension.
use crate::data::{
    errors::{SampleError, SampleResult},
    sample::Sample,
    validation::validate_weights,
};
use ndarray::{Array1, ArrayView1};

/// Copy of `weights` with every non-finite or negative entry set to 0.
pub fn sanitize_weights(weights: ArrayView1<'_, f64>) -> Array1<f64> {
    weights.mapv(|w| if w.is_finite() && w > 0.0 { w } else { 0.0 })
}

/// Rescale weights to mean one; all-zero weights are returned unchanged.
///
/// # Errors
/// `SampleError::InvalidWeight` for non-finite or negative entries.
pub fn normalize_weights(weights: ArrayView1<'_, f64>) -> SampleResult<Array1<f64>> {
    validate_weights(weights, weights.len())?;
    let total = weights.sum();
    if total == 0.0 {
        return Ok(weights.to_owned());
    }
    Ok(weights.mapv(|w| w * weights.len() as f64 / total))
}

/// Kish effective sample size; 0 when every weight is 0.
///
/// # Errors
/// `SampleError::InvalidWeight` for non-finite or negative entries.
pub fn effective_sample_size(weights: ArrayView1<'_, f64>) -> SampleResult<f64> {
    validate_weights(weights, weights.len())?;
    let sum = weights.sum();
    let sum_sq = weights.dot(&weights);
    if sum_sq == 0.0 {
        return Ok(0.0);
    }
    Ok(sum * sum / sum_sq)
}

/// Weighted mean of the rows of `sample`.
///
/// # Errors
/// - `SampleError::WeightLengthMismatch` / `InvalidWeight`.
/// - `SampleError::InvalidWeight` with index `0` and value `0` if every
///   weight is zero (the mean is undefined).
pub fn weighted_mean(sample: &Sample, weights: ArrayView1<'_, f64>) -> SampleResult<Array1<f64>> {
    validate_weights(weights, sample.len())?;
    let total = weights.sum();
    if total == 0.0 {
        return Err(SampleError::InvalidWeight { index: 0, value: 0.0 });
    }
    Ok(sample.points().t().dot(&weights) / total)
}
