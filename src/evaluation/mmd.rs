//! evaluation::mmd — weighted maximum mean discrepancy diagnostics.
//!
//! Purpose
//! -------
//! Measure how close a reweighted source sample is to a target sample in a
//! reproducing-kernel Hilbert space. A good density-ratio estimate drives
//! the weighted MMD toward zero.
//!
//! Key behaviors
//! -------------
//! - [`mmd_squared`] computes
//!   `Σ_{i,i'} α_i α_i' k(x_i, x_i') + Σ_{j,j'} β_j β_j' k(y_j, y_j')
//!   − 2 Σ_{i,j} α_i β_j k(x_i, y_j)` with `α_i = w_i / n_S` and
//!   `β_j = 1 / n_T`.
//! - [`weighted_density_compare`] reports the weighted and unweighted MMD²
//!   side by side with the Kish effective sample size of the weights.
//!
//! Invariants & assumptions
//! ------------------------
//! - The value is not clamped: for a PSD kernel it is `≥ 0` up to rounding.
//! - The kernel is validated before any evaluation, and a non-finite total
//!   is an error rather than a returned `NaN` or `±∞`.
//! - Weights are validated (length, finite, `≥ 0`) but not renormalized;
//!   weights with mean different from one shift the `α` mass accordingly.
//!
//! Conventions
//! -----------
//! - Cost is `O((n_S + n_T)²)` kernel evaluations. This is a diagnostic and
//!   is never called inside an optimizer loop.
use crate::{
    data::{
        errors::SampleError,
        sample::Sample,
        validation::{ensure_same_dim, validate_weights},
    },
    estimator::RatioResult,
    evaluation::{kernel::KernelFunction, weights::effective_sample_size},
};
use ndarray::{Array1, ArrayView1};

/// Weighted vs unweighted discrepancy between a sample and a reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityComparison {
    /// MMD² with the supplied weights.
    pub weighted_mmd2: f64,
    /// MMD² with unit weights.
    pub unweighted_mmd2: f64,
    /// Kish effective sample size of the weights.
    pub effective_sample_size: f64,
}

impl DensityComparison {
    /// `unweighted_mmd2 − weighted_mmd2`; positive when reweighting helped.
    pub fn improvement(&self) -> f64 {
        self.unweighted_mmd2 - self.weighted_mmd2
    }
}

/// Weighted MMD² between `source` (weights `w`) and `target` (uniform).
///
/// # Errors
/// - `RatioError::Sample(InvalidBandwidth | InvalidKernelParam)` if the
///   kernel fails [`KernelFunction::validate`].
/// - `RatioError::Sample(DimensionMismatch)` if dimensions differ.
/// - `RatioError::Sample(WeightLengthMismatch | InvalidWeight)` for bad weights.
/// - `RatioError::Sample(NonFiniteStatistic)` if the kernel sums overflow.
///
/// # Examples
/// ```rust
/// use ndarray::{array, Array1};
/// use rust_density_ratio::data::{Sample, SampleRole};
/// use rust_density_ratio::evaluation::{mmd_squared, Kernel};
///
/// let s = Sample::from_values(array![0.0, 1.0, 2.0], SampleRole::Source)?;
/// let t = s.relabel(SampleRole::Target);
/// let v = mmd_squared(&s, Array1::ones(3).view(), &t, &Kernel::Gaussian { bandwidth: 1.0 })?;
/// assert!(v.abs() < 1e-12);
/// # Ok::<(), rust_density_ratio::estimator::RatioError>(())
/// ```
pub fn mmd_squared<K: KernelFunction + ?Sized>(
    source: &Sample, weights: ArrayView1<'_, f64>, target: &Sample, kernel: &K,
) -> RatioResult<f64> {
    kernel.validate()?;
    ensure_same_dim(source, target)?;
    validate_weights(weights, source.len())?;
    let alpha = weights.mapv(|w| w / source.len() as f64);
    let beta = 1.0 / target.len() as f64;

    let mut kss = 0.0;
    for i in 0..source.len() {
        let xi = source.row(i);
        kss += alpha[i] * alpha[i] * kernel.eval(xi, xi);
        for i2 in (i + 1)..source.len() {
            kss += 2.0 * alpha[i] * alpha[i2] * kernel.eval(xi, source.row(i2));
        }
    }

    let mut ktt = 0.0;
    for j in 0..target.len() {
        let yj = target.row(j);
        ktt += kernel.eval(yj, yj);
        for j2 in (j + 1)..target.len() {
            ktt += 2.0 * kernel.eval(yj, target.row(j2));
        }
    }
    ktt *= beta * beta;

    let mut kst = 0.0;
    for (i, xi) in source.rows().enumerate() {
        let row_sum: f64 = target.rows().map(|yj| kernel.eval(xi, yj)).sum();
        kst += alpha[i] * row_sum;
    }
    kst *= beta;

    let mmd2 = kss + ktt - 2.0 * kst;
    if !mmd2.is_finite() {
        return Err(SampleError::NonFiniteStatistic { name: "MMD²", value: mmd2 }.into());
    }
    Ok(mmd2)
}

/// Compare a weighted sample against a reference sample.
///
/// # Errors
/// As [`mmd_squared`].
pub fn weighted_density_compare<K: KernelFunction + ?Sized>(
    sample: &Sample, weights: ArrayView1<'_, f64>, reference: &Sample, kernel: &K,
) -> RatioResult<DensityComparison> {
    let weighted_mmd2 = mmd_squared(sample, weights, reference, kernel)?;
    let ones = Array1::<f64>::ones(sample.len());
    let unweighted_mmd2 = mmd_squared(sample, ones.view(), reference, kernel)?;
    Ok(DensityComparison {
        weighted_mmd2,
        unweighted_mmd2,
        effective_sample_size: effective_sample_size(weights)?,
    })
}
