//! evaluation::kernel — pluggable positive-semidefinite kernels.
//!
//! [`KernelFunction`] is the seam: the built-in [`Kernel`] enum implements
//! it, and so does any closure `Fn(ArrayView1, ArrayView1) -> f64`, which
//! lets callers supply their own PSD kernel without a wrapper type.
//!
//! Built-in kernels:
//! - `Linear`: `k(x, y) = x·y`
//! - `Gaussian { bandwidth: σ }`: `exp(−‖x − y‖² / (2σ²))`
//! - `Laplacian { bandwidth: σ }`: `exp(−‖x − y‖₁ / σ)`
//! - `Polynomial { degree: p, offset: c }`: `(x·y + c)^p`
use crate::data::{
    errors::{SampleError, SampleResult},
    sample::Sample,
    validation::validate_bandwidth,
};
use ndarray::ArrayView1;

/// A symmetric positive-semidefinite kernel on `ℝ^d`.
pub trait KernelFunction {
    /// `k(x, y)`; `x` and `y` have the same length.
    fn eval(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64;

    /// Check the kernel's parameters before any evaluation. Closures have
    /// none, so the default accepts.
    fn validate(&self) -> SampleResult<()> {
        Ok(())
    }
}

impl<F> KernelFunction for F
where
    F: Fn(ArrayView1<'_, f64>, ArrayView1<'_, f64>) -> f64,
{
    fn eval(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
        self(x, y)
    }
}

/// Built-in kernels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Kernel {
    #[default]
    Linear,
    Gaussian { bandwidth: f64 },
    Laplacian { bandwidth: f64 },
    Polynomial { degree: u32, offset: f64 },
}

impl Kernel {
    /// Gaussian kernel with the median heuristic: `σ = median ‖x_i − x_j‖ / √2`
    /// over all pairs `i < j`. Falls back to `σ = 1` when fewer than two
    /// points or when every pair coincides.
    pub fn gaussian_median(sample: &Sample) -> Self {
        let n = sample.len();
        let mut distances = Vec::with_capacity(n.saturating_sub(1) * n / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                distances.push(squared_distance(sample.row(i), sample.row(j)).sqrt());
            }
        }
        distances.sort_by(f64::total_cmp);
        let median = distances.get(distances.len() / 2).copied().unwrap_or(0.0);
        let bandwidth = if median > 0.0 { median / 2f64.sqrt() } else { 1.0 };
        Kernel::Gaussian { bandwidth }
    }
}

impl KernelFunction for Kernel {
    /// # Errors
    /// - `SampleError::InvalidBandwidth` for a non-positive or non-finite σ.
    /// - `SampleError::InvalidKernelParam` for a negative or non-finite
    ///   polynomial offset (a negative offset breaks positive
    ///   semi-definiteness), or a degree above `i32::MAX`.
    fn validate(&self) -> SampleResult<()> {
        match *self {
            Kernel::Linear => Ok(()),
            Kernel::Gaussian { bandwidth } | Kernel::Laplacian { bandwidth } => {
                validate_bandwidth(bandwidth)
            }
            Kernel::Polynomial { degree, offset } => {
                if i32::try_from(degree).is_err() {
                    return Err(SampleError::InvalidKernelParam {
                        value: f64::from(degree),
                        reason: "Polynomial kernel degree must not exceed i32::MAX.",
                    });
                }
                if offset.is_finite() && offset >= 0.0 {
                    Ok(())
                } else {
                    Err(SampleError::InvalidKernelParam {
                        value: offset,
                        reason: "Polynomial kernel offset must be finite and non-negative.",
                    })
                }
            }
        }
    }

    fn eval(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
        match *self {
            Kernel::Linear => x.dot(&y),
            Kernel::Gaussian { bandwidth } => {
                (-squared_distance(x, y) / (2.0 * bandwidth * bandwidth)).exp()
            }
            Kernel::Laplacian { bandwidth } => {
                let l1: f64 = x.iter().zip(y.iter()).map(|(a, b)| (a - b).abs()).sum();
                (-l1 / bandwidth).exp()
            }
            Kernel::Polynomial { degree, offset } => {
                let base = x.dot(&y) + offset;
                match i32::try_from(degree) {
                    Ok(p) => base.powi(p),
                    Err(_) => base.powf(f64::from(degree)),
                }
            }
        }
    }
}

#[inline]
pub(crate) fn squared_distance(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
    x.iter().zip(y.iter()).map(|(a, b)| (a - b) * (a - b)).sum()
}
