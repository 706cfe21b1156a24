//! baselines::gaussian — ratio of two fitted product-normal densities.
//!
//! Each sample gets an independent normal per dimension (sample mean,
//! unbiased standard deviation floored at [`STD_FLOOR`]); the weight is
//! `exp(Σ_d ln φ_T(x_d) − ln φ_S(x_d))`, evaluated in log space with
//! `statrs` log-densities.
use crate::{
    data::{
        errors::{SampleError, SampleResult},
        sample::Sample,
        validation::ensure_same_dim,
    },
    estimator::{DensityRatioModel, RatioError, RatioResult},
    evaluation::weights::sanitize_weights,
};
use ndarray::{Array1, ArrayView1, Axis};
use statrs::distribution::{Continuous, Normal};

/// Smallest standard deviation used for a fitted normal.
pub const STD_FLOOR: f64 = 1e-6;

/// Per-dimension sample mean and unbiased standard deviation (floored).
///
/// A single observation has standard deviation [`STD_FLOOR`].
pub(crate) fn column_moments(sample: &Sample) -> (Array1<f64>, Array1<f64>) {
    let pts = sample.points();
    let n = sample.len() as f64;
    let mean = pts.sum_axis(Axis(0)) / n;
    let std = if sample.len() > 1 {
        let centered = &pts - &mean;
        (centered.mapv(|v| v * v).sum_axis(Axis(0)) / (n - 1.0)).mapv(|v| v.sqrt())
    } else {
        Array1::zeros(sample.dim())
    };
    (mean, std.mapv(|s| s.max(STD_FLOOR)))
}

fn fit_normals(sample: &Sample) -> SampleResult<Vec<Normal>> {
    let (mean, std) = column_moments(sample);
    mean.iter().zip(std.iter()).map(|(&m, &s)| Ok(Normal::new(m, s)?)).collect()
}

/// Fitted marginals for both samples.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedGaussian {
    pub source: Vec<Normal>,
    pub target: Vec<Normal>,
}

impl FittedGaussian {
    /// `ln p_T(x) − ln p_S(x)` under the fitted product normals.
    pub fn log_ratio(&self, x: ArrayView1<'_, f64>) -> f64 {
        x.iter()
            .zip(self.source.iter().zip(self.target.iter()))
            .map(|(&v, (s, t))| t.ln_pdf(v) - s.ln_pdf(v))
            .sum()
    }
}

/// Parametric baseline: independent normals per dimension.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GaussianRatio {
    fitted: Option<FittedGaussian>,
}

impl GaussianRatio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fitted(&self) -> Option<&FittedGaussian> {
        self.fitted.as_ref()
    }
}

impl DensityRatioModel for GaussianRatio {
    fn fit(&mut self, source: &Sample, target: &Sample) -> RatioResult<()> {
        ensure_same_dim(source, target)?;
        self.fitted =
            Some(FittedGaussian { source: fit_normals(source)?, target: fit_normals(target)? });
        Ok(())
    }

    fn predict(&self, queries: &Sample) -> RatioResult<Array1<f64>> {
        let fit = self.fitted.as_ref().ok_or(RatioError::ModelNotFitted)?;
        if queries.dim() != fit.source.len() {
            return Err(SampleError::DimensionMismatch {
                role: queries.role(),
                expected: fit.source.len(),
                found: queries.dim(),
            }
            .into());
        }
        let raw: Array1<f64> = queries.rows().map(|x| fit.log_ratio(x).exp()).collect();
        Ok(sanitize_weights(raw.view()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SampleRole;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Moment estimates, including the single-observation floor.
    // - The fitted log-ratio against the closed form for two normals.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Column moments use the unbiased variance and the floor.
    //
    // Given
    // -----
    // - Values {1, 3} and a single value {5}.
    //
    // Expect
    // ------
    // - mean 2, std √2; single point: mean 5, std STD_FLOOR.
    fn column_moments_are_unbiased_and_floored() {
        let s = Sample::from_values(array![1.0, 3.0], SampleRole::Source).expect("valid");
        let (m, sd) = column_moments(&s);
        assert_eq!(m[0], 2.0);
        assert_relative_eq!(sd[0], 2f64.sqrt(), epsilon = 1e-12);

        let one = Sample::from_values(array![5.0], SampleRole::Source).expect("valid");
        let (m1, sd1) = column_moments(&one);
        assert_eq!((m1[0], sd1[0]), (5.0, STD_FLOOR));
    }

    #[test]
    // Purpose
    // -------
    // Predicted weights equal the ratio of the two fitted normal pdfs.
    //
    // Given
    // -----
    // - Source {−1, 1} (N(0, 2)), target {0, 2} (N(1, 2)); query x = 0.5.
    //
    // Expect
    // ------
    // - Equal variances and the midpoint between means give weight 1.
    // - Queries to the right of the midpoint get weight > 1.
    fn weights_match_normal_ratio() {
        // Arrange
        let source = Sample::from_values(array![-1.0, 1.0], SampleRole::Source).expect("valid");
        let target = Sample::from_values(array![0.0, 2.0], SampleRole::Target).expect("valid");
        let queries = Sample::from_values(array![0.5, 2.0], SampleRole::Query).expect("valid");
        let mut model = GaussianRatio::new();

        // Act
        let w = model.fit_predict(&source, &target).expect("fit");
        let wq = model.predict(&queries).expect("predict");

        // Assert
        assert_eq!(w.len(), 2);
        assert_relative_eq!(wq[0], 1.0, epsilon = 1e-12);
        assert!(wq[1] > 1.0);
    }
}
