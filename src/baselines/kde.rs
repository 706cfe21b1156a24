//! baselines::kde — ratio of two product-Gaussian kernel density estimates.
//!
//! Purpose
//! -------
//! Nonparametric plug-in baseline: estimate `p_T` and `p_S` separately with
//! kernel density estimates and divide.
//!
//! Key behaviors
//! -------------
//! - Density: `p̂(x) = (1/n) Σ_i Π_d φ((x_d − x_id)/h_d) / h_d` with the
//!   standard normal `φ`, accumulated with log-sum-exp.
//! - [`Bandwidth::Silverman`] sets `h_d = 1.06 σ_d n^{−1/5}` per sample and
//!   dimension; [`Bandwidth::Fixed`] uses one `h` everywhere.
//! - A query whose source log-density is `−∞` gets weight 0.
//!
//! Invariants & assumptions
//! ------------------------
//! - Bandwidths are finite and `> 0`. A constant column under Silverman
//!   falls back to [`STD_FLOOR`](super::gaussian::STD_FLOOR) scaled by the
//!   rule.
use crate::{
    baselines::gaussian::column_moments,
    data::{
        errors::{SampleError, SampleResult},
        sample::Sample,
        validation::{ensure_same_dim, validate_bandwidth},
    },
    estimator::{DensityRatioModel, RatioError, RatioResult},
    evaluation::weights::sanitize_weights,
};
use ndarray::{Array1, ArrayView1};
use statrs::distribution::{Continuous, Normal};

/// Bandwidth rule for [`KdeRatio`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Bandwidth {
    /// `1.06 σ n^{−1/5}` per dimension.
    #[default]
    Silverman,
    /// The same `h` in every dimension for both samples.
    Fixed(f64),
}

impl Bandwidth {
    /// # Errors
    /// `SampleError::InvalidBandwidth` for a non-positive or non-finite `Fixed`.
    pub fn validate(&self) -> SampleResult<()> {
        match *self {
            Bandwidth::Silverman => Ok(()),
            Bandwidth::Fixed(h) => validate_bandwidth(h),
        }
    }

    /// Per-dimension bandwidths for `sample`.
    pub fn resolve(&self, sample: &Sample) -> Array1<f64> {
        match *self {
            Bandwidth::Silverman => {
                let (_, std) = column_moments(sample);
                let factor = 1.06 * (sample.len() as f64).powf(-0.2);
                std.mapv(|s| factor * s)
            }
            Bandwidth::Fixed(h) => Array1::from_elem(sample.dim(), h),
        }
    }
}

/// A kernel density estimate: the data plus its per-dimension bandwidths.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelDensity {
    pub sample: Sample,
    pub bandwidths: Array1<f64>,
}

impl KernelDensity {
    /// # Errors
    /// `SampleError::InvalidBandwidth` if a resolved bandwidth is not `> 0`.
    pub fn new(sample: Sample, rule: Bandwidth) -> SampleResult<Self> {
        rule.validate()?;
        let bandwidths = rule.resolve(&sample);
        for &h in bandwidths.iter() {
            validate_bandwidth(h)?;
        }
        Ok(Self { sample, bandwidths })
    }

    /// `ln p̂(x)`.
    pub fn ln_density(&self, x: ArrayView1<'_, f64>) -> SampleResult<f64> {
        let std_normal = Normal::new(0.0, 1.0)?;
        let ln_norm: f64 = self.bandwidths.iter().map(|h| h.ln()).sum::<f64>()
            + (self.sample.len() as f64).ln();
        let terms: Vec<f64> = self
            .sample
            .rows()
            .map(|xi| {
                x.iter()
                    .zip(xi.iter())
                    .zip(self.bandwidths.iter())
                    .map(|((&v, &c), &h)| std_normal.ln_pdf((v - c) / h))
                    .sum::<f64>()
            })
            .collect();
        Ok(log_sum_exp(&terms) - ln_norm)
    }
}

fn log_sum_exp(terms: &[f64]) -> f64 {
    let max = terms.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return max;
    }
    max + terms.iter().map(|t| (t - max).exp()).sum::<f64>().ln()
}

/// Plug-in ratio of two kernel density estimates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KdeRatio {
    pub bandwidth: Bandwidth,
    fitted: Option<(KernelDensity, KernelDensity)>,
}

impl KdeRatio {
    /// # Errors
    /// As [`Bandwidth::validate`].
    pub fn new(bandwidth: Bandwidth) -> SampleResult<Self> {
        bandwidth.validate()?;
        Ok(Self { bandwidth, fitted: None })
    }

    /// Fitted `(source, target)` densities.
    pub fn fitted(&self) -> Option<(&KernelDensity, &KernelDensity)> {
        self.fitted.as_ref().map(|(s, t)| (s, t))
    }
}

impl DensityRatioModel for KdeRatio {
    fn fit(&mut self, source: &Sample, target: &Sample) -> RatioResult<()> {
        ensure_same_dim(source, target)?;
        let src = KernelDensity::new(source.clone(), self.bandwidth)?;
        let tgt = KernelDensity::new(target.clone(), self.bandwidth)?;
        self.fitted = Some((src, tgt));
        Ok(())
    }

    fn predict(&self, queries: &Sample) -> RatioResult<Array1<f64>> {
        let (src, tgt) = self.fitted.as_ref().ok_or(RatioError::ModelNotFitted)?;
        if queries.dim() != src.sample.dim() {
            return Err(SampleError::DimensionMismatch {
                role: queries.role(),
                expected: src.sample.dim(),
                found: queries.dim(),
            }
            .into());
        }
        let mut raw = Array1::<f64>::zeros(queries.len());
        for (w, x) in raw.iter_mut().zip(queries.rows()) {
            let ln_s = src.ln_density(x)?;
            *w = if ln_s == f64::NEG_INFINITY { 0.0 } else { (tgt.ln_density(x)? - ln_s).exp() };
        }
        Ok(sanitize_weights(raw.view()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SampleRole;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Silverman's rule on a hand-computed sample.
    // - The KDE against a direct single-point evaluation.
    // - Ratio ordering for shifted samples and bandwidth validation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Silverman's rule matches 1.06 σ n^{−1/5}.
    //
    // Given
    // -----
    // - Values {1, 3} (σ = √2, n = 2).
    //
    // Expect
    // ------
    // - h = 1.06 · √2 · 2^{−0.2}.
    fn silverman_matches_rule_of_thumb() {
        let s = Sample::from_values(array![1.0, 3.0], SampleRole::Source).expect("valid");
        let h = Bandwidth::Silverman.resolve(&s);
        assert!((h[0] - 1.06 * 2f64.sqrt() * 2f64.powf(-0.2)).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // A one-point KDE is a normal density centered at that point.
    //
    // Given
    // -----
    // - Sample {0}, fixed h = 2, x = 1.
    //
    // Expect
    // ------
    // - ln p̂(1) = ln φ(0.5) − ln 2.
    fn single_point_kde_is_normal_density() {
        let s = Sample::from_values(array![0.0], SampleRole::Source).expect("valid");
        let kde = KernelDensity::new(s, Bandwidth::Fixed(2.0)).expect("valid bandwidth");
        let expected = -0.5 * 0.25 - 0.5 * (2.0 * std::f64::consts::PI).ln() - 2f64.ln();
        let got = kde.ln_density(array![1.0].view()).expect("valid");
        assert!((got - expected).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Shifting the target to the right raises weights on the right.
    //
    // Given
    // -----
    // - Source {0, 0.5, 1}, target {1, 1.5, 2}, Fixed(0.5); queries {0, 2}.
    //
    // Expect
    // ------
    // - w(0) < 1 < w(2); Fixed(0) is rejected.
    fn kde_ratio_orders_shifted_samples() {
        let source = Sample::from_values(array![0.0, 0.5, 1.0], SampleRole::Source).expect("valid");
        let target = Sample::from_values(array![1.0, 1.5, 2.0], SampleRole::Target).expect("valid");
        let queries = Sample::from_values(array![0.0, 2.0], SampleRole::Query).expect("valid");
        let mut model = KdeRatio::new(Bandwidth::Fixed(0.5)).expect("valid");

        model.fit(&source, &target).expect("fit");
        let w = model.predict(&queries).expect("predict");

        assert!(w[0] < 1.0 && w[1] > 1.0, "{w:?}");
        assert!(matches!(
            KdeRatio::new(Bandwidth::Fixed(0.0)),
            Err(SampleError::InvalidBandwidth { .. })
        ));
    }
}
