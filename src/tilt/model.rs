//! tilt::model — fitting the exponential tilt and using the fitted ratio.
//!
//! Purpose
//! -------
//! Orchestrate one tilt fit (validate samples, precompute designs, choose a
//! start, maximize the profile likelihood) and package the result so it can
//! be evaluated, inspected, and used as a [`DensityRatioModel`].
//!
//! Key behaviors
//! -------------
//! - [`fit_tilt`] returns a [`TiltFit`] on success and a typed [`TiltError`]
//!   otherwise: `InfeasibleStart` when the start has infinite cost,
//!   `NoFiniteObjective` when nothing finite was seen, and
//!   `OptimizationFailed` for every other backend failure.
//! - A backend abort or a failed line search after at least one feasible
//!   evaluation is not an error: the best feasible point is returned with
//!   `outcome.converged == false` and an `"Aborted: …"` status. A fit cut
//!   off by `max_iter` also reports `converged == false`.
//! - [`TiltFit::standard_errors`] reports classical or sandwich standard
//!   errors for the optimized entries of `θ` (and `λ` when free).
//! - [`TiltEstimator::predict`] evaluates `g` at the queries and sanitizes
//!   the result, so an overflowing tilt contributes weight 0 instead of `+∞`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Without an explicit start, the fit begins at `α = β = 0` (`g ≡ 1`) with
//!   `λ = n_T / (n_S + n_T)`; this start is feasible for both constraint
//!   forms.
//! - The optimizer settings in [`TiltOptions::mle_opts`] are used verbatim;
//!   `max_iter` is a hard cap.
//!
//! Testing notes
//! -------------
//! - Unit tests here check start handling, error mapping, and a Gaussian
//!   shift recovered through the quadratic basis. Beta recovery on the
//!   bounded log basis lives in the integration tests.
use crate::{
    data::{errors::SampleError, sample::Sample, validation::ensure_same_dim},
    estimator::{DensityRatioModel, RatioError, RatioResult},
    evaluation::weights::sanitize_weights,
    inference::hessian::{calc_standard_errors, score_covariance},
    optimization::loglik_optimizer::{maximize, OptimOutcome},
    tilt::{
        basis::TiltBasis,
        errors::{TiltError, TiltResult},
        objective::{average_cost_gradient, cost_scores, profile_cost, TiltData, TiltObjective},
        options::TiltOptions,
        params::TiltParameter,
    },
};
use ndarray::{Array1, ArrayView1};

/// Variance estimator used by [`TiltFit::standard_errors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StandardErrorKind {
    /// Inverse observed information of the profile cost.
    #[default]
    Classical,
    /// Observed information around the centered outer product of scores.
    Sandwich,
}

/// Result of a successful tilt fit.
#[derive(Debug, Clone, PartialEq)]
pub struct TiltFit {
    pub param: TiltParameter,
    pub outcome: OptimOutcome,
    pub basis: TiltBasis,
    pub n_source: usize,
    pub n_target: usize,
    dim: usize,
    data: TiltData,
}

impl TiltFit {
    /// Fitted `g(x)` at a single point.
    ///
    /// # Errors
    /// Dimension or basis-domain errors for `x`.
    pub fn evaluate(&self, x: ArrayView1<'_, f64>) -> TiltResult<f64> {
        self.param.evaluate(self.basis, x)
    }

    /// Fitted `g` at every row of `queries`.
    ///
    /// # Errors
    /// - `TiltError::Sample(DimensionMismatch)` for the wrong `d`.
    /// - Basis-domain errors for the first offending row.
    pub fn evaluate_many(&self, queries: &Sample) -> TiltResult<Array1<f64>> {
        if queries.dim() != self.dim {
            return Err(TiltError::Sample(SampleError::DimensionMismatch {
                role: queries.role(),
                expected: self.dim,
                found: queries.dim(),
            }));
        }
        self.param.evaluate_many(self.basis, queries.rows())
    }

    /// Profile log-likelihood at the fitted parameters.
    pub fn log_likelihood(&self) -> f64 {
        self.outcome.value
    }

    /// Whether λ was part of the optimizer vector.
    pub fn multiplier_is_free(&self) -> bool {
        self.data.pinned.is_none()
    }

    /// Standard errors in optimizer order `[α, β₁, …, β_k]`, then `λ` when
    /// it was optimized.
    ///
    /// # Errors
    /// `TiltError::OptimizationFailed` if the observed information cannot
    /// be formed (for example, the fit sits on the feasibility boundary).
    pub fn standard_errors(&self, kind: StandardErrorKind) -> TiltResult<Array1<f64>> {
        let theta_hat = &self.outcome.theta_hat;
        let n = self.data.n_total() as f64;
        let grad = |theta: &Array1<f64>| average_cost_gradient(theta, &self.data);
        let se = match kind {
            StandardErrorKind::Classical => calc_standard_errors(&grad, theta_hat, None)?,
            StandardErrorKind::Sandwich => {
                let s = score_covariance(&cost_scores(theta_hat, &self.data)?, true);
                calc_standard_errors(&grad, theta_hat, Some(&s))?
            }
        };
        Ok(se / n.sqrt())
    }
}

/// Fit the exponential tilt `g(x) = exp(α + β·T(x)) ≈ p_T(x) / p_S(x)`.
///
/// `init` overrides the neutral start; its `λ` is used only when the
/// multiplier is free.
///
/// # Errors
/// - `TiltError::Sample` for dimension mismatches.
/// - Basis errors (`UnsupportedDimension`, `InvalidBasisInput`).
/// - `TiltError::CoefficientLengthMismatch` for a mis-sized `init`.
/// - `TiltError::InfeasibleStart`, `NoFiniteObjective`,
///   `OptimizationFailed` from the optimizer.
pub fn fit_tilt(
    source: &Sample, target: &Sample, init: Option<&TiltParameter>, options: &TiltOptions,
) -> TiltResult<TiltFit> {
    ensure_same_dim(source, target)?;
    let data =
        TiltData::new(options.basis, source, target, options.constraint, options.multiplier)?;
    let k = data.n_features();
    let free = data.pinned.is_none();
    let default_lambda = target.len() as f64 / (source.len() + target.len()) as f64;

    let start = match init {
        Some(p) if p.n_features() != k => {
            return Err(TiltError::CoefficientLengthMismatch { expected: k, found: p.n_features() });
        }
        Some(p) => p.clone(),
        None => TiltParameter::neutral(k, data.pinned.unwrap_or(default_lambda)),
    };
    let theta0 = start.to_theta(free);
    let cost0 = profile_cost(&theta0, &data);
    if cost0 == f64::INFINITY {
        return Err(TiltError::InfeasibleStart { cost: cost0 });
    }

    let outcome = maximize(&TiltObjective, theta0, &data, &options.mle_opts)?;
    let param = TiltParameter::from_theta(&outcome.theta_hat, k, data.pinned)?;
    Ok(TiltFit {
        param,
        outcome,
        basis: options.basis,
        n_source: source.len(),
        n_target: target.len(),
        dim: source.dim(),
        data,
    })
}

/// Exponential tilting as a [`DensityRatioModel`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TiltEstimator {
    pub options: TiltOptions,
    pub init: Option<TiltParameter>,
    fitted: Option<TiltFit>,
}

impl TiltEstimator {
    pub fn new(options: TiltOptions) -> Self {
        Self { options, init: None, fitted: None }
    }

    /// Start the next fit from `init` instead of the neutral tilt.
    pub fn with_init(mut self, init: TiltParameter) -> Self {
        self.init = Some(init);
        self
    }

    pub fn fitted(&self) -> Option<&TiltFit> {
        self.fitted.as_ref()
    }
}

impl DensityRatioModel for TiltEstimator {
    fn fit(&mut self, source: &Sample, target: &Sample) -> RatioResult<()> {
        let fit = fit_tilt(source, target, self.init.as_ref(), &self.options)?;
        self.fitted = Some(fit);
        Ok(())
    }

    fn predict(&self, queries: &Sample) -> RatioResult<Array1<f64>> {
        let fit = self.fitted.as_ref().ok_or(RatioError::ModelNotFitted)?;
        let raw = fit.evaluate_many(queries)?;
        Ok(sanitize_weights(raw.view()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::SampleRole,
        optimization::loglik_optimizer::{traits::LineSearcher, MLEOptions, Tolerances},
        tilt::options::{ConstraintForm, Multiplier},
    };
    use ndarray::array;
    use rand::{rngs::StdRng, SeedableRng};
    use rand_distr::{Beta, Distribution, Normal};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Start handling (infeasible start, mis-sized init).
    // - The not-fitted contract of `TiltEstimator`.
    // - Recovery of a Gaussian mean shift with the quadratic basis, and
    //   finite standard errors at the optimum.
    // - Non-convergence reporting: an iteration cap and a failed line search
    //   both leave `converged == false` with a feasible θ̂.
    //
    // They intentionally DO NOT cover:
    // - Beta recovery with the bounded log basis (integration tests).
    // -------------------------------------------------------------------------

    fn normal_sample(mean: f64, n: usize, seed: u64, role: SampleRole) -> Sample {
        let mut rng = StdRng::seed_from_u64(seed);
        let dist = Normal::new(mean, 1.0).expect("valid normal");
        let values: Array1<f64> = (0..n).map(|_| dist.sample(&mut rng)).collect();
        Sample::from_values(values, role).expect("finite draws")
    }

    fn beta_sample(a: f64, b: f64, n: usize, seed: u64, role: SampleRole) -> Sample {
        let mut rng = StdRng::seed_from_u64(seed);
        let dist = Beta::new(a, b).expect("valid beta");
        let values: Array1<f64> = (0..n).map(|_| dist.sample(&mut rng)).collect();
        Sample::from_values(values, role).expect("finite draws")
    }

    #[test]
    // Purpose
    // -------
    // A start with infinite cost is reported as InfeasibleStart.
    //
    // Given
    // -----
    // - Shifted form, free λ = −1 (so a = −g < 0 everywhere).
    //
    // Expect
    // ------
    // - `TiltError::InfeasibleStart { cost: +∞ }`.
    fn infeasible_start_is_reported() {
        let source = normal_sample(0.0, 20, 1, SampleRole::Source);
        let target = normal_sample(0.5, 20, 2, SampleRole::Target);
        let opts = TiltOptions::new(
            TiltBasis::Linear,
            ConstraintForm::Shifted,
            Multiplier::Free,
            MLEOptions::default(),
        )
        .expect("finite options");
        let init = TiltParameter::new(0.0, array![0.0], -1.0).expect("finite");

        let err = fit_tilt(&source, &target, Some(&init), &opts).expect_err("infeasible");

        assert_eq!(err, TiltError::InfeasibleStart { cost: f64::INFINITY });
    }

    #[test]
    // Purpose
    // -------
    // A start whose β has the wrong length is rejected before optimizing.
    //
    // Given
    // -----
    // - Quadratic basis in d = 1 (k = 2) and an init with k = 1.
    //
    // Expect
    // ------
    // - `CoefficientLengthMismatch { expected: 2, found: 1 }`.
    fn mis_sized_init_is_rejected() {
        let source = normal_sample(0.0, 10, 3, SampleRole::Source);
        let target = normal_sample(0.0, 10, 4, SampleRole::Target);
        let opts = TiltOptions::profiled(TiltBasis::Quadratic);
        let init = TiltParameter::neutral(1, 0.5);
        assert_eq!(
            fit_tilt(&source, &target, Some(&init), &opts),
            Err(TiltError::CoefficientLengthMismatch { expected: 2, found: 1 })
        );
    }

    #[test]
    // Purpose
    // -------
    // `predict` before `fit` is an explicit error.
    //
    // Given
    // -----
    // - A default `TiltEstimator`.
    //
    // Expect
    // ------
    // - `RatioError::ModelNotFitted`.
    fn predict_before_fit_errors() {
        let est = TiltEstimator::default();
        let q = Sample::from_values(array![0.5], SampleRole::Query).expect("valid");
        assert_eq!(est.predict(&q), Err(RatioError::ModelNotFitted));
    }

    #[test]
    // Purpose
    // -------
    // The profiled fit recovers the log-ratio of two unit-variance normals.
    //
    // Given
    // -----
    // - Source N(0, 1), target N(0.5, 1), 1500 draws each.
    // - Quadratic basis, profiled configuration.
    //
    // Expect
    // ------
    // - True log-ratio is 0.5x − 0.125: β₁ ≈ 0.5 and β₂ ≈ 0 within 0.25.
    // - Finite, positive standard errors for all three entries.
    // - Predicted weights are finite and non-negative.
    fn profiled_fit_recovers_gaussian_shift() {
        // Arrange
        let source = normal_sample(0.0, 1500, 11, SampleRole::Source);
        let target = normal_sample(0.5, 1500, 12, SampleRole::Target);
        let tols = Tolerances::new(Some(1e-7), None, Some(500)).expect("valid tolerances");
        let mle = MLEOptions::new(tols, LineSearcher::Backtracking, None).expect("valid opts");
        let mut est =
            TiltEstimator::new(TiltOptions::profiled(TiltBasis::Quadratic).with_mle_options(mle));

        // Act
        let weights = est.fit_predict(&source, &target).expect("fit succeeds");
        let fit = est.fitted().expect("fitted");
        let se = fit.standard_errors(StandardErrorKind::Classical).expect("interior optimum");

        // Assert
        assert!((fit.param.coefficients[0] - 0.5).abs() < 0.25, "{:?}", fit.param);
        assert!(fit.param.coefficients[1].abs() < 0.25, "{:?}", fit.param);
        assert!(!fit.multiplier_is_free());
        assert_eq!(se.len(), 3);
        assert!(se.iter().all(|v| v.is_finite() && *v > 0.0));
        assert!(weights.iter().all(|w| w.is_finite() && *w >= 0.0));
    }

    #[test]
    // Purpose
    // -------
    // `max_iter` caps the solve and the capped fit is not reported as
    // converged.
    //
    // Given
    // -----
    // - The Gaussian-shift data above, quadratic basis, profiled.
    // - `tol_grad = 1e-12` and `max_iter = 1`.
    //
    // Expect
    // ------
    // - At most one iteration, `converged == false`, a `MaxItersReached`
    //   status, and a finite profile cost at θ̂.
    fn profiled_fit_stops_at_iteration_cap() {
        // Arrange
        let source = normal_sample(0.0, 1500, 11, SampleRole::Source);
        let target = normal_sample(0.5, 1500, 12, SampleRole::Target);
        let tols = Tolerances::new(Some(1e-12), None, Some(1)).expect("valid tolerances");
        let mle = MLEOptions::new(tols, LineSearcher::Backtracking, None).expect("valid opts");
        let opts = TiltOptions::profiled(TiltBasis::Quadratic).with_mle_options(mle);

        // Act
        let fit = fit_tilt(&source, &target, None, &opts).expect("capped fit still returns");

        // Assert
        assert!(fit.outcome.iterations <= 1, "{}", fit.outcome.iterations);
        assert!(!fit.outcome.converged);
        assert!(fit.outcome.status.contains("MaxItersReached"), "{}", fit.outcome.status);
        assert!(profile_cost(&fit.outcome.theta_hat, &fit.data).is_finite());
    }

    #[test]
    // Purpose
    // -------
    // A line search that steps outside the feasible region ends the fit as
    // an abort rather than a converged one.
    //
    // Given
    // -----
    // - Source Beta(2, 5), target Beta(5, 2), 300 draws each.
    // - Default options (bounded log, shifted, free λ) with More–Thuente.
    //   Its first unit step along the summed gradient leaves the feasible
    //   region (g overflows or a ≤ 0) and it then asks for a gradient there.
    //
    // Expect
    // ------
    // - `converged == false` with an "Aborted" status.
    // - θ̂ is feasible: finite profile cost and finite log-likelihood.
    fn failed_line_search_is_not_reported_as_converged() {
        // Arrange
        let source = beta_sample(2.0, 5.0, 300, 21, SampleRole::Source);
        let target = beta_sample(5.0, 2.0, 300, 22, SampleRole::Target);
        let tols = Tolerances::new(Some(1e-6), None, Some(500)).expect("valid tolerances");
        let mle = MLEOptions::new(tols, LineSearcher::MoreThuente, None).expect("valid opts");
        let opts = TiltOptions::default().with_mle_options(mle);

        // Act
        let fit = fit_tilt(&source, &target, None, &opts).expect("the neutral start is feasible");

        // Assert
        assert!(!fit.outcome.converged, "{}", fit.outcome.status);
        assert!(fit.outcome.status.starts_with("Aborted"), "{}", fit.outcome.status);
        assert!(profile_cost(&fit.outcome.theta_hat, &fit.data).is_finite());
        assert!(fit.log_likelihood().is_finite());
    }
}
