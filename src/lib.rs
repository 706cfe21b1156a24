//! rust_density_ratio — density-ratio estimation under covariate shift, with
//! Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the estimators to Python via the `_rust_density_ratio` extension module.
//! Given a source sample from `p_S` and a target sample from `p_T`, the crate
//! estimates importance weights `w(x) ≈ p_T(x) / p_S(x)` and measures how well
//! a weighting closes the gap between the two samples.
//!
//! Key behaviors
//! -------------
//! - [`ball_ratio`]: nonparametric ratio of empirical ball masses with a
//!   reliability guard for regions the source barely covers.
//! - [`tilt`]: exponential-tilting (log-linear) ratio fitted by maximizing a
//!   profile empirical likelihood with L-BFGS, plus standard errors.
//! - [`baselines`]: Gaussian, KDE and logistic-propensity comparators.
//! - [`evaluation`]: kernel MMD between a weighted sample and a reference,
//!   effective sample size, and weight utilities.
//! - [`estimator::DensityRatioModel`]: the common `fit` / `predict` contract.
//! - When `python-bindings` is enabled, `#[pyclass]` wrappers and the
//!   `#[pymodule]` initializer for `_rust_density_ratio`.
//!
//! Invariants & assumptions
//! ------------------------
//! - All heavy numerical work is implemented in the inner Rust modules; the
//!   PyO3 items in this file perform only FFI glue, input validation, and
//!   error mapping.
//! - Samples are validated once at construction ([`data::Sample`]); estimators
//!   assume finite, non-empty inputs of matching dimension afterwards.
//! - Every weight returned through [`estimator::DensityRatioModel::predict`]
//!   is finite and `≥ 0`.
//!
//! Conventions
//! -----------
//! - Samples are `n × d` row-major matrices; one row per observation.
//! - Errors from core Rust code are propagated as rich error types internally
//!   and converted to `PyErr` (`ValueError`) at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on the inner modules (or the re-exports
//!   below) and can ignore the items guarded by the `python-bindings` feature.
//! - The Python packaging layer imports `_rust_density_ratio` and may wrap its
//!   classes in thin pure-Python facades.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules and
//!   by `tests/integration_ratio_pipeline.rs`, which exercises the estimators
//!   end to end on simulated covariate shift.

pub mod ball_ratio;
pub mod baselines;
pub mod data;
pub mod estimator;
pub mod evaluation;
pub mod inference;
pub mod optimization;
pub mod tilt;
pub mod utils;

// ---- Re-exports (primary public surface) ----------------------------------

pub use crate::ball_ratio::{estimate_ratio, BallRatio, BallRatioEstimator, RadiusRule, ThresholdRule};
pub use crate::baselines::{GaussianRatio, KdeRatio, PropensityRatio};
pub use crate::data::{Sample, SampleError, SampleResult, SampleRole};
pub use crate::estimator::{DensityRatioModel, RatioError, RatioResult};
pub use crate::evaluation::{mmd_squared, weighted_density_compare, Kernel};
pub use crate::tilt::{fit_tilt, TiltBasis, TiltError, TiltEstimator, TiltFit, TiltOptions};

// Downstream crates can write
//
//     use rust_density_ratio::prelude::*;
//
// to import the estimators, samples and diagnostics in a single line.
pub mod prelude {
    pub use crate::ball_ratio::prelude::*;
    pub use crate::baselines::prelude::*;
    pub use crate::data::prelude::*;
    pub use crate::estimator::{DensityRatioModel, RatioError, RatioResult};
    pub use crate::evaluation::prelude::*;
    pub use crate::tilt::prelude::*;
}

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    ball_ratio::model::BallPrediction,
    evaluation::weights::effective_sample_size,
    optimization::loglik_optimizer::traits::OptimOutcome,
    tilt::options::{ConstraintForm, Multiplier},
    utils::{
        extract_basis, extract_f64_array, extract_kernel, extract_mle_opts, extract_sample,
        extract_se_kind,
    },
};

/// BallRatio — Python-facing wrapper for the ball-ratio estimator.
///
/// Purpose
/// -------
/// Expose [`BallRatioEstimator`] to Python with its radius and threshold
/// rules configured from plain keyword arguments.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `BallRatio(radius=None, threshold=None, holder=1.0, radius_scale=1.0,
/// threshold_scale=1.0)`:
/// - `radius`: fixed radius; `None` uses the rate rule with `holder` and
///   `radius_scale`.
/// - `threshold`: fixed reliability threshold; `None` uses
///   `threshold_scale · ln(n_T) / n_T`.
///
/// Notes
/// -----
/// - Rust callers should use [`BallRatioEstimator`] directly.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "BallRatio", module = "rust_density_ratio")]
pub struct PyBallRatio {
    inner: BallRatioEstimator,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyBallRatio {
    #[new]
    #[pyo3(
        signature = (radius = None, threshold = None, holder = 1.0, radius_scale = 1.0, threshold_scale = 1.0),
        text_signature = "(/, radius=None, threshold=None, holder=1.0, radius_scale=1.0, threshold_scale=1.0)"
    )]
    pub fn new(
        radius: Option<f64>, threshold: Option<f64>, holder: f64, radius_scale: f64,
        threshold_scale: f64,
    ) -> PyResult<Self> {
        let radius_rule = match radius {
            Some(r) => RadiusRule::Fixed(r),
            None => RadiusRule::Rate { holder, scale: radius_scale },
        };
        let threshold_rule = match threshold {
            Some(a) => ThresholdRule::Fixed(a),
            None => ThresholdRule::Rate { scale: threshold_scale },
        };
        let inner = BallRatioEstimator::new(radius_rule, threshold_rule)?;
        Ok(PyBallRatio { inner })
    }

    pub fn fit<'py>(
        &mut self, py: Python<'py>, source: &Bound<'py, PyAny>, target: &Bound<'py, PyAny>,
    ) -> PyResult<()> {
        let source = extract_sample(py, source, SampleRole::Source)?;
        let target = extract_sample(py, target, SampleRole::Target)?;
        self.inner.fit(&source, &target)?;
        Ok(())
    }

    /// Guarded weights at every query row.
    pub fn predict<'py>(&self, py: Python<'py>, queries: &Bound<'py, PyAny>) -> PyResult<Vec<f64>> {
        let queries = extract_sample(py, queries, SampleRole::Query)?;
        Ok(self.inner.predict(&queries)?.to_vec())
    }

    /// Fit, then weight the source sample.
    pub fn fit_predict<'py>(
        &mut self, py: Python<'py>, source: &Bound<'py, PyAny>, target: &Bound<'py, PyAny>,
    ) -> PyResult<Vec<f64>> {
        let source = extract_sample(py, source, SampleRole::Source)?;
        let target = extract_sample(py, target, SampleRole::Target)?;
        Ok(self.inner.fit_predict(&source, &target)?.to_vec())
    }

    /// Per-query ball masses, raw and guarded ratios.
    pub fn predict_detailed<'py>(
        &self, py: Python<'py>, queries: &Bound<'py, PyAny>,
    ) -> PyResult<BallPredictionResult> {
        let queries = extract_sample(py, queries, SampleRole::Query)?;
        Ok(BallPredictionResult { inner: self.inner.predict_detailed(&queries)? })
    }

    /// Resolved radius, or `None` before `fit`.
    #[getter]
    pub fn radius(&self) -> Option<f64> {
        self.inner.fitted().map(|f| f.radius)
    }

    /// Resolved reliability threshold, or `None` before `fit`.
    #[getter]
    pub fn threshold(&self) -> Option<f64> {
        self.inner.fitted().map(|f| f.threshold)
    }
}

/// BallPredictionResult — read-only per-query ball-ratio records.
///
/// Instances are returned by `BallRatio.predict_detailed` and are not
/// created directly by user code.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_density_ratio")]
pub struct BallPredictionResult {
    pub inner: BallPrediction,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl BallPredictionResult {
    #[getter]
    pub fn p_target(&self) -> Vec<f64> {
        self.inner.ratios.iter().map(|b| b.p_target).collect()
    }

    #[getter]
    pub fn p_source(&self) -> Vec<f64> {
        self.inner.ratios.iter().map(|b| b.p_source).collect()
    }

    /// Unguarded ratios; `inf` where the ball holds no source point.
    #[getter]
    pub fn raw(&self) -> Vec<f64> {
        self.inner.ratios.iter().map(|b| b.raw).collect()
    }

    #[getter]
    pub fn guarded(&self) -> Vec<f64> {
        self.inner.ratios.iter().map(|b| b.guarded).collect()
    }

    #[getter]
    pub fn degenerate_count(&self) -> usize {
        self.inner.degenerate_count
    }
}

/// ExponentialTilt — Python-facing wrapper for the exponential-tilting model.
///
/// Purpose
/// -------
/// Expose [`TiltEstimator`] to Python: configure the basis, constraint form,
/// multiplier treatment and optimizer, fit, predict, and read back the
/// fitted parameters, optimizer diagnostics and standard errors.
///
/// Parameters
/// ----------
/// Constructed from Python via `ExponentialTilt(basis="bounded_log",
/// constraint="shifted", multiplier="free", multiplier_value=None, ...)` or
/// the `ExponentialTilt.profiled(basis=...)` factory:
/// - `basis`: `"bounded_log"`, `"linear"` or `"quadratic"`.
/// - `constraint`: `"shifted"` (`1 + λ(g + 1)`) or `"centered"`
///   (`1 + λ(g − 1)`).
/// - `multiplier`: `"free"`, `"sample_ratio"` or `"fixed"` (with
///   `multiplier_value`).
/// - `tol_grad`, `tol_cost`, `max_iter`, `line_searcher`, `lbfgs_mem`:
///   optimizer overrides; unset values keep the tilt defaults.
///
/// Notes
/// -----
/// - Rust callers should use [`TiltEstimator`] or [`fit_tilt`] directly.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "ExponentialTilt", module = "rust_density_ratio")]
pub struct PyExponentialTilt {
    inner: TiltEstimator,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyExponentialTilt {
    #[new]
    #[pyo3(
        signature = (
            basis = None,
            constraint = None,
            multiplier = None,
            multiplier_value = None,
            tol_grad = None,
            tol_cost = None,
            max_iter = None,
            line_searcher = None,
            lbfgs_mem = None,
        ),
        text_signature = "(/, basis=None, constraint=None, multiplier=None, multiplier_value=None, \
                          tol_grad=None, tol_cost=None, max_iter=None, line_searcher=None, \
                          lbfgs_mem=None)"
    )]
    pub fn new(
        basis: Option<&str>, constraint: Option<&str>, multiplier: Option<&str>,
        multiplier_value: Option<f64>, tol_grad: Option<f64>, tol_cost: Option<f64>,
        max_iter: Option<usize>, line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
    ) -> PyResult<Self> {
        let basis = extract_basis(basis)?;
        let constraint = match constraint.unwrap_or("shifted").to_lowercase().as_str() {
            "shifted" => ConstraintForm::Shifted,
            "centered" => ConstraintForm::Centered,
            other => {
                return Err(PyValueError::new_err(format!(
                    "invalid constraint {:?} (expected 'shifted' or 'centered')",
                    other
                )));
            }
        };
        let multiplier = match multiplier.unwrap_or("free").to_lowercase().as_str() {
            "free" => Multiplier::Free,
            "sample_ratio" => Multiplier::SampleRatio,
            "fixed" => Multiplier::Fixed(multiplier_value.ok_or_else(|| {
                PyValueError::new_err("multiplier_value must be provided when multiplier='fixed'")
            })?),
            other => {
                return Err(PyValueError::new_err(format!(
                    "invalid multiplier {:?} (expected 'free', 'sample_ratio', or 'fixed')",
                    other
                )));
            }
        };
        let defaults = TiltOptions::default();
        let mle_opts = extract_mle_opts(
            tol_grad,
            tol_cost,
            max_iter,
            line_searcher,
            lbfgs_mem,
            &defaults.mle_opts,
        )?;
        let options = TiltOptions::new(basis, constraint, multiplier, mle_opts)?;
        Ok(PyExponentialTilt { inner: TiltEstimator::new(options) })
    }

    /// Centered constraint with λ pinned to `n_T / N`.
    #[staticmethod]
    #[pyo3(signature = (basis = None), text_signature = "(/, basis=None)")]
    pub fn profiled(basis: Option<&str>) -> PyResult<Self> {
        let options = TiltOptions::profiled(extract_basis(basis)?);
        Ok(PyExponentialTilt { inner: TiltEstimator::new(options) })
    }

    pub fn fit<'py>(
        &mut self, py: Python<'py>, source: &Bound<'py, PyAny>, target: &Bound<'py, PyAny>,
    ) -> PyResult<()> {
        let source = extract_sample(py, source, SampleRole::Source)?;
        let target = extract_sample(py, target, SampleRole::Target)?;
        self.inner.fit(&source, &target)?;
        Ok(())
    }

    pub fn predict<'py>(&self, py: Python<'py>, queries: &Bound<'py, PyAny>) -> PyResult<Vec<f64>> {
        let queries = extract_sample(py, queries, SampleRole::Query)?;
        Ok(self.inner.predict(&queries)?.to_vec())
    }

    pub fn fit_predict<'py>(
        &mut self, py: Python<'py>, source: &Bound<'py, PyAny>, target: &Bound<'py, PyAny>,
    ) -> PyResult<Vec<f64>> {
        let source = extract_sample(py, source, SampleRole::Source)?;
        let target = extract_sample(py, target, SampleRole::Target)?;
        Ok(self.inner.fit_predict(&source, &target)?.to_vec())
    }

    /// Standard errors in optimizer order `[α, β…, (λ)]`.
    #[pyo3(signature = (kind = None), text_signature = "($self, /, kind=None)")]
    pub fn standard_errors(&self, kind: Option<&str>) -> PyResult<Vec<f64>> {
        let kind = extract_se_kind(kind)?;
        Ok(self.fit_ref()?.standard_errors(kind)?.to_vec())
    }

    #[getter]
    pub fn intercept(&self) -> PyResult<f64> {
        Ok(self.fit_ref()?.param.intercept)
    }

    #[getter]
    pub fn coefficients(&self) -> PyResult<Vec<f64>> {
        Ok(self.fit_ref()?.param.coefficients.to_vec())
    }

    #[getter]
    pub fn multiplier(&self) -> PyResult<f64> {
        Ok(self.fit_ref()?.param.multiplier)
    }

    #[getter]
    pub fn log_likelihood(&self) -> PyResult<f64> {
        Ok(self.fit_ref()?.log_likelihood())
    }

    #[getter]
    pub fn results(&self) -> PyResult<TiltOptimOutcome> {
        Ok(TiltOptimOutcome { inner: self.fit_ref()?.outcome.clone() })
    }
}

#[cfg(feature = "python-bindings")]
impl PyExponentialTilt {
    fn fit_ref(&self) -> PyResult<&TiltFit> {
        Ok(self.inner.fitted().ok_or(TiltError::ModelNotFitted)?)
    }
}

/// TiltOptimOutcome — optimizer diagnostics for a fitted tilt.
///
/// Instances are constructed by the `ExponentialTilt.results` getter;
/// `value` is the maximized log-likelihood.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_density_ratio")]
pub struct TiltOptimOutcome {
    pub inner: OptimOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl TiltOptimOutcome {
    #[getter]
    pub fn theta_hat(&self) -> Vec<f64> {
        self.inner.theta_hat.to_vec()
    }

    #[getter]
    pub fn value(&self) -> f64 {
        self.inner.value
    }

    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.converged
    }

    #[getter]
    pub fn status(&self) -> String {
        self.inner.status.clone()
    }

    #[getter]
    pub fn iterations(&self) -> usize {
        self.inner.iterations
    }

    #[getter]
    pub fn grad_norm(&self) -> Option<f64> {
        self.inner.grad_norm
    }

    #[getter]
    pub fn fn_evals(&self) -> Vec<(String, u64)> {
        self.inner.fn_evals.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }
}

/// Squared MMD between `source` weighted by `weights` and `target`.
///
/// `kernel` is `"linear"`, `"gaussian"` (median-heuristic bandwidth on the
/// pooled data when `bandwidth` is `None`), `"laplacian"` or `"polynomial"`.
#[cfg(feature = "python-bindings")]
#[pyfunction(name = "mmd_squared")]
#[pyo3(
    signature = (source, weights, target, kernel = None, bandwidth = None, degree = None, offset = None),
    text_signature = "(source, weights, target, /, kernel=None, bandwidth=None, degree=None, offset=None)"
)]
#[allow(clippy::too_many_arguments)]
pub fn py_mmd_squared<'py>(
    py: Python<'py>, source: &Bound<'py, PyAny>, weights: &Bound<'py, PyAny>,
    target: &Bound<'py, PyAny>, kernel: Option<&str>, bandwidth: Option<f64>,
    degree: Option<u32>, offset: Option<f64>,
) -> PyResult<f64> {
    let source = extract_sample(py, source, SampleRole::Source)?;
    let target = extract_sample(py, target, SampleRole::Target)?;
    let weights = extract_f64_array(py, weights)?;
    let pooled = pooled_reference(&source, &target)?;
    let kernel = extract_kernel(kernel, bandwidth, degree, offset, &pooled)?;
    Ok(mmd_squared(&source, weights.as_array(), &target, &kernel)?)
}

/// Kish effective sample size `(Σw)² / Σw²`.
#[cfg(feature = "python-bindings")]
#[pyfunction(name = "effective_sample_size")]
#[pyo3(signature = (weights), text_signature = "(weights)")]
pub fn py_effective_sample_size<'py>(
    py: Python<'py>, weights: &Bound<'py, PyAny>,
) -> PyResult<f64> {
    let weights = extract_f64_array(py, weights)?;
    Ok(effective_sample_size(weights.as_array())?)
}

#[cfg(feature = "python-bindings")]
fn pooled_reference(source: &Sample, target: &Sample) -> PyResult<Sample> {
    let pooled = ndarray::concatenate(ndarray::Axis(0), &[source.points(), target.points()])
        .map_err(|e| PyValueError::new_err(format!("cannot pool samples: {e}")))?;
    Ok(Sample::new(pooled, SampleRole::Reference)?)
}

/// _rust_density_ratio — PyO3 module initializer for the Python extension.
///
/// Registers `BallRatio`, `ExponentialTilt`, their result classes, and the
/// `mmd_squared` / `effective_sample_size` functions. Invoked by Python when
/// importing the compiled extension.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_density_ratio<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<PyBallRatio>()?;
    m.add_class::<BallPredictionResult>()?;
    m.add_class::<PyExponentialTilt>()?;
    m.add_class::<TiltOptimOutcome>()?;
    m.add_function(wrap_pyfunction!(py_mmd_squared, m)?)?;
    m.add_function(wrap_pyfunction!(py_effective_sample_size, m)?)?;
    Ok(())
}
