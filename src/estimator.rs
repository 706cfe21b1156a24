//! estimator — the shared fit/predict contract.
//!
//! Every density-ratio estimator in this crate (ball ratio, exponential tilt,
//! Gaussian, KDE, propensity) implements [`DensityRatioModel`], so a
//! reweighting pipeline can swap one for another without code changes.
//!
//! Errors from the individual layers are folded into [`RatioError`].
use crate::{
    data::{errors::SampleError, sample::Sample},
    optimization::errors::OptError,
    tilt::errors::TiltError,
};
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, PyErr};

/// Result alias for the estimator contract.
pub type RatioResult<T> = Result<T, RatioError>;

/// Umbrella error for [`DensityRatioModel`] implementations.
#[derive(Debug, Clone, PartialEq)]
pub enum RatioError {
    /// Invalid samples or configuration.
    Sample(SampleError),
    /// Exponential-tilting fit or evaluation failure.
    Tilt(TiltError),
    /// Optimizer failure outside the tilting model (e.g. propensity fit).
    Opt(OptError),
    /// `predict` called before `fit`.
    ModelNotFitted,
}

impl std::error::Error for RatioError {}

impl std::fmt::Display for RatioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatioError::Sample(err) => write!(f, "{err}"),
            RatioError::Tilt(err) => write!(f, "{err}"),
            RatioError::Opt(err) => write!(f, "Optimization failed: {err}"),
            RatioError::ModelNotFitted => write!(f, "Model has not been fitted yet."),
        }
    }
}

impl From<SampleError> for RatioError {
    fn from(err: SampleError) -> Self {
        RatioError::Sample(err)
    }
}

impl From<TiltError> for RatioError {
    fn from(err: TiltError) -> Self {
        match err {
            TiltError::Sample(inner) => RatioError::Sample(inner),
            TiltError::ModelNotFitted => RatioError::ModelNotFitted,
            other => RatioError::Tilt(other),
        }
    }
}

impl From<OptError> for RatioError {
    fn from(err: OptError) -> Self {
        RatioError::Opt(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<RatioError> for PyErr {
    fn from(err: RatioError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Two-call density-ratio estimator: learn from `(source, target)`, then
/// produce weights `ŵ(x) ≈ p_target(x) / p_source(x)` at query points.
///
/// Implementations guarantee that `predict` returns one finite,
/// non-negative weight per query row.
pub trait DensityRatioModel {
    /// Fit the estimator to a source and a target sample of equal dimension.
    fn fit(&mut self, source: &Sample, target: &Sample) -> RatioResult<()>;

    /// Weights at every row of `queries`.
    ///
    /// # Errors
    /// `RatioError::ModelNotFitted` before a successful `fit`.
    fn predict(&self, queries: &Sample) -> RatioResult<Array1<f64>>;

    /// Fit, then weight the source sample itself (the usual reweighting use).
    fn fit_predict(&mut self, source: &Sample, target: &Sample) -> RatioResult<Array1<f64>> {
        self.fit(source, target)?;
        self.predict(source)
    }
}
