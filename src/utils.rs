//! utils — Python-boundary conversion helpers.
//!
//! Everything here turns loosely typed Python arguments (NumPy arrays,
//! pandas objects, nested sequences, option strings) into the validated Rust
//! types the estimators consume. Validation errors surface as `ValueError`
//! through the crate's `From<…> for PyErr` conversions.
#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::PyAny,
};

#[cfg(feature = "python-bindings")]
use crate::{
    data::{errors::SampleRole, sample::Sample},
    evaluation::kernel::{Kernel, KernelFunction},
    optimization::loglik_optimizer::traits::{LineSearcher, MLEOptions, Tolerances},
    tilt::{basis::TiltBasis, model::StandardErrorKind},
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
    PyReadonlyArray2,
};

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    Ok(vec.into_pyarray_bound(py).readonly())
}

/// Convert a Python array-like into a [`Sample`].
///
/// Accepted shapes, tried in order:
/// - a 2-D `float64` ndarray (or anything with `.to_numpy()` returning one),
///   one row per observation;
/// - a sequence of equal-length float sequences;
/// - a 1-D array-like, read as `n` observations in dimension 1.
#[cfg(feature = "python-bindings")]
pub fn extract_sample<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>, role: SampleRole,
) -> PyResult<Sample> {
    if let Ok(arr) = raw_data.extract::<PyReadonlyArray2<f64>>() {
        return Ok(Sample::new(arr.as_array().to_owned(), role)?);
    }
    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(arr) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(Sample::new(arr.as_array().to_owned(), role)?);
        }
    }
    if let Ok(rows) = raw_data.extract::<Vec<Vec<f64>>>() {
        return Ok(Sample::from_rows(&rows, role)?);
    }
    let arr = extract_f64_array(py, raw_data)?;
    Ok(Sample::from_values(arr.as_array().to_owned(), role)?)
}

#[cfg(feature = "python-bindings")]
pub fn extract_mle_opts(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>, default: &MLEOptions,
) -> PyResult<MLEOptions> {
    use std::str::FromStr;

    if tol_grad.is_none()
        && tol_cost.is_none()
        && max_iter.is_none()
        && line_searcher.is_none()
        && lbfgs_mem.is_none()
    {
        return Ok(default.clone());
    }

    let tols = Tolerances::new(
        tol_grad.or(default.tols.tol_grad),
        tol_cost.or(default.tols.tol_cost),
        max_iter.or(default.tols.max_iter),
    )?;
    let ls = match line_searcher {
        Some(name) => LineSearcher::from_str(name)?,
        None => default.line_searcher,
    };
    let opts = MLEOptions::new(tols, ls, lbfgs_mem.or(default.lbfgs_mem))?;

    Ok(opts)
}

#[cfg(feature = "python-bindings")]
pub fn extract_basis(basis: Option<&str>) -> PyResult<TiltBasis> {
    let basis_str = basis.unwrap_or("bounded_log").to_lowercase();
    match basis_str.as_str() {
        "bounded_log" | "boundedlog" | "beta" => Ok(TiltBasis::BoundedLog),
        "linear" => Ok(TiltBasis::Linear),
        "quadratic" | "gaussian" => Ok(TiltBasis::Quadratic),
        other => Err(PyValueError::new_err(format!(
            "invalid tilt basis {:?} (expected 'bounded_log', 'linear', or 'quadratic')",
            other
        ))),
    }
}

#[cfg(feature = "python-bindings")]
pub fn extract_se_kind(kind: Option<&str>) -> PyResult<StandardErrorKind> {
    let kind_str = kind.unwrap_or("classical").to_lowercase();
    match kind_str.as_str() {
        "classical" | "hessian" => Ok(StandardErrorKind::Classical),
        "sandwich" | "robust" => Ok(StandardErrorKind::Sandwich),
        other => Err(PyValueError::new_err(format!(
            "invalid standard-error kind {:?} (expected 'classical' or 'sandwich')",
            other
        ))),
    }
}

/// Kernel from a name plus its optional parameter.
///
/// `bandwidth = None` with `"gaussian"` uses the median heuristic on
/// `reference`.
#[cfg(feature = "python-bindings")]
pub fn extract_kernel(
    kernel: Option<&str>, bandwidth: Option<f64>, degree: Option<u32>, offset: Option<f64>,
    reference: &Sample,
) -> PyResult<Kernel> {
    let kernel_str = kernel.unwrap_or("gaussian").to_lowercase();
    let kernel = match kernel_str.as_str() {
        "linear" => Kernel::Linear,
        "gaussian" | "rbf" => match bandwidth {
            Some(h) => Kernel::Gaussian { bandwidth: h },
            None => Kernel::gaussian_median(reference),
        },
        "laplacian" => Kernel::Laplacian { bandwidth: bandwidth.unwrap_or(1.0) },
        "polynomial" => {
            Kernel::Polynomial { degree: degree.unwrap_or(2), offset: offset.unwrap_or(1.0) }
        }
        other => {
            return Err(PyValueError::new_err(format!(
                "invalid kernel {:?} (expected 'linear', 'gaussian', 'laplacian', or 'polynomial')",
                other
            )));
        }
    };
    kernel.validate()?;
    Ok(kernel)
}
