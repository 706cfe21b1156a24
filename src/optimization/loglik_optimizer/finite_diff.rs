//! loglik_optimizer::finite_diff — finite-difference gradient and Hessian helpers.
//!
//! Purpose
//! -------
//! Wrap the `finitediff` crate so the adapter and the inference layer can
//! request numerical derivatives with error capture and validation attached.
//!
//! Key behaviors
//! -------------
//! - [`run_fd_diff`]: forward-difference gradient of a scalar closure, with
//!   errors raised inside the closure routed through a shared cell.
//! - [`compute_hessian`]: Hessian of an analytic gradient, central
//!   differences first and forward differences as fallback, symmetrized.
//!
//! Invariants & assumptions
//! ------------------------
//! - Anything returned from here satisfies [`validate_grad`] or
//!   [`validate_hessian`].
//! - Derivatives are taken in the unconstrained optimizer space `Theta`.
//!
//! Downstream usage
//! ----------------
//! - `ArgMinAdapter::gradient` calls [`run_fd_diff`] when a model has no
//!   analytic gradient.
//! - `TiltFit::standard_errors` calls [`compute_hessian`] on the analytic
//!   tilting gradient to build observed information.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        types::Hessian,
        validation::{validate_grad, validate_hessian},
        Grad, Theta,
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Forward-difference gradient with error capture and validation.
///
/// `func` is expected to store the first error it hits into `closure_err`
/// and return `NaN`. The cell is cleared on entry.
///
/// # Errors
/// - The captured error, converted into `OptError`.
/// - `GradientDimMismatch` / `InvalidGradient` from [`validate_grad`].
///
/// # Examples
/// ```rust
/// # use std::cell::RefCell;
/// # use argmin::core::Error;
/// # use ndarray::array;
/// # use rust_density_ratio::optimization::loglik_optimizer::finite_diff::run_fd_diff;
/// let closure_err: RefCell<Option<Error>> = RefCell::new(None);
/// let grad = run_fd_diff(&array![0.0, 1.0], &|x| x.dot(x), &closure_err)?;
/// assert_eq!(grad.len(), 2);
/// # Ok::<(), rust_density_ratio::optimization::errors::OptError>(())
/// ```
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    let dim = theta.len();
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, dim)?;
    Ok(fd_grad)
}

/// Finite-difference Hessian of a gradient function, validated and symmetric.
///
/// The central-difference validation error is discarded; only the
/// forward-difference result is surfaced when both fail.
///
/// # Errors
/// - `HessianDimMismatch` / `InvalidHessian` from [`validate_hessian`].
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut cent_hess = theta.central_hessian(f);
    if validate_hessian(&cent_hess, dim).is_ok() {
        symmetrize_hess(&mut cent_hess);
        return Ok(cent_hess);
    }
    let mut forward_hess = theta.forward_hessian(f);
    validate_hessian(&forward_hess, dim)?;
    symmetrize_hess(&mut forward_hess);
    Ok(forward_hess)
}

// ---- Helper methods ----

/// Average each off-diagonal pair in place; the diagonal is untouched.
fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}
