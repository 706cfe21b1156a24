//! Adapter that exposes a user `LogLikelihood` as an `argmin` problem.
//!
//! We convert a *maximization* of a log-likelihood `ℓ(θ)` into a *minimization*
//! problem by defining the cost as `c(θ) = -ℓ(θ)`. Analytic gradients (if
//! provided by the user) are negated accordingly. If a gradient is not
//! provided, we finite-difference the **cost** closure, so no sign flip is
//! needed in that branch.
//!
//! A log-likelihood of `-∞` (the model's "outside the domain" sentinel) is
//! passed to the solver as a cost of `+∞`. Every finite cost the solver asks
//! for is also recorded in a [`BestPoint`] tracker, so a run that aborts
//! inside a line search can still report the best feasible point it saw.
use std::cell::{Cell, RefCell};

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        finite_diff::run_fd_diff,
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Running record of the lowest finite cost evaluated during a solve.
///
/// Shared by reference between the adapter (which writes to it) and the
/// runner (which reads it after the executor returns).
#[derive(Debug, Default)]
pub struct BestPoint {
    inner: RefCell<Option<(Theta, Cost)>>,
    evals: Cell<u64>,
}

impl BestPoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one cost evaluation and keep `(theta, cost)` if it improves
    /// on the stored point. Non-finite costs are counted but never stored.
    pub fn record(&self, theta: &Theta, cost: Cost) {
        self.evals.set(self.evals.get() + 1);
        if !cost.is_finite() {
            return;
        }
        let mut slot = self.inner.borrow_mut();
        let improves = match slot.as_ref() {
            Some((_, best)) => cost < *best,
            None => true,
        };
        if improves {
            *slot = Some((theta.clone(), cost));
        }
    }

    /// Best `(theta, cost)` seen so far, if any finite cost was recorded.
    pub fn best(&self) -> Option<(Theta, Cost)> {
        self.inner.borrow().clone()
    }

    /// Number of cost evaluations recorded.
    pub fn evaluations(&self) -> u64 {
        self.evals.get()
    }
}

/// Bridges a user `LogLikelihood` to `argmin`'s `CostFunction` and `Gradient`.
///
/// - `CostFunction::cost` returns `-ℓ(θ)` (negative log-likelihood), or
///   `+∞` when `ℓ(θ) = -∞`.
/// - `Gradient::gradient` returns:
///   - `-∇ℓ(θ)` if the user provides an analytic gradient, or
///   - a finite-difference gradient of the cost (no sign flip needed).
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
    best: &'a BestPoint,
}

impl<'a, F: LogLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost `c(θ) = -ℓ(θ)`.
    ///
    /// - `ℓ(θ) = -∞` maps to `c(θ) = +∞`.
    /// - Any other non-finite value (`NaN`, `+∞`) is `Error(NonFiniteCost)`.
    ///
    /// # Errors
    /// Propagates any `OptError` from the user’s `value` via `?`.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if output == f64::NEG_INFINITY {
            self.best.record(theta, f64::INFINITY);
            return Ok(f64::INFINITY);
        }
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        let cost = -output;
        self.best.record(theta, cost);
        Ok(cost)
    }
}

impl<'a, F: LogLikelihood> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the gradient of the cost at `θ`.
    ///
    /// Behavior:
    /// - If the user implements `grad(θ, data)`, we validate it and return `-grad`
    ///   (because the cost is `-ℓ`).
    /// - Otherwise, we compute a finite-difference gradient of the **cost**:
    ///   central differences first, then forward differences if any cost
    ///   evaluation failed or the central result is not finite.
    ///
    /// The FD closure must return `f64`, so the first error raised inside it
    /// is parked in `closure_err` and the closure yields `NaN`.
    ///
    /// # Errors
    /// - Propagates user errors from `grad` (non-`GradientNotImplemented`).
    /// - Propagates any error raised by cost evaluations performed during FD.
    /// - Returns validation errors if the gradient has wrong dimension or
    ///   non-finite entries.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_func = |theta: &Theta| -> f64 {
                    match self.cost(theta) {
                        Ok(val) => val,
                        Err(e) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            f64::NAN
                        }
                    }
                };
                let fd_grad = theta.central_diff(&cost_func);
                if closure_err.borrow().is_none() && validate_grad(&fd_grad, dim).is_ok() {
                    return Ok(fd_grad);
                }
                Ok(run_fd_diff(theta, &cost_func, &closure_err)?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a user `LogLikelihood`, its data, and the
    /// tracker that records the best feasible point.
    pub fn new(f: &'a F, data: &'a F::Data, best: &'a BestPoint) -> Self {
        Self { f, data, best }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Sign conventions of cost and analytic gradient.
    // - Mapping of the -∞ domain sentinel to +∞ cost.
    // - BestPoint bookkeeping.
    // - Finite-difference fallback when no analytic gradient exists.
    //
    // They intentionally DO NOT cover:
    // - Full solver runs (see `api` tests).
    // -------------------------------------------------------------------------

    /// ℓ(θ) = ln θ₀ − θ₀ on θ₀ > 0, −∞ elsewhere. Maximized at θ₀ = 1.
    struct LogMinusLinear {
        analytic: bool,
    }

    impl LogLikelihood for LogMinusLinear {
        type Data = ();

        fn value(&self, theta: &Theta, _: &()) -> OptResult<Cost> {
            let x = theta[0];
            if x <= 0.0 {
                return Ok(f64::NEG_INFINITY);
            }
            Ok(x.ln() - x)
        }

        fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
            Ok(())
        }

        fn grad(&self, theta: &Theta, _: &()) -> OptResult<Grad> {
            if !self.analytic {
                return Err(OptError::GradientNotImplemented);
            }
            Ok(array![1.0 / theta[0] - 1.0])
        }
    }

    struct NanModel;

    impl LogLikelihood for NanModel {
        type Data = ();

        fn value(&self, _: &Theta, _: &()) -> OptResult<Cost> {
            Ok(f64::NAN)
        }

        fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // The adapter negates both value and analytic gradient.
    //
    // Given
    // -----
    // - `LogMinusLinear` with analytic gradient at θ = [2].
    //
    // Expect
    // ------
    // - cost = 2 − ln 2 and gradient = [0.5].
    fn adapter_negates_value_and_gradient() {
        // Arrange
        let model = LogMinusLinear { analytic: true };
        let best = BestPoint::new();
        let adapter = ArgMinAdapter::new(&model, &(), &best);
        let theta = array![2.0];

        // Act
        let cost = adapter.cost(&theta).expect("feasible point");
        let grad = adapter.gradient(&theta).expect("analytic gradient");

        // Assert
        assert!((cost - (2.0 - 2.0_f64.ln())).abs() < 1e-12);
        assert!((grad[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // A −∞ log-likelihood becomes a +∞ cost and is never stored as best.
    //
    // Given
    // -----
    // - Evaluations at θ = [-1] (infeasible) and θ = [1] (optimum).
    //
    // Expect
    // ------
    // - cost(-1) = +∞; best point is θ = [1]; two evaluations counted.
    fn adapter_maps_domain_sentinel_to_positive_infinity() {
        // Arrange
        let model = LogMinusLinear { analytic: true };
        let best = BestPoint::new();
        let adapter = ArgMinAdapter::new(&model, &(), &best);

        // Act
        let outside = adapter.cost(&array![-1.0]).expect("sentinel is not an error");
        let inside = adapter.cost(&array![1.0]).expect("feasible point");

        // Assert
        assert_eq!(outside, f64::INFINITY);
        assert!((inside - 1.0).abs() < 1e-12);
        let (theta, cost) = best.best().expect("one finite evaluation");
        assert_eq!(theta[0], 1.0);
        assert_eq!(cost, inside);
        assert_eq!(best.evaluations(), 2);
    }

    #[test]
    // Purpose
    // -------
    // NaN log-likelihoods are surfaced as `NonFiniteCost`.
    //
    // Given
    // -----
    // - `NanModel` at any θ.
    //
    // Expect
    // ------
    // - The adapter's cost returns an error mapping to `NonFiniteCost`.
    fn adapter_rejects_nan_values() {
        // Arrange
        let best = BestPoint::new();
        let adapter = ArgMinAdapter::new(&NanModel, &(), &best);

        // Act
        let err = adapter.cost(&array![0.0]).expect_err("NaN must be rejected");

        // Assert
        assert!(matches!(OptError::from(err), OptError::NonFiniteCost { .. }));
    }

    #[test]
    // Purpose
    // -------
    // Without an analytic gradient the adapter finite-differences the cost.
    //
    // Given
    // -----
    // - `LogMinusLinear { analytic: false }` at θ = [2].
    //
    // Expect
    // ------
    // - FD gradient of the cost ≈ 1 − 1/2 = 0.5.
    fn adapter_falls_back_to_finite_differences() {
        // Arrange
        let model = LogMinusLinear { analytic: false };
        let best = BestPoint::new();
        let adapter = ArgMinAdapter::new(&model, &(), &best);

        // Act
        let grad = adapter.gradient(&array![2.0]).expect("FD gradient");

        // Assert
        assert!((grad[0] - 0.5).abs() < 1e-5);
    }
}
