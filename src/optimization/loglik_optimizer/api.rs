//! High-level entry point for maximizing a user-provided `LogLikelihood`.
//!
//! This selects an L-BFGS solver with the configured line search, wraps the
//! model in an `ArgMinAdapter` (which *minimizes* `-ℓ(θ)`), and delegates the
//! run to `run_lbfgs`.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        adapter::{ArgMinAdapter, BestPoint},
        builders::{
            build_optimizer_backtracking, build_optimizer_hager_zhang,
            build_optimizer_more_thuente,
        },
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
        validation::validate_value,
        OptimOutcome, Theta,
    },
};

/// Maximize a log-likelihood `ℓ(θ)` using L-BFGS with the chosen line search.
///
/// # Behavior
/// - Validates the initial guess via `f.check(theta0, data)`.
/// - Evaluates `ℓ(θ₀)`: `-∞` is rejected as [`OptError::InfeasibleStart`],
///   any other non-finite value as [`OptError::NonFiniteCost`].
/// - Wraps `(f, data)` in an `ArgMinAdapter` that exposes `c(θ) = -ℓ(θ)`
///   to `argmin` and records the best feasible point.
/// - Builds an L-BFGS solver for `opts.line_searcher` and runs it.
///
/// # Errors
/// - Propagates any error from `f.check` or `f.value`.
/// - Propagates builder errors from `build_optimizer_*`.
/// - Propagates runtime errors from `run_lbfgs` that occur before any
///   feasible point could be recorded.
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use rust_density_ratio::optimization::errors::OptResult;
/// use rust_density_ratio::optimization::loglik_optimizer::{
///     maximize, traits::LineSearcher, LogLikelihood, MLEOptions, Theta, Tolerances,
/// };
///
/// struct Concave;
/// impl LogLikelihood for Concave {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let tols = Tolerances::new(Some(1e-6), None, Some(200))?;
/// let opts = MLEOptions::new(tols, LineSearcher::HagerZhang, None)?;
/// let out = maximize(&Concave, array![0.1, -0.2, 0.3], &(), &opts)?;
/// println!("θ̂ = {:?}", out.theta_hat);
/// # Ok::<(), rust_density_ratio::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let ll0 = f.value(&theta0, data)?;
    if ll0 == f64::NEG_INFINITY {
        return Err(OptError::InfeasibleStart);
    }
    validate_value(ll0)?;

    let best = BestPoint::new();
    best.record(&theta0, -ll0);
    let problem = ArgMinAdapter::new(f, data, &best);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver, &best)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver, &best)
        }
        LineSearcher::Backtracking => {
            let solver = build_optimizer_backtracking(opts)?;
            run_lbfgs(theta0, opts, problem, solver, &best)
        }
    }
}
