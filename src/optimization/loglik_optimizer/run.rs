//! Execution helper that runs an `argmin` solver on a log-likelihood problem and
//! returns a crate-friendly [`OptimOutcome`].
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        adapter::{ArgMinAdapter, BestPoint},
        Grad, LogLikelihood, MLEOptions, OptimOutcome, Theta,
    },
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
use argmin::core::{Executor, State, TerminationReason, TerminationStatus};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;

/// Run an `argmin` optimization for a log-likelihood problem.
///
/// This is the shared runner used by every line-search variant. It wires up:
/// - the user model via [`ArgMinAdapter`],
/// - the chosen `Solver` (L-BFGS with Hager–Zhang, More–Thuente, or
///   Armijo backtracking),
/// - initial parameter `theta0`,
/// - optional observers (behind the `obs_slog` feature),
/// - optional `max_iters`,
///   then executes the solver and converts the result into [`OptimOutcome`].
///
/// # Aborted runs
/// Two exits count as aborts: the executor returning an error (for instance
/// a gradient failure between line searches), and the solver stopping with
/// `SolverExit` (L-BFGS reports a failed line search this way). If at least
/// one feasible point was evaluated, the best point recorded in `best` is
/// returned with `converged = false` and a status starting with `Aborted`.
/// Errors raised before any finite cost was seen are propagated.
///
/// # Feature flags
/// If the `obs_slog` feature is enabled and `opts.verbose == true`, a terminal
/// slog observer is attached with `ObserverMode::Always` and a one-time pre-iteration
/// line logs ℓ(θ₀) and, if available, ||grad|| before the first iteration.
///
/// # Errors
/// - Propagates `argmin` runtime errors when no feasible point is available
///   to fall back on.
/// - Propagates any validation errors encountered when constructing
///   [`OptimOutcome`].
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
    best: &'a BestPoint,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: argmin::core::Solver<
            ArgMinAdapter<'a, F>,
            argmin::core::IterState<Theta, Grad, (), (), (), f64>,
        > + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let run_result = optimizer.run();
    let mut result = match run_result {
        Ok(res) => res.state().clone(),
        Err(err) => return fall_back_to_best(best, OptError::from(err), 0),
    };
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    if let TerminationStatus::Terminated(TerminationReason::SolverExit(text)) = &termination {
        let reason = OptError::BackendError { text: text.clone() };
        return fall_back_to_best(best, reason, iterations);
    }
    let grad = result.take_gradient();
    let best_cost = result.get_best_cost();
    if !best_cost.is_finite() {
        return Err(OptError::NoFiniteObjective);
    }
    OptimOutcome::new(
        result.take_best_param(),
        -best_cost,
        termination,
        iterations,
        function_counts,
        grad,
    )
}

// ---- Helper Methods ----

/// Best recorded point as an aborted outcome, or `reason` if none was finite.
fn fall_back_to_best(
    best: &BestPoint, reason: OptError, iterations: u64,
) -> OptResult<OptimOutcome> {
    let Some((theta, cost)) = best.best() else {
        return Err(reason);
    };
    let mut outcome = OptimOutcome::aborted(theta, -cost, best.evaluations(), &reason)?;
    outcome.iterations = iterations as usize;
    Ok(outcome)
}

#[cfg(feature = "obs_slog")]
fn log_initial_state<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: LogLikelihood,
{
    let ll0 = -problem.cost(theta0)?;
    let g0n = problem.gradient(theta0).ok().map(|g| g.l2_norm());

    eprintln!(
        "init: ell(theta0) = {:.6}{}",
        ll0,
        g0n.map(|n| format!(", ||grad|| = {:.6}", n)).unwrap_or_default()
    );
    Ok(())
}
