//! loglik_optimizer — argmin-powered log-likelihood maximizer.
//!
//! Purpose
//! -------
//! Callers implement [`LogLikelihood`] and invoke [`maximize`] to run L-BFGS
//! with a configurable line search, tolerances, and finite-difference
//! fallbacks.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] turns `ℓ(θ)` into the cost `c(θ) = -ℓ(θ)`,
//!   maps `ℓ = -∞` to `c = +∞`, and records the best feasible point in a
//!   [`adapter::BestPoint`].
//! - [`maximize`] validates `θ₀` (including feasibility), picks a solver in
//!   [`builders`] from [`traits::LineSearcher`], and runs it through
//!   [`run::run_lbfgs`].
//! - A run aborted by a backend error or a failed line search after feasible
//!   progress returns the best recorded point with `converged = false`.
//! - `converged` is `true` only for `SolverConverged` and
//!   `TargetCostReached`; hitting `max_iter` is not convergence.
//! - [`finite_diff`] and [`validation`] provide numerical derivatives and
//!   shape/finiteness checks.
//!
//! Invariants & assumptions
//! ------------------------
//! - User code implements `ℓ(θ)` and `∇ℓ(θ)`, never the cost directly.
//! - `value` returns `Ok(f64::NEG_INFINITY)` for infeasible θ; any other
//!   non-finite value is an error.
//! - [`OptimOutcome::theta_hat`] and [`OptimOutcome::value`] are finite.
//!
//! Conventions
//! -----------
//! - Objectives with a `-∞` region should use
//!   [`traits::LineSearcher::Backtracking`]; the Wolfe-type searches may
//!   evaluate gradients at infeasible trial points.
//!
//! Testing notes
//! -------------
//! - Unit tests cover sign conventions and the sentinel in [`adapter`],
//!   builder wiring, FD helpers, validation, and full solves in [`api`].

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, FnEvalMap, Grad, Theta, DEFAULT_LBFGS_MEM};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
