//! loglik_optimizer::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the numeric types and solver aliases used by the log-likelihood
//! optimizer so the rest of the crate can stay agnostic to `ndarray` and
//! Argmin generics.
//!
//! Key behaviors
//! -------------
//! - Define canonical aliases for parameter vectors, gradients, Hessians, and
//!   scalar costs (`Theta`, `Grad`, `Hessian`, `Cost`).
//! - Provide a standard map type for Argmin function-evaluation counters
//!   (`FnEvalMap`).
//! - Expose pre-wired L-BFGS solver aliases for the three supported line
//!   searches (Hager–Zhang, More–Thuente, Armijo backtracking).
//!
//! Conventions
//! -----------
//! - `Theta` and `Grad` are column vectors with length equal to the number of
//!   free parameters; `Hessian` is `theta.len() × theta.len()`.
//! - `Cost` is the minimized quantity `c(θ) = -ℓ(θ)`. `+∞` is a legal cost
//!   and marks a point outside the model's feasible region.
//!
//! Testing notes
//! -------------
//! - Aliases and constants only; exercised by the builder and runner tests.
use argmin::solver::{
    linesearch::{
        condition::ArmijoCondition, BacktrackingLineSearch, HagerZhangLineSearch,
        MoreThuenteLineSearch,
    },
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Parameter vector `θ` for log-likelihood optimization.
pub type Theta = Array1<f64>;

/// Gradient vector `∇ℓ(θ)` or `∇c(θ)`, matching the shape of `Theta`.
pub type Grad = Array1<f64>;

/// Dense Hessian matrix; `n × n` for `n = Theta.len()`.
pub type Hessian = Array2<f64>;

/// Scalar objective value used by the optimizer (the cost `c(θ) = -ℓ(θ)`).
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps human-readable counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Sufficient-decrease constant for the Armijo backtracking line search.
pub const DEFAULT_ARMIJO_C: f64 = 1e-4;

/// Step contraction factor for the Armijo backtracking line search.
pub const DEFAULT_BACKTRACK_RHO: f64 = 0.5;

/// Hager–Zhang line search specialized to this crate’s numeric types.
pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

/// More–Thuente line search specialized to this crate’s numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// Armijo backtracking line search specialized to this crate’s numeric types.
///
/// Only cost values are compared at trial points, so a `+∞` trial cost is
/// simply rejected and the step is contracted.
pub type BacktrackingLS = BacktrackingLineSearch<Theta, Grad, ArmijoCondition<Cost>, Cost>;

/// L-BFGS solver wired to the Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS solver wired to the More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;

/// L-BFGS solver wired to the Armijo backtracking line search.
pub type LbfgsBacktracking = LBFGS<BacktrackingLS, Theta, Grad, Cost>;
