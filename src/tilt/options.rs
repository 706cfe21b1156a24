//! tilt::options — configuration of the exponential-tilting fit.
//!
//! Purpose
//! -------
//! Collect the modelling choices (basis, constraint form, multiplier policy)
//! and the optimizer settings for [`fit_tilt`](super::fit_tilt) in one
//! validated struct.
//!
//! Key behaviors
//! -------------
//! - [`ConstraintForm`] selects the constraint argument
//!   `a(x) = 1 + λ(g(x) + s)`: `Shifted` uses `s = +1`, `Centered` uses
//!   `s = −1` (the two-sample empirical-likelihood form).
//! - [`Multiplier`] decides whether λ is optimized jointly (`Free`), pinned
//!   to `n_T / (n_S + n_T)` (`SampleRatio`), or fixed by the caller.
//! - [`TiltOptions::profiled`] is the numerically stable pairing
//!   `Centered + SampleRatio`. With `Free`, the profile is convex in λ and
//!   the joint optimum is usually on the boundary of the feasible region.
//!
//! Conventions
//! -----------
//! - The default optimizer uses Armijo backtracking, which only compares
//!   costs at trial points and so never asks for a gradient at a point
//!   whose objective is `+∞`.
use crate::{
    optimization::loglik_optimizer::{
        traits::{LineSearcher, MLEOptions, Tolerances},
        DEFAULT_LBFGS_MEM,
    },
    tilt::{
        basis::TiltBasis,
        errors::{TiltError, TiltResult},
    },
};

/// Shift `s` in the constraint argument `1 + λ(g + s)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConstraintForm {
    /// `1 + λ(g + 1)`.
    #[default]
    Shifted,
    /// `1 + λ(g − 1)`.
    Centered,
}

impl ConstraintForm {
    pub fn shift(&self) -> f64 {
        match self {
            ConstraintForm::Shifted => 1.0,
            ConstraintForm::Centered => -1.0,
        }
    }
}

/// Treatment of the Lagrange multiplier λ.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Multiplier {
    /// λ is the last entry of the optimizer vector.
    #[default]
    Free,
    /// λ = n_T / (n_S + n_T).
    SampleRatio,
    /// λ fixed to the given finite value.
    Fixed(f64),
}

impl Multiplier {
    /// λ when it is not optimized; `None` for [`Multiplier::Free`].
    pub fn pinned(&self, n_source: usize, n_target: usize) -> Option<f64> {
        match *self {
            Multiplier::Free => None,
            Multiplier::SampleRatio => Some(n_target as f64 / (n_source + n_target) as f64),
            Multiplier::Fixed(v) => Some(v),
        }
    }
}

/// Options for an exponential-tilting fit.
///
/// Default: `BoundedLog` basis, `Shifted` constraint, `Free` multiplier,
/// L-BFGS with backtracking, `tol_grad = 1e-6`, `max_iter = 500`.
#[derive(Debug, Clone, PartialEq)]
pub struct TiltOptions {
    pub basis: TiltBasis,
    pub constraint: ConstraintForm,
    pub multiplier: Multiplier,
    pub mle_opts: MLEOptions,
}

impl TiltOptions {
    /// # Errors
    /// `TiltError::NonFiniteParameter` if `multiplier` is `Fixed` with a
    /// non-finite value.
    pub fn new(
        basis: TiltBasis, constraint: ConstraintForm, multiplier: Multiplier, mle_opts: MLEOptions,
    ) -> TiltResult<Self> {
        if let Multiplier::Fixed(v) = multiplier {
            if !v.is_finite() {
                return Err(TiltError::NonFiniteParameter { name: "lambda", value: v });
            }
        }
        Ok(Self { basis, constraint, multiplier, mle_opts })
    }

    /// `Centered` constraint with λ pinned to the sample ratio.
    pub fn profiled(basis: TiltBasis) -> Self {
        Self {
            basis,
            constraint: ConstraintForm::Centered,
            multiplier: Multiplier::SampleRatio,
            mle_opts: default_tilt_mle_options(),
        }
    }

    /// Replace the optimizer settings.
    pub fn with_mle_options(mut self, mle_opts: MLEOptions) -> Self {
        self.mle_opts = mle_opts;
        self
    }
}

impl Default for TiltOptions {
    fn default() -> Self {
        Self {
            basis: TiltBasis::default(),
            constraint: ConstraintForm::default(),
            multiplier: Multiplier::default(),
            mle_opts: default_tilt_mle_options(),
        }
    }
}

fn default_tilt_mle_options() -> MLEOptions {
    MLEOptions {
        tols: Tolerances { tol_grad: Some(1e-6), tol_cost: None, max_iter: Some(500) },
        line_searcher: LineSearcher::Backtracking,
        verbose: false,
        lbfgs_mem: Some(DEFAULT_LBFGS_MEM),
    }
}
