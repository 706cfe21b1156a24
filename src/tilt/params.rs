//! tilt::params — tilt parameters and the tilting function `g(x; θ)`.
//!
//! Purpose
//! -------
//! Hold `θ = (α, β)` and the multiplier `λ` in validated form and convert
//! them to and from the flat optimizer vector.
//!
//! Key behaviors
//! -------------
//! - [`TiltParameter::evaluate`] computes `g(x; θ) = exp(α + β·T(x))` with
//!   no guarding: an overflowing exponent yields `+∞`, and callers decide
//!   how to treat it.
//! - [`TiltParameter::to_theta`] / [`TiltParameter::from_theta`] use the
//!   layout `[α, β₁, …, β_k]`, followed by `λ` only when the multiplier is
//!   optimized.
//!
//! Invariants & assumptions
//! ------------------------
//! - `α`, every `β_j` and `λ` are finite after construction.
use crate::{
    optimization::loglik_optimizer::Theta,
    tilt::{
        basis::TiltBasis,
        errors::{TiltError, TiltResult},
    },
};
use ndarray::{s, Array1, ArrayView1};

/// `θ = (α, β)` together with the Lagrange multiplier `λ`.
#[derive(Debug, Clone, PartialEq)]
pub struct TiltParameter {
    pub intercept: f64,
    pub coefficients: Array1<f64>,
    pub multiplier: f64,
}

impl TiltParameter {
    /// # Errors
    /// `TiltError::NonFiniteParameter` naming the first non-finite entry.
    pub fn new(intercept: f64, coefficients: Array1<f64>, multiplier: f64) -> TiltResult<Self> {
        if !intercept.is_finite() {
            return Err(TiltError::NonFiniteParameter { name: "alpha", value: intercept });
        }
        if let Some(&bad) = coefficients.iter().find(|v| !v.is_finite()) {
            return Err(TiltError::NonFiniteParameter { name: "beta", value: bad });
        }
        if !multiplier.is_finite() {
            return Err(TiltError::NonFiniteParameter { name: "lambda", value: multiplier });
        }
        Ok(Self { intercept, coefficients, multiplier })
    }

    /// `α = 0`, `β = 0` (so `g ≡ 1`) and the given `λ`.
    pub fn neutral(n_features: usize, multiplier: f64) -> Self {
        Self { intercept: 0.0, coefficients: Array1::zeros(n_features), multiplier }
    }

    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Flatten to the optimizer layout; `λ` is appended only when `free_multiplier`.
    pub fn to_theta(&self, free_multiplier: bool) -> Theta {
        let k = self.n_features();
        let len = 1 + k + usize::from(free_multiplier);
        let mut theta = Array1::zeros(len);
        theta[0] = self.intercept;
        theta.slice_mut(s![1..k + 1]).assign(&self.coefficients);
        if free_multiplier {
            theta[k + 1] = self.multiplier;
        }
        theta
    }

    /// Rebuild from the optimizer layout. `pinned` supplies `λ` when it is
    /// not part of `theta`.
    ///
    /// # Errors
    /// - `TiltError::CoefficientLengthMismatch` if `theta` has the wrong length.
    /// - `TiltError::NonFiniteParameter` as in [`TiltParameter::new`].
    pub fn from_theta(theta: &Theta, n_features: usize, pinned: Option<f64>) -> TiltResult<Self> {
        let expected = 1 + n_features + usize::from(pinned.is_none());
        if theta.len() != expected {
            return Err(TiltError::CoefficientLengthMismatch {
                expected,
                found: theta.len(),
            });
        }
        let multiplier = match pinned {
            Some(l) => l,
            None => theta[n_features + 1],
        };
        Self::new(theta[0], theta.slice(s![1..n_features + 1]).to_owned(), multiplier)
    }

    /// Linear predictor `η = α + β·t` for precomputed features `t`.
    #[inline]
    pub fn linear_predictor(&self, features: ArrayView1<'_, f64>) -> f64 {
        self.intercept + self.coefficients.dot(&features)
    }

    /// `g(x; θ) = exp(α + β·T(x))`.
    ///
    /// # Errors
    /// - `TiltError::CoefficientLengthMismatch` if `β` does not fit the basis
    ///   at this dimension.
    /// - Basis domain/dimension errors from [`TiltBasis::features_into`].
    pub fn evaluate(&self, basis: TiltBasis, x: ArrayView1<'_, f64>) -> TiltResult<f64> {
        self.evaluate_row(basis, x, 0)
    }

    /// `g` at every row of `points`.
    ///
    /// # Errors
    /// As [`TiltParameter::evaluate`], labelled with the failing row.
    pub fn evaluate_many<'a, I>(&self, basis: TiltBasis, points: I) -> TiltResult<Array1<f64>>
    where
        I: IntoIterator<Item = ArrayView1<'a, f64>>,
    {
        points
            .into_iter()
            .enumerate()
            .map(|(i, x)| self.evaluate_row(basis, x, i))
            .collect::<TiltResult<Vec<f64>>>()
            .map(Array1::from)
    }

    fn evaluate_row(&self, basis: TiltBasis, x: ArrayView1<'_, f64>, row: usize) -> TiltResult<f64> {
        basis.check_dim(x.len())?;
        let k = basis.n_features(x.len());
        if k != self.n_features() {
            return Err(TiltError::CoefficientLengthMismatch {
                expected: k,
                found: self.n_features(),
            });
        }
        let mut t = vec![0.0; k];
        basis.features_into(x, row, &mut t)?;
        Ok(self.linear_predictor(ArrayView1::from(&t[..])).exp())
    }
}
