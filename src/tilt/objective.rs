//! tilt::objective — profile log-likelihood of the exponential tilt.
//!
//! Purpose
//! -------
//! Evaluate the negated profile objective and its gradient for
//! `θ = (α, β)` (and `λ` when free) on design matrices precomputed once per
//! fit, and expose it to the optimizer through [`LogLikelihood`].
//!
//! Key behaviors
//! -------------
//! - With `g_i = exp(α + β·T(x_i))` and `a_i = 1 + λ(g_i + s)`:
//!   `c(θ, λ) = Σ_{S ∪ T} ln(a_i + ε) − Σ_T ln(g_i + ε)`, and
//!   `ℓ = −c` is what [`TiltObjective::value`] reports.
//! - [`profile_cost`] returns `+∞` as soon as any `g_i` is non-finite, any
//!   `a_i ≤ 0` (or non-finite), or the sum is non-finite. The log-likelihood
//!   is then `−∞`, which the optimizer adapter treats as an infeasible point.
//! - [`TiltObjective::grad`] is analytic. With `φ_i = (1, T(x_i))`:
//!   `∂c/∂θ = Σ_{S ∪ T} λ g_i φ_i / (a_i + ε) − Σ_T g_i φ_i / (g_i + ε)` and
//!   `∂c/∂λ = Σ_{S ∪ T} (g_i + s) / (a_i + ε)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Design rows are finite (the basis floors its logarithms).
//! - `θ` has length `1 + k` plus one when `λ` is free; `check` enforces it.
//!
//! Conventions
//! -----------
//! - `ε` is [`LOG_FLOOR`]; `s` is [`ConstraintForm::shift`].
use crate::{
    data::sample::Sample,
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{traits::LogLikelihood, Cost, Grad, Theta},
        numerical_stability::transformations::LOG_FLOOR,
    },
    tilt::{
        basis::TiltBasis,
        errors::TiltResult,
        options::{ConstraintForm, Multiplier},
    },
};
use ndarray::{s, Array1, Array2, ArrayView1};

/// Precomputed designs and constants for one tilt fit.
#[derive(Debug, Clone, PartialEq)]
pub struct TiltData {
    /// `T(x)` at every source row.
    pub source_design: Array2<f64>,
    /// `T(x)` at every target row.
    pub target_design: Array2<f64>,
    /// `s` in `1 + λ(g + s)`.
    pub shift: f64,
    /// `λ` when it is not optimized.
    pub pinned: Option<f64>,
}

impl TiltData {
    /// # Errors
    /// Basis domain/dimension errors for either sample.
    pub fn new(
        basis: TiltBasis, source: &Sample, target: &Sample, constraint: ConstraintForm,
        multiplier: Multiplier,
    ) -> TiltResult<Self> {
        Ok(Self {
            source_design: basis.design(source)?,
            target_design: basis.design(target)?,
            shift: constraint.shift(),
            pinned: multiplier.pinned(source.len(), target.len()),
        })
    }

    pub fn n_features(&self) -> usize {
        self.source_design.ncols()
    }

    /// `n_S + n_T`.
    pub fn n_total(&self) -> usize {
        self.source_design.nrows() + self.target_design.nrows()
    }

    /// Length of the optimizer vector.
    pub fn theta_len(&self) -> usize {
        1 + self.n_features() + usize::from(self.pinned.is_none())
    }

    fn lambda(&self, theta: &Theta) -> f64 {
        match self.pinned {
            Some(l) => l,
            None => theta[self.n_features() + 1],
        }
    }
}

/// Per-row quantities shared by the cost, gradient and score computations.
struct RowTerms {
    g: f64,
    a: f64,
}

/// `g` and `a` for one design row, or `None` outside the domain.
#[inline]
fn row_terms(theta: &Theta, t: ArrayView1<'_, f64>, lambda: f64, shift: f64) -> Option<RowTerms> {
    let k = t.len();
    let eta = theta[0] + theta.slice(s![1..k + 1]).dot(&t);
    let g = eta.exp();
    if !g.is_finite() {
        return None;
    }
    let a = 1.0 + lambda * (g + shift);
    if !(a.is_finite() && a > 0.0) {
        return None;
    }
    Some(RowTerms { g, a })
}

/// Negated profile log-likelihood, `+∞` outside the feasible region.
///
/// `theta` must have length [`TiltData::theta_len`].
pub fn profile_cost(theta: &Theta, data: &TiltData) -> Cost {
    let lambda = data.lambda(theta);
    let mut cost = 0.0;
    for t in data.source_design.rows() {
        match row_terms(theta, t, lambda, data.shift) {
            Some(r) => cost += (r.a + LOG_FLOOR).ln(),
            None => return f64::INFINITY,
        }
    }
    for t in data.target_design.rows() {
        match row_terms(theta, t, lambda, data.shift) {
            Some(r) => cost += (r.a + LOG_FLOOR).ln() - (r.g + LOG_FLOOR).ln(),
            None => return f64::INFINITY,
        }
    }
    if cost.is_finite() {
        cost
    } else {
        f64::INFINITY
    }
}

/// Per-observation gradients of the cost, one row per observation
/// (source rows first, then target rows).
///
/// # Errors
/// `OptError::InvalidGradient` if `theta` is outside the feasible region.
pub fn cost_scores(theta: &Theta, data: &TiltData) -> OptResult<Array2<f64>> {
    let p = data.theta_len();
    let k = data.n_features();
    let lambda = data.lambda(theta);
    let free = data.pinned.is_none();
    let n_s = data.source_design.nrows();
    let mut out = Array2::<f64>::zeros((data.n_total(), p));

    let designs = data.source_design.rows().into_iter().chain(data.target_design.rows());
    for (i, (t, mut score)) in designs.zip(out.rows_mut()).enumerate() {
        let r = row_terms(theta, t, lambda, data.shift).ok_or(OptError::InvalidGradient {
            index: i,
            value: f64::INFINITY,
            reason: "Gradient requested outside the feasible region.",
        })?;
        let inv_a = 1.0 / (r.a + LOG_FLOOR);
        let mut w = lambda * r.g * inv_a;
        if i >= n_s {
            w -= r.g / (r.g + LOG_FLOOR);
        }
        score[0] = w;
        for j in 0..k {
            score[j + 1] = w * t[j];
        }
        if free {
            score[k + 1] = (r.g + data.shift) * inv_a;
        }
    }
    Ok(out)
}

/// Exponential-tilting profile likelihood as an optimizer model.
#[derive(Debug, Clone, Copy, Default)]
pub struct TiltObjective;

impl LogLikelihood for TiltObjective {
    type Data = TiltData;

    fn value(&self, theta: &Theta, data: &TiltData) -> OptResult<Cost> {
        Ok(-profile_cost(theta, data))
    }

    fn check(&self, theta: &Theta, data: &TiltData) -> OptResult<()> {
        let expected = data.theta_len();
        if theta.len() != expected {
            return Err(OptError::ThetaLengthMismatch { expected, actual: theta.len() });
        }
        if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(OptError::InvalidThetaInput { index, value });
        }
        Ok(())
    }

    fn grad(&self, theta: &Theta, data: &TiltData) -> OptResult<Grad> {
        let scores = cost_scores(theta, data)?;
        Ok(-scores.sum_axis(ndarray::Axis(0)))
    }
}

/// Gradient of the average cost `c / (n_S + n_T)`, for observed information.
///
/// Outside the feasible region the result is filled with `NaN`, which the
/// Hessian routine rejects.
pub fn average_cost_gradient(theta: &Theta, data: &TiltData) -> Array1<f64> {
    match cost_scores(theta, data) {
        Ok(scores) => scores.sum_axis(ndarray::Axis(0)) / data.n_total() as f64,
        Err(_) => Array1::from_elem(theta.len(), f64::NAN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data::SampleRole, optimization::loglik_optimizer::finite_diff::run_fd_diff};
    use ndarray::array;
    use std::cell::RefCell;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The cost at neutral parameters against a closed form.
    // - The domain guard (+∞ cost, −∞ log-likelihood).
    // - Agreement of the analytic gradient with finite differences.
    //
    // They intentionally DO NOT cover:
    // - Full fits (see `tilt::model`).
    // -------------------------------------------------------------------------

    fn small_data(constraint: ConstraintForm, multiplier: Multiplier) -> TiltData {
        let source = Sample::from_values(array![0.1, 0.3, 0.5, 0.7], SampleRole::Source)
            .expect("valid");
        let target =
            Sample::from_values(array![0.4, 0.6, 0.8], SampleRole::Target).expect("valid");
        TiltData::new(TiltBasis::BoundedLog, &source, &target, constraint, multiplier)
            .expect("in domain")
    }

    #[test]
    // Purpose
    // -------
    // At α = β = 0 every g_i = 1, so the cost has a closed form.
    //
    // Given
    // -----
    // - 4 source and 3 target points, Centered, λ = 3/7 (SampleRatio).
    //
    // Expect
    // ------
    // - a_i = 1 for all rows, so c = 7 ln(1 + ε) − 3 ln(1 + ε) ≈ 0.
    fn neutral_cost_matches_closed_form() {
        let data = small_data(ConstraintForm::Centered, Multiplier::SampleRatio);
        let theta = array![0.0, 0.0, 0.0];
        assert!(profile_cost(&theta, &data).abs() < 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Infeasible parameters give cost +∞ and log-likelihood −∞, never NaN.
    //
    // Given
    // -----
    // - Shifted form with free λ = −1, so a = 1 − (g + 1) = −g < 0.
    // - An exponent large enough to overflow g.
    //
    // Expect
    // ------
    // - profile_cost = +∞; value = −∞.
    fn domain_guard_returns_infinite_cost() {
        let data = small_data(ConstraintForm::Shifted, Multiplier::Free);
        let negative_a = array![0.0, 0.0, 0.0, -1.0];
        let overflow = array![800.0, 0.0, 0.0, 0.1];

        assert_eq!(profile_cost(&negative_a, &data), f64::INFINITY);
        assert_eq!(profile_cost(&overflow, &data), f64::INFINITY);
        let ll = TiltObjective.value(&negative_a, &data).expect("sentinel, not error");
        assert_eq!(ll, f64::NEG_INFINITY);
        assert!(TiltObjective.grad(&negative_a, &data).is_err());
    }

    #[test]
    // Purpose
    // -------
    // The analytic gradient matches central finite differences.
    //
    // Given
    // -----
    // - Shifted form with free λ at θ = (0.2, 0.5, -0.3, 0.4).
    // - Centered form with pinned λ at θ = (0.1, -0.2, 0.3).
    //
    // Expect
    // ------
    // - Max abs difference below 1e-5 in both cases.
    fn analytic_gradient_matches_finite_differences() {
        for (data, theta) in [
            (small_data(ConstraintForm::Shifted, Multiplier::Free), array![0.2, 0.5, -0.3, 0.4]),
            (
                small_data(ConstraintForm::Centered, Multiplier::SampleRatio),
                array![0.1, -0.2, 0.3],
            ),
        ] {
            // Arrange
            let err_slot = RefCell::new(None);
            let cost = |th: &Theta| profile_cost(th, &data);

            // Act
            let analytic = -TiltObjective.grad(&theta, &data).expect("feasible");
            let numeric = run_fd_diff(&theta, &cost, &err_slot).expect("smooth");

            // Assert
            let gap = (&analytic - &numeric).iter().fold(0.0f64, |m, v| m.max(v.abs()));
            assert!(gap < 1e-5, "gradient gap {gap}");
        }
    }

    #[test]
    // Purpose
    // -------
    // `check` enforces the optimizer-vector length.
    //
    // Given
    // -----
    // - Pinned λ (expects length 3) and a length-4 θ.
    //
    // Expect
    // ------
    // - `OptError::ThetaLengthMismatch { expected: 3, actual: 4 }`.
    fn check_rejects_wrong_length() {
        let data = small_data(ConstraintForm::Centered, Multiplier::SampleRatio);
        assert_eq!(
            TiltObjective.check(&array![0.0, 0.0, 0.0, 0.0], &data),
            Err(OptError::ThetaLengthMismatch { expected: 3, actual: 4 })
        );
    }
}
