//! Numerical stability utilities.
//!
//! Provides safe implementations of the handful of nonlinear transforms the
//! density-ratio objectives lean on. Each helper keeps `f64` arithmetic in a
//! well-conditioned regime with an explicit cutoff or floor instead of
//! letting `ln(0)` or `exp(large)` leak into a likelihood.
//!
//! # Provided items
//! - [`LOG_FLOOR`]: additive ε applied before every logarithm in the tilting
//!   objective (default 1e-12).
//! - [`GENERAL_TOL`]: generic "numerically zero" tolerance.
//! - [`EIGEN_EPS`]: eigenvalue cutoff used by pseudoinverse routines.
//! - [`floored_ln(x)`]: `ln(x + LOG_FLOOR)`.
//! - [`safe_softplus(x)`]: stable `ln(1 + exp(x))`.
//! - [`safe_logistic(x)`]: stable `1 / (1 + exp(-x))`.
//! - [`log_sigmoid(x)`]: stable `ln σ(x) = -softplus(-x)`.

/// Additive floor applied before each logarithm in likelihood objectives.
///
/// `ln(x + LOG_FLOOR)` keeps an exact zero from producing `-∞` while leaving
/// any value of practical size untouched.
pub const LOG_FLOOR: f64 = 1e-12;

/// Generic tolerance for "numerically zero" denominators.
pub const GENERAL_TOL: f64 = 1e-12;

/// Eigenvalues with magnitude at most this value are treated as zero when
/// forming a pseudoinverse.
pub const EIGEN_EPS: f64 = 1e-10;

/// Logarithm with the additive [`LOG_FLOOR`].
///
/// Returns `NaN` for inputs below `-LOG_FLOOR`; callers treat any non-finite
/// result as a domain violation.
#[inline]
pub fn floored_ln(x: f64) -> f64 {
    (x + LOG_FLOOR).ln()
}

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// - For sufficiently large `x`, `softplus(x) ≈ x`.
/// - Otherwise, it falls back to `ln1p(exp(x))`.
///
/// The cutoff (`x > 20.0`) keeps the calculation well-conditioned for `f64`.
#[inline]
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 {
        x
    } else {
        x.exp().ln_1p()
    }
}

/// Numerically stable logistic function `σ(x) = 1 / (1 + exp(-x))`.
///
/// Branches on the sign of `x` so that `exp` is only ever evaluated at a
/// non-positive argument.
#[inline]
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Stable log-sigmoid: `ln σ(x) = -softplus(-x)`.
#[inline]
pub fn log_sigmoid(x: f64) -> f64 {
    -safe_softplus(-x)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Agreement of the stable transforms with naïve formulas on safe grids.
    // - Tail behavior (no overflow, no underflow to exact zero/one too early).
    // - The floored logarithm at zero.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Stable transforms agree with the textbook formulas where the latter are
    // well-conditioned.
    //
    // Given
    // -----
    // - A grid of moderate inputs in [-10, 10].
    //
    // Expect
    // ------
    // - softplus, logistic and log-sigmoid match to 1e-12.
    fn stable_transforms_match_naive_formulas_on_safe_grid() {
        for k in -20..=20 {
            let x = 0.5 * k as f64;
            let naive_softplus = (1.0 + x.exp()).ln();
            let naive_logistic = 1.0 / (1.0 + (-x).exp());
            assert!((safe_softplus(x) - naive_softplus).abs() < 1e-12);
            assert!((safe_logistic(x) - naive_logistic).abs() < 1e-12);
            assert!((log_sigmoid(x) - naive_logistic.ln()).abs() < 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Extreme inputs stay finite.
    //
    // Given
    // -----
    // - x = ±800, where exp overflows.
    //
    // Expect
    // ------
    // - softplus(800) = 800, logistic in [0, 1], log-sigmoid(-800) = -800.
    fn stable_transforms_survive_extreme_inputs() {
        assert_eq!(safe_softplus(800.0), 800.0);
        assert!(safe_softplus(-800.0) >= 0.0);
        assert_eq!(safe_logistic(800.0), 1.0);
        assert!((0.0..=1.0).contains(&safe_logistic(-800.0)));
        assert_eq!(log_sigmoid(-800.0), -800.0);
    }

    #[test]
    // Purpose
    // -------
    // The floored logarithm is finite at exactly zero and negligible
    // elsewhere.
    //
    // Given
    // -----
    // - x = 0 and x = 1.
    //
    // Expect
    // ------
    // - floored_ln(0) = ln(LOG_FLOOR); floored_ln(1) ≈ 0.
    fn floored_ln_is_finite_at_zero() {
        assert_eq!(floored_ln(0.0), LOG_FLOOR.ln());
        assert!(floored_ln(1.0).abs() < 1e-11);
        assert!(floored_ln(-1.0).is_nan());
    }
}
