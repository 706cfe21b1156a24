//! inference::hessian — observed-information standard errors.
//!
//! Purpose
//! -------
//! Turn a gradient map of an average objective into per-parameter standard
//! errors, either classical (inverse observed information) or sandwich
//! (information pseudoinverse around an outer-product-of-scores matrix).
//!
//! Key behaviors
//! -------------
//! - [`calc_standard_errors`] differentiates the supplied gradient map with
//!   [`compute_hessian`] to obtain the observed information `J(θ̂)`, copies
//!   it into a `nalgebra::DMatrix`, and reads standard errors off a
//!   truncated symmetric eigendecomposition.
//! - [`score_covariance`] builds the IID outer-product-of-gradients matrix
//!   `S = (1/n) Σ_i s_i s_iᵀ` from an `n × p` score matrix, optionally
//!   centering the scores first.
//!
//! Invariants & assumptions
//! ------------------------
//! - The gradient map and the scores are on the **average** objective scale
//!   (sum divided by the number of observations). Callers divide the
//!   returned standard errors by `√n` to reach the scale of the estimator.
//! - Eigenvalues at or below [`EIGEN_EPS`] are dropped from the
//!   pseudoinverse; a flat direction contributes nothing to any variance.
//!
//! Conventions
//! -----------
//! - No explicit inverse is formed; only `symmetric_eigen` is used.
//! - Sign of the gradient map is irrelevant as long as `J(θ̂)` comes out
//!   positive semi-definite: pass the gradient of a cost (minimized
//!   objective), not of a log-likelihood.
//!
//! Downstream usage
//! ----------------
//! - `tilt::TiltFit::standard_errors` passes the average profile-cost
//!   gradient, and for the sandwich form the per-observation cost scores.
use crate::optimization::{
    errors::OptResult, loglik_optimizer::finite_diff::compute_hessian,
    numerical_stability::transformations::EIGEN_EPS,
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2, Axis};

/// Standard errors from the observed information of an average objective.
///
/// `f` maps `θ` to the gradient of the average cost. With `scores = None`
/// the classical form `√diag(J⁺)` is returned; with `Some(S)` the sandwich
/// form `√diag(J⁺ S J⁺)`.
///
/// # Errors
/// Any error from [`compute_hessian`] (non-finite or mis-shaped Hessian).
///
/// # Examples
/// ```rust
/// # use ndarray::array;
/// # use rust_density_ratio::inference::hessian::calc_standard_errors;
/// let a = array![[4.0, 0.0], [0.0, 1.0]];
/// let f = |theta: &ndarray::Array1<f64>| a.dot(theta);
/// let se = calc_standard_errors(&f, &array![1.0, -1.0], None)?;
/// assert!((se[0] - 0.5).abs() < 1e-6);
/// assert!((se[1] - 1.0).abs() < 1e-6);
/// # Ok::<(), rust_density_ratio::optimization::errors::OptError>(())
/// ```
pub fn calc_standard_errors<F: Fn(&Array1<f64>) -> Array1<f64>>(
    f: &F, theta_hat: &Array1<f64>, scores: Option<&Array2<f64>>,
) -> OptResult<Array1<f64>> {
    let obs_info = compute_hessian(f, theta_hat)?;
    let info = to_dmatrix(&obs_info);
    Ok(match scores {
        Some(s) => solve_for_se_robust(info, s),
        None => solve_for_se(info),
    })
}

/// IID outer product of per-observation scores, `(1/n) Σ_i s_i s_iᵀ`.
///
/// `raw_scores` is `n × p` with one observation per row. With `center`,
/// the column means are subtracted first. An empty matrix yields zeros.
pub fn score_covariance(raw_scores: &Array2<f64>, center: bool) -> Array2<f64> {
    let n = raw_scores.nrows();
    let p = raw_scores.ncols();
    if n == 0 {
        return Array2::zeros((p, p));
    }
    let centered;
    let s = if center {
        let mean = raw_scores.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(p));
        centered = raw_scores - &mean;
        &centered
    } else {
        raw_scores
    };
    s.t().dot(s) / n as f64
}

// ---- Helper methods ----

fn to_dmatrix(obs_info: &Array2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(obs_info.nrows(), obs_info.ncols(), |i, j| obs_info[[i, j]])
}

/// `√diag(J⁺)` with eigenvalues `≤ EIGEN_EPS` discarded.
fn solve_for_se(obs_info: DMatrix<f64>) -> Array1<f64> {
    let n = obs_info.nrows();
    let eig = obs_info.symmetric_eigen();
    let q = eig.eigenvectors;
    Array1::from_shape_fn(n, |i| {
        eig.eigenvalues
            .iter()
            .enumerate()
            .filter(|(_, lambda)| **lambda > EIGEN_EPS)
            .map(|(k, &lambda)| q[(i, k)] * q[(i, k)] / lambda)
            .sum::<f64>()
            .sqrt()
    })
}

/// `√diag(J⁺ S J⁺)`: row `i` of `J⁺` is `w_i`, and `Var_i = w_iᵀ S w_i`.
fn solve_for_se_robust(obs_info: DMatrix<f64>, scores: &Array2<f64>) -> Array1<f64> {
    let n = obs_info.nrows();
    let eig = obs_info.symmetric_eigen();
    let q = eig.eigenvectors;
    let mut se = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut w_i = Array1::<f64>::zeros(n);
        for (k, &lambda) in eig.eigenvalues.iter().enumerate() {
            if lambda > EIGEN_EPS {
                let coeff = q[(i, k)] / lambda;
                for j in 0..n {
                    w_i[j] += coeff * q[(j, k)];
                }
            }
        }
        se[i] = w_i.dot(&scores.dot(&w_i)).sqrt();
    }
    se
}
