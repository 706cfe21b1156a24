//! tilt::basis — sufficient-statistic transforms `T(x)` for the tilt.
//!
//! Purpose
//! -------
//! Make the feature map of the log-linear tilt `g(x; θ) = exp(α + β·T(x))`
//! a configuration choice instead of a hard-coded formula.
//!
//! Key behaviors
//! -------------
//! - [`TiltBasis::BoundedLog`]: `T(x) = (ln(x + ε), ln(1 − x + ε))` for
//!   univariate data on `[0, 1]`. With this basis the tilt family contains
//!   every Beta-to-Beta density ratio.
//! - [`TiltBasis::Linear`]: `T(x) = x` (one feature per dimension).
//! - [`TiltBasis::Quadratic`]: `T(x) = (x, x²)` per dimension, which
//!   contains every Gaussian-to-Gaussian ratio with diagonal covariances.
//! - [`TiltBasis::design`] evaluates `T` at every row of a sample once, so
//!   the objective can reuse the matrix across optimizer iterations.
//!
//! Conventions
//! -----------
//! - `ε` is [`LOG_FLOOR`], the same floor used in the profile objective.
//! - For `Quadratic`, features are ordered `(x₁, …, x_d, x₁², …, x_d²)`.
use crate::{
    data::sample::Sample,
    optimization::numerical_stability::transformations::{floored_ln, LOG_FLOOR},
    tilt::errors::{TiltError, TiltResult},
};
use ndarray::{Array2, ArrayView1};

/// Feature map `T(x)` of the exponential tilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiltBasis {
    /// `(ln(x + ε), ln(1 − x + ε))`, univariate, `x ∈ [0, 1]`.
    #[default]
    BoundedLog,
    /// `x`.
    Linear,
    /// `(x, x²)`.
    Quadratic,
}

impl TiltBasis {
    /// Number of features `k` for inputs of dimension `dim`.
    pub fn n_features(&self, dim: usize) -> usize {
        match self {
            TiltBasis::BoundedLog => 2,
            TiltBasis::Linear => dim,
            TiltBasis::Quadratic => 2 * dim,
        }
    }

    /// # Errors
    /// `TiltError::UnsupportedDimension` if `BoundedLog` is used with `dim ≠ 1`.
    pub fn check_dim(&self, dim: usize) -> TiltResult<()> {
        if matches!(self, TiltBasis::BoundedLog) && dim != 1 {
            return Err(TiltError::UnsupportedDimension {
                dim,
                reason: "The bounded log basis is univariate.",
            });
        }
        Ok(())
    }

    /// Write `T(x)` into `out` (length [`TiltBasis::n_features`]).
    ///
    /// `row` only labels errors.
    ///
    /// # Errors
    /// `TiltError::InvalidBasisInput` if `BoundedLog` sees `x ∉ [0, 1]`.
    pub fn features_into(
        &self, x: ArrayView1<'_, f64>, row: usize, out: &mut [f64],
    ) -> TiltResult<()> {
        match self {
            TiltBasis::BoundedLog => {
                let v = x[0];
                if !(0.0..=1.0).contains(&v) {
                    return Err(TiltError::InvalidBasisInput {
                        row,
                        col: 0,
                        value: v,
                        reason: "The bounded log basis needs values in [0, 1].",
                    });
                }
                out[0] = floored_ln(v);
                out[1] = (1.0 - v + LOG_FLOOR).ln();
            }
            TiltBasis::Linear => {
                for (o, &v) in out.iter_mut().zip(x.iter()) {
                    *o = v;
                }
            }
            TiltBasis::Quadratic => {
                let d = x.len();
                for (j, &v) in x.iter().enumerate() {
                    out[j] = v;
                    out[d + j] = v * v;
                }
            }
        }
        Ok(())
    }

    /// `n × k` design matrix with `T(x_i)` in row `i`.
    ///
    /// # Errors
    /// - `TiltError::UnsupportedDimension` (see [`TiltBasis::check_dim`]).
    /// - `TiltError::InvalidBasisInput` for the first out-of-domain row.
    pub fn design(&self, sample: &Sample) -> TiltResult<Array2<f64>> {
        self.check_dim(sample.dim())?;
        let k = self.n_features(sample.dim());
        let mut out = Array2::<f64>::zeros((sample.len(), k));
        for (i, (x, mut row)) in sample.rows().zip(out.rows_mut()).enumerate() {
            let slot = row.as_slice_mut().ok_or(TiltError::UnsupportedDimension {
                dim: sample.dim(),
                reason: "Design rows must be contiguous.",
            })?;
            self.features_into(x, i, slot)?;
        }
        Ok(out)
    }
}
