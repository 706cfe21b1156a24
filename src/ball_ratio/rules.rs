//! ball_ratio::rules — radius and reliability-threshold selection.
//!
//! Both knobs are either fixed by the caller or derived from the sample
//! sizes through the rate formulas
//!
//! - `r = c · [ln m / m]^{β / (2β + d)}`, `m = min(n_T, n_S)`,
//! - `α = c · ln(n_T) / n_T`,
//!
//! where `β ∈ (0, 1]` is the assumed Hölder smoothness of the ratio. The
//! smoothness is a configuration input; nothing here estimates it.
use crate::data::{
    errors::{SampleError, SampleResult},
    validation::{validate_radius, validate_threshold},
};

/// How the ball radius is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RadiusRule {
    /// Use this radius as-is (finite, ≥ 0).
    Fixed(f64),
    /// `scale · [ln m / m]^{holder / (2·holder + d)}` with `m = min(n_T, n_S)`.
    Rate { holder: f64, scale: f64 },
}

impl Default for RadiusRule {
    fn default() -> Self {
        RadiusRule::Rate { holder: 1.0, scale: 1.0 }
    }
}

impl RadiusRule {
    /// Validate the rule's own parameters.
    ///
    /// # Errors
    /// - `NegativeRadius` for an invalid fixed radius.
    /// - `InvalidHolderExponent` if `holder ∉ (0, 1]`.
    /// - `InvalidRateScale` if `scale` is not finite and > 0.
    pub fn validate(&self) -> SampleResult<()> {
        match *self {
            RadiusRule::Fixed(r) => validate_radius(r),
            RadiusRule::Rate { holder, scale } => {
                if !(holder > 0.0 && holder <= 1.0) {
                    return Err(SampleError::InvalidHolderExponent { value: holder });
                }
                validate_scale(scale)
            }
        }
    }

    /// Radius for samples of sizes `n_target`, `n_source` in dimension `dim`.
    ///
    /// With `m = 1` the rate formula gives `ln 1 = 0`, so the radius is 0
    /// and only exact matches fall inside the ball.
    ///
    /// # Errors
    /// See [`RadiusRule::validate`].
    pub fn resolve(&self, n_target: usize, n_source: usize, dim: usize) -> SampleResult<f64> {
        self.validate()?;
        match *self {
            RadiusRule::Fixed(r) => Ok(r),
            RadiusRule::Rate { holder, scale } => {
                let m = n_target.min(n_source).max(1) as f64;
                let exponent = holder / (2.0 * holder + dim as f64);
                let r = scale * (m.ln() / m).powf(exponent);
                validate_radius(r)?;
                Ok(r)
            }
        }
    }
}

/// How the reliability threshold `α` is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdRule {
    /// Use this threshold as-is (finite, ≥ 0).
    Fixed(f64),
    /// `scale · ln(n_T) / n_T`.
    Rate { scale: f64 },
}

impl Default for ThresholdRule {
    fn default() -> Self {
        ThresholdRule::Rate { scale: 1.0 }
    }
}

impl ThresholdRule {
    /// # Errors
    /// - `NegativeThreshold` for an invalid fixed threshold.
    /// - `InvalidRateScale` if `scale` is not finite and > 0.
    pub fn validate(&self) -> SampleResult<()> {
        match *self {
            ThresholdRule::Fixed(a) => validate_threshold(a),
            ThresholdRule::Rate { scale } => validate_scale(scale),
        }
    }

    /// Threshold for a target sample of size `n_target`.
    ///
    /// # Errors
    /// See [`ThresholdRule::validate`].
    pub fn resolve(&self, n_target: usize) -> SampleResult<f64> {
        self.validate()?;
        match *self {
            ThresholdRule::Fixed(a) => Ok(a),
            ThresholdRule::Rate { scale } => {
                let n = n_target.max(1) as f64;
                Ok(scale * n.ln() / n)
            }
        }
    }
}

fn validate_scale(scale: f64) -> SampleResult<()> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(SampleError::InvalidRateScale { value: scale });
    }
    Ok(())
}
