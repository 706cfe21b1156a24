//! ball_ratio::estimate — empirical ball masses and the guarded ratio.
//!
//! Purpose
//! -------
//! Compute, for a query point `x`, the fraction of target and source points
//! inside the closed Euclidean ball `B(x, r)` and turn them into a raw ratio
//! plus a reliability-guarded weight.
//!
//! Key behaviors
//! -------------
//! - [`ball_mass`]: `count{‖s − x‖₂ ≤ r} / n` by brute-force scan, comparing
//!   squared distances against `r²`.
//! - [`estimate_ratio`]: one query → [`BallRatio`].
//! - [`estimate_ratios`] / [`guarded_weights`]: a whole query sample.
//!
//! Invariants & assumptions
//! ------------------------
//! - `raw = p_T / p_S` when `p_S > 0`, else `+∞`.
//! - `guarded = raw` when `p_S > 0` and `p_S ≥ α`, else exactly `0`.
//!   The extra `p_S > 0` clause keeps `α = 0` from leaking `+∞` into a
//!   weight vector.
//! - Guarded values are finite and ≥ 0.
//!
//! Conventions
//! -----------
//! - Distances use every feature column.
//! - Cost is `O((n_T + n_S) · d)` per query; no spatial index.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the closed-ball boundary, the degenerate-region
//!   record, the threshold guard, and input validation.
use crate::data::{
    errors::SampleResult,
    sample::Sample,
    validation::{ensure_query, ensure_same_dim, validate_radius, validate_threshold},
};
use ndarray::{Array1, ArrayView1};

/// Ratio estimate at one query point.
///
/// Both `raw` and `guarded` are kept so a caller can tell "unsupported
/// region" (`raw = +∞`, `guarded = 0`) from "zero ratio" (`raw = 0`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallRatio {
    /// Fraction of target points in the ball.
    pub p_target: f64,
    /// Fraction of source points in the ball.
    pub p_source: f64,
    /// `p_target / p_source`, or `+∞` when no source point is in the ball.
    pub raw: f64,
    /// `raw` when the source mass passes the reliability threshold, else 0.
    pub guarded: f64,
}

impl BallRatio {
    /// Build the record from two ball masses and a threshold.
    pub fn from_masses(p_target: f64, p_source: f64, threshold: f64) -> Self {
        let raw = if p_source > 0.0 { p_target / p_source } else { f64::INFINITY };
        let guarded = if p_source > 0.0 && p_source >= threshold { raw } else { 0.0 };
        BallRatio { p_target, p_source, raw, guarded }
    }

    /// `true` when the ball contains no source point (the query lies outside
    /// the empirical source support).
    pub fn is_degenerate(&self) -> bool {
        self.p_source == 0.0
    }

    /// `true` when the guard zeroed a finite or infinite raw ratio.
    pub fn is_guarded(&self) -> bool {
        self.guarded == 0.0 && self.raw != 0.0
    }
}

/// Fraction of `sample` points within Euclidean distance `radius` of `x`.
///
/// The ball is closed. `x` must already have the sample's dimension.
pub fn ball_mass(sample: &Sample, x: ArrayView1<'_, f64>, radius: f64) -> f64 {
    let inside = sample.rows().filter(|s| euclidean_distance(*s, x) <= radius).count();
    inside as f64 / sample.len() as f64
}

/// `‖x − y‖₂` computed relative to the largest coordinate gap, so squaring
/// cannot overflow while the gaps themselves are finite.
#[inline]
fn euclidean_distance(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
    let scale = x.iter().zip(y.iter()).map(|(a, b)| (a - b).abs()).fold(0.0, f64::max);
    if scale == 0.0 || !scale.is_finite() {
        return scale;
    }
    let sum: f64 = x
        .iter()
        .zip(y.iter())
        .map(|(a, b)| {
            let t = (a - b) / scale;
            t * t
        })
        .sum();
    scale * sum.sqrt()
}

/// Ball-ratio estimate at a single query point.
///
/// # Errors
/// - `SampleError::DimensionMismatch` if `source`, `target`, and `x`
///   disagree on `d`.
/// - `SampleError::NonFiniteData` if `x` has a NaN/±∞ coordinate.
/// - `SampleError::NegativeRadius` / `NegativeThreshold` for invalid `r`, `α`.
///
/// # Examples
/// ```rust
/// # use ndarray::array;
/// # use rust_density_ratio::data::{Sample, SampleRole};
/// # use rust_density_ratio::ball_ratio::estimate_ratio;
/// let source = Sample::from_values(array![0.0, 0.0, 0.0, 0.0, 0.0], SampleRole::Source)?;
/// let target = Sample::from_values(array![1.0, 1.0, 1.0, 1.0, 1.0], SampleRole::Target)?;
/// let est = estimate_ratio(array![0.0].view(), &target, &source, 0.5, 1.0)?;
/// assert_eq!((est.p_target, est.p_source, est.raw, est.guarded), (0.0, 1.0, 0.0, 0.0));
/// # Ok::<(), rust_density_ratio::data::SampleError>(())
/// ```
pub fn estimate_ratio(
    x: ArrayView1<'_, f64>, target: &Sample, source: &Sample, radius: f64, threshold: f64,
) -> SampleResult<BallRatio> {
    check_inputs(target, source, radius, threshold)?;
    ensure_query(x, source.dim())?;
    Ok(ratio_unchecked(x, target, source, radius, threshold))
}

/// Ball-ratio estimates for every row of `queries`.
///
/// # Errors
/// Same as [`estimate_ratio`], with `queries` checked once up front.
pub fn estimate_ratios(
    queries: &Sample, target: &Sample, source: &Sample, radius: f64, threshold: f64,
) -> SampleResult<Vec<BallRatio>> {
    check_inputs(target, source, radius, threshold)?;
    ensure_same_dim(source, queries)?;
    Ok(queries.rows().map(|x| ratio_unchecked(x, target, source, radius, threshold)).collect())
}

/// Guarded weights for every row of `queries`: finite, non-negative, and
/// exactly 0 wherever the source mass is below `threshold` or zero.
///
/// # Errors
/// Same as [`estimate_ratios`].
pub fn guarded_weights(
    queries: &Sample, target: &Sample, source: &Sample, radius: f64, threshold: f64,
) -> SampleResult<Array1<f64>> {
    let ratios = estimate_ratios(queries, target, source, radius, threshold)?;
    Ok(ratios.iter().map(|b| b.guarded).collect())
}

// ---- Helper methods ----

fn check_inputs(target: &Sample, source: &Sample, radius: f64, threshold: f64) -> SampleResult<()> {
    ensure_same_dim(source, target)?;
    validate_radius(radius)?;
    validate_threshold(threshold)
}

pub(crate) fn ratio_unchecked(
    x: ArrayView1<'_, f64>, target: &Sample, source: &Sample, radius: f64, threshold: f64,
) -> BallRatio {
    let p_target = ball_mass(target, x, radius);
    let p_source = ball_mass(source, x, radius);
    BallRatio::from_masses(p_target, p_source, threshold)
}
