//! ball_ratio::model — fit/predict wrapper around the ball-ratio estimator.
//!
//! `fit` stores both samples and resolves the radius/threshold rules against
//! their sizes; `predict` runs the guarded estimate at every query row.
use crate::{
    ball_ratio::{
        estimate::{ratio_unchecked, BallRatio},
        rules::{RadiusRule, ThresholdRule},
    },
    data::{
        errors::SampleResult,
        sample::Sample,
        validation::ensure_same_dim,
    },
    estimator::{DensityRatioModel, RatioError, RatioResult},
};
use ndarray::Array1;

/// Ball-ratio estimator with configurable radius and threshold rules.
#[derive(Debug, Clone, PartialEq)]
pub struct BallRatioEstimator {
    pub radius_rule: RadiusRule,
    pub threshold_rule: ThresholdRule,
    fitted: Option<FittedBall>,
}

/// Samples and resolved knobs stored by [`BallRatioEstimator::fit`].
#[derive(Debug, Clone, PartialEq)]
pub struct FittedBall {
    pub source: Sample,
    pub target: Sample,
    pub radius: f64,
    pub threshold: f64,
}

/// Per-query records plus how many queries fell outside the source support.
#[derive(Debug, Clone, PartialEq)]
pub struct BallPrediction {
    pub ratios: Vec<BallRatio>,
    pub degenerate_count: usize,
}

impl BallPrediction {
    /// Guarded weights, one per query.
    pub fn weights(&self) -> Array1<f64> {
        self.ratios.iter().map(|b| b.guarded).collect()
    }
}

impl Default for BallRatioEstimator {
    fn default() -> Self {
        Self {
            radius_rule: RadiusRule::default(),
            threshold_rule: ThresholdRule::default(),
            fitted: None,
        }
    }
}

impl BallRatioEstimator {
    /// # Errors
    /// Any rule-validation error from [`RadiusRule::validate`] or
    /// [`ThresholdRule::validate`].
    pub fn new(radius_rule: RadiusRule, threshold_rule: ThresholdRule) -> SampleResult<Self> {
        radius_rule.validate()?;
        threshold_rule.validate()?;
        Ok(Self { radius_rule, threshold_rule, fitted: None })
    }

    pub fn fitted(&self) -> Option<&FittedBall> {
        self.fitted.as_ref()
    }

    /// Full per-query records, including raw ratios and the degenerate count.
    ///
    /// # Errors
    /// - `RatioError::ModelNotFitted` before `fit`.
    /// - `RatioError::Sample(DimensionMismatch)` for queries of the wrong `d`.
    pub fn predict_detailed(&self, queries: &Sample) -> RatioResult<BallPrediction> {
        let fit = self.fitted.as_ref().ok_or(RatioError::ModelNotFitted)?;
        ensure_same_dim(&fit.source, queries)?;
        let ratios: Vec<BallRatio> = queries
            .rows()
            .map(|x| ratio_unchecked(x, &fit.target, &fit.source, fit.radius, fit.threshold))
            .collect();
        let degenerate_count = ratios.iter().filter(|b| b.is_degenerate()).count();
        Ok(BallPrediction { ratios, degenerate_count })
    }
}

impl DensityRatioModel for BallRatioEstimator {
    fn fit(&mut self, source: &Sample, target: &Sample) -> RatioResult<()> {
        ensure_same_dim(source, target)?;
        let radius = self.radius_rule.resolve(target.len(), source.len(), source.dim())?;
        let threshold = self.threshold_rule.resolve(target.len())?;
        self.fitted =
            Some(FittedBall { source: source.clone(), target: target.clone(), radius, threshold });
        Ok(())
    }

    fn predict(&self, queries: &Sample) -> RatioResult<Array1<f64>> {
        Ok(self.predict_detailed(queries)?.weights())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SampleError, SampleRole};
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The fit/predict contract (not-fitted error, resolved knobs).
    // - Degenerate-query counting in `predict_detailed`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // `predict` before `fit` is an explicit error.
    //
    // Given
    // -----
    // - A default estimator and a one-point query sample.
    //
    // Expect
    // ------
    // - `RatioError::ModelNotFitted`.
    fn predict_before_fit_errors() {
        let est = BallRatioEstimator::default();
        let q = Sample::from_values(array![0.0], SampleRole::Query).expect("valid");
        assert_eq!(est.predict(&q), Err(RatioError::ModelNotFitted));
    }

    #[test]
    // Purpose
    // -------
    // Fixed rules pass through and degenerate queries are counted.
    //
    // Given
    // -----
    // - Source {0, 0.1}, target {0, 5}, r = 0.5, α = 0; queries {0, 5}.
    //
    // Expect
    // ------
    // - Query 0: raw = 0.5/1 = 0.5. Query 5: degenerate, weight 0.
    // - degenerate_count == 1.
    fn predict_detailed_counts_degenerate_queries() {
        // Arrange
        let source = Sample::from_values(array![0.0, 0.1], SampleRole::Source).expect("valid");
        let target = Sample::from_values(array![0.0, 5.0], SampleRole::Target).expect("valid");
        let queries = Sample::from_values(array![0.0, 5.0], SampleRole::Query).expect("valid");
        let mut est =
            BallRatioEstimator::new(RadiusRule::Fixed(0.5), ThresholdRule::Fixed(0.0))
                .expect("valid rules");

        // Act
        est.fit(&source, &target).expect("fit");
        let pred = est.predict_detailed(&queries).expect("predict");

        // Assert
        assert_eq!(est.fitted().map(|f| f.radius), Some(0.5));
        assert_eq!(pred.ratios[0].raw, 0.5);
        assert_eq!(pred.degenerate_count, 1);
        assert_eq!(pred.weights(), array![0.5, 0.0]);
    }

    #[test]
    // Purpose
    // -------
    // Mismatched dimensions are rejected at `fit`.
    //
    // Given
    // -----
    // - A 1-d source and a 2-d target.
    //
    // Expect
    // ------
    // - `RatioError::Sample(DimensionMismatch)`.
    fn fit_rejects_dimension_mismatch() {
        let source = Sample::from_values(array![0.0], SampleRole::Source).expect("valid");
        let target = Sample::new(array![[0.0, 1.0]], SampleRole::Target).expect("valid");
        let mut est = BallRatioEstimator::default();
        assert!(matches!(
            est.fit(&source, &target),
            Err(RatioError::Sample(SampleError::DimensionMismatch { .. }))
        ));
    }
}
