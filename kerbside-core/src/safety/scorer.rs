use log::{debug, warn};
use serde::Serialize;

use super::{FeatureMatrix, SafetyScoreError, feature_matrix};
use crate::RouteAnalysis;

/// Score reported when the remote model cannot be consulted.
pub const FALLBACK_MODEL_SCORE: f64 = 0.0;

/// Produce a model-based safety score for a route's feature matrix.
///
/// Implementations must be thread-safe (`Send` + `Sync`) so routes can be
/// scored from worker threads. The night flag is supplied by the caller;
/// scorers never read the clock.
///
/// # Examples
///
/// ```
/// use kerbside_core::safety::{FeatureMatrix, SafetyScoreError, SafetyScorer};
///
/// struct RowCount;
///
/// impl SafetyScorer for RowCount {
///     fn score_route(&self, matrix: &FeatureMatrix, _is_night: bool) -> Result<f64, SafetyScoreError> {
///         if matrix.is_empty() {
///             return Err(SafetyScoreError::EmptyMatrix);
///         }
///         Ok(f64::from(u32::try_from(matrix.len()).unwrap_or(u32::MAX)))
///     }
/// }
///
/// assert_eq!(RowCount.score_route(&vec![vec![1.0]], false), Ok(1.0));
/// ```
pub trait SafetyScorer: Send + Sync {
    /// Score `matrix`, one row per complete route point.
    ///
    /// # Errors
    ///
    /// Returns [`SafetyScoreError`] when the matrix is empty or the model
    /// cannot be reached or understood.
    fn score_route(&self, matrix: &FeatureMatrix, is_night: bool) -> Result<f64, SafetyScoreError>;
}

/// A model score, marking whether the model actually produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "source", content = "value", rename_all = "lowercase")]
pub enum ModelScore {
    /// Value returned by the scorer.
    Scored(f64),
    /// Fallback used because the scorer could not produce a value.
    Fallback(f64),
}

impl ModelScore {
    /// The numeric score, whatever its source.
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Scored(value) | Self::Fallback(value) => value,
        }
    }

    /// Report whether the value is a fallback.
    #[must_use]
    pub const fn is_fallback(self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Consult `scorer`, degrading every failure to [`FALLBACK_MODEL_SCORE`].
///
/// An empty matrix falls back without calling the scorer. Failures are
/// logged so fallbacks can be told apart from genuine zero scores.
///
/// # Examples
/// ```
/// use kerbside_core::safety::{ModelScore, model_score_or_fallback};
/// use kerbside_core::test_support::FailingSafetyScorer;
///
/// let score = model_score_or_fallback(&FailingSafetyScorer, &vec![vec![1.0]], true);
/// assert_eq!(score, ModelScore::Fallback(0.0));
/// ```
pub fn model_score_or_fallback(
    scorer: &dyn SafetyScorer,
    matrix: &FeatureMatrix,
    is_night: bool,
) -> ModelScore {
    if matrix.is_empty() {
        debug!("no complete feature rows; using fallback model score");
        return ModelScore::Fallback(FALLBACK_MODEL_SCORE);
    }
    match scorer.score_route(matrix, is_night) {
        Ok(value) if value.is_finite() => ModelScore::Scored(value),
        Ok(value) => {
            warn!("safety scorer returned non-finite value {value}; using fallback");
            ModelScore::Fallback(FALLBACK_MODEL_SCORE)
        }
        Err(err) => {
            warn!("safety scorer failed: {err}; using fallback");
            ModelScore::Fallback(FALLBACK_MODEL_SCORE)
        }
    }
}

/// Attach a model score to every analysis without changing its rule score
/// or ranking.
pub fn attach_model_scores(analyses: &mut [RouteAnalysis], scorer: &dyn SafetyScorer, is_night: bool) {
    for analysis in analyses {
        let matrix = feature_matrix(&analysis.point_attributes, is_night);
        analysis.model_score = Some(model_score_or_fallback(scorer, &matrix, is_night));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingSafetyScorer, FixedSafetyScorer};
    use crate::{PointAttributes, Route};
    use rstest::rstest;

    fn complete_point() -> PointAttributes {
        PointAttributes {
            sidewalk_width_ft: Some(6.0),
            sidewalk_slope_pct: Some(1.0),
            damage_ratio: Some(0.0),
            has_sidewalk_coverage: true,
            ..PointAttributes::default()
        }
    }

    #[rstest]
    fn successful_scores_are_marked_scored() {
        let score = model_score_or_fallback(&FixedSafetyScorer::new(0.0), &vec![vec![1.0]], false);
        assert_eq!(score, ModelScore::Scored(0.0));
        assert!(!score.is_fallback());
    }

    #[rstest]
    fn empty_matrix_falls_back_without_calling_scorer() {
        let scorer = FixedSafetyScorer::new(3.0);
        let score = model_score_or_fallback(&scorer, &Vec::new(), false);
        assert_eq!(score, ModelScore::Fallback(FALLBACK_MODEL_SCORE));
        assert_eq!(scorer.calls(), 0);
    }

    #[rstest]
    fn non_finite_scores_fall_back() {
        let score = model_score_or_fallback(&FixedSafetyScorer::new(f64::NAN), &vec![vec![1.0]], false);
        assert!(score.is_fallback());
    }

    #[rstest]
    fn attach_leaves_rule_scores_untouched() {
        let mut analysis = RouteAnalysis::empty(Route::default());
        analysis.score = 7.0;
        analysis.point_attributes = vec![complete_point(), PointAttributes::default()];
        let mut analyses = vec![analysis, RouteAnalysis::empty(Route::default())];

        attach_model_scores(&mut analyses, &FixedSafetyScorer::new(1.25), true);

        let scores: Vec<_> = analyses.iter().map(|a| (a.score, a.model_score)).collect();
        assert_eq!(
            scores,
            vec![
                (7.0, Some(ModelScore::Scored(1.25))),
                (0.0, Some(ModelScore::Fallback(0.0))),
            ]
        );
    }

    #[rstest]
    fn failing_scorer_degrades_per_route() {
        let mut analysis = RouteAnalysis::empty(Route::default());
        analysis.point_attributes = vec![complete_point()];
        let mut analyses = vec![analysis];
        attach_model_scores(&mut analyses, &FailingSafetyScorer, false);
        assert_eq!(
            analyses.first().and_then(|a| a.model_score),
            Some(ModelScore::Fallback(FALLBACK_MODEL_SCORE))
        );
    }
}
