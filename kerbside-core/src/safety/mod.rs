//! Optional model-based safety scoring.
//!
//! A remote model scores a route from a numeric feature matrix built from
//! the extracted point attributes. The `SafetyScorer` trait abstracts the
//! model; every failure degrades to a fallback value at the boundary so
//! ranking is never interrupted. The model score is reported next to the
//! rule-based score and never blended into it.

mod error;
mod matrix;
mod scorer;

pub use error::SafetyScoreError;
pub use matrix::{DAY_COLUMNS, FeatureMatrix, NIGHT_COLUMNS, feature_matrix, feature_row};
pub use scorer::{
    FALLBACK_MODEL_SCORE, ModelScore, SafetyScorer, attach_model_scores, model_score_or_fallback,
};
