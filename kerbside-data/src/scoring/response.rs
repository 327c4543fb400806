//! Wire types for the route safety prediction service.
//!
//! The service accepts one feature row per route point and answers with
//! several aggregates of the per-point crash probabilities.

use kerbside_core::safety::{FeatureMatrix, SafetyScoreError};
use serde::{Deserialize, Serialize};

/// Request body for `POST /predict_route_safety`.
#[derive(Debug, Serialize)]
pub(super) struct PredictionRequest<'a> {
    /// Feature rows, one per complete route point.
    pub data: &'a FeatureMatrix,
    /// Selects the night model, which expects the lamp column.
    pub is_night: bool,
}

/// Response body from the prediction service.
///
/// Every field is optional on the wire so that a missing aggregate is
/// reported as a malformed response only when it is the one selected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PredictionResponse {
    /// One minus the mean crash probability.
    pub route_safety_score: Option<f64>,
    /// Mean crash probability across rows.
    pub average_crash_probability: Option<f64>,
    /// Sum of crash probabilities across rows.
    pub sum_probability: Option<f64>,
    /// Largest crash probability of any row.
    pub max_prob: Option<f64>,
}

/// Which aggregate of the prediction response is reported as the score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseField {
    /// `route_safety_score`
    RouteSafetyScore,
    /// `average_crash_probability`
    AverageCrashProbability,
    /// `sum_probability`
    #[default]
    SumProbability,
    /// `max_prob`
    #[serde(rename = "max_prob")]
    MaxProbability,
}

impl ResponseField {
    /// Every selectable field.
    pub const ALL: [Self; 4] = [
        Self::RouteSafetyScore,
        Self::AverageCrashProbability,
        Self::SumProbability,
        Self::MaxProbability,
    ];

    /// The JSON key of the field.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::RouteSafetyScore => "route_safety_score",
            Self::AverageCrashProbability => "average_crash_probability",
            Self::SumProbability => "sum_probability",
            Self::MaxProbability => "max_prob",
        }
    }
}

impl std::fmt::Display for ResponseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for ResponseField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.key() == s.trim())
            .ok_or_else(|| format!("unknown response field '{s}'"))
    }
}

impl PredictionResponse {
    /// Read the selected aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`SafetyScoreError::ParseError`] when the field is missing or
    /// not finite.
    pub fn select(&self, field: ResponseField) -> Result<f64, SafetyScoreError> {
        let value = match field {
            ResponseField::RouteSafetyScore => self.route_safety_score,
            ResponseField::AverageCrashProbability => self.average_crash_probability,
            ResponseField::SumProbability => self.sum_probability,
            ResponseField::MaxProbability => self.max_prob,
        };
        value
            .filter(|number| number.is_finite())
            .ok_or_else(|| SafetyScoreError::ParseError {
                message: format!("response has no numeric {field}"),
            })
    }
}
