//! Remote route safety scoring over HTTP.
//!
//! This module provides [`HttpSafetyScorer`], an implementation of
//! [`kerbside_core::safety::SafetyScorer`] that posts a route's feature
//! matrix to a prediction service and reports one aggregate of its reply.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use kerbside_core::safety::{ModelScore, model_score_or_fallback};
//! use kerbside_data::scoring::{HttpSafetyScorer, HttpSafetyScorerConfig, ResponseField};
//!
//! let config = HttpSafetyScorerConfig::new("http://localhost:8000")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_response_field(ResponseField::SumProbability);
//! let scorer = HttpSafetyScorer::with_config(config)?;
//!
//! let matrix = vec![vec![25.0, 1.0, 3.0, 0.0, 6.0, 2.0, 0.05, 1.0]];
//! let score = model_score_or_fallback(&scorer, &matrix, false);
//! println!("model score: {}", score.value());
//! # Ok::<(), kerbside_data::scoring::ScorerBuildError>(())
//! ```

mod provider;
mod response;

pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT, HttpSafetyScorer, HttpSafetyScorerConfig,
    ScorerBuildError,
};
pub use response::{PredictionResponse, ResponseField};
