//! HTTP-based `SafetyScorer` backed by a route safety prediction service.
//!
//! This module provides [`HttpSafetyScorer`], an implementation of the
//! [`SafetyScorer`] trait that posts a route's feature matrix to a
//! prediction service and reads one aggregate from the reply.
//!
//! # Architecture
//!
//! The [`SafetyScorer`] trait is synchronous so that the engine stays
//! embeddable in synchronous contexts. This scorer bridges the async HTTP
//! call to the sync interface by blocking on a Tokio runtime internally.

use std::time::Duration;

use kerbside_core::safety::{FeatureMatrix, SafetyScoreError, SafetyScorer};
use log::debug;
use reqwest::Client;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use super::response::{PredictionRequest, PredictionResponse, ResponseField};

/// Error type for [`HttpSafetyScorer`] construction failures.
#[derive(Debug, Error)]
pub enum ScorerBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Default user agent for prediction requests.
pub const DEFAULT_USER_AGENT: &str = "kerbside-scoring/0.1";

/// Default base URL of the prediction service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Path of the prediction endpoint below the base URL.
const PREDICT_PATH: &str = "predict_route_safety";

/// Configuration for [`HttpSafetyScorer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSafetyScorerConfig {
    /// Base URL for the prediction service (e.g., `"http://localhost:8000"`).
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Aggregate reported as the route's score.
    pub response_field: ResponseField,
}

impl Default for HttpSafetyScorerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            response_field: ResponseField::default(),
        }
    }
}

impl HttpSafetyScorerConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Choose which aggregate of the response is reported.
    #[must_use]
    pub const fn with_response_field(mut self, field: ResponseField) -> Self {
        self.response_field = field;
        self
    }
}

/// HTTP-based safety scorer.
///
/// The scorer owns a Tokio runtime that is reused across calls. When called
/// from within an existing multi-threaded Tokio runtime it uses that
/// runtime's handle with [`tokio::task::block_in_place`] instead, avoiding
/// nested runtime panics. From a `current_thread` runtime it falls back to
/// its own runtime.
///
/// Reported scores are rounded to two decimal places.
pub struct HttpSafetyScorer {
    client: Client,
    config: HttpSafetyScorerConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpSafetyScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSafetyScorer")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpSafetyScorer {
    /// Create a scorer with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ScorerBuildError> {
        Self::with_config(HttpSafetyScorerConfig::new(base_url))
    }

    /// Create a scorer with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: HttpSafetyScorerConfig) -> Result<Self, ScorerBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ScorerBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ScorerBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// The configuration the scorer was built with.
    #[must_use]
    pub const fn config(&self) -> &HttpSafetyScorerConfig {
        &self.config
    }

    fn predict_url(&self) -> String {
        format!(
            "{}/{PREDICT_PATH}",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn fetch_score_async(
        &self,
        matrix: &FeatureMatrix,
        is_night: bool,
    ) -> Result<f64, SafetyScoreError> {
        let url = self.predict_url();
        let body = PredictionRequest {
            data: matrix,
            is_night,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        let prediction: PredictionResponse =
            response
                .json()
                .await
                .map_err(|err| SafetyScoreError::ParseError {
                    message: err.to_string(),
                })?;

        self.convert_response(&prediction)
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> SafetyScoreError {
        if error.is_timeout() {
            return SafetyScoreError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return SafetyScoreError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        SafetyScoreError::NetworkError {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }

    fn convert_response(&self, response: &PredictionResponse) -> Result<f64, SafetyScoreError> {
        let value = response.select(self.config.response_field)?;
        debug!("{} = {value}", self.config.response_field);
        Ok(round_to_hundredths(value))
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "scores are presented with two decimal places"
)]
fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl SafetyScorer for HttpSafetyScorer {
    /// Post the matrix and read the configured aggregate.
    ///
    /// # Runtime requirements
    ///
    /// When called from within an existing Tokio runtime, the runtime must be
    /// multi-threaded. From a `current_thread` runtime the scorer blocks on
    /// its own runtime, which may stall the caller's runtime.
    fn score_route(&self, matrix: &FeatureMatrix, is_night: bool) -> Result<f64, SafetyScoreError> {
        if matrix.is_empty() {
            return Err(SafetyScoreError::EmptyMatrix);
        }

        let future = self.fetch_score_async(matrix, is_night);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}
