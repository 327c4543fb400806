use thiserror::Error;

/// Errors from [`crate::safety::SafetyScorer::score_route`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SafetyScoreError {
    /// Every row was excluded from the feature matrix.
    ///
    /// Scorers need at least one complete row. Callers usually reach the
    /// scorer through [`crate::safety::model_score_or_fallback`], which
    /// falls back without calling it in this case.
    #[error("feature matrix has no complete rows")]
    EmptyMatrix,
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Endpoint that was called.
        url: String,
        /// Configured timeout in whole seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success status.
    #[error("request to {url} failed with status {status}: {message}")]
    HttpError {
        /// Endpoint that was called.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Description of the failure.
        message: String,
    },
    /// The request failed before a response arrived.
    #[error("request to {url} failed: {message}")]
    NetworkError {
        /// Endpoint that was called.
        url: String,
        /// Description of the failure.
        message: String,
    },
    /// The response body did not have the expected shape.
    #[error("invalid scoring response: {message}")]
    ParseError {
        /// Description of the problem.
        message: String,
    },
}
