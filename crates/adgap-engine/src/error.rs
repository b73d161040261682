use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(
        "invalid competitor set: expected 1 subject and 5 competitors, \
         got {subjects} subject(s) and {competitors} competitor(s)"
    )]
    InvalidCompetitorSet { subjects: usize, competitors: usize },

    #[error("no ads retrieved for subject brand '{brand}'")]
    NoSubjectAds { brand: String },

    #[error("retrieval failed for {brand}: {reason}")]
    Retrieval { brand: String, reason: String },

    #[error("classification error: {0}")]
    Classification(String),

    #[error("recommendation error: {0}")]
    Recommendation(String),

    #[error("text generation error: {0}")]
    Generation(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{operation} timed out after {secs}s")]
    Timeout { operation: &'static str, secs: u64 },

    #[error("persistence error: {0}")]
    Persistence(String),
}

impl EngineError {
    /// Deadline expiry for `operation` after `limit`.
    #[must_use]
    pub fn timeout(operation: &'static str, limit: Duration) -> Self {
        EngineError::Timeout {
            operation,
            secs: limit.as_secs(),
        }
    }

    /// `true` for caller mistakes, as opposed to downstream service failures.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, EngineError::InvalidCompetitorSet { .. })
    }
}
