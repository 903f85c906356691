//! Generation error types.

use foobi_models::TimelineError;
use thiserror::Error;

pub type GenerationResult<T> = Result<T, GenerationError>;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Generation service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Concept {concept_id} has an invalid timeline: {source}")]
    InvalidTimeline {
        concept_id: u32,
        #[source]
        source: TimelineError,
    },

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenerationError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::ServiceUnavailable(_)
                | GenerationError::Timeout(_)
                | GenerationError::Network(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        assert!(GenerationError::Timeout(5).is_retryable());
        assert!(GenerationError::ServiceUnavailable("down".into()).is_retryable());
        assert!(!GenerationError::InvalidResponse("bad".into()).is_retryable());
        assert!(!GenerationError::InvalidTimeline {
            concept_id: 1,
            source: TimelineError::Empty,
        }
        .is_retryable());
    }
}
