use glance_llm::LlmError;
use glance_persist::PersistError;
use glance_source::SourceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlanceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// An integration needed by the request has no credentials
    #[error("{0} is not configured")]
    UpstreamConfig(&'static str),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Storage error: {0}")]
    Storage(#[from] PersistError),
}

impl From<SourceError> for GlanceError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::NotFound(handle) => Self::NotFound(format!("User @{} not found", handle)),
            SourceError::RateLimited => Self::RateLimited("X API".to_string()),
            other => Self::Upstream(other.to_string()),
        }
    }
}

impl From<LlmError> for GlanceError {
    fn from(err: LlmError) -> Self {
        if err.is_rate_limited() {
            Self::RateLimited("OpenAI".to_string())
        } else {
            Self::Upstream(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, GlanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_errors_map_by_kind() {
        let err: GlanceError = SourceError::NotFound("ghost".to_string()).into();
        assert!(matches!(err, GlanceError::NotFound(ref msg) if msg.contains("@ghost")));

        let err: GlanceError = SourceError::RateLimited.into();
        assert!(matches!(err, GlanceError::RateLimited(_)));

        let err: GlanceError = SourceError::Api { status: 503, body: "down".to_string() }.into();
        assert!(matches!(err, GlanceError::Upstream(_)));
    }

    #[test]
    fn test_llm_errors_map_by_kind() {
        let err: GlanceError = LlmError::RateLimited("slow down".to_string()).into();
        assert!(matches!(err, GlanceError::RateLimited(_)));

        let err: GlanceError = LlmError::EmptyResponse.into();
        assert!(matches!(err, GlanceError::Upstream(_)));
    }
}
