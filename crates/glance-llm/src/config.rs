use serde::{Deserialize, Serialize};

/// Default chat model used for summaries and follow-up answers
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Configuration for the OpenAI provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub api_key: String,
    /// Base URL for OpenAI API (optional, defaults to https://api.openai.com/v1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Base URL without a trailing slash
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(OPENAI_API_BASE)
            .trim_end_matches('/')
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        let config = OpenAIConfig::new("test-key");
        assert_eq!(config.resolved_base_url(), "https://api.openai.com/v1");
    }

    #[test]
    fn test_custom_base_url_trims_slash() {
        let config = OpenAIConfig::new("test-key").with_base_url("http://localhost:1234/v1/");
        assert_eq!(config.resolved_base_url(), "http://localhost:1234/v1");
    }

    #[test]
    fn test_serde_skips_missing_base_url() {
        let config = OpenAIConfig::new("test-key");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("base_url"));

        let back: OpenAIConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.api_key, "test-key");
        assert!(back.base_url.is_none());
    }
}
