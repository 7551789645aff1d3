use crate::clients::mock::{MockClient, MockHandle, MockResponse};
use crate::config::KeyFromEnv;
use crate::core::GenerativeModel;
use crate::error::{AIError, QuizError};
use async_trait::async_trait;
use std::sync::Arc;

/// Which hosted model backs a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    #[cfg(feature = "gemini")]
    Gemini,
    #[cfg(feature = "deepseek")]
    DeepSeek,
    #[cfg(feature = "openai")]
    OpenAI,
    /// Scripted in-process model; never detected from keys
    Mock,
}

impl ModelKind {
    /// Parse model kind from string (case insensitive)
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            #[cfg(feature = "gemini")]
            "gemini" => Ok(Self::Gemini),
            #[cfg(feature = "deepseek")]
            "deepseek" => Ok(Self::DeepSeek),
            #[cfg(feature = "openai")]
            "openai" => Ok(Self::OpenAI),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown model: '{}'. Supported: {}", s, Self::supported().join(", "))),
        }
    }

    pub fn supported() -> Vec<&'static str> {
        let mut kinds = Vec::new();
        #[cfg(feature = "gemini")]
        kinds.push("gemini");
        #[cfg(feature = "deepseek")]
        kinds.push("deepseek");
        #[cfg(feature = "openai")]
        kinds.push("openai");
        kinds.push("mock");
        kinds
    }

    /// First provider, in preference order, whose API key is available.
    pub fn detect() -> Option<Self> {
        #[cfg(feature = "gemini")]
        {
            if super::GeminiClient::find_key().is_some() {
                return Some(Self::Gemini);
            }
        }
        #[cfg(feature = "deepseek")]
        {
            if super::DeepSeekClient::find_key().is_some() {
                return Some(Self::DeepSeek);
            }
        }
        #[cfg(feature = "openai")]
        {
            if super::OpenAIClient::find_key().is_some() {
                return Some(Self::OpenAI);
            }
        }
        None
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            #[cfg(feature = "gemini")]
            ModelKind::Gemini => write!(f, "Gemini"),
            #[cfg(feature = "deepseek")]
            ModelKind::DeepSeek => write!(f, "DeepSeek"),
            #[cfg(feature = "openai")]
            ModelKind::OpenAI => write!(f, "OpenAI"),
            ModelKind::Mock => write!(f, "Mock"),
        }
    }
}

/// Model wrapper chosen at runtime
#[derive(Debug, Clone)]
pub struct FlexibleClient {
    inner: Arc<dyn GenerativeModel>,
}

impl FlexibleClient {
    pub fn new(model: Box<dyn GenerativeModel>) -> Self {
        Self { inner: Arc::from(model) }
    }

    /// Build the client for `kind` from environment credentials.
    pub fn from_kind(kind: ModelKind) -> Result<Self, QuizError> {
        let model: Box<dyn GenerativeModel> = match kind {
            #[cfg(feature = "gemini")]
            ModelKind::Gemini => Box::new(super::GeminiClient::from_env()?),
            #[cfg(feature = "deepseek")]
            ModelKind::DeepSeek => Box::new(super::DeepSeekClient::from_env()?),
            #[cfg(feature = "openai")]
            ModelKind::OpenAI => Box::new(super::OpenAIClient::from_env()?),
            ModelKind::Mock => return Ok(Self::mock().0),
        };
        Ok(Self::new(model))
    }

    /// Create a FlexibleClient with a mock and return the handle for configuration
    pub fn mock() -> (Self, Arc<MockHandle>) {
        let (mock_client, handle) = MockClient::new();
        (Self::new(Box::new(mock_client)), handle)
    }

    pub fn mock_with_responses(responses: Vec<MockResponse>) -> (Self, Arc<MockHandle>) {
        let (mock_client, handle) = MockClient::with_responses(responses);
        (Self::new(Box::new(mock_client)), handle)
    }
}

#[async_trait]
impl GenerativeModel for FlexibleClient {
    async fn invoke(&self, prompt: String) -> Result<String, AIError> {
        self.inner.invoke(prompt).await
    }

    fn clone_box(&self) -> Box<dyn GenerativeModel> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_kind_parsing() {
        #[cfg(feature = "gemini")]
        assert_eq!(ModelKind::from_str("GEMINI"), Ok(ModelKind::Gemini));
        #[cfg(feature = "deepseek")]
        assert_eq!(ModelKind::from_str("deepseek"), Ok(ModelKind::DeepSeek));
        assert_eq!(ModelKind::from_str("Mock"), Ok(ModelKind::Mock));
        assert!(ModelKind::from_str("invalid").is_err());
        assert!(ModelKind::supported().contains(&"mock"));
    }

    #[tokio::test]
    async fn test_mock_kind_builds_without_credentials() {
        let client = FlexibleClient::from_kind(ModelKind::Mock).unwrap();
        assert!(matches!(client.invoke("prompt".to_string()).await, Err(AIError::Mock(_))));
    }

    #[tokio::test]
    async fn test_mock_passthrough() {
        let (client, handle) = FlexibleClient::mock_with_responses(vec![MockResponse::Success("ok".to_string())]);
        assert_eq!(client.invoke("prompt".to_string()).await.unwrap(), "ok");
        assert_eq!(handle.call_count(), 1);
    }
}
