use super::chat::{self, ChatConfig, ChatFailure};
use crate::config::KeyFromEnv;
use crate::core::GenerativeModel;
use crate::error::{AIError, OpenAIError, QuizError};
use async_trait::async_trait;
use tracing::instrument;

const ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";

impl From<ChatFailure> for OpenAIError {
    fn from(failure: ChatFailure) -> Self {
        match failure {
            ChatFailure::Http(msg) => OpenAIError::Http(msg),
            ChatFailure::Api(msg) => OpenAIError::Api(msg),
            ChatFailure::RateLimit => OpenAIError::RateLimit,
            ChatFailure::Authentication => OpenAIError::Authentication,
        }
    }
}

#[derive(Clone, Debug)]
pub struct OpenAIClient {
    config: ChatConfig,
    http: reqwest::Client,
}

impl KeyFromEnv for OpenAIClient {
    const KEY_NAME: &'static str = "OPENAI_API_KEY";
}

impl OpenAIClient {
    pub fn new(config: ChatConfig) -> Self {
        Self { config, http: reqwest::Client::new() }
    }

    pub fn from_env() -> Result<Self, QuizError> {
        Ok(Self::new(ChatConfig::new(Self::require_key()?, OPENAI_DEFAULT_MODEL)))
    }
}

#[async_trait]
impl GenerativeModel for OpenAIClient {
    #[instrument(skip(self, prompt), fields(model = %self.config.model))]
    async fn invoke(&self, prompt: String) -> Result<String, AIError> {
        chat::complete(&self.http, ENDPOINT, &self.config, prompt)
            .await
            .map_err(|failure| AIError::OpenAI(failure.into()))
    }

    fn clone_box(&self) -> Box<dyn GenerativeModel> {
        Box::new(self.clone())
    }
}
