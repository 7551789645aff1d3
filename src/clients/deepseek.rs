use super::chat::{self, ChatConfig, ChatFailure};
use crate::config::KeyFromEnv;
use crate::core::GenerativeModel;
use crate::error::{AIError, DeepSeekError, QuizError};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, instrument};

const ENDPOINT: &str = "https://api.deepseek.com/v1/chat/completions";
pub const DEEPSEEK_DEFAULT_MODEL: &str = "deepseek-chat";

impl From<ChatFailure> for DeepSeekError {
    fn from(failure: ChatFailure) -> Self {
        match failure {
            ChatFailure::Http(msg) => DeepSeekError::Http(msg),
            ChatFailure::Api(msg) => DeepSeekError::Api(msg),
            ChatFailure::RateLimit => DeepSeekError::RateLimit,
            ChatFailure::Authentication => DeepSeekError::Authentication,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DeepSeekClient {
    config: ChatConfig,
    http: Client,
}

impl KeyFromEnv for DeepSeekClient {
    const KEY_NAME: &'static str = "DEEPSEEK_API_KEY";
}

impl DeepSeekClient {
    pub fn new(config: ChatConfig) -> Self {
        info!(model = %config.model, "Creating new DeepSeek client");
        Self { config, http: Client::new() }
    }

    pub fn from_env() -> Result<Self, QuizError> {
        Ok(Self::new(ChatConfig::new(Self::require_key()?, DEEPSEEK_DEFAULT_MODEL)))
    }
}

#[async_trait]
impl GenerativeModel for DeepSeekClient {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len(), model = %self.config.model))]
    async fn invoke(&self, prompt: String) -> Result<String, AIError> {
        chat::complete(&self.http, ENDPOINT, &self.config, prompt)
            .await
            .map_err(|failure| AIError::DeepSeek(failure.into()))
    }

    fn clone_box(&self) -> Box<dyn GenerativeModel> {
        Box::new(self.clone())
    }
}
