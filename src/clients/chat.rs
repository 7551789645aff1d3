//! Request plumbing shared by providers that speak the `/chat/completions` dialect.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

/// Connection and sampling settings for one chat-completions model.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ChatConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), model: model.into(), max_tokens: 500, temperature: 0.12 }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage; 1],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: String,
}

/// Provider-neutral failure; each client maps it onto its own error type.
#[derive(Debug)]
pub enum ChatFailure {
    Http(String),
    Api(String),
    RateLimit,
    Authentication,
}

/// Send `prompt` as a single user message and return the first reply.
pub(crate) async fn complete(
    http: &Client,
    endpoint: &str,
    config: &ChatConfig,
    prompt: String,
) -> Result<String, ChatFailure> {
    let request = ChatRequest {
        model: &config.model,
        messages: [ChatMessage { role: "user", content: prompt }],
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    };

    let response = http
        .post(endpoint)
        .bearer_auth(&config.api_key)
        .json(&request)
        .send()
        .await
        .map_err(|e| {
            error!(%endpoint, error = %e, "HTTP request failed");
            ChatFailure::Http(e.to_string())
        })?;

    let status = response.status();
    debug!(%endpoint, %status, "Received chat completion response");
    match status {
        StatusCode::TOO_MANY_REQUESTS => {
            warn!(%endpoint, "Rate limit exceeded");
            return Err(ChatFailure::RateLimit);
        }
        StatusCode::UNAUTHORIZED => {
            error!(%endpoint, "Authentication failed");
            return Err(ChatFailure::Authentication);
        }
        s if !s.is_success() => {
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            error!(%endpoint, %status, error = %body, "API error");
            return Err(ChatFailure::Api(body));
        }
        _ => {}
    }

    let parsed: ChatResponse = response.json().await.map_err(|e| ChatFailure::Http(e.to_string()))?;
    parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| ChatFailure::Api("No choices in response".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let config = ChatConfig::new("key", "deepseek-chat");
        let request = ChatRequest {
            model: &config.model,
            messages: [ChatMessage { role: "user", content: "hi".to_string() }],
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["model"], "deepseek-chat");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["max_tokens"], 500);
    }

    #[test]
    fn test_first_choice_is_the_reply() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": "one"}}, {"message": {"content": "two"}}]}"#)
                .unwrap();
        assert_eq!(parsed.choices.into_iter().next().unwrap().message.content, "one");
    }
}
