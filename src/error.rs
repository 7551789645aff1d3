use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Invalid input: {0}")]
    ValidationInput(String),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseFailure),
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),
    #[error("Model invocation error: {0}")]
    ModelInvocation(#[from] AIError),
    #[error("Question bank is empty")]
    EmptyBank,
}

/// Why a raw model response could not become a candidate question.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("response is not valid JSON: {0}")]
    Malformed(String),
    #[error("response does not match the question schema: {0}")]
    SchemaInvalid(String),
}

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No documents have been ingested")]
    EmptyIndex,
    #[error("Retriever backend error: {0}")]
    Backend(String),
}

#[derive(Error, Debug)]
pub enum AIError {
    #[error("Gemini API error: {0}")]
    Gemini(#[from] GeminiError),
    #[error("OpenAI API error: {0}")]
    OpenAI(#[from] OpenAIError),
    #[error("DeepSeek API error: {0}")]
    DeepSeek(#[from] DeepSeekError),
    #[error("Mock error: {0}")]
    Mock(String),
}

impl AIError {
    /// Authentication failures abort a whole generation run instead of a single attempt.
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            AIError::Gemini(GeminiError::Authentication)
                | AIError::OpenAI(OpenAIError::Authentication)
                | AIError::DeepSeek(DeepSeekError::Authentication)
        )
    }
}

#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Rate limit exceeded")]
    RateLimit,
    #[error("Authentication failed")]
    Authentication,
}

#[derive(Error, Debug)]
pub enum OpenAIError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Rate limit exceeded")]
    RateLimit,
    #[error("Authentication failed")]
    Authentication,
}

#[derive(Error, Debug)]
pub enum DeepSeekError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Rate limit exceeded")]
    RateLimit,
    #[error("Authentication failed")]
    Authentication,
}
