//! Boundary traits the quiz core talks through.
//!
//! The generator never knows which model or index sits behind these seams:
//! - `GenerativeModel` turns a rendered prompt into raw response text
//! - `ContextRetriever` turns a topic into ranked context passages

use crate::error::{AIError, RetrievalError};
use async_trait::async_trait;
use std::fmt::Debug;

/// Generative model abstraction.
///
/// Implementors provide `invoke`, which executes a prompt and returns the full
/// response text. Parsing and validation happen in the generator.
#[async_trait]
pub trait GenerativeModel: Send + Sync + Debug {
    /// The only method that implementations must provide
    async fn invoke(&self, prompt: String) -> Result<String, AIError>;

    /// Clone this model into a boxed trait object
    fn clone_box(&self) -> Box<dyn GenerativeModel>;
}

impl Clone for Box<dyn GenerativeModel> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[async_trait]
impl GenerativeModel for Box<dyn GenerativeModel> {
    async fn invoke(&self, prompt: String) -> Result<String, AIError> {
        self.as_ref().invoke(prompt).await
    }

    fn clone_box(&self) -> Box<dyn GenerativeModel> {
        self.as_ref().clone_box()
    }
}

/// Source of context passages for a topic, most relevant first.
///
/// Must be safe to call once per generation attempt.
#[async_trait]
pub trait ContextRetriever: Send + Sync + Debug {
    async fn retrieve(&self, topic: &str) -> Result<Vec<String>, RetrievalError>;

    fn clone_box(&self) -> Box<dyn ContextRetriever>;
}

impl Clone for Box<dyn ContextRetriever> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[async_trait]
impl ContextRetriever for Box<dyn ContextRetriever> {
    async fn retrieve(&self, topic: &str) -> Result<Vec<String>, RetrievalError> {
        self.as_ref().retrieve(topic).await
    }

    fn clone_box(&self) -> Box<dyn ContextRetriever> {
        self.as_ref().clone_box()
    }
}
