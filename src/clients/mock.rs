use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{core::GenerativeModel, error::AIError};

/// A scripted reply for [`MockClient`].
#[derive(Debug)]
pub enum MockResponse {
    Success(String),
    Failure(AIError),
}

#[derive(Debug, Default)]
struct MockState {
    responses: VecDeque<MockResponse>,
    prompts: Vec<String>,
}

/// Shared control surface for a [`MockClient`]: queue replies, inspect prompts.
#[derive(Debug, Default)]
pub struct MockHandle {
    state: Mutex<MockState>,
}

impl MockHandle {
    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_response(&self, response: MockResponse) {
        self.state().responses.push_back(response);
    }

    pub fn add_responses(&self, responses: impl IntoIterator<Item = MockResponse>) {
        self.state().responses.extend(responses);
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.state().prompts.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state().prompts.len()
    }

    pub fn remaining(&self) -> usize {
        self.state().responses.len()
    }
}

/// Model that replays queued responses; an empty queue answers with a mock error.
#[derive(Debug, Clone)]
pub struct MockClient {
    handle: Arc<MockHandle>,
}

impl MockClient {
    pub fn new() -> (Self, Arc<MockHandle>) {
        let handle = Arc::new(MockHandle::default());
        (Self { handle: handle.clone() }, handle)
    }

    pub fn with_responses(responses: Vec<MockResponse>) -> (Self, Arc<MockHandle>) {
        let (client, handle) = Self::new();
        handle.add_responses(responses);
        (client, handle)
    }
}

#[async_trait]
impl GenerativeModel for MockClient {
    async fn invoke(&self, prompt: String) -> Result<String, AIError> {
        let next = {
            let mut state = self.handle.state();
            state.prompts.push(prompt);
            state.responses.pop_front()
        };
        match next {
            Some(MockResponse::Success(text)) => Ok(text),
            Some(MockResponse::Failure(error)) => Err(error),
            None => Err(AIError::Mock("no scripted response left".to_string())),
        }
    }

    fn clone_box(&self) -> Box<dyn GenerativeModel> {
        Box::new(self.clone())
    }
}
