//! Retrieval-grounded multiple-choice quiz generation.
//!
//! [`generator::QuizGenerator`] builds a deduplicated [`model::QuestionBank`] from a
//! topic, a [`core::ContextRetriever`] and a [`core::GenerativeModel`]. The bank is
//! installed into a [`session::QuizSession`] and paged through with
//! [`session::QuizNavigator`].

pub mod clients;
pub mod config;
pub mod core;
pub mod error;
pub mod generator;
pub mod interceptors;
pub mod json_utils;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod retrieval;
pub mod session;
pub mod validator;

// Convenient re-exports
pub use error::QuizError;
pub use generator::{generate_quiz, GenerationReport, QuizGenerator};
pub use model::{Choice, ChoiceKey, Question, QuestionBank, QuizRequest};
pub use session::{AnswerOutcome, Direction, QuizNavigator, QuizSession};
