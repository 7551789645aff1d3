//! Quiz data model: requests, choices, questions and the deduplicated bank.

use crate::error::QuizError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound on questions per quiz.
pub const MAX_QUESTIONS: usize = 10;

/// A validated request for a quiz on `topic` with `requested_count` questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRequest {
    topic: String,
    requested_count: usize,
}

impl QuizRequest {
    pub fn new(topic: impl Into<String>, requested_count: usize) -> Result<Self, QuizError> {
        let topic = topic.into();
        if requested_count > MAX_QUESTIONS {
            return Err(QuizError::Configuration(format!(
                "number of questions cannot exceed {MAX_QUESTIONS} (got {requested_count})"
            )));
        }
        if requested_count == 0 {
            return Err(QuizError::Configuration("at least one question must be requested".to_string()));
        }
        if topic.trim().is_empty() {
            return Err(QuizError::ValidationInput("quiz topic cannot be empty".to_string()));
        }
        Ok(Self { topic, requested_count })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn requested_count(&self) -> usize {
        self.requested_count
    }
}

/// One of the four answer slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum ChoiceKey {
    A,
    B,
    C,
    D,
}

impl ChoiceKey {
    pub const ALL: [ChoiceKey; 4] = [ChoiceKey::A, ChoiceKey::B, ChoiceKey::C, ChoiceKey::D];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChoiceKey::A => "A",
            ChoiceKey::B => "B",
            ChoiceKey::C => "C",
            ChoiceKey::D => "D",
        }
    }
}

impl fmt::Display for ChoiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts a bare key (`"b"`, `" C "`) or a rendered option such as `"A) Paris"`.
impl FromStr for ChoiceKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let first = chars.next().ok_or_else(|| "empty choice key".to_string())?;
        let rest = chars.as_str();
        if !(rest.is_empty() || rest.starts_with(')') || rest.starts_with('.') || rest.starts_with(':')) {
            return Err(format!("unknown choice key: '{s}'"));
        }
        match first.to_ascii_uppercase() {
            'A' => Ok(ChoiceKey::A),
            'B' => Ok(ChoiceKey::B),
            'C' => Ok(ChoiceKey::C),
            'D' => Ok(ChoiceKey::D),
            _ => Err(format!("unknown choice key: '{s}'")),
        }
    }
}

impl TryFrom<String> for ChoiceKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A keyed answer option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Choice {
    /// One of "A", "B", "C", "D"
    #[schemars(with = "String")]
    pub key: ChoiceKey,
    /// Answer text shown to the user
    pub value: String,
}

impl Choice {
    pub fn new(key: ChoiceKey, value: impl Into<String>) -> Self {
        Self { key, value: value.into() }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}) {}", self.key, self.value)
    }
}

/// A not-yet-validated question decoded from model output.
///
/// Field names follow the JSON object the prompt asks the model to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Quiz Question", description = "A multiple-choice question with four keyed choices")]
pub struct Candidate {
    /// The question text
    pub question: Option<String>,
    /// Four choices keyed A, B, C, D in order
    pub choices: Vec<Choice>,
    /// Key of the correct choice
    #[schemars(with = "String")]
    pub answer: ChoiceKey,
    /// Why the answer is correct
    pub explanation: String,
}

impl Candidate {
    pub fn question_text(&self) -> Option<&str> {
        self.question.as_deref()
    }
}

/// An accepted quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub choices: Vec<Choice>,
    pub answer_key: ChoiceKey,
    pub explanation: String,
}

impl Question {
    /// Promote a candidate; `None` when it carries no question text.
    pub fn from_candidate(candidate: Candidate) -> Option<Self> {
        let Candidate { question, choices, answer, explanation } = candidate;
        Some(Self {
            text: question?,
            choices,
            answer_key: answer,
            explanation,
        })
    }

    pub fn choice(&self, key: ChoiceKey) -> Option<&Choice> {
        self.choices.iter().find(|c| c.key == key)
    }

    /// Options rendered as `"A) text"` in order.
    pub fn rendered_choices(&self) -> Vec<String> {
        self.choices.iter().map(ToString::to_string).collect()
    }
}

/// Ordered questions in generation order, unique by exact question text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-sensitive exact match on question text.
    pub fn contains_text(&self, text: &str) -> bool {
        self.questions.iter().any(|q| q.text == text)
    }

    /// Append `question` unless its text is already present. Returns whether it was added.
    pub fn insert(&mut self, question: Question) -> bool {
        if self.contains_text(&question.text) {
            return false;
        }
        self.questions.push(question);
        true
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn as_slice(&self) -> &[Question] {
        &self.questions
    }
}

impl<'a> IntoIterator for &'a QuestionBank {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}
