use crate::model::{Candidate, ChoiceKey, QuestionBank};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// Question text must be present and not already in the bank.
    #[default]
    Presence,
    /// Additionally require four distinct choice keys and an answer among them.
    Strict,
}

impl ValidationPolicy {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "presence" => Ok(Self::Presence),
            "strict" => Ok(Self::Strict),
            _ => Err(format!("Unknown validation policy: '{}'. Supported: presence, strict", s)),
        }
    }
}

/// Why a candidate was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingQuestion,
    Duplicate,
    MalformedChoices,
}

#[derive(Debug, Clone, Default)]
pub struct QuestionValidator {
    policy: ValidationPolicy,
}

impl QuestionValidator {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub fn validate(&self, candidate: &Candidate, existing: &QuestionBank) -> bool {
        self.check(candidate, existing).is_ok()
    }

    pub fn check(&self, candidate: &Candidate, existing: &QuestionBank) -> Result<(), Rejection> {
        let text = candidate.question_text().ok_or(Rejection::MissingQuestion)?;

        if existing.contains_text(text) {
            return Err(Rejection::Duplicate);
        }

        if self.policy == ValidationPolicy::Strict && !has_well_formed_choices(candidate) {
            return Err(Rejection::MalformedChoices);
        }

        Ok(())
    }
}

fn has_well_formed_choices(candidate: &Candidate) -> bool {
    let keys: HashSet<ChoiceKey> = candidate.choices.iter().map(|c| c.key).collect();
    candidate.choices.len() == ChoiceKey::ALL.len()
        && keys.len() == ChoiceKey::ALL.len()
        && keys.contains(&candidate.answer)
}
