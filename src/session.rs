//! Interactive quiz state: the installed bank, the current position and the score.
//!
//! A session is "empty" until a bank is installed and "active" afterwards.
//! All position and score mutation goes through [`QuizNavigator`].

use crate::error::QuizError;
use crate::model::{ChoiceKey, Question, QuestionBank};
use crate::retrieval::DocumentArena;
use std::fmt;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn step(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
}

/// One user's quiz state. Owned by the hosting session, never shared across users.
#[derive(Debug, Default)]
pub struct QuizSession {
    bank: Option<QuestionBank>,
    current_index: usize,
    score: u32,
    documents: DocumentArena,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any previous bank and restart at the first question with a zero score.
    pub fn install(&mut self, bank: QuestionBank) {
        info!(target: "quizzify::session", questions = bank.len(), "Installing question bank");
        self.bank = Some(bank);
        self.current_index = 0;
        self.score = 0;
    }

    /// Drop the bank and score; ingested documents are kept.
    pub fn reset(&mut self) {
        self.bank = None;
        self.current_index = 0;
        self.score = 0;
    }

    pub fn is_active(&self) -> bool {
        self.bank.is_some()
    }

    pub fn bank(&self) -> Option<&QuestionBank> {
        self.bank.as_ref()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total(&self) -> usize {
        self.bank.as_ref().map_or(0, QuestionBank::len)
    }

    pub fn documents(&self) -> &DocumentArena {
        &self.documents
    }

    pub fn documents_mut(&mut self) -> &mut DocumentArena {
        &mut self.documents
    }

    pub fn score_card(&self) -> ScoreCard {
        ScoreCard { score: self.score, total: self.total() }
    }
}

/// `Score: x/total`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreCard {
    pub score: u32,
    pub total: usize,
}

impl fmt::Display for ScoreCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Score: {}/{}", self.score, self.total)
    }
}

/// Navigation and scoring over a borrowed session.
///
/// Callers must not run two mutations for the same session concurrently.
#[derive(Debug)]
pub struct QuizNavigator<'a> {
    session: &'a mut QuizSession,
}

impl<'a> QuizNavigator<'a> {
    pub fn new(session: &'a mut QuizSession) -> Self {
        Self { session }
    }

    fn active_bank(&self) -> Result<&QuestionBank, QuizError> {
        match &self.session.bank {
            Some(bank) if !bank.is_empty() => Ok(bank),
            _ => Err(QuizError::EmptyBank),
        }
    }

    pub fn current_index(&self) -> usize {
        self.session.current_index
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn current_question(&self) -> Result<&Question, QuizError> {
        let bank = self.active_bank()?;
        let index = self.session.current_index % bank.len();
        bank.get(index).ok_or(QuizError::EmptyBank)
    }

    /// Move one question forward or back, wrapping at either end.
    pub fn advance(&mut self, direction: Direction) -> Result<usize, QuizError> {
        let total = self.active_bank()?.len() as i64;
        let next = (self.session.current_index as i64 + direction.step()).rem_euclid(total);
        self.session.current_index = next as usize;
        debug!(target: "quizzify::session", ?direction, index = self.session.current_index, "Moved to question");
        Ok(self.session.current_index)
    }

    /// Score `selected` against the current question.
    ///
    /// Every correct submission scores, including repeats for the same question.
    pub fn submit_answer(&mut self, selected: ChoiceKey) -> Result<AnswerOutcome, QuizError> {
        let correct = self.current_question()?.answer_key == selected;
        let outcome = if correct {
            self.session.score += 1;
            AnswerOutcome::Correct
        } else {
            AnswerOutcome::Incorrect
        };
        debug!(target: "quizzify::session", %selected, ?outcome, score = self.session.score, "Answer submitted");
        Ok(outcome)
    }
}
