//! Turns raw model output into a candidate question.
//!
//! Decoding never raises: callers branch on [`ParseOutcome`].

use crate::error::ParseFailure;
use crate::json_utils::find_json_objects;
use crate::model::Candidate;
use serde_json::Value;
use tracing::{debug, instrument};

/// Fields the model must emit for a response to count as a candidate.
pub const REQUIRED_FIELDS: [&str; 4] = ["question", "choices", "answer", "explanation"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// The entire response must be one JSON object.
    #[default]
    Strict,
    /// Use the first embedded JSON object that decodes as a candidate.
    Lenient,
}

impl ParseMode {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            _ => Err(format!("Unknown parse mode: '{}'. Supported: strict, lenient", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Ok(Candidate),
    ParseFailed(String),
    SchemaInvalid(String),
}

impl ParseOutcome {
    pub fn into_result(self) -> Result<Candidate, ParseFailure> {
        match self {
            ParseOutcome::Ok(candidate) => Ok(candidate),
            ParseOutcome::ParseFailed(reason) => Err(ParseFailure::Malformed(reason)),
            ParseOutcome::SchemaInvalid(reason) => Err(ParseFailure::SchemaInvalid(reason)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResponseParser {
    mode: ParseMode,
}

impl ResponseParser {
    pub fn new(mode: ParseMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    #[instrument(target = "quizzify::parser", skip(self, raw), fields(raw_len = raw.len(), mode = ?self.mode))]
    pub fn parse(&self, raw: &str) -> ParseOutcome {
        match self.mode {
            ParseMode::Strict => decode(raw),
            ParseMode::Lenient => {
                let mut fallback: Option<ParseOutcome> = None;
                for span in find_json_objects(raw) {
                    match decode(span.slice(raw)) {
                        ParseOutcome::Ok(candidate) => return ParseOutcome::Ok(candidate),
                        // Report the closest miss: a schema problem beats a syntax error
                        failure @ ParseOutcome::SchemaInvalid(_)
                            if !matches!(fallback, Some(ParseOutcome::SchemaInvalid(_))) =>
                        {
                            fallback = Some(failure)
                        }
                        failure => {
                            fallback.get_or_insert(failure);
                        }
                    }
                }
                fallback.unwrap_or_else(|| ParseOutcome::ParseFailed("no JSON object found in response".to_string()))
            }
        }
    }
}

fn decode(payload: &str) -> ParseOutcome {
    let value: Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(e) => return ParseOutcome::ParseFailed(e.to_string()),
    };

    let Some(object) = value.as_object() else {
        return ParseOutcome::SchemaInvalid("expected a JSON object".to_string());
    };

    if let Some(missing) = REQUIRED_FIELDS.iter().find(|field| !object.contains_key(**field)) {
        return ParseOutcome::SchemaInvalid(format!("missing field `{}`", missing));
    }

    match serde_json::from_value::<Candidate>(value) {
        Ok(candidate) => {
            debug!(target: "quizzify::parser", choices = candidate.choices.len(), "decoded candidate");
            ParseOutcome::Ok(candidate)
        }
        Err(e) => ParseOutcome::SchemaInvalid(e.to_string()),
    }
}
