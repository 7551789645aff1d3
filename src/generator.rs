//! Question-bank generation: retrieve, prompt, invoke, parse, validate.
//!
//! A run performs exactly `requested_count` attempts, one after another. An
//! attempt that yields nothing usable is skipped, never retried, so the bank
//! may come back shorter than requested.

use crate::config::QuizConfig;
use crate::core::{ContextRetriever, GenerativeModel};
use crate::error::{ParseFailure, QuizError};
use crate::interceptors::Interceptor;
use crate::model::{Question, QuestionBank, QuizRequest};
use crate::parser::{ParseMode, ResponseParser};
use crate::prompt::PromptTemplate;
use crate::validator::{QuestionValidator, Rejection, ValidationPolicy};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// What happened to a single generation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Accepted,
    Rejected(Rejection),
    ParseFailed(ParseFailure),
    ModelFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationEvent {
    /// Zero-based attempt index within the run
    pub attempt: usize,
    pub outcome: AttemptOutcome,
}

/// The bank produced by a run plus one event per attempt.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    pub bank: QuestionBank,
    pub events: Vec<GenerationEvent>,
}

impl GenerationReport {
    fn record(&mut self, attempt: usize, outcome: AttemptOutcome) {
        self.events.push(GenerationEvent { attempt, outcome });
    }

    pub fn accepted(&self) -> usize {
        self.count(|o| matches!(o, AttemptOutcome::Accepted))
    }

    pub fn rejected(&self) -> usize {
        self.count(|o| matches!(o, AttemptOutcome::Rejected(_)))
    }

    pub fn parse_failures(&self) -> usize {
        self.count(|o| matches!(o, AttemptOutcome::ParseFailed(_)))
    }

    pub fn model_failures(&self) -> usize {
        self.count(|o| matches!(o, AttemptOutcome::ModelFailed(_)))
    }

    fn count(&self, pred: impl Fn(&AttemptOutcome) -> bool) -> usize {
        self.events.iter().filter(|e| pred(&e.outcome)).count()
    }
}

#[derive(Debug)]
pub struct QuizGenerator<M: GenerativeModel> {
    request: QuizRequest,
    model: M,
    retriever: Option<Box<dyn ContextRetriever>>,
    template: PromptTemplate,
    parser: ResponseParser,
    validator: QuestionValidator,
    interceptor: Option<Arc<dyn Interceptor>>,
}

impl<M: GenerativeModel> QuizGenerator<M> {
    pub fn new(request: QuizRequest, model: M) -> Self {
        info!(topic = %request.topic(), requested = request.requested_count(), "Creating new QuizGenerator");
        Self {
            request,
            model,
            retriever: None,
            template: PromptTemplate::new(),
            parser: ResponseParser::default(),
            validator: QuestionValidator::default(),
            interceptor: None,
        }
    }

    /// Validate `topic`/`requested_count` and build a generator in one step.
    pub fn for_topic(topic: &str, requested_count: usize, model: M) -> Result<Self, QuizError> {
        Ok(Self::new(QuizRequest::new(topic, requested_count)?, model))
    }

    pub fn request(&self) -> &QuizRequest {
        &self.request
    }

    pub fn with_retriever<R: ContextRetriever + 'static>(self, retriever: R) -> Self {
        self.with_boxed_retriever(Box::new(retriever))
    }

    pub fn with_boxed_retriever(mut self, retriever: Box<dyn ContextRetriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    pub fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.parser = ResponseParser::new(mode);
        self
    }

    pub fn with_validation_policy(mut self, policy: ValidationPolicy) -> Self {
        self.validator = QuestionValidator::new(policy);
        self
    }

    pub fn with_schema_guidance(mut self, enabled: bool) -> Self {
        self.template = self.template.with_schema_guidance(enabled);
        self
    }

    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    /// Apply parse, validation, prompt and transcript settings from `config`.
    pub fn configured(self, config: &QuizConfig) -> Self {
        let generator = self
            .with_parse_mode(config.parse_mode)
            .with_validation_policy(config.validation)
            .with_schema_guidance(config.schema_guidance);
        match config.transcript_interceptor() {
            Some(interceptor) => generator.with_interceptor(interceptor),
            None => generator,
        }
    }

    /// Run generation and return only the bank.
    pub async fn generate(&self) -> Result<QuestionBank, QuizError> {
        Ok(self.generate_with_report().await?.bank)
    }

    /// Run generation, keeping the per-attempt event log.
    #[instrument(target = "quizzify::generator", skip(self), fields(topic = %self.request.topic(), requested = self.request.requested_count()))]
    pub async fn generate_with_report(&self) -> Result<GenerationReport, QuizError> {
        let retriever = self.retriever.as_ref().ok_or_else(|| {
            error!(target: "quizzify::generator", "No context retriever configured");
            QuizError::Configuration("no context retriever configured".to_string())
        })?;

        let topic = self.request.topic();
        let mut report = GenerationReport::default();

        for attempt in 0..self.request.requested_count() {
            let passages = retriever.retrieve(topic).await.map_err(|e| {
                error!(target: "quizzify::generator", attempt, error = %e, "Context retrieval failed, aborting run");
                e
            })?;

            let prompt = self.template.render(topic, &passages);

            let raw = match self.model.invoke(prompt.clone()).await {
                Ok(raw) => raw,
                Err(e) if e.is_authentication() => {
                    error!(target: "quizzify::generator", attempt, error = %e, "Model authentication failed, aborting run");
                    return Err(e.into());
                }
                Err(e) => {
                    warn!(target: "quizzify::generator", attempt, error = %e, "Model invocation failed, skipping attempt");
                    report.record(attempt, AttemptOutcome::ModelFailed(e.to_string()));
                    continue;
                }
            };

            if let Some(interceptor) = &self.interceptor {
                if let Err(e) = interceptor.save(attempt, &prompt, &raw).await {
                    warn!(target: "quizzify::generator", attempt, error = %e, "Failed to save transcript");
                }
            }

            let candidate = match self.parser.parse(&raw).into_result() {
                Ok(candidate) => candidate,
                Err(failure) => {
                    warn!(target: "quizzify::generator", attempt, reason = %failure, response = %raw, "Failed to decode question");
                    report.record(attempt, AttemptOutcome::ParseFailed(failure));
                    continue;
                }
            };

            let outcome = match self.validator.check(&candidate, &report.bank) {
                Ok(()) => match Question::from_candidate(candidate) {
                    Some(question) => {
                        if report.bank.insert(question) {
                            AttemptOutcome::Accepted
                        } else {
                            AttemptOutcome::Rejected(Rejection::Duplicate)
                        }
                    }
                    None => AttemptOutcome::Rejected(Rejection::MissingQuestion),
                },
                Err(rejection) => AttemptOutcome::Rejected(rejection),
            };

            match &outcome {
                AttemptOutcome::Accepted => {
                    info!(target: "quizzify::generator", attempt, "Generated unique question")
                }
                AttemptOutcome::Rejected(rejection) => {
                    info!(target: "quizzify::generator", attempt, ?rejection, "Duplicate or invalid question")
                }
                _ => {}
            }
            report.record(attempt, outcome);
        }

        info!(
            target: "quizzify::generator",
            generated = report.bank.len(),
            parse_failures = report.parse_failures(),
            rejected = report.rejected(),
            model_failures = report.model_failures(),
            "Quiz generation completed"
        );
        Ok(report)
    }
}

/// Build a bank for `topic` in one call.
///
/// Fails with `Configuration` before any retrieval or model call when the count
/// is out of range or no retriever is supplied.
pub async fn generate_quiz<M: GenerativeModel>(
    topic: &str,
    requested_count: usize,
    retriever: Option<Box<dyn ContextRetriever>>,
    model: M,
) -> Result<QuestionBank, QuizError> {
    let generator = QuizGenerator::for_topic(topic, requested_count, model)?;
    match retriever {
        Some(retriever) => generator.with_boxed_retriever(retriever).generate().await,
        None => generator.generate().await,
    }
}
