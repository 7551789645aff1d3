
use quizzify::clients::mock::MockResponse;
use quizzify::error::{AIError, DeepSeekError, GeminiError, ParseFailure, QuizError, RetrievalError};
use quizzify::generator::{generate_quiz, AttemptOutcome};
use quizzify::model::ChoiceKey;
use quizzify::parser::ParseMode;
use quizzify::retrieval::{DocumentArena, PageRecord};
use quizzify::validator::{Rejection, ValidationPolicy};
use quizzify::QuizGenerator;
use crate::test_utils::{boxed_notes, ok, question_json, rust_notes, scripted_model};

#[tokio::test]
async fn test_generates_requested_count_of_unique_questions() {
    let (model, handle) = scripted_model(vec![
        ok(question_json("Where does Box store data?")),
        ok(question_json("What does ownership guarantee?")),
        ok(question_json("Which trait enables cloning?")),
    ]);

    let bank = QuizGenerator::for_topic("Rust memory", 3, model)
        .unwrap()
        .with_retriever(rust_notes())
        .generate()
        .await
        .unwrap();

    assert_eq!(bank.len(), 3);
    assert_eq!(bank.get(0).unwrap().text, "Where does Box store data?");
    assert_eq!(bank.get(2).unwrap().answer_key, ChoiceKey::B);
    assert_eq!(handle.call_count(), 3);
}

#[tokio::test]
async fn test_prompt_carries_topic_and_retrieved_context() {
    let (model, handle) = scripted_model(vec![ok(question_json("Q1"))]);

    QuizGenerator::for_topic("Rust memory", 1, model)
        .unwrap()
        .with_retriever(rust_notes())
        .generate()
        .await
        .unwrap();

    let prompts = handle.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("subject matter expert on the topic: Rust memory"));
    assert!(prompts[0].contains("Box<T> stores its value on the heap."));
}

#[tokio::test]
async fn test_parse_failures_are_skipped_not_retried() {
    let (model, handle) = scripted_model(vec![
        ok("Sure! Here's a question about Rust."),
        ok("{\"question\": \"unterminated"),
        ok(question_json("Where does Box store data?")),
    ]);

    let report = QuizGenerator::for_topic("Rust", 3, model)
        .unwrap()
        .with_retriever(rust_notes())
        .generate_with_report()
        .await
        .unwrap();

    assert_eq!(report.bank.len(), 1);
    assert_eq!(report.parse_failures(), 2);
    assert_eq!(report.accepted(), 1);
    assert_eq!(report.events.len(), 3);
    assert!(matches!(report.events[0].outcome, AttemptOutcome::ParseFailed(ParseFailure::Malformed(_))));
    assert_eq!(report.events[2].attempt, 2);
    assert_eq!(handle.call_count(), 3);
}

#[tokio::test]
async fn test_duplicate_question_text_is_rejected() {
    let (model, _handle) = scripted_model(vec![
        ok(question_json("What is a lifetime?")),
        ok(question_json("What is a lifetime?")),
    ]);

    let report = QuizGenerator::for_topic("Rust", 2, model)
        .unwrap()
        .with_retriever(rust_notes())
        .generate_with_report()
        .await
        .unwrap();

    assert_eq!(report.bank.len(), 1);
    assert_eq!(report.events[1].outcome, AttemptOutcome::Rejected(Rejection::Duplicate));
}

#[tokio::test]
async fn test_missing_fields_and_null_question() {
    let (model, _handle) = scripted_model(vec![
        ok(r#"{"question": "Q?", "choices": [], "answer": "A"}"#),
        ok(r#"{"question": null, "choices": [], "answer": "A", "explanation": "e"}"#),
    ]);

    let report = QuizGenerator::for_topic("Rust", 2, model)
        .unwrap()
        .with_retriever(rust_notes())
        .generate_with_report()
        .await
        .unwrap();

    assert!(report.bank.is_empty());
    assert!(matches!(report.events[0].outcome, AttemptOutcome::ParseFailed(ParseFailure::SchemaInvalid(_))));
    assert_eq!(report.events[1].outcome, AttemptOutcome::Rejected(Rejection::MissingQuestion));
}

#[tokio::test]
async fn test_count_above_limit_fails_before_any_call() {
    let (model, handle) = scripted_model(vec![ok(question_json("Q1"))]);

    let result = generate_quiz("Rust", 11, boxed_notes(), model).await;

    assert!(matches!(result, Err(QuizError::Configuration(_))));
    assert_eq!(handle.call_count(), 0);
}

#[tokio::test]
async fn test_empty_topic_is_input_error() {
    let (model, _handle) = scripted_model(vec![]);
    let result = generate_quiz("   ", 2, boxed_notes(), model).await;
    assert!(matches!(result, Err(QuizError::ValidationInput(_))));
}

#[tokio::test]
async fn test_missing_retriever_is_configuration_error() {
    let (model, handle) = scripted_model(vec![ok(question_json("Q1"))]);

    let result = generate_quiz("Rust", 1, None, model).await;

    assert!(matches!(result, Err(QuizError::Configuration(_))));
    assert_eq!(handle.call_count(), 0);
}

#[tokio::test]
async fn test_transient_model_failure_skips_attempt() {
    let (model, _handle) = scripted_model(vec![
        MockResponse::Failure(AIError::DeepSeek(DeepSeekError::RateLimit)),
        ok(question_json("Q2")),
    ]);

    let report = QuizGenerator::for_topic("Rust", 2, model)
        .unwrap()
        .with_retriever(rust_notes())
        .generate_with_report()
        .await
        .unwrap();

    assert_eq!(report.bank.len(), 1);
    assert_eq!(report.model_failures(), 1);
}

#[tokio::test]
async fn test_authentication_failure_aborts_run() {
    let (model, handle) = scripted_model(vec![
        MockResponse::Failure(AIError::Gemini(GeminiError::Authentication)),
        ok(question_json("Q2")),
    ]);

    let result = QuizGenerator::for_topic("Rust", 2, model)
        .unwrap()
        .with_retriever(rust_notes())
        .generate()
        .await;

    assert!(matches!(result, Err(QuizError::ModelInvocation(_))));
    assert_eq!(handle.call_count(), 1);
}

#[tokio::test]
async fn test_retrieval_failure_aborts_run() {
    let (model, handle) = scripted_model(vec![ok(question_json("Q1"))]);

    let result = QuizGenerator::for_topic("Rust", 1, model)
        .unwrap()
        .with_retriever(DocumentArena::new().retriever(4))
        .generate()
        .await;

    assert!(matches!(result, Err(QuizError::Retrieval(RetrievalError::EmptyIndex))));
    assert_eq!(handle.call_count(), 0);
}

#[tokio::test]
async fn test_arena_retriever_feeds_generation() {
    let mut arena = DocumentArena::new();
    arena.add_pages([
        PageRecord { source: "bio.txt".into(), page_number: 1, content: "Mitochondria produce ATP.".into() },
        PageRecord { source: "rust.txt".into(), page_number: 1, content: "Lifetimes bound how long references live.".into() },
    ]);
    let (model, handle) = scripted_model(vec![ok(question_json("What do lifetimes bound?"))]);

    let bank = QuizGenerator::for_topic("lifetimes references", 1, model)
        .unwrap()
        .with_retriever(arena.retriever(1))
        .generate()
        .await
        .unwrap();

    assert_eq!(bank.len(), 1);
    let prompt = &handle.prompts()[0];
    assert!(prompt.contains("Lifetimes bound how long references live."));
    assert!(!prompt.contains("Mitochondria"));
}

#[tokio::test]
async fn test_lenient_mode_and_strict_validation() {
    let fenced = format!("Here is your question:\n```json\n{}\n```", question_json("Q1"));
    let three_choices = r#"{"question": "Q2", "choices": [{"key": "A", "value": "x"}], "answer": "A", "explanation": "e"}"#;
    let (model, _handle) = scripted_model(vec![ok(fenced), ok(three_choices)]);

    let report = QuizGenerator::for_topic("Rust", 2, model)
        .unwrap()
        .with_retriever(rust_notes())
        .with_parse_mode(ParseMode::Lenient)
        .with_validation_policy(ValidationPolicy::Strict)
        .generate_with_report()
        .await
        .unwrap();

    assert_eq!(report.bank.len(), 1);
    assert_eq!(report.events[1].outcome, AttemptOutcome::Rejected(Rejection::MalformedChoices));
}

#[tokio::test]
async fn test_bank_never_exceeds_request_and_stays_unique() {
    for count in 1..=10 {
        let responses = (0..count).map(|i| ok(question_json(&format!("Q{}", i % 3)))).collect();
        let (model, _handle) = scripted_model(responses);

        let bank = generate_quiz("Rust", count, boxed_notes(), model).await.unwrap();

        assert!(bank.len() <= count);
        assert_eq!(bank.len(), count.min(3));
        let mut texts: Vec<&str> = bank.iter().map(|q| q.text.as_str()).collect();
        texts.sort();
        texts.dedup();
        assert_eq!(texts.len(), bank.len());
    }
}
