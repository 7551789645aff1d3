
use quizzify::error::QuizError;
use quizzify::model::{ChoiceKey, QuestionBank};
use quizzify::{AnswerOutcome, Direction, QuizNavigator, QuizSession};
use crate::test_utils::bank_of;

fn active_session(n: usize) -> QuizSession {
    let mut session = QuizSession::new();
    session.install(bank_of(n));
    session
}

#[test]
fn test_forward_wraps_to_start() {
    let mut session = active_session(3);
    let mut nav = QuizNavigator::new(&mut session);

    assert_eq!(nav.advance(Direction::Forward).unwrap(), 1);
    assert_eq!(nav.advance(Direction::Forward).unwrap(), 2);
    assert_eq!(nav.advance(Direction::Forward).unwrap(), 0);
    assert_eq!(nav.current_question().unwrap().text, "Question 0");
}

#[test]
fn test_backward_from_start_wraps_to_end() {
    let mut session = active_session(3);
    let mut nav = QuizNavigator::new(&mut session);

    assert_eq!(nav.advance(Direction::Backward).unwrap(), 2);
    assert_eq!(nav.current_question().unwrap().text, "Question 2");
}

#[test]
fn test_single_question_bank_stays_put() {
    let mut session = active_session(1);
    let mut nav = QuizNavigator::new(&mut session);

    assert_eq!(nav.advance(Direction::Backward).unwrap(), 0);
    assert_eq!(nav.advance(Direction::Forward).unwrap(), 0);
}

#[test]
fn test_correct_answer_scores_once_without_moving() {
    let mut session = active_session(3);
    let mut nav = QuizNavigator::new(&mut session);
    nav.advance(Direction::Forward).unwrap();

    // Question 1 is answered by B
    assert_eq!(nav.submit_answer(ChoiceKey::B).unwrap(), AnswerOutcome::Correct);
    assert_eq!(nav.score(), 1);
    assert_eq!(nav.current_index(), 1);
}

#[test]
fn test_incorrect_answer_leaves_score() {
    let mut session = active_session(3);
    let mut nav = QuizNavigator::new(&mut session);

    assert_eq!(nav.submit_answer(ChoiceKey::D).unwrap(), AnswerOutcome::Incorrect);
    assert_eq!(nav.score(), 0);
    assert_eq!(nav.current_index(), 0);
}

#[test]
fn test_resubmitting_correct_answer_scores_again() {
    let mut session = active_session(2);
    {
        let mut nav = QuizNavigator::new(&mut session);
        nav.submit_answer(ChoiceKey::A).unwrap();
        nav.submit_answer(ChoiceKey::A).unwrap();
    }
    assert_eq!(session.score(), 2);
    assert_eq!(session.score_card().to_string(), "Score: 2/2");
}

#[test]
fn test_rendered_selection_parses_back_to_key() {
    let mut session = active_session(2);
    let mut nav = QuizNavigator::new(&mut session);
    let rendered = nav.current_question().unwrap().rendered_choices()[0].clone();

    let key: ChoiceKey = rendered.parse().unwrap();
    assert_eq!(nav.submit_answer(key).unwrap(), AnswerOutcome::Correct);
}

#[test]
fn test_empty_bank_errors() {
    let mut session = QuizSession::new();
    session.install(QuestionBank::new());
    let mut nav = QuizNavigator::new(&mut session);

    assert!(matches!(nav.current_question(), Err(QuizError::EmptyBank)));
    assert!(matches!(nav.advance(Direction::Forward), Err(QuizError::EmptyBank)));
}

#[test]
fn test_new_bank_discards_previous_progress() {
    let mut session = active_session(3);
    {
        let mut nav = QuizNavigator::new(&mut session);
        nav.advance(Direction::Backward).unwrap();
        nav.submit_answer(ChoiceKey::C).unwrap();
    }
    assert_eq!((session.current_index(), session.score()), (2, 1));

    session.install(bank_of(5));
    assert_eq!((session.current_index(), session.score(), session.total()), (0, 0, 5));
}
