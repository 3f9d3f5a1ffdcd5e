use adaquiz_core::quiz::session::{AdvanceOutcome, QuizSession};
use adaquiz_model::question::{Question, UserResponse};
use adaquiz_test_helpers::ScriptedGenerator;

pub fn response(question: &Question, user_answer: &str, correct: bool) -> UserResponse {
    UserResponse {
        user_answer: user_answer.to_owned(),
        previous_question: question.question.clone(),
        response_correct: correct,
        topic: String::new(),
    }
}

/// Answers the current question and expects a new one.
pub async fn answer(
    session: &mut QuizSession,
    generator: &ScriptedGenerator,
    current: &Question,
    user_answer: &str,
    correct: bool,
) -> Question {
    match session.advance(generator, &response(current, user_answer, correct)).await.unwrap() {
        AdvanceOutcome::NextQuestion(next) => next,
        AdvanceOutcome::Complete => panic!("session completed early"),
    }
}
