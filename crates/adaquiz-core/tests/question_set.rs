use adaquiz_core::quiz::error::GenerationError;
use adaquiz_core::quiz::generator::generate_question_set;
use adaquiz_test_helpers::{ScriptedGenerator, question, sample_question};

use test_log::test;

#[test(tokio::test)]
async fn test_generates_requested_number() {
    let generator = ScriptedGenerator::new();
    let questions = generate_question_set(&generator, "Rust", 3).await.unwrap();

    assert_eq!(questions.len(), 3);
    assert!(questions.iter().all(|q| q.options.len() == 4 && q.options[0].starts_with("A. ")));
    assert_eq!(generator.last_request().unwrap().num, 3);
}

#[test(tokio::test)]
async fn test_drops_malformed_questions() {
    let generator = ScriptedGenerator::with_script([Ok(vec![
        sample_question(1),
        question("Broken?", ["one", "two", "three", "four"], "Z"),
        sample_question(3),
    ])]);
    let questions = generate_question_set(&generator, "Rust", 3).await.unwrap();

    assert_eq!(questions.len(), 2);
    assert_eq!(questions[1].question, "Sample question 3?");
}

#[test(tokio::test)]
async fn test_no_usable_questions() {
    let generator =
        ScriptedGenerator::with_script([Ok(vec![question("Broken?", ["one", "two", "three", "four"], "Z")])]);
    let err = generate_question_set(&generator, "Rust", 1).await;
    assert!(matches!(err, Err(GenerationError::NoQuestions)));
}
