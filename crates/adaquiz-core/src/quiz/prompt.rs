use crate::quiz::generator::{PreviousAnswer, QuestionRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTemplate {
    /// Opening question of a quiz, only knows the topic and the level.
    Initial,
    /// Follow-up question that reacts to the previous answer.
    Adaptive,
}

pub(crate) const SYSTEM_PROMPT: &str = "You write multiple-choice questions (MCQ) for an adaptive learning quiz. \
Every question has exactly four options labelled A. to D. and exactly one correct option. \
Always reply by calling the provided function.";

fn initial(topic: &str, learning_objective: &str, difficulty_level: &str) -> String {
    format!(
        "Generate a unique and high-quality multiple-choice question (MCQ) based on the given topic and level.
The question should be clear, relevant, and aligned with the topic. Provide four answer options and the correct answer.
Topic: {topic}
Learning Objective: {learning_objective}
Difficulty Level: {difficulty_level}
Guidelines:
1. Avoid repeating questions.
2. Ensure the question is specific and tests knowledge effectively.
3. Provide plausible distractors (incorrect options).
4. Include a brief explanation for the correct answer."
    )
}

fn adaptive(topic: &str, difficulty_level: &str, previous: &PreviousAnswer) -> String {
    let PreviousAnswer {
        question: previous_question,
        answer: user_response,
        was_correct: response_correct,
    } = previous;
    // The model reads the flag the way a person would write it
    let response_correct = if *response_correct { "True" } else { "False" };

    format!(
        "Based on the user's response to the previous question on {topic}, generate a new unique and high-quality multiple-choice question (MCQ).
If the user's response is correct, output a harder question. Otherwise, output an easier question.
The question should be clear, relevant, and aligned with the topic.

Format your response exactly as follows:
1. Write the question
2. Provide four options formatted exactly as:
   A. [First option]
   B. [Second option]
   C. [Third option]
   D. [Fourth option]
3. Indicate the correct answer using just the letter (A, B, C, or D)
4. Provide a brief explanation for why the answer is correct

Topic: {topic}
Difficulty Level: {difficulty_level}
Previous Question: {previous_question}
User's Response: {user_response}
Was the response correct?: {response_correct}

Guidelines:
1. Avoid repeating questions
2. Ensure the question is specific and tests knowledge effectively
3. Make all options plausible but only one correct
4. Include clear explanations"
    )
}

/// Renders the user prompt for a generation request.
///
/// An adaptive request without a previous answer falls back to the initial template.
#[must_use]
pub fn render(request: &QuestionRequest) -> String {
    let difficulty: &'static str = request.difficulty.into();
    let body = match (request.template, &request.context) {
        (PromptTemplate::Adaptive, Some(previous)) => adaptive(&request.topic, difficulty, previous),
        _ => initial(&request.topic, &request.learning_objective, difficulty),
    };

    let count = match request.num {
        1 => "Generate exactly 1 question.".to_owned(),
        n => format!("Generate exactly {n} different questions."),
    };
    format!("{body}\n\n{count}")
}
