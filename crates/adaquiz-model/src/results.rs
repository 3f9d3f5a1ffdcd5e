use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResults {
    pub total_questions: usize,
    pub correct_answers: usize,
    pub score: String,
    /// Seconds since the quiz was started.
    pub elapsed_time: f64,
    pub details: Vec<ResultDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultDetail {
    pub question: String,
    pub correct_answer: String,
    pub user_answer: String,
}

impl QuizResults {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total_questions: 0,
            correct_answers: 0,
            score: "0/0".to_owned(),
            elapsed_time: 0.0,
            details: Vec::new(),
        }
    }
}
