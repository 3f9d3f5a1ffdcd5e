use thiserror::Error;

use crate::openai::error::OpenAiError;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("No questions generated.")]
    NoQuestions,

    #[error("Expected 4 options but the model returned {0}")]
    InvalidOptionCount(usize),

    #[error("The answer '{0}' does not match any of the options")]
    UnresolvedAnswer(String),

    #[error(transparent)]
    OpenAi(#[from] OpenAiError),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("The quiz session has not been started")]
    NotStarted,

    #[error(transparent)]
    Generation(#[from] GenerationError),
}
