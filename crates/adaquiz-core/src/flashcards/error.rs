use thiserror::Error;

use crate::openai::error::OpenAiError;

#[derive(Debug, Error)]
pub enum FlashcardError {
    #[error("No flashcards generated.")]
    NoFlashcards,

    #[error(transparent)]
    OpenAi(#[from] OpenAiError),
}
