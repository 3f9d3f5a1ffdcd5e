use adaquiz_core::flashcards::error::FlashcardError;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

use crate::routes::error::{GetStatusCode, error_to_axum_response};

#[derive(Error, Debug)]
pub(crate) enum FlashcardRouteError {
    #[error("Topic must not be empty.")]
    BlankTopic,

    #[error("num_flashcards must be between 1 and {0}.")]
    InvalidFlashcardCount(usize),

    #[error(transparent)]
    Generation(#[from] FlashcardError),
}

impl GetStatusCode for FlashcardRouteError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BlankTopic | Self::InvalidFlashcardCount(_) | Self::Generation(FlashcardError::NoFlashcards) => {
                StatusCode::BAD_REQUEST
            }
            Self::Generation(FlashcardError::OpenAi(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FlashcardRouteError {
    fn into_response(self) -> Response {
        error_to_axum_response(self)
    }
}
