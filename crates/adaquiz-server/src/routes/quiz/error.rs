use adaquiz_core::quiz::error::{GenerationError, SessionError};
use adaquiz_core::quiz::store::SessionId;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

use crate::routes::error::{GetStatusCode, error_to_axum_response};

#[derive(Error, Debug)]
pub(crate) enum QuizRouteError {
    #[error("Topic must not be empty.")]
    BlankTopic,

    #[error("num_questions must be between 1 and {0}.")]
    InvalidQuestionCount(usize),

    #[error("No quiz session given. Start a quiz first.")]
    MissingSession,

    #[error("Quiz session {0} not found.")]
    SessionNotFound(SessionId),

    #[error("Quiz completed. Please submit to view results.")]
    QuizCompleted,

    /// Failure while generating the opening question of a quiz.
    #[error(transparent)]
    Start(GenerationError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Error generating next question: {0}")]
    Advance(#[from] SessionError),
}

impl GetStatusCode for QuizRouteError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BlankTopic
            | Self::InvalidQuestionCount(_)
            | Self::MissingSession
            | Self::QuizCompleted
            | Self::Start(GenerationError::NoQuestions)
            | Self::Advance(SessionError::NotStarted) => StatusCode::BAD_REQUEST,
            Self::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Self::Start(_) | Self::Generation(_) | Self::Advance(SessionError::Generation(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for QuizRouteError {
    fn into_response(self) -> Response {
        error_to_axum_response(self)
    }
}
