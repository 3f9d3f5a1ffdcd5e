use adaquiz_model::flashcard::FlashcardSet;
use axum::routing::post;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use tracing::instrument;

use crate::AppState;
use crate::routes::MAX_BATCH_SIZE;
use crate::routes::flashcards::error::FlashcardRouteError;

mod error;

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/generate-flashcards", post(generate_flashcards))
        .with_state(())
}

#[derive(Debug, Deserialize)]
pub(crate) struct FlashcardRequest {
    topic: String,
    num_flashcards: usize,
}

#[instrument(skip_all)]
async fn generate_flashcards(
    Extension(state): Extension<AppState>,
    Json(request): Json<FlashcardRequest>,
) -> Result<Json<FlashcardSet>, FlashcardRouteError> {
    let topic = request.topic.trim();
    if topic.is_empty() {
        return Err(FlashcardRouteError::BlankTopic);
    }
    if !(1..=MAX_BATCH_SIZE).contains(&request.num_flashcards) {
        return Err(FlashcardRouteError::InvalidFlashcardCount(MAX_BATCH_SIZE));
    }

    let set = state.flashcards().generate_flashcards(topic, request.num_flashcards).await?;
    tracing::debug!(title = %set.title, count = set.flashcards.len(), "generated flashcards");
    Ok(Json(set))
}
