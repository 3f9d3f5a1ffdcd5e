use adaquiz_model::status::{ComponentState, Status};
use axum::routing::get;
use axum::{Extension, Json, Router};
use tracing::instrument;

use crate::AppState;

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", get(get_status)).with_state(())
}

// The llm settings are validated at startup, there is nothing to probe without spending tokens
#[instrument(skip_all)]
pub(crate) async fn get_status(Extension(state): Extension<AppState>) -> Json<Status> {
    Json(Status {
        llm: ComponentState::Ok,
        active_sessions: state.sessions().len().await,
    })
}
