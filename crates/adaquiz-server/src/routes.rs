use axum::Router;

pub(crate) mod error;
pub(crate) mod flashcards;
pub(crate) mod quiz;
pub(crate) mod status;

/// Upper bound for the batch endpoints.
pub(crate) const MAX_BATCH_SIZE: usize = 20;

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .merge(quiz::create_router())
        .merge(flashcards::create_router())
        .nest("/status", status::create_router())
}

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::Arc;
    use std::time::Duration;

    use adaquiz_core::quiz::store::SessionStore;
    use adaquiz_test_helpers::ScriptedGenerator;
    use axum::body::Body;
    use axum::{Extension, Router};
    use http::{HeaderMap, Request, StatusCode, header};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::AppState;

    pub(crate) fn app(generator: &ScriptedGenerator) -> (Router, AppState) {
        let state = AppState::new(
            Arc::new(generator.clone()),
            Arc::new(generator.clone()),
            SessionStore::new(Duration::from_secs(60)),
        );
        let app = super::create_router()
            .layer(Extension(state.clone()))
            .with_state(());
        (app, state)
    }

    pub(crate) fn post(uri: &str, session: Option<&str>, body: &Value) -> Request<Body> {
        let mut req = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        if let Some(session) = session {
            req = req.header(crate::session::SESSION_HEADER, session);
        }
        req.body(Body::from(body.to_string())).unwrap()
    }

    pub(crate) async fn send(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, headers, body)
    }
}
