use std::time::Duration;

use adaquiz_core::quiz::store::SessionStore;
use axum::routing::get;
use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayerBuilder;
use chrono::Utc;
use http::{HeaderName, Method, header};
use sentry_tower::NewSentryLayer;
use tokio::task::{self, JoinHandle};
use tokio::time;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::session::SESSION_HEADER;
use crate::{AppState, routes};

fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_headers([
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            HeaderName::from_static(SESSION_HEADER),
        ])
        .expose_headers([HeaderName::from_static(SESSION_HEADER)])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .max_age(Duration::from_secs(3600));

    if origins.is_empty() {
        tracing::warn!("no origins configured, allowing any origin");
        return Ok(cors.allow_origin(AllowOrigin::any()));
    }

    tracing::info!(?origins, "allowing origins");
    // Credentials are needed for the session cookie, they can't be combined with a wildcard origin
    Ok(cors
        .allow_origin(origins.iter().map(|origin| origin.parse()).collect::<Result<Vec<_>, _>>()?)
        .allow_credentials(true))
}

pub fn create_app(state: AppState, origins: &[String]) -> anyhow::Result<Router> {
    let (prometheus_layer, metric_handle) = PrometheusMetricLayerBuilder::new()
        .with_prefix("adaquiz")
        .with_default_metrics()
        .build_pair();

    let app = routes::create_router()
        .route("/metrics", get(|| async move { metric_handle.render() }))
        .layer(
            // Router layers are called bottom to top
            // ServiceBuilder layers are called top to bottom
            ServiceBuilder::new()
                .layer(NewSentryLayer::new_from_top())
                .layer(sentry_tower::SentryHttpLayer::with_transaction())
                .layer(prometheus_layer)
                .layer(cors_layer(origins)?)
                .layer(Extension(state)),
        )
        .with_state(());
    Ok(app)
}

/// Periodically drops quiz sessions that were idle for longer than the store's ttl.
pub(crate) fn spawn_session_pruner(sessions: SessionStore, period: Duration) -> JoinHandle<()> {
    let period = period.max(Duration::from_secs(1));
    tracing::info!(?period, ttl = ?sessions.ttl(), "pruning idle quiz sessions");

    task::spawn(async move {
        let mut interval = time::interval(period);
        loop {
            interval.tick().await;
            sessions.prune_expired(Utc::now()).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use adaquiz_test_helpers::ScriptedGenerator;
    use axum::body::Body;
    use http::{Request, StatusCode};
    use tower::ServiceExt;

    #[test]
    fn test_cors_rejects_invalid_origin() {
        assert!(cors_layer(&["not a\nheader".to_owned()]).is_err());
        assert!(cors_layer(&["http://localhost:3000".to_owned()]).is_ok());
        assert!(cors_layer(&[]).is_ok());
    }

    #[test_log::test(tokio::test)]
    async fn test_create_app_serves_routes_and_metrics() {
        let generator = ScriptedGenerator::new();
        let state = AppState::new(
            Arc::new(generator.clone()),
            Arc::new(generator),
            SessionStore::new(Duration::from_secs(60)),
        );
        let app = create_app(state, &["http://localhost:3000".to_owned()]).unwrap();

        let status = app
            .clone()
            .oneshot(Request::get("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(status.status(), StatusCode::OK);

        let metrics = app
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(metrics.status(), StatusCode::OK);
    }
}
