use std::borrow::Cow;
use std::error::Error;

use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

pub(crate) trait GetStatusCode {
    fn status_code(&self) -> http::StatusCode;
}

/// Error body in the shape the frontend reads.
#[derive(Debug, Serialize)]
pub(crate) struct ErrorData {
    pub(crate) detail: Cow<'static, str>,
}

impl ErrorData {
    pub fn new<A: Into<Cow<'static, str>>>(detail: A) -> Self {
        Self { detail: detail.into() }
    }
}

pub(crate) fn error_to_axum_response<T>(error: T) -> Response
where
    T: GetStatusCode + Error + 'static,
{
    let status_code = error.status_code();
    if status_code.is_server_error() {
        tracing::error!(error = &error as &dyn Error, "request failed");
    } else {
        tracing::debug!(error = &error as &dyn Error, %status_code, "rejected request");
    }
    (status_code, Json(ErrorData::new(error.to_string()))).into_response()
}
