use std::convert::Infallible;

use adaquiz_core::quiz::store::SessionId;
use axum::extract::FromRequestParts;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use http::request::Parts;

pub(crate) const SESSION_HEADER: &str = "x-quiz-session";
pub(crate) const SESSION_COOKIE: &str = "quiz_session";

/// Session id sent by the client, taken from the `x-quiz-session` header or the `quiz_session` cookie.
///
/// The cookie is used when the header is missing or malformed. Ids that don't parse are treated like a
/// missing id.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ExtractSessionId(pub Option<SessionId>);

fn parse_session_id(source: &'static str, raw: &str) -> Option<SessionId> {
    raw.parse()
        .inspect_err(|_| tracing::debug!(source, session = raw, "ignoring malformed session id"))
        .ok()
}

impl<S> FromRequestParts<S> for ExtractSessionId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let from_header = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| parse_session_id("header", raw));

        let id = from_header.or_else(|| {
            CookieJar::from_headers(&parts.headers)
                .get(SESSION_COOKIE)
                .and_then(|cookie| parse_session_id("cookie", cookie.value()))
        });
        Ok(Self(id))
    }
}

pub(crate) fn session_cookie(jar: CookieJar, id: SessionId) -> CookieJar {
    jar.add(
        Cookie::build((SESSION_COOKIE, id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}
