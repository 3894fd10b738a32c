use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;

/// Opaque session identity, resolved per request and passed into handlers
/// explicitly. Token verification itself happens upstream; this only carries
/// the identifier for rate limiting and log scoping.
#[derive(Debug, Clone)]
pub struct Session(pub Option<String>);

impl Session {
    /// Rate-limit key. Anonymous requests share one bucket.
    pub fn key(&self) -> &str {
        self.0.as_deref().unwrap_or("anonymous")
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts
            .headers
            .get("x-session-id")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
        {
            return Ok(Session(Some(id.to_string())));
        }

        let from_cookie = parts
            .headers
            .get(http::header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(session_id_from_cookie);

        Ok(Session(from_cookie))
    }
}

fn session_id_from_cookie(cookie_header: &str) -> Option<String> {
    cookie_header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == "session_id" && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}
