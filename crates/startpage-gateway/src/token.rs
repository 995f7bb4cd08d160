use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Header carrying the anti-forgery token on mutating requests.
pub const REQUEST_TOKEN_HEADER: &str = "x-request-token";

/// Opaque per-deployment anti-forgery token.
#[derive(Clone, PartialEq, Eq)]
pub struct RequestToken(Arc<str>);

impl RequestToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Arc::from(value.into()))
    }

    /// A fresh random token, valid until the process exits.
    pub fn generate() -> Self {
        Self::new(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compares without short-circuiting on the first differing byte.
    pub fn matches(&self, presented: &[u8]) -> bool {
        let expected = self.0.as_bytes();
        if expected.len() != presented.len() {
            return false;
        }
        expected
            .iter()
            .zip(presented)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl Debug for RequestToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("RequestToken(..)")
    }
}

fn is_safe(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Rejects mutating requests that do not carry the expected token, before
/// any dashboard logic runs.
pub async fn require_request_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    if is_safe(request.method()) {
        return Ok(next.run(request).await);
    }

    let authorized = request
        .headers()
        .get(REQUEST_TOKEN_HEADER)
        .is_some_and(|value| state.request_token().matches(value.as_bytes()));

    if !authorized {
        warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "rejected request without a valid request token"
        );
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_exact_value_only() {
        let token = RequestToken::new("abc123");

        assert!(token.matches(b"abc123"));
        assert!(!token.matches(b"abc124"));
        assert!(!token.matches(b"abc12"));
        assert!(!token.matches(b""));
    }

    #[test]
    fn generated_tokens_differ() {
        let a = RequestToken::generate();
        let b = RequestToken::generate();

        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
    }

    #[test]
    fn debug_hides_value() {
        let token = RequestToken::new("secret");
        assert_eq!(format!("{token:?}"), "RequestToken(..)");
    }
}
