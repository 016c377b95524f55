//! Bearer token gate for the ledger routes.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;

/// Where an unauthenticated client is told to sign in.
pub const LOGIN_URL: &str = "/login/";

/// The token protected routes accept. `None` locks every protected route.
#[derive(Debug, Clone, Default)]
pub struct AuthToken(Option<Arc<str>>);

impl AuthToken {
    pub fn new(token: Option<String>) -> Self {
        Self(token.map(Arc::from))
    }

    /// Returns true if `candidate` matches the configured token.
    pub fn accepts(&self, candidate: &str) -> bool {
        match &self.0 {
            Some(token) => constant_time_eq(token.as_bytes(), candidate.as_bytes()),
            None => false,
        }
    }
}

/// Middleware rejecting requests without a matching `Authorization: Bearer` header.
pub async fn require_bearer(
    State(token): State<AuthToken>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    match presented {
        Some(candidate) if token.accepts(candidate) => Ok(next.run(request).await),
        _ => {
            tracing::debug!(path = %request.uri().path(), "rejected unauthenticated request");
            Err(ApiError::Unauthenticated)
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
