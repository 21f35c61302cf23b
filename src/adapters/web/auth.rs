//! Static token check for the `/api` routes.
//!
//! The `Authorization` header must carry the configured token, either bare
//! or as `Bearer <token>`. Comparison is constant time.

use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;

use super::AppState;

const BEARER_PREFIX: &str = "Bearer ";

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Token carried by an `Authorization` header value.
fn presented_token(header: &str) -> &str {
    header.strip_prefix(BEARER_PREFIX).unwrap_or(header).trim()
}

fn token_matches(header: Option<&str>, expected: Option<&str>) -> bool {
    match (header, expected) {
        (Some(header), Some(expected)) if !expected.is_empty() => {
            constant_time_eq(presented_token(header).as_bytes(), expected.as_bytes())
        }
        _ => false,
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Unauthorized" })),
    )
        .into_response()
}

pub async fn require_token(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if state.settings.auth_token.is_none() {
        tracing::warn!("no [auth] token configured; rejecting protected request");
        return unauthorized();
    }
    if !token_matches(header, state.settings.auth_token.as_deref()) {
        tracing::warn!(path = %request.uri().path(), "rejected request with bad token");
        return unauthorized();
    }

    next.run(request).await
}
