//! Api key middleware.
//! Rejects requests whose `Api-key` header matches no stored key.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::server::AppState;
use crate::observability::metrics;
use crate::users::ServiceError;

/// Header carrying the caller's api key.
pub const API_KEY_HEADER: &str = "api-key";

/// Gate for the `/profile` subtree.
///
/// Forwards the request untouched when the `Api-key` header matches a stored
/// key. Any failure, including a broken key store, answers 403 `Forbidden`
/// without running the handler.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // A missing or non-UTF-8 header counts as an empty key.
    let api_key = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let result = state.users.authenticate(api_key).await;
    match result {
        Ok(()) => next.run(request).await,
        Err(e) => {
            match &e {
                ServiceError::Unauthenticated => {
                    tracing::debug!(path = %request.uri().path(), "Api key rejected");
                }
                _ => tracing::error!(error = %e, "Api key check failed"),
            }
            metrics::record_auth_failure();
            forbidden()
        }
    }
}

fn forbidden() -> Response {
    let reason = StatusCode::FORBIDDEN
        .canonical_reason()
        .unwrap_or("Forbidden");
    (StatusCode::FORBIDDEN, reason).into_response()
}
