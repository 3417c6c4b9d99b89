//! Route table.
//!
//! ```text
//! /profile, /profile/, /profile/*
//!                        → require_api_key → get_profile (GET) / app_handler
//! everything else        → app_handler
//! ```

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::{any, get},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::http::handlers::{app_handler, get_profile};
use crate::http::middleware::require_api_key;
use crate::http::server::AppState;
use crate::observability::metrics;

/// Path prefix guarded by the api key check.
pub const PROFILE_PATH: &str = "/profile";

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    let profile = Router::new()
        .route(PROFILE_PATH, get(get_profile))
        .route(&format!("{PROFILE_PATH}/"), any(app_handler))
        .route(&format!("{PROFILE_PATH}/{{*rest}}"), any(app_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .merge(profile)
        .fallback(app_handler)
        .with_state(state)
        .layer(middleware::from_fn(metrics::track_requests))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or("unknown");
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id,
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}
