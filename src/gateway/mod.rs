//! HTTP gateway (Axum) exposing grading, self-rating and model control.

#![allow(missing_docs)]

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;
pub mod streaming;

#[cfg(test)]
mod handler_tests;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use error::GatewayError;
pub use handler::{bulk_handler, rate_handler, score_handler, warm_model_handler};
pub use payload::HealthResponse;
pub use state::HandlerState;
pub use streaming::model_events_handler;

/// Response header carrying a short machine-readable outcome.
pub const RETENTION_STATUS_HEADER: &str = "x-retention-status";

pub fn create_router_with_state(state: HandlerState) -> Router {
    let cors = cors_layer(&state.allowed_origins);

    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/score", post(score_handler))
        .route("/rate", post(rate_handler))
        .route("/schedules/bulk", post(bulk_handler))
        .route("/warm-model", post(warm_model_handler))
        .route("/model/events", get(model_events_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match cors {
        Some(layer) => router.layer(layer),
        None => router,
    }
}

/// Builds a CORS layer for `origins`, skipping entries that are not valid header values.
pub fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

/// Liveness plus model cache state; always `200`, the body carries readiness.
#[tracing::instrument(skip(state))]
pub async fn health_handler(State(state): State<HandlerState>) -> Response {
    let health = HealthResponse::from_status(state.service.model_status(), state.stub_embedder);

    let mut headers = HeaderMap::new();
    headers.insert(
        RETENTION_STATUS_HEADER,
        HeaderValue::from_static(health.status),
    );

    (StatusCode::OK, headers, Json(health)).into_response()
}
