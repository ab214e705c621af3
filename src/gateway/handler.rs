use axum::{Json, extract::State, response::IntoResponse, response::Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::gateway::error::GatewayError;
use crate::gateway::payload::{BulkRequest, HealthResponse, RateRequest, RateResponse};
use crate::gateway::state::HandlerState;
use crate::scoring::ScoreRequest;

/// Parses a JSON body, turning schema errors into `400` responses.
pub(crate) fn parse_body<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, GatewayError> {
    serde_json::from_value(body)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))
}

#[instrument(skip(state, body))]
pub async fn score_handler(
    State(state): State<HandlerState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let request: ScoreRequest = parse_body(body)?;
    debug!(card_id = %request.card_id, keypoints = request.keypoints.len(), "Score request");

    let attempt = state.service.score(request).await?;
    Ok(Json(attempt).into_response())
}

#[instrument(skip(state, body))]
pub async fn rate_handler(
    State(state): State<HandlerState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let request: RateRequest = parse_body(body)?;

    let schedule = state.service.rate(&request.card_id, request.quality).await?;
    Ok(Json(RateResponse {
        card_id: request.card_id,
        schedule,
    })
    .into_response())
}

#[instrument(skip(state, body))]
pub async fn bulk_handler(
    State(state): State<HandlerState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let request: BulkRequest = parse_body(body)?;

    let updated = state
        .service
        .bulk(&request.card_ids, request.operation)
        .await?;
    Ok(Json(updated).into_response())
}

/// Loads the model (waiting for it) and reports health afterwards.
#[instrument(skip(state))]
pub async fn warm_model_handler(
    State(state): State<HandlerState>,
) -> Result<Response, GatewayError> {
    if let Err(e) = state.service.warm_model().await {
        warn!(error = %e, "Model warm-up request failed");
        return Err(GatewayError::ModelUnavailable(e.to_string()));
    }

    let health = HealthResponse::from_status(state.service.model_status(), state.stub_embedder);
    Ok(Json(health).into_response())
}
