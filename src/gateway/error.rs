use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::RETENTION_STATUS_HEADER;
use crate::review::ReviewError;
use crate::schedule::ScheduleError;
use crate::scoring::ScoringError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("embedding model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("scoring failed: {0}")]
    ScoringFailed(String),

    #[error("schedule update failed: {0}")]
    ScheduleFailed(String),
}

impl From<ReviewError> for GatewayError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::Validation { reason } => GatewayError::InvalidRequest(reason),
            ReviewError::Scoring(ScoringError::ModelUnavailable(e)) => {
                GatewayError::ModelUnavailable(e.to_string())
            }
            ReviewError::Scoring(ScoringError::InvalidInput { reason }) => {
                GatewayError::InvalidRequest(reason)
            }
            ReviewError::Scoring(e @ ScoringError::Compute { .. }) => {
                GatewayError::ScoringFailed(e.to_string())
            }
            ReviewError::Schedule(e @ ScheduleError::InvalidQuality { .. }) => {
                GatewayError::InvalidRequest(e.to_string())
            }
            ReviewError::Schedule(e @ ScheduleError::Store { .. }) => {
                GatewayError::ScheduleFailed(e.to_string())
            }
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, retention_status) = match &self {
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            GatewayError::ModelUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "model_unavailable")
            }
            GatewayError::ScoringFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "scoring_error"),
            GatewayError::ScheduleFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "schedule_error")
            }
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            RETENTION_STATUS_HEADER,
            HeaderValue::from_static(retention_status),
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
