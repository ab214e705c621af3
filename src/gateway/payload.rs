use serde::{Deserialize, Serialize};

use crate::lifecycle::{ModelCacheStatus, ModelState};
use crate::review::BulkOperation;
use crate::schedule::ScheduleState;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RateRequest {
    pub card_id: String,
    pub quality: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RateResponse {
    pub card_id: String,
    pub schedule: ScheduleState,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BulkRequest {
    pub card_ids: Vec<String>,
    pub operation: BulkOperation,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_cache: ModelState,
    pub model_cache_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_cache_progress: Option<u8>,
    pub embedder_mode: &'static str,
}

impl HealthResponse {
    pub fn from_status(status: ModelCacheStatus, stub_embedder: bool) -> Self {
        let overall = match status.state {
            ModelState::Ready => "ok",
            ModelState::Error => "error",
            _ => "initializing",
        };
        Self {
            status: overall,
            model_cache: status.state,
            model_cache_message: status.message,
            model_cache_progress: status.progress,
            embedder_mode: if stub_embedder { "stub" } else { "real" },
        }
    }
}
