//! Router-level tests: payload parsing, status mapping and response shapes.

use std::sync::Arc;

use axum::{Router, body::Body, http::Request, http::StatusCode};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::gateway::error::GatewayError;
use crate::gateway::{HandlerState, RETENTION_STATUS_HEADER, create_router_with_state};
use crate::lifecycle::{ModelCacheConfig, ModelCacheManager, MockModelBackend};
use crate::review::{ReviewError, ReviewService};
use crate::schedule::{MemoryScheduleStore, ScheduleError, ScheduleStore};
use crate::scoring::ScoringError;

fn stub_router(tmp: &TempDir) -> Router {
    let cache = Arc::new(ModelCacheManager::from_config(ModelCacheConfig::stub(
        tmp.path(),
    )));
    router_with_cache(cache)
}

fn failing_router(tmp: &TempDir) -> Router {
    let backend = MockModelBackend::new();
    backend.set_fail_download(true);
    let config = ModelCacheConfig {
        cache_dir: tmp.path().join("models"),
        ..Default::default()
    };
    router_with_cache(Arc::new(ModelCacheManager::new(config, Arc::new(backend))))
}

fn router_with_cache(cache: Arc<ModelCacheManager>) -> Router {
    let store: Arc<dyn ScheduleStore> = Arc::new(MemoryScheduleStore::new());
    let state = HandlerState::new(ReviewService::new(cache, store), true);
    create_router_with_state(state)
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn score_body(expected: &str, user: &str) -> serde_json::Value {
    serde_json::json!({
        "cardId": "card-1",
        "prompt": "Capital of France?",
        "expectedAnswer": expected,
        "userAnswer": user,
        "keypoints": []
    })
}

#[tokio::test]
async fn test_health_before_warm_is_initializing() {
    let tmp = TempDir::new().unwrap();
    let router = stub_router(&tmp);

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(&router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "initializing");
    assert_eq!(json["model_cache"], "cold");
    assert_eq!(json["embedder_mode"], "stub");
    assert!(json.get("model_cache_progress").is_none());
}

#[tokio::test]
async fn test_warm_model_reports_ok() {
    let tmp = TempDir::new().unwrap();
    let router = stub_router(&tmp);

    let (status, json) = send(&router, post_json("/warm-model", serde_json::json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["model_cache"], "ready");
    assert_eq!(json["model_cache_progress"], 100);

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (_, health) = send(&router, request).await;
    assert_eq!(health["status"], "ok");
}

#[tokio::test]
async fn test_warm_model_failure_is_503() {
    let tmp = TempDir::new().unwrap();
    let router = failing_router(&tmp);

    let response = router
        .clone()
        .oneshot(post_json("/warm-model", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.headers().get(RETENTION_STATUS_HEADER).unwrap(),
        "model_unavailable"
    );

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (_, health) = send(&router, request).await;
    assert_eq!(health["status"], "error");
    assert_eq!(health["model_cache"], "error");
}

#[tokio::test]
async fn test_score_exact_match() {
    let tmp = TempDir::new().unwrap();
    let router = stub_router(&tmp);

    let (status, json) = send(&router, post_json("/score", score_body("Paris", " PARIS"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cardId"], "card-1");
    assert_eq!(json["verdict"], "correct");
    assert_eq!(json["score"], 1.0);
    assert_eq!(
        json["feedback"],
        "Excellent! Your answer covers all key concepts."
    );
    assert_eq!(json["schedule"]["interval"], 1);
    assert_eq!(json["schedule"]["streak"], 1);
    assert!(json["id"].is_string());
}

#[tokio::test]
async fn test_score_exact_match_skips_failing_model() {
    let tmp = TempDir::new().unwrap();
    let router = failing_router(&tmp);

    let (status, json) = send(&router, post_json("/score", score_body("Paris", "paris"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["verdict"], "correct");
}

#[tokio::test]
async fn test_score_model_unavailable_is_503() {
    let tmp = TempDir::new().unwrap();
    let router = failing_router(&tmp);

    let (status, json) = send(
        &router,
        post_json("/score", score_body("Paris", "Lyon is the capital")),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], 503);
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .contains("network unreachable")
    );
}

#[tokio::test]
async fn test_score_missing_field_is_400() {
    let tmp = TempDir::new().unwrap();
    let router = stub_router(&tmp);

    let body = serde_json::json!({ "cardId": "c", "expectedAnswer": "Paris" });
    let (status, json) = send(&router, post_json("/score", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], 400);
    assert!(json["error"].as_str().unwrap().contains("userAnswer"));
}

#[tokio::test]
async fn test_score_empty_answer_is_400() {
    let tmp = TempDir::new().unwrap();
    let router = stub_router(&tmp);

    let (status, _) = send(&router, post_json("/score", score_body("Paris", ""))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_score_whitespace_answer_is_graded() {
    let tmp = TempDir::new().unwrap();
    let router = stub_router(&tmp);

    let (status, json) = send(&router, post_json("/score", score_body("Paris", "   "))).await;
    assert_eq!(status, StatusCode::OK);
    assert!((0.0..=1.0).contains(&json["score"].as_f64().unwrap()));
    assert!(json["schedule"]["quality"].is_u64());
}

#[tokio::test]
async fn test_rate_returns_schedule() {
    let tmp = TempDir::new().unwrap();
    let router = stub_router(&tmp);

    let body = serde_json::json!({ "cardId": "card-9", "quality": 4 });
    let (status, json) = send(&router, post_json("/rate", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cardId"], "card-9");
    assert_eq!(json["schedule"]["quality"], 4);
    assert_eq!(json["schedule"]["streak"], 1);
    assert!(json["schedule"]["dueAt"].is_string());
}

#[tokio::test]
async fn test_rate_out_of_range_is_400() {
    let tmp = TempDir::new().unwrap();
    let router = stub_router(&tmp);

    for quality in [0, 6, 42] {
        let body = serde_json::json!({ "cardId": "card", "quality": quality });
        let (status, json) = send(&router, post_json("/rate", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "quality {quality}");
        assert_eq!(json["code"], 400);
    }
}

#[tokio::test]
async fn test_bulk_mark_learned() {
    let tmp = TempDir::new().unwrap();
    let router = stub_router(&tmp);

    let body = serde_json::json!({ "cardIds": ["a", "b"], "operation": "mark-learned" });
    let (status, json) = send(&router, post_json("/schedules/bulk", body)).await;

    assert_eq!(status, StatusCode::OK);
    let updated = json.as_array().unwrap();
    assert_eq!(updated.len(), 2);
    assert_eq!(updated[1]["cardId"], "b");
    assert_eq!(updated[1]["schedule"]["interval"], 180);
}

#[tokio::test]
async fn test_bulk_unknown_operation_is_400() {
    let tmp = TempDir::new().unwrap();
    let router = stub_router(&tmp);

    let body = serde_json::json!({ "cardIds": ["a"], "operation": "archive" });
    let (status, _) = send(&router, post_json("/schedules/bulk", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_model_events_is_event_stream() {
    let tmp = TempDir::new().unwrap();
    let router = stub_router(&tmp);

    let request = Request::builder()
        .uri("/model/events")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get("content-type").unwrap();
    assert!(
        content_type
            .to_str()
            .unwrap()
            .starts_with("text/event-stream")
    );

    let mut body = response.into_body();
    let frame = body.frame().await.unwrap().unwrap();
    let text = String::from_utf8(frame.into_data().unwrap().to_vec()).unwrap();
    assert!(text.starts_with("event: cold"));
    assert!(text.contains("\"state\":\"cold\""));
}

#[test]
fn test_error_status_mapping() {
    use axum::response::IntoResponse;

    let cases = [
        (
            GatewayError::InvalidRequest("bad".into()),
            StatusCode::BAD_REQUEST,
        ),
        (
            GatewayError::ModelUnavailable("down".into()),
            StatusCode::SERVICE_UNAVAILABLE,
        ),
        (
            GatewayError::ScoringFailed("nan".into()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
        (
            GatewayError::ScheduleFailed("io".into()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (err, expected) in cases {
        assert_eq!(err.into_response().status(), expected);
    }
}

#[test]
fn test_review_error_conversion() {
    let err = GatewayError::from(ReviewError::Scoring(ScoringError::Compute {
        reason: "vector count".into(),
    }));
    assert!(matches!(err, GatewayError::ScoringFailed(_)));

    let err = GatewayError::from(ReviewError::Validation {
        reason: "cardId must not be empty".into(),
    });
    assert!(matches!(err, GatewayError::InvalidRequest(_)));

    let err = GatewayError::from(ReviewError::Schedule(ScheduleError::Store {
        reason: "database is locked".into(),
    }));
    assert!(matches!(err, GatewayError::ScheduleFailed(_)));
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let tmp = TempDir::new().unwrap();
    let cache = Arc::new(ModelCacheManager::from_config(ModelCacheConfig::stub(
        tmp.path(),
    )));
    let store: Arc<dyn ScheduleStore> = Arc::new(MemoryScheduleStore::new());
    let state = HandlerState::new(ReviewService::new(cache, store), true)
        .with_allowed_origins(vec!["http://localhost:1420".to_string()]);
    let router = create_router_with_state(state);

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:1420")
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "http://localhost:1420"
    );

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://evil.test")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert!(
        response
            .headers()
            .get("access-control-allow-origin")
            .is_none()
    );
}

#[test]
fn test_cors_layer_skips_invalid_origins() {
    use crate::gateway::cors_layer;

    assert!(cors_layer(&[]).is_none());
    assert!(cors_layer(&["bad\norigin".to_string()]).is_none());
    assert!(cors_layer(&["http://localhost:1420".to_string()]).is_some());
}
