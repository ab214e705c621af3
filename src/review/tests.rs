use super::*;

use std::sync::Arc;

use tempfile::TempDir;

use crate::lifecycle::{ModelCacheConfig, ModelCacheManager, ModelState};
use crate::schedule::{
    MemoryScheduleStore, ScheduleError, ScheduleResult, ScheduleState, ScheduleStore,
    ScheduleUpdate,
};
use crate::scoring::{ScoreRequest, Verdict};

fn stub_service(tmp: &TempDir) -> (ReviewService, Arc<MemoryScheduleStore>) {
    let cache = Arc::new(ModelCacheManager::from_config(ModelCacheConfig::stub(
        tmp.path(),
    )));
    let store = Arc::new(MemoryScheduleStore::new());
    let service = ReviewService::new(cache, Arc::clone(&store) as Arc<dyn ScheduleStore>);
    (service, store)
}

#[tokio::test]
async fn test_score_advances_schedule() {
    let tmp = TempDir::new().unwrap();
    let (service, store) = stub_service(&tmp);

    let attempt = service
        .score(ScoreRequest::new("card-1", "Paris", " paris "))
        .await
        .unwrap();

    assert_eq!(attempt.card_id, "card-1");
    assert_eq!(attempt.result.verdict, Verdict::Correct);
    assert_eq!(attempt.schedule.streak, 1);
    assert_eq!(attempt.schedule.interval, 1);
    assert_eq!(attempt.schedule.quality, Some(5));
    assert_eq!(store.get("card-1").await.unwrap(), Some(attempt.schedule));
}

#[tokio::test]
async fn test_attempts_get_distinct_ids() {
    let tmp = TempDir::new().unwrap();
    let (service, _) = stub_service(&tmp);

    let a = service.score(ScoreRequest::new("c", "x", "x")).await.unwrap();
    let b = service.score(ScoreRequest::new("c", "x", "x")).await.unwrap();

    assert_ne!(a.id, b.id);
    assert_eq!(b.schedule.streak, 2);
    assert_eq!(b.schedule.interval, 6);
}

#[tokio::test]
async fn test_score_with_stub_model() {
    let tmp = TempDir::new().unwrap();
    let (service, _) = stub_service(&tmp);

    let attempt = service
        .score(
            ScoreRequest::new("card", "mitochondria make ATP", "the nucleus stores DNA")
                .with_keypoints(["ATP"]),
        )
        .await
        .unwrap();

    for value in [attempt.result.score, attempt.result.cosine, attempt.result.coverage] {
        assert!((0.0..=1.0).contains(&value));
    }
    assert!(attempt.result.feedback.is_some());
    assert_eq!(service.model_status().state, ModelState::Ready);
}

#[tokio::test]
async fn test_graded_attempt_serializes_flat() {
    let tmp = TempDir::new().unwrap();
    let (service, _) = stub_service(&tmp);

    let attempt = service.score(ScoreRequest::new("c", "x", "x")).await.unwrap();
    let json = serde_json::to_value(&attempt).unwrap();

    assert_eq!(json["cardId"], "c");
    assert_eq!(json["verdict"], "correct");
    assert_eq!(json["missingKeypoints"], serde_json::json!([]));
    assert_eq!(json["schedule"]["streak"], 1);
    assert!(json["createdAt"].is_string());
}

#[tokio::test]
async fn test_empty_answer_is_validation_error() {
    let tmp = TempDir::new().unwrap();
    let (service, store) = stub_service(&tmp);

    let err = service
        .score(ScoreRequest::new("card", "Paris", ""))
        .await
        .unwrap_err();

    assert!(matches!(err, ReviewError::Validation { .. }));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_blank_card_id_is_validation_error() {
    let tmp = TempDir::new().unwrap();
    let (service, _) = stub_service(&tmp);

    let err = service.rate("", 5).await.unwrap_err();
    assert!(matches!(err, ReviewError::Validation { .. }));
}

#[tokio::test]
async fn test_rate_maps_quality_to_verdict() {
    let tmp = TempDir::new().unwrap();
    let (service, _) = stub_service(&tmp);

    let good = service.rate("card", 5).await.unwrap();
    assert_eq!(good.streak, 1);
    assert_eq!(good.quality, Some(5));

    // A self-rating of 3 maps to `missing`, which schedules as a lapse.
    let lapse = service.rate("card", 3).await.unwrap();
    assert_eq!(lapse.streak, 0);
    assert_eq!(lapse.interval, 1);
    assert_eq!(lapse.quality, Some(2));
}

#[tokio::test]
async fn test_rate_rejects_out_of_range() {
    let tmp = TempDir::new().unwrap();
    let (service, store) = stub_service(&tmp);

    for quality in [0, 6, -1] {
        let err = service.rate("card", quality).await.unwrap_err();
        assert!(matches!(err, ReviewError::Validation { .. }));
    }
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_bulk_mark_learned_then_reset() {
    let tmp = TempDir::new().unwrap();
    let (service, store) = stub_service(&tmp);
    let cards = vec!["a".to_string(), "b".to_string()];

    let learned = service
        .bulk(&cards, BulkOperation::MarkLearned)
        .await
        .unwrap();
    assert_eq!(learned.len(), 2);
    assert!(learned.iter().all(|c| c.schedule.interval == 180 && c.schedule.streak == 10));

    let reset = service
        .bulk(&cards[..1], BulkOperation::ResetSchedule)
        .await
        .unwrap();
    assert_eq!(reset[0].card_id, "a");
    assert_eq!(reset[0].schedule.interval, 1);
    assert_eq!(reset[0].schedule.streak, 0);

    let b = store.get("b").await.unwrap().unwrap();
    assert_eq!(b.interval, 180);
}

#[tokio::test]
async fn test_bulk_validates_before_applying() {
    let tmp = TempDir::new().unwrap();
    let (service, store) = stub_service(&tmp);
    let cards = vec!["a".to_string(), " ".to_string()];

    let err = service
        .bulk(&cards, BulkOperation::MarkLearned)
        .await
        .unwrap_err();
    assert!(matches!(err, ReviewError::Validation { .. }));
    assert!(store.is_empty());
}

#[test]
fn test_bulk_operation_wire_names() {
    let op: BulkOperation = serde_json::from_str("\"mark-learned\"").unwrap();
    assert_eq!(op, BulkOperation::MarkLearned);
    assert_eq!(
        serde_json::to_string(&BulkOperation::ResetSchedule).unwrap(),
        "\"reset-schedule\""
    );
}

#[tokio::test]
async fn test_warm_model_reports_ready() {
    let tmp = TempDir::new().unwrap();
    let (service, _) = stub_service(&tmp);
    let mut events = service.model_events();

    assert_eq!(service.model_status().state, ModelState::Cold);
    service.warm_model().await.unwrap();
    assert_eq!(service.model_status().state, ModelState::Ready);

    let first = events.recv().await.unwrap();
    assert_eq!(first.state, ModelState::Initializing);
}

#[tokio::test]
async fn test_model_failure_surfaces_model_error() {
    use crate::lifecycle::MockModelBackend;

    let tmp = TempDir::new().unwrap();
    let backend = MockModelBackend::new();
    backend.set_fail_download(true);
    let config = ModelCacheConfig {
        cache_dir: tmp.path().join("models"),
        ..Default::default()
    };
    let cache = Arc::new(ModelCacheManager::new(config, Arc::new(backend)));
    let store = Arc::new(MemoryScheduleStore::new());
    let service = ReviewService::new(cache, Arc::clone(&store) as Arc<dyn ScheduleStore>);

    let err = service
        .score(ScoreRequest::new("card", "Paris", "Lyon"))
        .await
        .unwrap_err();

    let model_err = err.model_error().expect("model error");
    assert!(model_err.to_string().contains("network unreachable"));
    assert!(store.is_empty());
    assert_eq!(service.model_status().state, ModelState::Error);
}

/// Store whose backing storage is gone.
struct OfflineStore;

#[async_trait::async_trait]
impl ScheduleStore for OfflineStore {
    async fn get(&self, _card_id: &str) -> ScheduleResult<Option<ScheduleState>> {
        Err(offline())
    }

    async fn update(
        &self,
        _card_id: &str,
        _update: ScheduleUpdate,
    ) -> ScheduleResult<ScheduleState> {
        Err(offline())
    }

    async fn remove(&self, _card_id: &str) -> ScheduleResult<Option<ScheduleState>> {
        Err(offline())
    }
}

fn offline() -> ScheduleError {
    ScheduleError::Store {
        reason: "database is locked".to_string(),
    }
}

#[tokio::test]
async fn test_store_failure_is_not_a_validation_error() {
    let tmp = TempDir::new().unwrap();
    let cache = Arc::new(ModelCacheManager::from_config(ModelCacheConfig::stub(
        tmp.path(),
    )));
    let service = ReviewService::new(cache, Arc::new(OfflineStore));

    let err = service.rate("card", 4).await.unwrap_err();
    assert!(matches!(
        err,
        ReviewError::Schedule(ScheduleError::Store { .. })
    ));
    assert!(err.to_string().contains("database is locked"));
}
