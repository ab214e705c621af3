use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::error::{ReviewError, ReviewResult};
use super::types::{BulkOperation, CardSchedule, GradedAttempt};
use crate::lifecycle::{ModelCacheManager, ModelCacheStatus, ModelError, ModelEvent};
use crate::schedule::{Quality, ScheduleState, ScheduleStore, next_state};
use crate::scoring::{AnswerScorer, ScoreRequest, Verdict};

/// Request-facing operations: grade, self-rate, bulk-schedule, and model control.
///
/// Composed explicitly from a model cache and a schedule store; cheap to clone.
#[derive(Clone)]
pub struct ReviewService {
    scorer: AnswerScorer,
    cache: Arc<ModelCacheManager>,
    store: Arc<dyn ScheduleStore>,
}

impl std::fmt::Debug for ReviewService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewService")
            .field("scorer", &self.scorer)
            .field("model", &self.cache.status().state)
            .finish()
    }
}

impl ReviewService {
    pub fn new(cache: Arc<ModelCacheManager>, store: Arc<dyn ScheduleStore>) -> Self {
        Self {
            scorer: AnswerScorer::new(Arc::clone(&cache)),
            cache,
            store,
        }
    }

    pub fn store(&self) -> &Arc<dyn ScheduleStore> {
        &self.store
    }

    /// Grades an answer and advances the card's schedule by the verdict.
    #[instrument(skip(self, request), fields(card_id = %request.card_id))]
    pub async fn score(&self, request: ScoreRequest) -> ReviewResult<GradedAttempt> {
        require_card_id(&request.card_id)?;

        let result = self.scorer.score(&request).await?;
        let now = Utc::now();
        let verdict = result.verdict;

        let schedule = self
            .store
            .update(
                &request.card_id,
                Box::new(move |prev| next_state(prev, verdict, now)),
            )
            .await?;

        debug!(
            interval = schedule.interval,
            streak = schedule.streak,
            "Schedule advanced"
        );

        Ok(GradedAttempt {
            id: Uuid::new_v4(),
            card_id: request.card_id,
            created_at: now,
            result,
            schedule,
        })
    }

    /// Applies a 1-5 self-rating to the card's schedule.
    #[instrument(skip(self))]
    pub async fn rate(&self, card_id: &str, quality: i64) -> ReviewResult<ScheduleState> {
        require_card_id(card_id)?;
        let quality = Quality::new(quality)?;
        let verdict = Verdict::from_self_rating(quality);
        let now = Utc::now();

        let schedule = self
            .store
            .update(card_id, Box::new(move |prev| next_state(prev, verdict, now)))
            .await?;

        info!(%quality, %verdict, interval = schedule.interval, "Self-rating recorded");
        Ok(schedule)
    }

    /// Applies `operation` to every card, in order.
    #[instrument(skip(self, card_ids), fields(cards = card_ids.len()))]
    pub async fn bulk(
        &self,
        card_ids: &[String],
        operation: BulkOperation,
    ) -> ReviewResult<Vec<CardSchedule>> {
        for card_id in card_ids {
            require_card_id(card_id)?;
        }

        let now = Utc::now();
        let mut updated = Vec::with_capacity(card_ids.len());
        for card_id in card_ids {
            let schedule = self
                .store
                .update(
                    card_id,
                    Box::new(move |_| match operation {
                        BulkOperation::MarkLearned => ScheduleState::learned(now),
                        BulkOperation::ResetSchedule => ScheduleState::reset(now),
                    }),
                )
                .await?;
            updated.push(CardSchedule {
                card_id: card_id.clone(),
                schedule,
            });
        }

        info!(?operation, updated = updated.len(), "Bulk schedule operation applied");
        Ok(updated)
    }

    /// Current model cache status; never blocks on a load.
    pub fn model_status(&self) -> ModelCacheStatus {
        self.cache.status()
    }

    /// Subscribes to model lifecycle events.
    pub fn model_events(&self) -> broadcast::Receiver<ModelEvent> {
        self.cache.subscribe()
    }

    /// Loads the model now, waiting for the outcome.
    pub async fn warm_model(&self) -> Result<(), Arc<ModelError>> {
        self.cache.warm().await
    }

    /// Starts loading the model in the background.
    pub fn spawn_warm(&self) -> tokio::task::JoinHandle<()> {
        self.cache.spawn_warm()
    }
}

fn require_card_id(card_id: &str) -> ReviewResult<()> {
    if card_id.trim().is_empty() {
        return Err(ReviewError::validation("cardId must not be empty"));
    }
    Ok(())
}
