use std::sync::Arc;

use tracing::{debug, info};

use super::classifier::{adjust_verdict, classify};
use super::error::ScoringError;
use super::feedback::{FULL_MARKS_FEEDBACK, generate_feedback};
use super::types::{ScoreComponents, ScoreRequest, ScoreResult, Verdict};
use crate::constants::{EMBEDDING_WEIGHT, KEYPOINT_SIM_THRESHOLD, KEYPOINT_WEIGHT};
use crate::embedding::normalized_similarity;
use crate::lifecycle::ModelCacheManager;

impl ScoreRequest {
    /// Rejects requests with an empty user answer. Whitespace-only answers are graded.
    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.user_answer.is_empty() {
            return Err(ScoringError::InvalidInput {
                reason: "userAnswer must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Returns `true` if the answer literally matches the reference or an alternative
/// (ignoring surrounding whitespace and case).
pub fn exact_match(request: &ScoreRequest) -> bool {
    let answer = normalize(&request.user_answer);
    answer == normalize(&request.expected_answer)
        || request
            .alternative_answers
            .iter()
            .any(|alt| normalize(alt) == answer)
}

/// Derives similarity components from encoded vectors.
///
/// `vectors` must be `[answer, reference, keypoint_0, ..]`, one per keypoint.
pub fn compute_components(
    vectors: &[Vec<f32>],
    keypoints: &[String],
) -> Result<ScoreComponents, ScoringError> {
    let expected = keypoints.len() + 2;
    if vectors.len() != expected {
        return Err(ScoringError::Compute {
            reason: format!(
                "provider returned {} vectors for {} inputs",
                vectors.len(),
                expected
            ),
        });
    }

    let answer = &vectors[0];
    let cosine = normalized_similarity(answer, &vectors[1]);

    let (coverage, missing_keypoints) = if keypoints.is_empty() {
        (1.0, Vec::new())
    } else {
        let mut total = 0.0f32;
        let mut missing = Vec::new();
        for (keypoint, vector) in keypoints.iter().zip(&vectors[2..]) {
            let similarity = normalized_similarity(answer, vector);
            total += similarity;
            if similarity < KEYPOINT_SIM_THRESHOLD {
                missing.push(keypoint.clone());
            }
        }
        (total / keypoints.len() as f32, missing)
    };

    let score = (EMBEDDING_WEIGHT * cosine + KEYPOINT_WEIGHT * coverage).clamp(0.0, 1.0);

    Ok(ScoreComponents {
        score,
        cosine,
        coverage,
        missing_keypoints,
    })
}

/// Grades answers with the shared embedding model.
#[derive(Clone)]
pub struct AnswerScorer {
    cache: Arc<ModelCacheManager>,
}

impl std::fmt::Debug for AnswerScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerScorer")
            .field("model_ready", &self.cache.is_ready())
            .finish()
    }
}

impl AnswerScorer {
    pub fn new(cache: Arc<ModelCacheManager>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<ModelCacheManager> {
        &self.cache
    }

    /// Scores `request`, loading the model first if needed.
    ///
    /// Literal matches never touch the model. Model failures surface as
    /// [`ScoringError::ModelUnavailable`].
    pub async fn score(&self, request: &ScoreRequest) -> Result<ScoreResult, ScoringError> {
        request.validate()?;

        if exact_match(request) {
            debug!(card_id = %request.card_id, "Exact match - skipping embedding");
            return Ok(ScoreResult::from_components(
                Verdict::Correct,
                ScoreComponents::perfect(),
                Some(FULL_MARKS_FEEDBACK.to_string()),
            ));
        }

        let provider = self.cache.ensure_ready().await?;

        let mut inputs = Vec::with_capacity(request.keypoints.len() + 2);
        inputs.push(request.user_answer.clone());
        inputs.push(request.expected_answer.clone());
        inputs.extend(request.keypoints.iter().cloned());

        debug!(
            card_id = %request.card_id,
            inputs = inputs.len(),
            provider = provider.name(),
            "Encoding answer, reference and keypoints"
        );

        let vectors = tokio::task::spawn_blocking(move || provider.encode(&inputs)).await??;
        let components = compute_components(&vectors, &request.keypoints)?;

        let base = classify(components.score);
        let verdict = adjust_verdict(base, &components, request.has_keypoints());

        debug!(
            score = components.score,
            cosine = components.cosine,
            coverage = components.coverage,
            missing = components.missing_keypoints.len(),
            base = %base,
            "Computed score components"
        );

        let feedback = generate_feedback(verdict, &components, &request.keypoints);
        let result = ScoreResult::from_components(verdict, components, feedback);

        info!(
            card_id = %request.card_id,
            verdict = %result.verdict,
            score = result.score,
            "Answer graded"
        );

        Ok(result)
    }
}
