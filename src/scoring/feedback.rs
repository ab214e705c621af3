use super::types::{ScoreComponents, Verdict};
use crate::constants::LOW_COVERAGE_HINT;

/// Feedback for a full-marks answer (also used by the exact-match shortcut).
pub const FULL_MARKS_FEEDBACK: &str = "Excellent! Your answer covers all key concepts.";

const REVIEW_PROMPT: &str = "Review the expected answer below to see what you missed.";
const RETRY_PROMPT: &str = "Please review the expected answer below and try again.";

/// Composes feedback text from the verdict and score components.
///
/// Returns `None` only if no fragment applies.
pub fn generate_feedback(
    verdict: Verdict,
    components: &ScoreComponents,
    keypoints: &[String],
) -> Option<String> {
    let missing = &components.missing_keypoints;
    let listed = missing.join(", ");
    let mut parts: Vec<String> = Vec::with_capacity(3);

    match verdict {
        Verdict::Correct if missing.is_empty() => parts.push(FULL_MARKS_FEEDBACK.to_string()),
        Verdict::Correct => parts.push(format!(
            "Great job! Your answer is correct, but consider including: {listed}"
        )),
        Verdict::Almost if missing.is_empty() => parts.push(
            "Close! Your understanding is good, but try to be more precise or complete."
                .to_string(),
        ),
        Verdict::Almost => {
            let noun = if missing.len() == 1 { "keyword" } else { "keywords" };
            parts.push(format!(
                "You're on the right track! Missing {} key {noun}: {listed}",
                missing.len()
            ));
        }
        Verdict::Missing => {
            if missing.is_empty() {
                parts.push(
                    "Your answer covers some concepts but needs more detail or accuracy."
                        .to_string(),
                );
            } else {
                parts.push(format!(
                    "Partially correct. You're missing important concepts: {listed}"
                ));
            }
            if !keypoints.is_empty() {
                parts.push(REVIEW_PROMPT.to_string());
            }
        }
        Verdict::Incorrect => {
            if missing.is_empty() {
                parts.push("This answer doesn't align with the expected response.".to_string());
            } else {
                parts.push(format!(
                    "Your answer doesn't match the expected response. Key concepts missing: {listed}"
                ));
            }
            parts.push(RETRY_PROMPT.to_string());
        }
    }

    if !keypoints.is_empty() && components.coverage < LOW_COVERAGE_HINT {
        let covered = keypoints.len().saturating_sub(missing.len());
        parts.push(format!(
            "(Covered {covered}/{} key concepts)",
            keypoints.len()
        ));
    }

    let text = parts.join(" ");
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
