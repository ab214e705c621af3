use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Grading outcome, ordered `incorrect < missing < almost < correct`.
pub enum Verdict {
    /// Answer does not match.
    Incorrect,
    /// Partially correct; concepts missing.
    Missing,
    /// Close to the reference.
    Almost,
    /// Matches the reference.
    Correct,
}

impl Verdict {
    /// Severity order used by downgrades, best first.
    pub const SEQUENCE: [Verdict; 4] = [
        Verdict::Correct,
        Verdict::Almost,
        Verdict::Missing,
        Verdict::Incorrect,
    ];

    /// Returns the lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Incorrect => "incorrect",
            Verdict::Missing => "missing",
            Verdict::Almost => "almost",
            Verdict::Correct => "correct",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A learner's answer to grade against the card's reference.
pub struct ScoreRequest {
    /// Opaque card identifier.
    pub card_id: String,
    /// Question shown to the learner.
    #[serde(default)]
    pub prompt: String,
    /// Reference answer.
    pub expected_answer: String,
    /// Concepts the answer should mention, in reporting order.
    #[serde(default)]
    pub keypoints: Vec<String>,
    /// The learner's answer.
    pub user_answer: String,
    /// Literal equivalents accepted by the exact-match shortcut.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub alternative_answers: Vec<String>,
}

impl ScoreRequest {
    /// Creates a request with no prompt, keypoints or alternatives.
    pub fn new(
        card_id: impl Into<String>,
        expected_answer: impl Into<String>,
        user_answer: impl Into<String>,
    ) -> Self {
        Self {
            card_id: card_id.into(),
            prompt: String::new(),
            expected_answer: expected_answer.into(),
            keypoints: Vec::new(),
            user_answer: user_answer.into(),
            alternative_answers: Vec::new(),
        }
    }

    /// Sets the keypoints.
    pub fn with_keypoints<I, S>(mut self, keypoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keypoints = keypoints.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the alternative answers.
    pub fn with_alternatives<I, S>(mut self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alternative_answers = alternatives.into_iter().map(Into::into).collect();
        self
    }

    /// Returns `true` if the request carries at least one keypoint.
    pub fn has_keypoints(&self) -> bool {
        !self.keypoints.is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq)]
/// Unrounded similarity measurements for one answer.
pub struct ScoreComponents {
    /// Combined score in `[0, 1]`.
    pub score: f32,
    /// Rescaled answer/reference similarity in `[0, 1]`.
    pub cosine: f32,
    /// Mean rescaled answer/keypoint similarity in `[0, 1]`.
    pub coverage: f32,
    /// Keypoints below the similarity threshold, in request order.
    pub missing_keypoints: Vec<String>,
}

impl ScoreComponents {
    /// Components of a literal match: everything perfect, nothing missing.
    pub fn perfect() -> Self {
        Self {
            score: 1.0,
            cosine: 1.0,
            coverage: 1.0,
            missing_keypoints: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Graded answer as returned to callers.
pub struct ScoreResult {
    /// Final verdict after corrections.
    pub verdict: Verdict,
    /// Combined score, rounded to two decimals.
    pub score: f32,
    /// Keypoints the answer did not cover.
    pub missing_keypoints: Vec<String>,
    /// Explanation text.
    pub feedback: Option<String>,
    /// Answer/reference similarity, rounded to two decimals.
    pub cosine: f32,
    /// Keypoint coverage, rounded to two decimals.
    pub coverage: f32,
}

impl ScoreResult {
    /// Builds a result from components, rounding and clamping every number.
    pub fn from_components(
        verdict: Verdict,
        components: ScoreComponents,
        feedback: Option<String>,
    ) -> Self {
        Self {
            verdict,
            score: round2(components.score),
            missing_keypoints: components.missing_keypoints,
            feedback,
            cosine: round2(components.cosine),
            coverage: round2(components.coverage),
        }
    }
}

/// Clamps to `[0, 1]` (NaN becomes 0) and rounds to two decimals.
pub fn round2(value: f32) -> f32 {
    let clamped = if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    };
    (clamped * 100.0).round() / 100.0
}
