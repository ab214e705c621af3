//! Cross-cutting, shared constants.
//!
//! Grading thresholds and scheduling parameters live here so the classifier, the feedback
//! generator, the scheduler and their tests agree on a single set of numbers.

/// Weight of answer/reference cosine in the combined score.
pub const EMBEDDING_WEIGHT: f32 = 0.65;
/// Weight of keypoint coverage in the combined score.
pub const KEYPOINT_WEIGHT: f32 = 0.35;
/// A keypoint whose normalized similarity falls below this is reported missing.
pub const KEYPOINT_SIM_THRESHOLD: f32 = 0.58;

/// Combined score at or above which an answer is `correct`.
pub const CORRECT_THRESHOLD: f32 = 0.86;
/// Combined score at or above which an answer is `almost`.
pub const ALMOST_THRESHOLD: f32 = 0.76;
/// Combined score at or above which an answer is `missing` (primary table).
pub const MISSING_THRESHOLD: f32 = 0.72;
/// Borderline floor; scores in `[MIN_BORDERLINE_SCORE, MISSING_THRESHOLD)` are still `missing`.
pub const MIN_BORDERLINE_SCORE: f32 = 0.60;

/// Keypoint coverage below this downgrades the verdict by one step.
pub const LOW_COVERAGE_DOWNGRADE: f32 = 0.4;
/// Keypoint coverage below this appends the "covered X/Y" hint to feedback.
pub const LOW_COVERAGE_HINT: f32 = 0.5;

/// Default SM-2 ease factor.
pub const DEFAULT_EASE: f64 = 2.5;
/// Lower bound for the SM-2 ease factor.
pub const MIN_EASE: f64 = 1.3;
/// Interval (days) after a failure and after the first success.
pub const INITIAL_INTERVAL: u32 = 1;
/// Interval (days) after the second consecutive success.
pub const SECOND_INTERVAL: u32 = 6;
/// Upper bound for a computed interval (days), keeps due dates representable.
pub const MAX_INTERVAL: u32 = 36_500;
/// Qualities below this reset the streak.
pub const MIN_SUCCESS_QUALITY: u8 = 3;

/// Interval assigned by the "mark learned" bulk operation.
pub const LEARNED_INTERVAL: u32 = 180;
/// Streak assigned by the "mark learned" bulk operation.
pub const LEARNED_STREAK: u32 = 10;

/// Default embedding model (hub repository id).
pub const DEFAULT_MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";
/// Default hub revision.
pub const DEFAULT_MODEL_REVISION: &str = "main";
/// Default hub base URL.
pub const DEFAULT_HUB_URL: &str = "https://huggingface.co";
/// Output dimension of the default model.
pub const MINILM_EMBEDDING_DIM: usize = 384;
/// Max tokens considered by the default model.
pub const MINILM_MAX_SEQ_LEN: usize = 256;

/// Files a model directory must contain to be loadable.
pub const MODEL_FILES: [&str; 3] = ["config.json", "tokenizer.json", "model.safetensors"];
