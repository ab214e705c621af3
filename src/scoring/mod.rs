//! Answer grading: embedding similarity, verdict bands and feedback text.
//!
//! [`AnswerScorer::score`] short-circuits literal matches, otherwise encodes
//! `[answer, reference, keypoints..]` in one batch and combines
//!
//! ```text
//! score = 0.65 * cosine + 0.35 * coverage
//! ```
//!
//! where `cosine` and each keypoint similarity are rescaled from `[-1, 1]` to `[0, 1]`.
//! The verdict comes from [`classify`] and is then corrected by [`adjust_verdict`].

pub mod classifier;
pub mod error;
pub mod feedback;
pub mod scorer;
pub mod types;


pub use classifier::{adjust_verdict, classify, downgrade};
pub use error::ScoringError;
pub use feedback::{FULL_MARKS_FEEDBACK, generate_feedback};
pub use scorer::{AnswerScorer, compute_components, exact_match};
pub use types::{ScoreComponents, ScoreRequest, ScoreResult, Verdict, round2};
