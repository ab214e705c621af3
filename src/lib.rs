//! Retention library crate (used by the server binary and integration tests).
//!
//! # Public API Surface
//!
//! ## Grading
//! - [`AnswerScorer`], [`ScoreRequest`], [`ScoreResult`], [`Verdict`] - Embedding-based answer grading
//!
//! ## Scheduling
//! - [`ScheduleState`], [`Quality`], [`next_state`] - SM-2 review scheduling
//! - [`ScheduleStore`], [`MemoryScheduleStore`] - Per-card schedule persistence
//!
//! ## Model Cache
//! - [`ModelCacheManager`], [`ModelCacheConfig`] - Single-flight model download and load
//! - [`ModelState`], [`ModelEvent`], [`ModelCacheStatus`] - Lifecycle reporting
//! - [`InitOnce`] - The single-flight primitive underneath
//!
//! ## Service
//! - [`ReviewService`] - Grade, self-rate and bulk-schedule cards
//! - [`gateway`] - HTTP routes over the service
//!
//! ## Test/Mock Support
//! [`lifecycle::MockModelBackend`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod lifecycle;
pub mod once;
pub mod review;
pub mod schedule;
pub mod scoring;

pub use config::{Config, ConfigError};
pub use embedding::{EmbeddingError, EmbeddingProvider, MiniLmEmbedder, StubEmbedder};
pub use lifecycle::{
    ModelBackend, ModelCacheConfig, ModelCacheManager, ModelCacheStatus, ModelError, ModelEvent,
    ModelState,
};
pub use once::InitOnce;
pub use review::{BulkOperation, GradedAttempt, ReviewError, ReviewService};
pub use schedule::{
    MemoryScheduleStore, Quality, ScheduleError, ScheduleState, ScheduleStore, next_state,
};
pub use scoring::{AnswerScorer, ScoreRequest, ScoreResult, ScoringError, Verdict};
