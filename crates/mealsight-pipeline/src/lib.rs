//! Mealsight Pipeline
//!
//! Top-level orchestration of the multi-evidence food analysis pipeline.
//!
//! # Overview
//!
//! ```text
//!                 ┌─> speech: audio -> transcript -> hypothesis ─┐
//! video ─ join! ──┤                                              ├─> per-frame
//!                 └─> frames: score -> select -> enhance ────────┘    analysis
//!                                                                        │
//!                                              final analysis <── voting ┘
//! ```
//!
//! The two evidence arms run concurrently; per-frame vision calls fan out
//! concurrently as well and aggregation waits for the complete batch.
//!
//! # Entry points
//!
//! - [`Pipeline::analyze_video`]: the full two-arm pipeline
//! - [`Pipeline::analyze_photo`]: single vision call, no hypothesis, with
//!   a TTL cache and realistic-range validation warnings
//! - [`Pipeline::apply_correction`]: session-bounded correction loop over
//!   the [`SessionStore`](mealsight_domain::SessionStore) seam
//!
//! Degraded inputs (no transcription credential, missing ffmpeg, a single
//! failed frame) never surface as errors; only exhaustion conditions and
//! caller misuse reach [`PipelineError`], each with a user-facing message.

#![warn(missing_docs)]

mod cache;
mod config;
mod error;
mod pipeline;
mod session;

#[cfg(test)]
mod tests;

pub use cache::AnalysisCache;
pub use config::PipelineConfig;
pub use error::PipelineError;
pub use pipeline::{CorrectionReply, Pipeline, VideoAnalysisOutcome};
pub use session::{InMemorySessionStore, SessionError, SessionStatus};
