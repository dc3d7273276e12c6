//! Mealsight Frame Analyzer
//!
//! Turns selected video frames into per-frame [`FrameEvidence`] by asking a
//! vision capability to verify the speech hypothesis against each image.
//!
//! # Overview
//!
//! One instruction set is built per batch from the hypothesis: a generic
//! "identify everything" request when nothing was said, a verification
//! request stating the spoken claims otherwise. Each frame is then analyzed
//! independently and concurrently, with near-deterministic sampling and a
//! bounded output budget.
//!
//! # Architecture
//!
//! ```text
//! Frames + SpeechHypothesis → PromptBuilder → vision capability → FrameEvidence
//! ```
//!
//! # Failure semantics
//!
//! A frame that times out, errors, or returns unparseable output is dropped
//! with a warning; the batch continues. Only "every frame failed" surfaces
//! as [`AnalyzerError::NoUsableFrames`], which the caller must treat as a
//! hard failure.
//!
//! # Example Usage
//!
//! ```no_run
//! use mealsight_analyzer::{AnalyzerConfig, FrameAnalyzer};
//! use mealsight_domain::SpeechHypothesis;
//! use mealsight_llm::MockChatProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = MockChatProvider::new(r#"{"components": []}"#);
//! let analyzer = FrameAnalyzer::new(provider, AnalyzerConfig::default());
//!
//! let frames: Vec<Vec<u8>> = vec![vec![0xFF, 0xD8]];
//! let evidence = analyzer
//!     .analyze_frames(frames, &SpeechHypothesis::empty())
//!     .await?;
//! println!("{} frames analyzed", evidence.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod analyzer;
mod config;
mod error;
mod parser;
mod prompt;

#[cfg(test)]
mod tests;

pub use analyzer::FrameAnalyzer;
pub use config::AnalyzerConfig;
pub use error::AnalyzerError;
pub use parser::parse_frame_response;
pub use prompt::PromptBuilder;
