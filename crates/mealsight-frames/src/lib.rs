//! Mealsight Frame Quality Selector
//!
//! Scores every decoded frame of a short meal video after an initial skip
//! window, keeps the highest-quality frames, lightly enhances them, and
//! returns JPEG buffers ready for vision analysis.
//!
//! # Overview
//!
//! Self-recorded looping videos typically open on the user's face or hand,
//! not the food, so the first seconds are skipped outright. The remaining
//! frames are scored on sharpness, exposure, texture, and frame-to-frame
//! change; the top N are re-sorted into chronological order because
//! downstream consumers rely on temporal frame indices.
//!
//! # Example
//!
//! ```
//! use mealsight_frames::{FrameConfig, FrameSelector, FrameSequence};
//!
//! let source = FrameSequence::new(Vec::new(), 30.0);
//! let selector = FrameSelector::new(FrameConfig::default());
//! let frames = selector.select_best_frames(source);
//! assert!(frames.is_empty()); // empty video is a normal outcome
//! ```

#![warn(missing_docs)]

mod config;
mod enhance;
mod score;
mod selector;
mod source;

pub use config::FrameConfig;
pub use selector::{FrameSelector, SelectedFrame};
pub use source::{FrameSequence, VideoSource};
