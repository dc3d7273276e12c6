//! Mealsight Speech Hypothesis Extractor
//!
//! Turns the audio track of a meal video into a structured, low-confidence
//! [`SpeechHypothesis`](mealsight_domain::SpeechHypothesis) about what the
//! user said they ate.
//!
//! # Pipeline
//!
//! ```text
//! video file -> ffmpeg (mono 16kHz mp3) -> transcription -> lexicon parse
//! ```
//!
//! # Degradation contract
//!
//! Extraction always succeeds. A missing ffmpeg binary, an unconfigured
//! transcription credential, a network failure, or an empty transcript all
//! degrade to the empty hypothesis; none of them is an error the caller
//! has to handle. The parse is deliberately a fixed-lexicon/regex pass,
//! not a second model call: it produces a cheap, inspectable hint, never
//! ground truth.

#![warn(missing_docs)]

mod audio;
mod config;
mod extractor;
mod parser;

pub use audio::AudioError;
pub use config::SpeechConfig;
pub use extractor::SpeechExtractor;
pub use parser::HypothesisParser;
