//! Mealsight Domain Layer
//!
//! This crate contains the core data model for the multi-evidence food
//! analysis pipeline. It has ZERO external dependencies and defines the
//! fundamental value types and trait interfaces that all other layers
//! depend upon.
//!
//! ## Key Concepts
//!
//! - **FoodComponent**: one identified item within a dish, with weight,
//!   macros, and estimator confidence
//! - **FoodAnalysis**: the aggregate estimate exchanged between pipeline
//!   stages; totals are a cache derived from components, never an
//!   independent source of truth
//! - **SpeechHypothesis**: the structured, low-confidence guess about meal
//!   contents derived from speech
//! - **FrameEvidence**: one frame's independent analysis, treated as a
//!   ballot during aggregation
//! - **ConfidenceTier**: the discrete bucket a component's vote ratio maps
//!   to, driving inclusion and the confidence multiplier
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture:
//! - No external crate dependencies
//! - Pure business logic only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod component;
pub mod evidence;
pub mod hypothesis;
pub mod tier;
pub mod traits;
pub mod validate;

// Re-exports for convenience
pub use analysis::{AggregationMetadata, AnalysisSource, FoodAnalysis};
pub use component::FoodComponent;
pub use evidence::FrameEvidence;
pub use hypothesis::{PrimaryDish, SecondaryItem, SpeechHypothesis, WeightGuess};
pub use tier::ConfidenceTier;
pub use traits::{SessionId, SessionStore};
