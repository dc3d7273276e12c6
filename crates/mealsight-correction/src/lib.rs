//! Mealsight Correction Engine
//!
//! Applies free-text user corrections ("no bread", "500g", "this is stew,
//! not soup") to a [`FoodAnalysis`](mealsight_domain::FoodAnalysis).
//!
//! # Architecture
//!
//! Corrections flow through an ordered chain of strategies implementing
//! [`CorrectionStrategy`]:
//!
//! ```text
//! text -> pre-validation -> AI interpreter -> rule-based fallback
//! ```
//!
//! The AI strategy handles compound and judgment-heavy edits and its
//! totals are accepted after structural validation; any failure there
//! falls through to the rule-based strategy, whose four fixed patterns
//! (remove / add / rename / rescale) always resum totals from the edited
//! component list. Text matching no pattern yields a guidance message
//! listing the supported forms.
//!
//! The engine is stateless; per-session correction limits are enforced by
//! the caller.

#![warn(missing_docs)]

mod ai;
mod engine;
mod rules;
mod strategy;

pub use ai::AiCorrectionStrategy;
pub use engine::{CorrectionEngine, CorrectionOutcome};
pub use rules::{guidance_message, RuleCorrectionStrategy};
pub use strategy::{CorrectionStrategy, StrategyOutcome};
