//! Mealsight Evidence Aggregator
//!
//! Combines per-frame [`FrameEvidence`](mealsight_domain::FrameEvidence)
//! ballots and the speech hypothesis into one final
//! [`FoodAnalysis`](mealsight_domain::FoodAnalysis).
//!
//! # Voting model
//!
//! Every unique component name gets one ballot; each frame that detected
//! it casts a vote carrying that frame's nutrition estimate and
//! confidence. The vote ratio, boosted by a fixed bonus when speech
//! mentioned the component, maps to a confidence tier:
//!
//! ```text
//! ratio >= 0.6          -> high   (multiplier 1.0)
//! 0.4 <= ratio < 0.6    -> medium (multiplier 0.8)
//! ratio < 0.4           -> excluded
//! ```
//!
//! Included components are folded with confidence-weighted means, totals
//! are recomputed from the component list, and the result carries voting
//! metadata (frames analyzed, dish conflicts, overall confidence).
//!
//! Aggregation never fails: an empty evidence batch yields a
//! distinguished empty analysis instead.

#![warn(missing_docs)]

mod aggregator;
mod config;
mod voting;

pub use aggregator::Aggregator;
pub use config::VotingConfig;
pub use voting::{collect_ballots, decide_tier, weighted_consensus, ComponentBallot};
