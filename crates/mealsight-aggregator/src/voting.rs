//! Confidence-weighted voting per named component

use crate::config::VotingConfig;
use mealsight_domain::component::{round1, title_case};
use mealsight_domain::{ConfidenceTier, FoodComponent, FrameEvidence};

/// All of one component's votes across the analyzed frames.
///
/// One ballot per unique (case-insensitive) component name; each frame
/// that detected the component contributes one vote carrying its reported
/// weight, nutrition, and confidence.
#[derive(Debug, Clone)]
pub struct ComponentBallot {
    /// Component name as first seen
    pub name: String,
    /// One vote per frame that detected the component
    pub votes: Vec<FoodComponent>,
    /// Total frames analyzed in the batch
    pub frame_total: usize,
}

impl ComponentBallot {
    /// Fraction of frames that voted for this component
    pub fn vote_ratio(&self) -> f64 {
        if self.frame_total == 0 {
            return 0.0;
        }
        self.votes.len() as f64 / self.frame_total as f64
    }
}

/// Collect per-name ballots across all frame evidences, in first-seen
/// order. Names are keyed case-insensitively.
pub fn collect_ballots(evidences: &[FrameEvidence]) -> Vec<ComponentBallot> {
    let frame_total = evidences.len();
    let mut ballots: Vec<ComponentBallot> = Vec::new();

    for evidence in evidences {
        for component in &evidence.components {
            let key = component.name.to_lowercase();
            match ballots
                .iter_mut()
                .find(|ballot| ballot.name.to_lowercase() == key)
            {
                Some(ballot) => ballot.votes.push(component.clone()),
                None => ballots.push(ComponentBallot {
                    name: component.name.clone(),
                    votes: vec![component.clone()],
                    frame_total,
                }),
            }
        }
    }

    ballots
}

/// Map a (possibly audio-boosted) vote ratio to an inclusion tier.
///
/// Thresholds are inclusive: a ratio of exactly `high_threshold` is High
/// and exactly `medium_threshold` is Medium. `None` means the component is
/// excluded as a probable per-frame recognition error.
pub fn decide_tier(boosted_ratio: f64, config: &VotingConfig) -> Option<ConfidenceTier> {
    if boosted_ratio >= config.high_threshold {
        Some(ConfidenceTier::High)
    } else if boosted_ratio >= config.medium_threshold {
        Some(ConfidenceTier::Medium)
    } else {
        None
    }
}

/// Fold a ballot's votes into one consensus component.
///
/// Weight, calories, and macros are the confidence-weighted mean across
/// votes; the final confidence is the plain mean scaled by the tier
/// multiplier.
pub fn weighted_consensus(ballot: &ComponentBallot, tier: ConfidenceTier) -> FoodComponent {
    let confidence_sum: f64 = ballot.votes.iter().map(|v| v.confidence).sum();
    let count = ballot.votes.len() as f64;

    let weighted = |field: fn(&FoodComponent) -> f64| -> f64 {
        if confidence_sum > 0.0 {
            ballot
                .votes
                .iter()
                .map(|v| field(v) * v.confidence)
                .sum::<f64>()
                / confidence_sum
        } else {
            // All votes at zero confidence; fall back to a plain mean
            ballot.votes.iter().map(field).sum::<f64>() / count
        }
    };

    let mean_confidence = confidence_sum / count;

    FoodComponent {
        name: title_case(&ballot.name),
        weight_g: weighted(|v| v.weight_g as f64).round() as u32,
        calories: weighted(|v| v.calories as f64).round() as u32,
        protein_g: round1(weighted(|v| v.protein_g)),
        fat_g: round1(weighted(|v| v.fat_g)),
        carbs_g: round1(weighted(|v| v.carbs_g)),
        confidence: mean_confidence * tier.multiplier(),
    }
}
