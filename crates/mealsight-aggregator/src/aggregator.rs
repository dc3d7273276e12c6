//! Evidence aggregation into a final analysis

use crate::config::VotingConfig;
use crate::voting::{collect_ballots, decide_tier, weighted_consensus};
use mealsight_domain::{
    AggregationMetadata, AnalysisSource, FoodAnalysis, FoodComponent, FrameEvidence,
    SpeechHypothesis,
};
use tracing::{debug, info};

/// Total calories above which a "high calorie" warning is raised
const HIGH_CALORIE_THRESHOLD: u32 = 800;
/// Total carbs (g) above which a "high carbs" warning is raised
const HIGH_CARBS_THRESHOLD: f64 = 100.0;
/// Total protein (g) below which a "low protein" warning is raised
const LOW_PROTEIN_THRESHOLD: f64 = 15.0;

/// Discount applied to overall confidence when any warning was generated
const WARNING_CONFIDENCE_DISCOUNT: f64 = 0.9;

/// Combines per-frame evidence and the speech hypothesis into one
/// [`FoodAnalysis`] via confidence-weighted voting.
pub struct Aggregator {
    config: VotingConfig,
}

impl Aggregator {
    /// Create an aggregator with the given voting configuration
    pub fn new(config: VotingConfig) -> Self {
        Self { config }
    }

    /// Aggregate a complete evidence batch.
    ///
    /// Never fails: zero evidence yields the distinguished empty analysis
    /// (no components, recognition-failed warning, health score 0).
    pub fn aggregate(
        &self,
        hypothesis: &SpeechHypothesis,
        evidences: &[FrameEvidence],
    ) -> FoodAnalysis {
        if evidences.is_empty() {
            info!("No frame evidence; returning empty analysis");
            return self.empty_analysis(hypothesis, 0);
        }

        let ballots = collect_ballots(evidences);
        debug!(
            "{} unique component names across {} frames",
            ballots.len(),
            evidences.len()
        );

        // One entry per included component: (ballot order index, consensus)
        let mut included: Vec<(usize, FoodComponent)> = Vec::new();
        for (order, ballot) in ballots.iter().enumerate() {
            let ratio = ballot.vote_ratio();
            let boosted = if hypothesis.mentions(&ballot.name) {
                ratio + self.config.audio_bonus
            } else {
                ratio
            };

            match decide_tier(boosted, &self.config) {
                Some(tier) => {
                    debug!(
                        "'{}': {}/{} votes, boosted ratio {:.2} -> {}",
                        ballot.name,
                        ballot.votes.len(),
                        ballot.frame_total,
                        boosted,
                        tier.as_str()
                    );
                    included.push((order, weighted_consensus(ballot, tier)));
                }
                None => {
                    debug!(
                        "'{}': {}/{} votes, boosted ratio {:.2} -> excluded",
                        ballot.name,
                        ballot.votes.len(),
                        ballot.frame_total,
                        boosted
                    );
                }
            }
        }

        if included.is_empty() {
            info!("Voting excluded every component; returning empty analysis");
            return self.empty_analysis(hypothesis, evidences.len());
        }

        // Strongest evidence first: by vote count, confidence as tiebreak
        included.sort_by(|a, b| {
            let votes_a = ballots[a.0].votes.len();
            let votes_b = ballots[b.0].votes.len();
            votes_b
                .cmp(&votes_a)
                .then(b.1.confidence.total_cmp(&a.1.confidence))
        });
        let components: Vec<FoodComponent> =
            included.into_iter().map(|(_, comp)| comp).collect();

        let dish_name = derive_dish_name(&components);
        let mut analysis = FoodAnalysis::from_components(dish_name, components);

        analysis.health_score = health_score(&analysis);
        push_nutrition_warnings(&mut analysis);

        let has_transcription = !hypothesis.transcription.is_empty();
        analysis.audio_transcription =
            has_transcription.then(|| hypothesis.transcription.clone());
        analysis.transcription_used = has_transcription;
        analysis.source = Some(AnalysisSource::VideoNote);

        let mut final_confidence = analysis.mean_confidence();
        if !analysis.warnings.is_empty() {
            final_confidence *= WARNING_CONFIDENCE_DISCOUNT;
        }

        analysis.aggregation_metadata = Some(AggregationMetadata {
            frames_analyzed: evidences.len(),
            conflicts_resolved: count_dish_conflicts(evidences),
            audio_hypothesis_used: has_transcription,
            final_confidence,
        });

        info!(
            "Aggregated '{}': {} components, {} kcal, confidence {:.2}",
            analysis.dish_name,
            analysis.components.len(),
            analysis.calories_total,
            final_confidence
        );

        analysis
    }

    fn empty_analysis(&self, hypothesis: &SpeechHypothesis, frames_analyzed: usize) -> FoodAnalysis {
        let mut analysis = FoodAnalysis::from_components("Unrecognized meal", Vec::new());
        analysis.health_score = 0;
        analysis.push_warning(
            "Could not recognize any food in the video. Try again with better \
             lighting and a clearer view of the dish.",
        );
        analysis.source = Some(AnalysisSource::VideoNote);

        let has_transcription = !hypothesis.transcription.is_empty();
        analysis.audio_transcription =
            has_transcription.then(|| hypothesis.transcription.clone());
        analysis.aggregation_metadata = Some(AggregationMetadata {
            frames_analyzed,
            conflicts_resolved: 0,
            audio_hypothesis_used: has_transcription,
            final_confidence: 0.0,
        });
        analysis
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(VotingConfig::default())
    }
}

/// "X" for one component, "X with y" for more
fn derive_dish_name(components: &[FoodComponent]) -> String {
    match components {
        [] => "Unrecognized meal".to_string(),
        [only] => only.name.clone(),
        [first, second, ..] => format!("{} with {}", first.name, second.name.to_lowercase()),
    }
}

/// Coarse additive healthiness heuristic seeded at 5.
///
/// Deliberately self-contained: this is not the single-photo scoring
/// engine and must not be unified with it.
fn health_score(analysis: &FoodAnalysis) -> u8 {
    let mut score = 5u8;
    if analysis.protein_g > 20.0 {
        score += 1;
    }
    if analysis.fat_g < 20.0 {
        score += 1;
    }
    if analysis.carbs_g < 50.0 {
        score += 1;
    }
    score.min(10)
}

fn push_nutrition_warnings(analysis: &mut FoodAnalysis) {
    if analysis.calories_total > HIGH_CALORIE_THRESHOLD {
        analysis.push_warning(format!(
            "High calorie content: {} kcal",
            analysis.calories_total
        ));
    }
    if analysis.carbs_g > HIGH_CARBS_THRESHOLD {
        analysis.push_warning(format!(
            "High carbohydrate content: {:.0} g",
            analysis.carbs_g
        ));
    }
    if analysis.protein_g < LOW_PROTEIN_THRESHOLD {
        analysis.push_warning(format!("Low protein content: {:.0} g", analysis.protein_g));
    }
}

/// Frames disagreeing on the actual dish, as a distinct-value count above
/// one
fn count_dish_conflicts(evidences: &[FrameEvidence]) -> usize {
    let mut seen: Vec<String> = Vec::new();
    for evidence in evidences {
        if let Some(dish) = &evidence.actual_dish {
            let key = dish.to_lowercase();
            if !seen.contains(&key) {
                seen.push(key);
            }
        }
    }
    seen.len().saturating_sub(1)
}
