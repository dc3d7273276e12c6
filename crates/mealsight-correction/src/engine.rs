//! The correction engine: an ordered chain of strategies

use crate::rules::{guidance_message, RuleCorrectionStrategy};
use crate::strategy::{CorrectionStrategy, StrategyOutcome};
use crate::ai::AiCorrectionStrategy;
use mealsight_domain::FoodAnalysis;
use mealsight_llm::ChatProvider;
use tracing::{debug, info};

/// Minimum correction text length (characters)
const MIN_CORRECTION_CHARS: usize = 3;
/// Maximum correction text length (characters)
const MAX_CORRECTION_CHARS: usize = 500;

/// Final outcome of a correction request
#[derive(Debug, Clone, PartialEq)]
pub enum CorrectionOutcome {
    /// The correction was understood and applied
    Applied(FoodAnalysis),

    /// The correction was refused, with a user-facing message explaining
    /// what to try instead
    Rejected(String),
}

impl CorrectionOutcome {
    /// Whether the correction was applied
    pub fn is_applied(&self) -> bool {
        matches!(self, CorrectionOutcome::Applied(_))
    }
}

/// Applies user corrections to an analysis by trying strategies in order.
///
/// Stateless: session correction limits are the caller's responsibility.
pub struct CorrectionEngine {
    strategies: Vec<Box<dyn CorrectionStrategy>>,
}

impl CorrectionEngine {
    /// Build an engine from an explicit strategy chain
    pub fn new(strategies: Vec<Box<dyn CorrectionStrategy>>) -> Self {
        Self { strategies }
    }

    /// The default chain: AI interpretation first, rule-based fallback
    pub fn with_ai<P: ChatProvider + 'static>(provider: P) -> Self {
        Self::new(vec![
            Box::new(AiCorrectionStrategy::new(provider)),
            Box::new(RuleCorrectionStrategy),
        ])
    }

    /// Rule-based only, for deployments without a text capability
    pub fn rule_based_only() -> Self {
        Self::new(vec![Box::new(RuleCorrectionStrategy)])
    }

    /// Apply a correction to the current analysis.
    ///
    /// Pre-validates the text length, then tries each strategy in order.
    /// The first applied or rejected outcome wins; if every strategy
    /// passes, the guidance message is returned.
    pub async fn apply(&self, text: &str, analysis: &FoodAnalysis) -> CorrectionOutcome {
        let trimmed = text.trim();
        if trimmed.chars().count() < MIN_CORRECTION_CHARS {
            return CorrectionOutcome::Rejected(
                "That correction is too short. Tell me what to change, for \
                 example \"no bread\" or \"500g\"."
                    .to_string(),
            );
        }
        if trimmed.chars().count() > MAX_CORRECTION_CHARS {
            return CorrectionOutcome::Rejected(
                "That correction is too long. Keep it to one short edit, for \
                 example \"no bread\" or \"500g\"."
                    .to_string(),
            );
        }

        for strategy in &self.strategies {
            debug!("Trying correction strategy '{}'", strategy.name());
            match strategy.attempt(trimmed, analysis).await {
                StrategyOutcome::Applied(updated) => {
                    info!("Correction applied by '{}' strategy", strategy.name());
                    return CorrectionOutcome::Applied(updated);
                }
                StrategyOutcome::Rejected(message) => {
                    info!("Correction rejected by '{}' strategy", strategy.name());
                    return CorrectionOutcome::Rejected(message);
                }
                StrategyOutcome::NotApplicable => continue,
            }
        }

        CorrectionOutcome::Rejected(guidance_message())
    }
}
