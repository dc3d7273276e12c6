//! The correction strategy seam

use async_trait::async_trait;
use mealsight_domain::FoodAnalysis;

/// Outcome of one strategy's attempt at a correction
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyOutcome {
    /// The strategy understood the correction and produced an updated
    /// analysis
    Applied(FoodAnalysis),

    /// The strategy could not handle this correction; the engine should
    /// try the next strategy in the chain
    NotApplicable,

    /// The strategy understood the correction but must refuse it, with a
    /// user-facing message. Stops the chain.
    Rejected(String),
}

/// One way of interpreting a user's correction text.
///
/// Strategies are tried in a fixed order by the engine until one applies
/// or rejects; they are stateless and unaware of session correction
/// limits.
#[async_trait]
pub trait CorrectionStrategy: Send + Sync {
    /// Short name for logging
    fn name(&self) -> &'static str;

    /// Attempt to apply `text` to `analysis`
    async fn attempt(&self, text: &str, analysis: &FoodAnalysis) -> StrategyOutcome;
}
