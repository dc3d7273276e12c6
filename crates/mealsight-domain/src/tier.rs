//! Confidence tier module - discrete consensus buckets

/// Discrete bucket a component's vote ratio maps to.
///
/// Drives both inclusion in the final analysis and the confidence
/// multiplier applied to the component's averaged confidence. Callers can
/// distinguish "strong consensus" from "weak but included" without
/// re-deriving it from raw vote counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfidenceTier {
    /// Strong cross-frame consensus
    High,

    /// Weak but sufficient consensus
    Medium,

    /// Below the inclusion cutoff. Components in this tier are excluded by
    /// the aggregator; the multiplier exists for completeness.
    Low,
}

impl ConfidenceTier {
    /// Get the tier name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "high",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::Low => "low",
        }
    }

    /// Parse a tier from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "high" => Some(ConfidenceTier::High),
            "medium" => Some(ConfidenceTier::Medium),
            "low" => Some(ConfidenceTier::Low),
            _ => None,
        }
    }

    /// Multiplier applied to a component's averaged confidence
    pub fn multiplier(&self) -> f64 {
        match self {
            ConfidenceTier::High => 1.0,
            ConfidenceTier::Medium => 0.8,
            ConfidenceTier::Low => 0.6,
        }
    }
}

impl std::str::FromStr for ConfidenceTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid tier: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multipliers() {
        assert_eq!(ConfidenceTier::High.multiplier(), 1.0);
        assert_eq!(ConfidenceTier::Medium.multiplier(), 0.8);
        assert_eq!(ConfidenceTier::Low.multiplier(), 0.6);
    }

    #[test]
    fn test_parse_round_trip() {
        for tier in [
            ConfidenceTier::High,
            ConfidenceTier::Medium,
            ConfidenceTier::Low,
        ] {
            assert_eq!(ConfidenceTier::parse(tier.as_str()), Some(tier));
        }
        assert_eq!(ConfidenceTier::parse("none"), None);
    }
}
