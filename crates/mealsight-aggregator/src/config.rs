//! Configuration for evidence voting

use serde::{Deserialize, Serialize};

/// Named voting constants for the evidence aggregator.
///
/// The defaults carry no documented derivation; they are tuned values, so
/// they live here as overridable configuration rather than buried literals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotingConfig {
    /// Bonus added to a component's vote ratio when speech mentioned it.
    /// Speech is a first-person signal and is trusted more than any single
    /// frame.
    pub audio_bonus: f64,

    /// Boosted ratio at or above which a component is included at the
    /// medium tier
    pub medium_threshold: f64,

    /// Boosted ratio at or above which a component is included at the
    /// high tier
    pub high_threshold: f64,
}

impl Default for VotingConfig {
    fn default() -> Self {
        Self {
            audio_bonus: 0.3,
            medium_threshold: 0.4,
            high_threshold: 0.6,
        }
    }
}

impl VotingConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.audio_bonus) {
            return Err("audio_bonus must be in [0, 1]".to_string());
        }
        if !(0.0..=1.0).contains(&self.medium_threshold)
            || !(0.0..=1.0).contains(&self.high_threshold)
        {
            return Err("thresholds must be in [0, 1]".to_string());
        }
        if self.medium_threshold > self.high_threshold {
            return Err("medium_threshold cannot exceed high_threshold".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(VotingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_thresholds_are_invalid() {
        let mut config = VotingConfig::default();
        config.medium_threshold = 0.7;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = VotingConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = VotingConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config.audio_bonus, parsed.audio_bonus);
        assert_eq!(config.high_threshold, parsed.high_threshold);
    }
}
