//! Configuration for the frame analyzer

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the frame analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Maximum time for one per-frame vision call (seconds)
    pub per_frame_timeout_secs: u64,

    /// Output token budget per frame response
    pub max_response_tokens: u32,
}

impl AnalyzerConfig {
    /// Get the per-frame timeout as a Duration
    pub fn per_frame_timeout(&self) -> Duration {
        Duration::from_secs(self.per_frame_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.per_frame_timeout_secs == 0 {
            return Err("per_frame_timeout_secs must be greater than 0".to_string());
        }
        if self.max_response_tokens == 0 {
            return Err("max_response_tokens must be greater than 0".to_string());
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

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            per_frame_timeout_secs: 60,
            max_response_tokens: 1500,
        }
    }
}
