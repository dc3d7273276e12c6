//! Top-level pipeline configuration

use mealsight_aggregator::VotingConfig;
use mealsight_analyzer::AnalyzerConfig;
use mealsight_frames::FrameConfig;
use mealsight_speech::SpeechConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the whole analysis pipeline.
///
/// Nests each stage's configuration and adds the orchestration-level
/// limits (photo size cap, correction cap, cache sizing).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Frame quality selector configuration
    pub frame: FrameConfig,

    /// Speech hypothesis extractor configuration
    pub speech: SpeechConfig,

    /// Per-frame vision analysis configuration
    pub analyzer: AnalyzerConfig,

    /// Evidence voting configuration
    pub voting: VotingConfig,

    /// Maximum accepted photo size in bytes
    pub max_photo_bytes: usize,

    /// Timeout for the single-photo vision call (seconds)
    pub photo_timeout_secs: u64,

    /// Maximum corrections per session before confirm-or-cancel
    pub max_corrections: u32,

    /// Photo analysis cache capacity (entries)
    pub cache_capacity: usize,

    /// Photo analysis cache entry lifetime (seconds)
    pub cache_ttl_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            frame: FrameConfig::default(),
            speech: SpeechConfig::default(),
            analyzer: AnalyzerConfig::default(),
            voting: VotingConfig::default(),
            max_photo_bytes: 10 * 1024 * 1024,
            photo_timeout_secs: 60,
            max_corrections: 3,
            cache_capacity: 100,
            cache_ttl_secs: 300,
        }
    }
}

impl PipelineConfig {
    /// Get the photo call timeout as a Duration
    pub fn photo_timeout(&self) -> Duration {
        Duration::from_secs(self.photo_timeout_secs)
    }

    /// Get the cache TTL as a Duration
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Validate the configuration, including every nested stage
    pub fn validate(&self) -> Result<(), String> {
        self.frame.validate()?;
        self.speech.validate()?;
        self.analyzer.validate()?;
        self.voting.validate()?;
        if self.max_photo_bytes == 0 {
            return Err("max_photo_bytes must be greater than 0".to_string());
        }
        if self.photo_timeout_secs == 0 {
            return Err("photo_timeout_secs must be greater than 0".to_string());
        }
        if self.max_corrections == 0 {
            return Err("max_corrections must be greater than 0".to_string());
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
