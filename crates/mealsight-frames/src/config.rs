//! Configuration for the frame selector

use serde::{Deserialize, Serialize};

/// Configuration for the Frame Quality Selector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Number of best frames to keep
    pub target_frames: usize,

    /// JPEG quality for encoded output frames
    pub jpeg_quality: u8,

    /// Skip window for videos shorter than 5 seconds
    pub short_skip_secs: f64,

    /// Skip window for videos between 5 and 10 seconds
    pub medium_skip_secs: f64,

    /// Skip window for videos of 10 seconds or longer
    pub long_skip_secs: f64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            target_frames: 5,
            jpeg_quality: 90,
            short_skip_secs: 1.0,
            medium_skip_secs: 2.0,
            long_skip_secs: 3.0,
        }
    }
}

impl FrameConfig {
    /// Skip window for a video of the given duration.
    ///
    /// The first seconds of a self-recorded loop usually show the user,
    /// not the food.
    pub fn skip_seconds(&self, duration_secs: f64) -> f64 {
        if duration_secs < 5.0 {
            self.short_skip_secs
        } else if duration_secs < 10.0 {
            self.medium_skip_secs
        } else {
            self.long_skip_secs
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.target_frames == 0 {
            return Err("target_frames must be greater than 0".to_string());
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err("jpeg_quality must be in 1..=100".to_string());
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
