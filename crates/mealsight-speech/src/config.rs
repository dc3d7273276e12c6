//! Configuration for the speech extractor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Speech Hypothesis Extractor.
///
/// Lexicons are deployment data, not code: the defaults target an English
/// deployment, but every list is injectable for other languages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Language hint passed to the transcription capability
    pub language_hint: String,

    /// Path or name of the ffmpeg binary
    pub ffmpeg_path: String,

    /// Maximum time for the audio-extraction subprocess (seconds)
    pub extraction_timeout_secs: u64,

    /// Known food names; the first one matched in a transcript becomes the
    /// primary dish
    pub food_vocabulary: Vec<String>,

    /// Hedging markers that lower trust in a weight guess
    pub certainty_words: Vec<String>,

    /// Cooking-style markers captured into the hypothesis
    pub cooking_styles: Vec<String>,

    /// Weight-guess confidence when a hedging marker co-occurred
    pub hedged_weight_confidence: f64,

    /// Weight-guess confidence for unhedged speech
    pub plain_weight_confidence: f64,

    /// Confidence assigned to secondary item mentions
    pub secondary_item_confidence: f64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            language_hint: "en".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            extraction_timeout_secs: 30,
            food_vocabulary: [
                "mashed potato",
                "potato",
                "soup",
                "porridge",
                "salad",
                "cutlet",
                "chicken",
                "fish",
                "meat",
                "vegetables",
                "bread",
                "rice",
                "pasta",
                "buckwheat",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            certainty_words: [
                "think", "maybe", "probably", "approximately", "about", "around", "roughly",
                "exactly", "sure",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            cooking_styles: ["fried", "boiled", "stewed", "baked", "roasted", "grilled"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            hedged_weight_confidence: 0.5,
            plain_weight_confidence: 0.7,
            secondary_item_confidence: 0.6,
        }
    }
}

impl SpeechConfig {
    /// Get the extraction timeout as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.extraction_timeout_secs == 0 {
            return Err("extraction_timeout_secs must be greater than 0".to_string());
        }
        if self.food_vocabulary.is_empty() {
            return Err("food_vocabulary must not be empty".to_string());
        }
        if !(0.0..=1.0).contains(&self.hedged_weight_confidence)
            || !(0.0..=1.0).contains(&self.plain_weight_confidence)
            || !(0.0..=1.0).contains(&self.secondary_item_confidence)
        {
            return Err("confidence values must be in [0, 1]".to_string());
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
