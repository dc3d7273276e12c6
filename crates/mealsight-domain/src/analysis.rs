//! Food analysis module - the aggregate estimate exchanged between stages

use crate::component::{round1, FoodComponent};

/// Where an analysis came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisSource {
    /// Multi-frame video pipeline
    VideoNote,
    /// Single-photo path
    Photo,
}

impl AnalysisSource {
    /// Get the source name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisSource::VideoNote => "video_note",
            AnalysisSource::Photo => "photo",
        }
    }
}

/// Metadata about how the aggregator combined the evidence
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationMetadata {
    /// Number of frames that produced usable evidence
    pub frames_analyzed: usize,
    /// Number of cross-frame conflicts detected (frames disagreeing on the
    /// actual dish)
    pub conflicts_resolved: usize,
    /// Whether the audio hypothesis carried any transcription
    pub audio_hypothesis_used: bool,
    /// Overall confidence of the final analysis
    pub final_confidence: f64,
}

/// The aggregate nutritional estimate.
///
/// Totals are a cache derived from `components`; every mutating operation
/// must call [`FoodAnalysis::recompute_totals`] afterwards. An analysis
/// with zero components is a distinguished failed/empty state, not a valid
/// zero-calorie meal.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodAnalysis {
    /// Display name of the dish
    pub dish_name: String,

    /// Identified components, in display order
    pub components: Vec<FoodComponent>,

    /// Total weight in grams (derived)
    pub weight_grams: u32,

    /// Total calories (derived)
    pub calories_total: u32,

    /// Calorie density per 100 g (derived; 0 when weight is 0)
    pub calories_per_100g: f64,

    /// Total protein in grams (derived)
    pub protein_g: f64,

    /// Total fat in grams (derived)
    pub fat_g: f64,

    /// Total carbohydrates in grams (derived)
    pub carbs_g: f64,

    /// Coarse healthiness score, 1-10 (0 for the failed/empty state)
    pub health_score: u8,

    /// Human-readable warnings, deduplicated
    pub warnings: Vec<String>,

    /// Raw speech transcription, when the video path produced one
    pub audio_transcription: Option<String>,

    /// Whether speech evidence actually contributed to this analysis
    pub transcription_used: bool,

    /// Provenance of the analysis
    pub source: Option<AnalysisSource>,

    /// Voting metadata from the evidence aggregator (video path only)
    pub aggregation_metadata: Option<AggregationMetadata>,

    /// Free-text note describing the last applied correction, if any
    pub correction_applied: Option<String>,
}

impl FoodAnalysis {
    /// Create an analysis from components, computing all totals
    pub fn from_components(dish_name: impl Into<String>, components: Vec<FoodComponent>) -> Self {
        let mut analysis = Self {
            dish_name: dish_name.into(),
            components,
            weight_grams: 0,
            calories_total: 0,
            calories_per_100g: 0.0,
            protein_g: 0.0,
            fat_g: 0.0,
            carbs_g: 0.0,
            health_score: 5,
            warnings: Vec::new(),
            audio_transcription: None,
            transcription_used: false,
            source: None,
            aggregation_metadata: None,
            correction_applied: None,
        };
        analysis.recompute_totals();
        analysis
    }

    /// Recompute every total from the component list.
    ///
    /// Totals are never trusted from any other source; this is the single
    /// place they are derived.
    pub fn recompute_totals(&mut self) {
        self.weight_grams = self.components.iter().map(|c| c.weight_g).sum();
        self.calories_total = self.components.iter().map(|c| c.calories).sum();
        self.protein_g = round1(self.components.iter().map(|c| c.protein_g).sum());
        self.fat_g = round1(self.components.iter().map(|c| c.fat_g).sum());
        self.carbs_g = round1(self.components.iter().map(|c| c.carbs_g).sum());
        self.calories_per_100g = if self.weight_grams > 0 {
            self.calories_total as f64 / self.weight_grams as f64 * 100.0
        } else {
            0.0
        };
    }

    /// Whether this analysis represents a usable estimate
    pub fn is_usable(&self) -> bool {
        !self.components.is_empty()
    }

    /// Append a warning, skipping duplicates
    pub fn push_warning(&mut self, warning: impl Into<String>) {
        let warning = warning.into();
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }

    /// Scale every component by `factor` and recompute totals
    pub fn scale(&mut self, factor: f64) {
        for comp in &mut self.components {
            comp.scale(factor);
        }
        self.recompute_totals();
    }

    /// Mean confidence over components (0.0 when empty)
    pub fn mean_confidence(&self) -> f64 {
        if self.components.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.components.iter().map(|c| c.confidence).sum();
        sum / self.components.len() as f64
    }
}
