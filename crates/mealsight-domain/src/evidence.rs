//! Frame evidence module - one frame's independent analysis result

use crate::component::FoodComponent;

/// One frame's independent analysis, treated as a single ballot during
/// aggregation.
///
/// Ephemeral: exists only for the duration of aggregation and is never
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameEvidence {
    /// Index of this frame within the analyzed batch (0-based)
    pub frame_index: usize,

    /// Total frames in the batch
    pub frame_total: usize,

    /// Whether the frame confirmed the speech hypothesis (None when the
    /// generic no-hypothesis instruction was used)
    pub hypothesis_confirmed: Option<bool>,

    /// What the vision capability believes the dish actually is
    pub actual_dish: Option<String>,

    /// Components detected in this frame
    pub components: Vec<FoodComponent>,

    /// Points where visual evidence contradicted the hypothesis
    pub discrepancies: Vec<String>,

    /// Items visible in the frame but absent from the hypothesis
    pub additional_items: Vec<String>,
}

impl FrameEvidence {
    /// Evidence with no detections for the given frame position
    pub fn empty(frame_index: usize, frame_total: usize) -> Self {
        Self {
            frame_index,
            frame_total,
            hypothesis_confirmed: None,
            actual_dish: None,
            components: Vec::new(),
            discrepancies: Vec::new(),
            additional_items: Vec::new(),
        }
    }

    /// Find this frame's vote for a component name (case-insensitive
    /// equality)
    pub fn component_named(&self, name: &str) -> Option<&FoodComponent> {
        let wanted = name.to_lowercase();
        self.components
            .iter()
            .find(|c| c.name.to_lowercase() == wanted)
    }
}
