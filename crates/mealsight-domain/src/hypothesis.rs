//! Speech hypothesis module - structured extraction from a transcript
//!
//! The hypothesis is a cheap, inspectable hint about what the user said
//! they ate. All consumers must treat its fields as advisory; it biases
//! visual analysis but never dictates it.

/// A weight the user mentioned, with how much we trust it
#[derive(Debug, Clone, PartialEq)]
pub struct WeightGuess {
    /// Claimed value in the mentioned unit
    pub value: u32,
    /// Unit as spoken ("g", "grams", "kg")
    pub unit: String,
    /// Trust in the guess; hedged speech ("I think") lowers this
    pub confidence: f64,
}

/// The dish the user named first
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryDish {
    /// Dish name as matched from the food vocabulary
    pub name: String,
    /// Weight the user attached to it, if any
    pub weight_guess: Option<WeightGuess>,
}

/// A food the user mentioned after the primary dish
#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryItem {
    /// Item name as matched from the food vocabulary
    pub name: String,
    /// Spoken quantity ("2 slices"), if one was paired with it
    pub quantity: Option<String>,
    /// Trust in the mention
    pub confidence: f64,
}

/// Structured extraction from a transcript.
///
/// Created once per video analysis and read-only afterwards. Only the
/// transcription string and a "was it used" flag survive into the final
/// [`crate::FoodAnalysis`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpeechHypothesis {
    /// Raw transcript, possibly empty
    pub transcription: String,

    /// The first food the user named, if any
    pub primary_dish: Option<PrimaryDish>,

    /// Other foods the user named, in order of appearance
    pub secondary_items: Vec<SecondaryItem>,

    /// Plain names mentioned in passing (weaker evidence than
    /// primary/secondary)
    pub mentioned_items: Vec<String>,

    /// Cooking style marker ("fried", "boiled"), if one was heard
    pub cooking_style: Option<String>,

    /// Hedging markers found in the transcript ("think", "maybe")
    pub certainty_words: Vec<String>,
}

impl SpeechHypothesis {
    /// The empty hypothesis every failure path degrades to
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the hypothesis carries no structured information
    pub fn is_empty(&self) -> bool {
        self.transcription.is_empty()
            && self.primary_dish.is_none()
            && self.secondary_items.is_empty()
            && self.mentioned_items.is_empty()
    }

    /// Whether a component name is backed by speech evidence.
    ///
    /// Checks the primary dish, secondary items, and mentioned items with
    /// case-insensitive equality or substring containment in either
    /// direction.
    pub fn mentions(&self, component_name: &str) -> bool {
        if let Some(primary) = &self.primary_dish {
            if names_match(&primary.name, component_name) {
                return true;
            }
        }
        if self
            .secondary_items
            .iter()
            .any(|item| names_match(&item.name, component_name))
        {
            return true;
        }
        self.mentioned_items
            .iter()
            .any(|item| names_match(item, component_name))
    }
}

fn names_match(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a == b || a.contains(&b) || b.contains(&a)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SpeechHypothesis {
        SpeechHypothesis {
            transcription: "mashed potato about 500 grams and two slices of bread".to_string(),
            primary_dish: Some(PrimaryDish {
                name: "mashed potato".to_string(),
                weight_guess: Some(WeightGuess {
                    value: 500,
                    unit: "grams".to_string(),
                    confidence: 0.7,
                }),
            }),
            secondary_items: vec![SecondaryItem {
                name: "bread".to_string(),
                quantity: Some("2 slices".to_string()),
                confidence: 0.6,
            }],
            mentioned_items: vec!["mashed potato".to_string(), "bread".to_string()],
            cooking_style: None,
            certainty_words: Vec::new(),
        }
    }

    #[test]
    fn test_empty_hypothesis() {
        let hyp = SpeechHypothesis::empty();
        assert!(hyp.is_empty());
        assert!(!hyp.mentions("bread"));
    }

    #[test]
    fn test_mentions_primary_dish() {
        assert!(sample().mentions("Mashed Potato"));
    }

    #[test]
    fn test_mentions_secondary_item_substring() {
        assert!(sample().mentions("White Bread"));
    }

    #[test]
    fn test_does_not_mention_unrelated() {
        assert!(!sample().mentions("soup"));
    }

    #[test]
    fn test_transcription_alone_is_not_empty() {
        let hyp = SpeechHypothesis {
            transcription: "something inaudible".to_string(),
            ..SpeechHypothesis::default()
        };
        assert!(!hyp.is_empty());
    }
}
