//! Lexicon and regex parse of a transcript into a hypothesis
//!
//! Deliberately not a model call: the parse must be cheap, deterministic,
//! and inspectable. It is a hint generator, and every consumer treats its
//! output as advisory.

use mealsight_domain::{PrimaryDish, SecondaryItem, SpeechHypothesis, WeightGuess};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::config::SpeechConfig;

fn weight_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*(g|gram|grams|kg|kilo|kilos)\b").unwrap())
}

fn quantity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*(piece|pieces|slice|slices)\b").unwrap())
}

/// Turns a raw transcript into a [`SpeechHypothesis`]
pub struct HypothesisParser {
    config: SpeechConfig,
}

impl HypothesisParser {
    /// Create a parser over the given lexicons
    pub fn new(config: SpeechConfig) -> Self {
        Self { config }
    }

    /// Parse a transcript.
    ///
    /// The first food named becomes the primary dish; a spoken weight
    /// attaches to it with lower confidence when hedging markers were
    /// heard. Later foods become secondary items, paired in order with
    /// any spoken quantities.
    pub fn parse(&self, transcript: &str) -> SpeechHypothesis {
        let text = transcript.trim().to_lowercase();
        if text.is_empty() {
            return SpeechHypothesis::empty();
        }

        let certainty_words: Vec<String> = self
            .config
            .certainty_words
            .iter()
            .filter(|word| contains_word(&text, word))
            .cloned()
            .collect();
        let hedged = !certainty_words.is_empty();

        let cooking_style = self
            .config
            .cooking_styles
            .iter()
            .find(|style| contains_word(&text, style))
            .cloned();

        let foods = self.matched_foods(&text);
        let mut quantities = self.spoken_quantities(&text);

        let weight_guess = self.spoken_weight(&text, hedged);

        let mut iter = foods.iter();
        let primary_dish = iter.next().map(|name| PrimaryDish {
            name: name.clone(),
            weight_guess: weight_guess.clone(),
        });

        let secondary_items: Vec<SecondaryItem> = iter
            .map(|name| SecondaryItem {
                name: name.clone(),
                quantity: if quantities.is_empty() {
                    None
                } else {
                    Some(quantities.remove(0))
                },
                confidence: self.config.secondary_item_confidence,
            })
            .collect();

        debug!(
            "Parsed transcript: primary={:?}, {} secondary, hedged={}",
            primary_dish.as_ref().map(|d| d.name.as_str()),
            secondary_items.len(),
            hedged
        );

        SpeechHypothesis {
            transcription: transcript.trim().to_string(),
            primary_dish,
            secondary_items,
            mentioned_items: foods,
            cooking_style,
            certainty_words,
        }
    }

    /// Vocabulary entries found in the text, ordered by first appearance.
    ///
    /// A shorter entry nested inside a longer match at the same place
    /// ("potato" inside "mashed potato") is suppressed.
    fn matched_foods(&self, text: &str) -> Vec<String> {
        let mut spans: Vec<(usize, usize, &String)> = Vec::new();
        for food in &self.config.food_vocabulary {
            let mut start = 0;
            while let Some(pos) = text[start..].find(food.as_str()) {
                let begin = start + pos;
                spans.push((begin, begin + food.len(), food));
                start = begin + 1;
            }
        }

        // Longest match wins at any given position
        spans.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut accepted: Vec<(usize, usize)> = Vec::new();
        let mut foods: Vec<String> = Vec::new();
        for (begin, end, food) in spans {
            let nested = accepted.iter().any(|&(s, e)| begin >= s && end <= e);
            if !nested && !foods.contains(food) {
                accepted.push((begin, end));
                foods.push(food.clone());
            }
        }
        foods
    }

    fn spoken_weight(&self, text: &str, hedged: bool) -> Option<WeightGuess> {
        let captures = weight_regex().captures(text)?;
        let raw: u32 = captures[1].parse().ok()?;
        let unit = captures[2].to_string();
        let value = if unit.starts_with('k') { raw * 1000 } else { raw };

        let confidence = if hedged {
            self.config.hedged_weight_confidence
        } else {
            self.config.plain_weight_confidence
        };

        Some(WeightGuess {
            value,
            unit,
            confidence,
        })
    }

    fn spoken_quantities(&self, text: &str) -> Vec<String> {
        quantity_regex()
            .captures_iter(text)
            .map(|c| format!("{} {}", &c[1], &c[2]))
            .collect()
    }
}

/// Word-boundary containment check without a per-word regex
fn contains_word(text: &str, word: &str) -> bool {
    text.match_indices(word).any(|(pos, _)| {
        let before_ok = pos == 0
            || !text[..pos]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric());
        let after = pos + word.len();
        let after_ok = after >= text.len()
            || !text[after..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric());
        before_ok && after_ok
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> HypothesisParser {
        HypothesisParser::new(SpeechConfig::default())
    }

    #[test]
    fn test_empty_transcript_gives_empty_hypothesis() {
        assert!(parser().parse("").is_empty());
        assert!(parser().parse("   ").is_empty());
    }

    #[test]
    fn test_primary_dish_is_first_food_named() {
        let hyp = parser().parse("I'm having soup and then some bread");
        assert_eq!(hyp.primary_dish.unwrap().name, "soup");
        assert_eq!(hyp.secondary_items.len(), 1);
        assert_eq!(hyp.secondary_items[0].name, "bread");
    }

    #[test]
    fn test_longest_vocabulary_match_wins() {
        let hyp = parser().parse("mashed potato with gravy");
        assert_eq!(hyp.primary_dish.unwrap().name, "mashed potato");
        // "potato" inside "mashed potato" must not surface separately
        assert_eq!(hyp.mentioned_items, vec!["mashed potato".to_string()]);
    }

    #[test]
    fn test_plain_weight_has_higher_confidence() {
        let hyp = parser().parse("chicken 300 grams");
        let guess = hyp.primary_dish.unwrap().weight_guess.unwrap();
        assert_eq!(guess.value, 300);
        assert!((guess.confidence - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hedged_weight_has_lower_confidence() {
        let hyp = parser().parse("chicken, I think about 300 grams");
        let guess = hyp.primary_dish.unwrap().weight_guess.unwrap();
        assert!((guess.confidence - 0.5).abs() < f64::EPSILON);
        assert!(hyp.certainty_words.contains(&"think".to_string()));
        assert!(hyp.certainty_words.contains(&"about".to_string()));
    }

    #[test]
    fn test_kilograms_convert_to_grams() {
        let hyp = parser().parse("rice 1 kg");
        let guess = hyp.primary_dish.unwrap().weight_guess.unwrap();
        assert_eq!(guess.value, 1000);
        assert_eq!(guess.unit, "kg");
    }

    #[test]
    fn test_quantities_pair_with_secondary_items_in_order() {
        let hyp = parser().parse("soup with 2 slices of bread");
        assert_eq!(hyp.secondary_items.len(), 1);
        assert_eq!(
            hyp.secondary_items[0].quantity.as_deref(),
            Some("2 slices")
        );
    }

    #[test]
    fn test_cooking_style_is_captured() {
        let hyp = parser().parse("fried fish with rice");
        assert_eq!(hyp.cooking_style.as_deref(), Some("fried"));
        assert_eq!(hyp.primary_dish.unwrap().name, "fish");
    }

    #[test]
    fn test_no_food_words_still_keeps_transcript() {
        let hyp = parser().parse("just talking about the weather");
        assert!(hyp.primary_dish.is_none());
        assert!(!hyp.is_empty());
        assert_eq!(hyp.transcription, "just talking about the weather");
    }

    #[test]
    fn test_certainty_word_needs_boundary() {
        // "surely" contains "sure" but not on a word boundary
        let hyp = parser().parse("chicken 200 g surely");
        assert!(!hyp.certainty_words.contains(&"sure".to_string()));
    }
}
