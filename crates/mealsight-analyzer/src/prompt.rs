//! Vision prompt engineering for hypothesis-guided frame analysis

use mealsight_domain::SpeechHypothesis;

/// Builds the shared vision instruction for one analysis batch.
///
/// One instruction set is built per batch and reused for every frame; only
/// the per-frame position line changes between calls.
pub struct PromptBuilder<'a> {
    hypothesis: &'a SpeechHypothesis,
}

impl<'a> PromptBuilder<'a> {
    /// Create a prompt builder over the batch's hypothesis
    pub fn new(hypothesis: &'a SpeechHypothesis) -> Self {
        Self { hypothesis }
    }

    /// Build the system instruction.
    ///
    /// With no primary dish and no transcript, the instruction is a generic
    /// "identify everything" request; otherwise it states the speech claims
    /// and asks the model to verify them against the image.
    pub fn build(&self) -> String {
        if self.hypothesis.primary_dish.is_none() && self.hypothesis.transcription.is_empty() {
            return format!("{}\n\n{}", GENERIC_INSTRUCTIONS, OUTPUT_FORMAT);
        }

        let mut prompt = String::new();
        prompt.push_str(VERIFICATION_INSTRUCTIONS);
        prompt.push_str("\n\nWhat the person said about this meal:\n");

        if !self.hypothesis.transcription.is_empty() {
            prompt.push_str(&format!(
                "Transcript: \"{}\"\n",
                self.hypothesis.transcription
            ));
        }

        if let Some(primary) = &self.hypothesis.primary_dish {
            prompt.push_str(&format!("Claimed dish: {}\n", primary.name));
            if let Some(guess) = &primary.weight_guess {
                prompt.push_str(&format!(
                    "Claimed weight: {} {} (confidence {:.1})\n",
                    guess.value, guess.unit, guess.confidence
                ));
            }
        }

        for item in &self.hypothesis.secondary_items {
            match &item.quantity {
                Some(quantity) => {
                    prompt.push_str(&format!("Also mentioned: {} ({})\n", item.name, quantity))
                }
                None => prompt.push_str(&format!("Also mentioned: {}\n", item.name)),
            }
        }

        if let Some(style) = &self.hypothesis.cooking_style {
            prompt.push_str(&format!("Cooking style mentioned: {}\n", style));
        }

        prompt.push('\n');
        prompt.push_str(OUTPUT_FORMAT);
        prompt
    }

    /// Build the per-frame user instruction ("frame N of M", 1-based)
    pub fn frame_instruction(&self, frame_index: usize, frame_total: usize) -> String {
        format!(
            "This is frame {} of {} from a video of the meal. Analyze this frame.",
            frame_index + 1,
            frame_total
        )
    }
}

const GENERIC_INSTRUCTIONS: &str = r#"You are a nutrition analyst. Identify every food item visible in this image.
For each item, estimate its weight in grams, calories, and macronutrients
(protein, fat, carbohydrates in grams), and rate your identification
confidence from 0.0 to 1.0.

Rules:
- List every distinct food item you can see, including sides and garnishes
- Estimate portion sizes from visual cues (plate size, utensils, depth)
- Do not invent items that are not clearly visible
- Keep calorie estimates consistent with the macronutrients you report"#;

const VERIFICATION_INSTRUCTIONS: &str = r#"You are a nutrition analyst. The person recorded a video of their meal and
described it in speech. Verify their description against this image:
1. Confirm or refute the claimed dish based on what you actually see
2. If the image contradicts the claim, report what the dish actually is
3. Report any food items visible in the image that were not mentioned
4. Flag every point where visual evidence disagrees with the description

The speech is a hint, not ground truth: trust your eyes over the claims,
but use the claimed weight as a portion-size prior when it is plausible.

Rules:
- List every distinct food item you can see, including sides and garnishes
- Do not invent items that are not clearly visible
- Keep calorie estimates consistent with the macronutrients you report"#;

const OUTPUT_FORMAT: &str = r#"Output format (one JSON object only, no additional text):
{
  "hypothesis_confirmed": true,
  "actual_dish": "what the dish actually is",
  "components": [
    {
      "name": "food item name",
      "weight_g": 300,
      "calories": 330,
      "protein_g": 6.0,
      "fat_g": 12.0,
      "carbs_g": 48.0,
      "confidence": 0.85
    }
  ],
  "discrepancies": ["points where the image contradicts the description"],
  "additional_items": ["visible items not mentioned in speech"]
}

Set "hypothesis_confirmed" to null if no description was given.
Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;
