//! AI-driven correction interpretation
//!
//! Sends the current analysis plus the raw correction text to a language
//! capability. Unlike the rule-based fallback, the model is asked to
//! pre-validate calorie/macro consistency, so its returned totals are
//! accepted as authoritative for the call once the response passes
//! structural validation. Any failure makes the strategy not-applicable,
//! letting the engine fall through to the rules.

use crate::strategy::{CorrectionStrategy, StrategyOutcome};
use async_trait::async_trait;
use mealsight_domain::component::round1;
use mealsight_domain::{FoodAnalysis, FoodComponent};
use mealsight_llm::json_repair::extract_object;
use mealsight_llm::{ChatProvider, ChatRequest};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const MAX_RESPONSE_TOKENS: u32 = 2000;

/// Correction strategy backed by a language capability
pub struct AiCorrectionStrategy<P: ChatProvider> {
    provider: P,
    call_timeout: Duration,
}

impl<P: ChatProvider> AiCorrectionStrategy<P> {
    /// Create a strategy over the given provider
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            call_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Override the per-call timeout
    pub fn with_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }
}

#[async_trait]
impl<P: ChatProvider> CorrectionStrategy for AiCorrectionStrategy<P> {
    fn name(&self) -> &'static str {
        "ai"
    }

    async fn attempt(&self, text: &str, analysis: &FoodAnalysis) -> StrategyOutcome {
        let user = format!(
            "Current analysis:\n{}\n\nUser correction: \"{}\"",
            analysis_to_json(analysis),
            text
        );
        let request =
            ChatRequest::text(CORRECTION_INSTRUCTIONS, user).with_max_tokens(MAX_RESPONSE_TOKENS);

        let reply = match timeout(self.call_timeout, self.provider.complete(request)).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                warn!("AI correction call failed, falling back: {}", e);
                return StrategyOutcome::NotApplicable;
            }
            Err(_) => {
                warn!("AI correction timed out, falling back");
                return StrategyOutcome::NotApplicable;
            }
        };

        match merge_response(&reply, analysis, text) {
            Ok(updated) => StrategyOutcome::Applied(updated),
            Err(reason) => {
                warn!("AI correction response rejected, falling back: {}", reason);
                StrategyOutcome::NotApplicable
            }
        }
    }
}

/// Serialize the analysis into the JSON shape the model is asked to edit
fn analysis_to_json(analysis: &FoodAnalysis) -> Value {
    json!({
        "dish_name": analysis.dish_name,
        "components": analysis.components.iter().map(|c| json!({
            "name": c.name,
            "weight_g": c.weight_g,
            "calories": c.calories,
            "protein_g": c.protein_g,
            "fat_g": c.fat_g,
            "carbs_g": c.carbs_g,
            "confidence": c.confidence,
        })).collect::<Vec<_>>(),
        "weight_grams": analysis.weight_grams,
        "calories_total": analysis.calories_total,
        "calories_per_100g": analysis.calories_per_100g,
        "protein_g": analysis.protein_g,
        "fat_g": analysis.fat_g,
        "carbs_g": analysis.carbs_g,
        "health_score": analysis.health_score,
    })
}

/// Validate the model's response structurally, then merge it into the
/// original analysis.
///
/// Components and all total fields must be present; fields absent from
/// the response (warnings, transcription, metadata) are preserved from
/// the original.
fn merge_response(
    reply: &str,
    original: &FoodAnalysis,
    correction_text: &str,
) -> Result<FoodAnalysis, String> {
    let json = extract_object(reply).map_err(|e| e.to_string())?;

    let components_json = json
        .get("components")
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .ok_or_else(|| "Missing or empty 'components'".to_string())?;

    for field in [
        "weight_grams",
        "calories_total",
        "calories_per_100g",
        "protein_g",
        "fat_g",
        "carbs_g",
    ] {
        if json.get(field).and_then(Value::as_f64).is_none() {
            return Err(format!("Missing or invalid total field '{}'", field));
        }
    }

    let mut components = Vec::with_capacity(components_json.len());
    for (idx, item) in components_json.iter().enumerate() {
        components.push(
            parse_component(item).map_err(|e| format!("Component {}: {}", idx, e))?,
        );
    }

    debug!("AI correction merged {} components", components.len());

    let mut updated = original.clone();
    updated.components = components;
    updated.dish_name = json
        .get("dish_name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| original.dish_name.clone());
    updated.weight_grams = number(&json, "weight_grams").round() as u32;
    updated.calories_total = number(&json, "calories_total").round() as u32;
    updated.calories_per_100g = number(&json, "calories_per_100g");
    updated.protein_g = round1(number(&json, "protein_g"));
    updated.fat_g = round1(number(&json, "fat_g"));
    updated.carbs_g = round1(number(&json, "carbs_g"));
    if let Some(score) = json.get("health_score").and_then(Value::as_u64) {
        updated.health_score = score.min(10) as u8;
    }
    updated.correction_applied = Some(
        json.get("correction_applied")
            .and_then(Value::as_str)
            .unwrap_or(correction_text)
            .to_string(),
    );

    Ok(updated)
}

fn parse_component(json: &Value) -> Result<FoodComponent, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "not a JSON object".to_string())?;

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| "missing 'name'".to_string())?
        .to_string();

    let num = |key: &str| obj.get(key).and_then(Value::as_f64).unwrap_or(0.0).max(0.0);

    Ok(FoodComponent {
        name,
        weight_g: num("weight_g").round() as u32,
        calories: num("calories").round() as u32,
        protein_g: round1(num("protein_g")),
        fat_g: round1(num("fat_g")),
        carbs_g: round1(num("carbs_g")),
        confidence: obj
            .get("confidence")
            .and_then(Value::as_f64)
            .unwrap_or(0.7)
            .clamp(0.0, 1.0),
    })
}

fn number(json: &Value, key: &str) -> f64 {
    json.get(key).and_then(Value::as_f64).unwrap_or(0.0).max(0.0)
}

const CORRECTION_INSTRUCTIONS: &str = r#"You are a nutrition analyst. The user wants to correct a meal analysis.
Apply their correction and return the full updated analysis.

Correction categories you must handle:
1. Rescale total weight ("it was 500g"): scale EVERY component's weight,
   calories, and macros proportionally
2. Remove a component ("no bread", "I didn't eat the sauce")
3. Add a component ("there was also a salad")
4. Rename a component or the dish ("this is stew, not soup"): keep the
   weight and nutrition unless the new name clearly implies otherwise
5. Change one component's weight ("the bread was 80g"): adjust only that
   component, proportionally for its calories and macros
6. Compound corrections ("no bread and it was 400g"): apply every edit

Rules:
- Keep calories consistent with macros (protein*4 + fat*9 + carbs*4)
- Always recompute totals from the edited component list
- Preserve components the correction does not touch
- Set "correction_applied" to a short note describing what you changed

Output format (one JSON object only, no additional text):
{
  "dish_name": "updated dish name",
  "components": [
    {"name": "...", "weight_g": 0, "calories": 0, "protein_g": 0.0, "fat_g": 0.0, "carbs_g": 0.0, "confidence": 0.8}
  ],
  "weight_grams": 0,
  "calories_total": 0,
  "calories_per_100g": 0.0,
  "protein_g": 0.0,
  "fat_g": 0.0,
  "carbs_g": 0.0,
  "health_score": 5,
  "correction_applied": "what changed"
}

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;
