//! Rule-based correction fallback
//!
//! Fixed-pattern interpretation of correction text. Incapable of the
//! nutritional judgment the AI path applies, so its totals are always
//! resummed from the edited component list.

use crate::strategy::{CorrectionStrategy, StrategyOutcome};
use async_trait::async_trait;
use mealsight_domain::component::{round1, title_case};
use mealsight_domain::{FoodAnalysis, FoodComponent};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info};

/// Default weight for an added component when none was given (grams)
const DEFAULT_ADD_WEIGHT_G: u32 = 100;
/// Assumed calorie density for an added component (kcal per gram)
const DEFAULT_DENSITY_KCAL_PER_G: f64 = 2.0;
/// Default macro split for an added component, as calorie fractions
const DEFAULT_PROTEIN_CAL_FRACTION: f64 = 0.15;
const DEFAULT_FAT_CAL_FRACTION: f64 = 0.30;
const DEFAULT_CARBS_CAL_FRACTION: f64 = 0.55;
/// User-supplied items are trusted less than detected ones
const ADDED_COMPONENT_CONFIDENCE: f64 = 0.5;
/// A rename is explicit user intent, trusted more than detection
const RENAMED_COMPONENT_CONFIDENCE: f64 = 0.7;

fn rescale_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(?:weight\s+)?(\d+)\s*(?:g|grams?)$").unwrap())
}

fn rename_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)this is\s+(.+?),?\s+not\s+(.+)$").unwrap())
}

fn remove_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(?:no|remove|without)\b\s*(.+)$").unwrap())
}

fn add_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(?:add|there'?s also)\b\s*(.+)$").unwrap())
}

fn weight_in_text_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(\d+)\s*(?:g|grams?)\b").unwrap())
}

/// Pattern-matching fallback strategy.
///
/// Supports four correction forms: remove, add, rename, and total-weight
/// rescale. Anything else is rejected with a guidance message, which makes
/// this strategy terminal in the chain.
pub struct RuleCorrectionStrategy;

#[async_trait]
impl CorrectionStrategy for RuleCorrectionStrategy {
    fn name(&self) -> &'static str {
        "rule-based"
    }

    async fn attempt(&self, text: &str, analysis: &FoodAnalysis) -> StrategyOutcome {
        let text = text.trim();

        if let Some(captures) = rescale_regex().captures(text) {
            let new_total: u32 = match captures[1].parse() {
                Ok(value) => value,
                Err(_) => return StrategyOutcome::Rejected(guidance_message()),
            };
            return self.rescale(analysis, new_total);
        }

        if let Some(captures) = rename_regex().captures(text) {
            let new_name = clean_target(&captures[1]);
            let old_name = clean_target(&captures[2]);
            return self.rename(analysis, &old_name, &new_name);
        }

        if let Some(captures) = remove_regex().captures(text) {
            let target = clean_target(&captures[1]);
            return self.remove(analysis, &target);
        }

        if let Some(captures) = add_regex().captures(text) {
            let raw = captures[1].trim();
            return self.add(analysis, raw);
        }

        StrategyOutcome::Rejected(guidance_message())
    }
}

impl RuleCorrectionStrategy {
    fn remove(&self, analysis: &FoodAnalysis, target: &str) -> StrategyOutcome {
        let mut updated = analysis.clone();
        let before = updated.components.len();
        updated.components.retain(|c| !c.name_matches(target));
        let removed = before - updated.components.len();

        if removed == 0 {
            // Nothing matched: a successful no-op, not a user-facing error
            info!("Remove '{}' matched no components; no-op", target);
        } else {
            info!("Removed {} component(s) matching '{}'", removed, target);
        }

        updated.recompute_totals();
        updated.correction_applied = Some(format!("Removed: {}", target));
        StrategyOutcome::Applied(updated)
    }

    fn add(&self, analysis: &FoodAnalysis, raw: &str) -> StrategyOutcome {
        let weight_g = weight_in_text_regex()
            .captures(raw)
            .and_then(|c| c[1].parse().ok())
            .unwrap_or(DEFAULT_ADD_WEIGHT_G);

        // The item name is whatever remains once the weight is stripped
        let name = clean_target(&weight_in_text_regex().replace(raw, ""));
        if name.is_empty() {
            return StrategyOutcome::Rejected(guidance_message());
        }

        let calories = (weight_g as f64 * DEFAULT_DENSITY_KCAL_PER_G).round();
        let component = FoodComponent {
            name: title_case(&name),
            weight_g,
            calories: calories as u32,
            protein_g: round1(calories * DEFAULT_PROTEIN_CAL_FRACTION / 4.0),
            fat_g: round1(calories * DEFAULT_FAT_CAL_FRACTION / 9.0),
            carbs_g: round1(calories * DEFAULT_CARBS_CAL_FRACTION / 4.0),
            confidence: ADDED_COMPONENT_CONFIDENCE,
        };

        debug!("Adding component: {:?}", component);

        let mut updated = analysis.clone();
        updated.components.push(component);
        updated.recompute_totals();
        updated.correction_applied = Some(format!("Added: {}", name));
        StrategyOutcome::Applied(updated)
    }

    fn rename(&self, analysis: &FoodAnalysis, old_name: &str, new_name: &str) -> StrategyOutcome {
        let mut updated = analysis.clone();
        let Some(component) = updated
            .components
            .iter_mut()
            .find(|c| c.name_matches(old_name))
        else {
            return StrategyOutcome::Rejected(format!(
                "I couldn't find \"{}\" in the analysis to rename.",
                old_name
            ));
        };

        info!("Renaming '{}' to '{}'", component.name, new_name);
        component.name = title_case(new_name);
        component.confidence = RENAMED_COMPONENT_CONFIDENCE;

        updated.recompute_totals();
        updated.correction_applied = Some(format!("Renamed {} to {}", old_name, new_name));
        StrategyOutcome::Applied(updated)
    }

    fn rescale(&self, analysis: &FoodAnalysis, new_total: u32) -> StrategyOutcome {
        if analysis.weight_grams == 0 {
            return StrategyOutcome::Rejected(
                "The current analysis has no weight to rescale.".to_string(),
            );
        }

        let scale = new_total as f64 / analysis.weight_grams as f64;
        info!(
            "Rescaling total weight {} g -> {} g (factor {:.3})",
            analysis.weight_grams, new_total, scale
        );

        let mut updated = analysis.clone();
        updated.scale(scale);
        updated.correction_applied = Some(format!("Rescaled to {} g", new_total));
        StrategyOutcome::Applied(updated)
    }
}

fn clean_target(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| c == '.' || c == ',' || c == '!' || c == '?')
        .trim()
        .trim_start_matches("the ")
        .trim()
        .to_string()
}

/// The message shown when no correction form matches
pub fn guidance_message() -> String {
    "I couldn't understand that correction. Supported corrections:\n\
     - Remove an item: \"no bread\", \"remove the sauce\"\n\
     - Add an item: \"add 100g rice\", \"there's also salad\"\n\
     - Rename the dish: \"this is stew, not soup\"\n\
     - Fix the weight: \"500g\" or \"weight 500g\""
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis() -> FoodAnalysis {
        FoodAnalysis::from_components(
            "Mashed Potato with bread",
            vec![
                FoodComponent {
                    name: "Mashed Potato".to_string(),
                    weight_g: 300,
                    calories: 330,
                    protein_g: 6.0,
                    fat_g: 12.0,
                    carbs_g: 48.0,
                    confidence: 0.85,
                },
                FoodComponent {
                    name: "Bread".to_string(),
                    weight_g: 50,
                    calories: 130,
                    protein_g: 4.0,
                    fat_g: 1.5,
                    carbs_g: 25.0,
                    confidence: 0.7,
                },
            ],
        )
    }

    async fn attempt(text: &str, on: &FoodAnalysis) -> StrategyOutcome {
        RuleCorrectionStrategy.attempt(text, on).await
    }

    #[tokio::test]
    async fn test_remove_drops_matching_component() {
        let outcome = attempt("no bread", &analysis()).await;
        let StrategyOutcome::Applied(updated) = outcome else {
            panic!("expected Applied");
        };
        assert_eq!(updated.components.len(), 1);
        assert_eq!(updated.weight_grams, 300);
        assert_eq!(updated.calories_total, 330);
    }

    #[tokio::test]
    async fn test_remove_nonexistent_is_a_noop_success() {
        let original = analysis();
        let outcome = attempt("remove pickles", &original).await;
        let StrategyOutcome::Applied(updated) = outcome else {
            panic!("expected Applied");
        };
        assert_eq!(updated.components.len(), 2);
        assert_eq!(updated.weight_grams, original.weight_grams);
        // No "not found" warning is raised
        assert_eq!(updated.warnings, original.warnings);
    }

    #[tokio::test]
    async fn test_add_with_defaults() {
        let outcome = attempt("add salad", &analysis()).await;
        let StrategyOutcome::Applied(updated) = outcome else {
            panic!("expected Applied");
        };
        let added = updated.components.last().unwrap();
        assert_eq!(added.name, "Salad");
        assert_eq!(added.weight_g, 100);
        assert_eq!(added.calories, 200);
        assert_eq!(added.confidence, 0.5);
        // 200 kcal split 15/30/55 by calories
        assert_eq!(added.protein_g, 7.5);
        assert_eq!(added.fat_g, 6.7);
        assert_eq!(added.carbs_g, 27.5);
        assert_eq!(updated.weight_grams, 450);
    }

    #[tokio::test]
    async fn test_add_with_explicit_weight() {
        let outcome = attempt("add 60g cheese", &analysis()).await;
        let StrategyOutcome::Applied(updated) = outcome else {
            panic!("expected Applied");
        };
        let added = updated.components.last().unwrap();
        assert_eq!(added.name, "Cheese");
        assert_eq!(added.weight_g, 60);
        assert_eq!(added.calories, 120);
    }

    #[tokio::test]
    async fn test_rename_keeps_nutrition() {
        let outcome = attempt("this is rice porridge, not mashed potato", &analysis()).await;
        let StrategyOutcome::Applied(updated) = outcome else {
            panic!("expected Applied");
        };
        let renamed = &updated.components[0];
        assert_eq!(renamed.name, "Rice Porridge");
        assert_eq!(renamed.weight_g, 300);
        assert_eq!(renamed.calories, 330);
        assert_eq!(renamed.confidence, 0.7);
    }

    #[tokio::test]
    async fn test_rename_missing_component_is_rejected() {
        let outcome = attempt("this is stew, not soup", &analysis()).await;
        assert!(matches!(outcome, StrategyOutcome::Rejected(_)));
    }

    #[tokio::test]
    async fn test_rescale_is_proportional() {
        let single = FoodAnalysis::from_components(
            "Porridge",
            vec![FoodComponent {
                name: "Porridge".to_string(),
                weight_g: 150,
                calories: 390,
                protein_g: 9.0,
                fat_g: 6.0,
                carbs_g: 72.0,
                confidence: 0.8,
            }],
        );

        let outcome = attempt("500g", &single).await;
        let StrategyOutcome::Applied(updated) = outcome else {
            panic!("expected Applied");
        };
        assert_eq!(updated.weight_grams, 500);
        assert_eq!(updated.calories_total, 1300);
    }

    #[tokio::test]
    async fn test_rescale_round_trips_within_rounding() {
        let original = analysis();
        let StrategyOutcome::Applied(scaled) = attempt("700g", &original).await else {
            panic!("expected Applied");
        };
        let StrategyOutcome::Applied(back) = attempt("350g", &scaled).await else {
            panic!("expected Applied");
        };
        assert!((back.weight_grams as i64 - 350).abs() <= 2);
        assert!((back.calories_total as i64 - original.calories_total as i64).abs() <= 3);
    }

    #[tokio::test]
    async fn test_rescale_zero_weight_is_rejected_not_a_crash() {
        let empty = FoodAnalysis::from_components("Empty", Vec::new());
        let outcome = attempt("500g", &empty).await;
        assert!(matches!(outcome, StrategyOutcome::Rejected(_)));
    }

    #[tokio::test]
    async fn test_unmatched_text_yields_guidance() {
        let outcome = attempt("make it healthier please", &analysis()).await;
        let StrategyOutcome::Rejected(message) = outcome else {
            panic!("expected Rejected");
        };
        assert!(message.contains("Remove an item"));
        assert!(message.contains("Add an item"));
        assert!(message.contains("Rename"));
        assert!(message.contains("weight"));
    }

    #[tokio::test]
    async fn test_weight_prefix_rescale() {
        let outcome = attempt("weight 600g", &analysis()).await;
        let StrategyOutcome::Applied(updated) = outcome else {
            panic!("expected Applied");
        };
        assert!((updated.weight_grams as i64 - 600).abs() <= 1);
    }
}
