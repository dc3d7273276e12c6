//! Analysis validation - realistic-range checks producing warnings
//!
//! Deviations are recorded as warnings, never errors: the estimate is
//! still shown to the user, who can correct it.

use crate::{FoodAnalysis, FoodComponent};

/// Minimum plausible calorie density (kcal per 100 g)
pub const MIN_CALORIES_PER_100G: f64 = 10.0;
/// Maximum plausible calorie density (kcal per 100 g)
pub const MAX_CALORIES_PER_100G: f64 = 900.0;
/// Minimum plausible meal weight in grams
pub const MIN_WEIGHT_G: u32 = 5;
/// Maximum plausible meal weight in grams
pub const MAX_WEIGHT_G: u32 = 2000;
/// Allowed relative deviation between stated calories and macro-derived
/// calories before a warning is raised
pub const MACRO_MISMATCH_TOLERANCE: f64 = 0.20;

/// Check an analysis against realistic ranges.
///
/// Returns warning strings for anything out of band; an empty vector
/// means the analysis looks plausible.
pub fn analysis_warnings(analysis: &FoodAnalysis) -> Vec<String> {
    let mut warnings = Vec::new();

    let weight = analysis.weight_grams;
    if weight > 0 && weight < MIN_WEIGHT_G {
        warnings.push(format!(
            "Weight too low: {}g (min: {}g)",
            weight, MIN_WEIGHT_G
        ));
    } else if weight > MAX_WEIGHT_G {
        warnings.push(format!(
            "Weight too high: {}g (max: {}g)",
            weight, MAX_WEIGHT_G
        ));
    }

    if analysis.calories_total > 5000 {
        warnings.push(format!(
            "Unrealistic calories: {} (typical meal: 300-1000 kcal)",
            analysis.calories_total
        ));
    }

    if weight > 0 {
        let density = analysis.calories_total as f64 / weight as f64 * 100.0;
        if density < MIN_CALORIES_PER_100G {
            warnings.push(format!(
                "Very low calorie density: {:.0} kcal/100g (typical: 50-300 kcal/100g)",
                density
            ));
        } else if density > MAX_CALORIES_PER_100G {
            warnings.push(format!(
                "Very high calorie density: {:.0} kcal/100g (typical: 50-300 kcal/100g)",
                density
            ));
        }
    }

    let stated = analysis.calories_total as f64;
    if stated > 0.0 {
        let derived =
            analysis.protein_g * 4.0 + analysis.fat_g * 9.0 + analysis.carbs_g * 4.0;
        let deviation = (stated - derived).abs() / stated;
        if deviation > MACRO_MISMATCH_TOLERANCE {
            warnings.push(format!(
                "Macro mismatch: stated {} kcal, but macros give {:.0} kcal (difference: {:.0}%)",
                analysis.calories_total,
                derived,
                deviation * 100.0
            ));
        }
    }

    for (index, comp) in analysis.components.iter().enumerate() {
        warnings.extend(component_warnings(comp, index));
    }

    warnings
}

/// Check a single component against realistic ranges
pub fn component_warnings(component: &FoodComponent, index: usize) -> Vec<String> {
    let mut warnings = Vec::new();

    if component.name.is_empty() {
        warnings.push(format!("Component {}: missing name", index));
    }

    if component.weight_g < 1 || component.weight_g > MAX_WEIGHT_G {
        warnings.push(format!(
            "Component {}: unrealistic weight {}g",
            index, component.weight_g
        ));
    }

    if !(0.0..=1.0).contains(&component.confidence) {
        warnings.push(format!(
            "Component {}: invalid confidence {}",
            index, component.confidence
        ));
    }

    warnings
}
