//! Parse vision output into frame evidence

use crate::error::AnalyzerError;
use mealsight_domain::{FoodComponent, FrameEvidence};
use mealsight_llm::json_repair::extract_object;
use serde_json::Value;
use tracing::warn;

/// Parse one frame's vision response into [`FrameEvidence`].
///
/// Individual malformed components are skipped with a warning; the whole
/// response only fails if no JSON object can be recovered at all.
pub fn parse_frame_response(
    response: &str,
    frame_index: usize,
    frame_total: usize,
) -> Result<FrameEvidence, AnalyzerError> {
    let json =
        extract_object(response).map_err(|e| AnalyzerError::InvalidFormat(e.to_string()))?;

    let mut evidence = FrameEvidence::empty(frame_index, frame_total);

    evidence.hypothesis_confirmed = json.get("hypothesis_confirmed").and_then(Value::as_bool);
    evidence.actual_dish = json
        .get("actual_dish")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    if let Some(items) = json.get("components").and_then(Value::as_array) {
        for (idx, item) in items.iter().enumerate() {
            match parse_component(item) {
                Ok(component) => evidence.components.push(component),
                Err(e) => {
                    warn!("Frame {}: skipping component {}: {}", frame_index, idx, e);
                }
            }
        }
    }

    evidence.discrepancies = string_list(&json, "discrepancies");
    evidence.additional_items = string_list(&json, "additional_items");

    Ok(evidence)
}

/// Parse a single component from JSON
fn parse_component(json: &Value) -> Result<FoodComponent, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "Component is not a JSON object".to_string())?;

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Missing or invalid 'name'".to_string())?
        .to_string();

    // Numeric fields are lenient: models report integers and floats
    // interchangeably, and a missing estimate reads as zero
    let weight_g = non_negative(obj, "weight_g").round() as u32;
    let calories = non_negative(obj, "calories").round() as u32;
    let protein_g = non_negative(obj, "protein_g");
    let fat_g = non_negative(obj, "fat_g");
    let carbs_g = non_negative(obj, "carbs_g");

    let confidence = obj
        .get("confidence")
        .and_then(Value::as_f64)
        .unwrap_or(0.5)
        .clamp(0.0, 1.0);

    Ok(FoodComponent {
        name,
        weight_g,
        calories,
        protein_g,
        fat_g,
        carbs_g,
        confidence,
    })
}

fn non_negative(obj: &serde_json::Map<String, Value>, key: &str) -> f64 {
    obj.get(key).and_then(Value::as_f64).unwrap_or(0.0).max(0.0)
}

fn string_list(json: &Value, key: &str) -> Vec<String> {
    json.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
