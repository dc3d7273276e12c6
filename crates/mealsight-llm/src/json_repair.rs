//! JSON extraction and repair for free-form model output
//!
//! Vision and text capabilities return prose that is expected to contain
//! one JSON object, but is not guaranteed to be valid JSON: models wrap it
//! in markdown fences, add `//` comments, or leave trailing commas. This
//! module is the single shared extract-and-repair routine for all three
//! capability-consuming components.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

/// Errors from JSON extraction
#[derive(Error, Debug)]
pub enum JsonExtractError {
    /// No brace-delimited object found in the response
    #[error("No JSON object found in response")]
    NotFound,

    /// The object failed to parse even after the repair pass
    #[error("JSON parse error after repair: {0}")]
    Parse(String),
}

/// Extract the outermost JSON object from free-form model output.
///
/// Strategy:
/// 1. Strip markdown code fences.
/// 2. Trim to the outermost `{` .. `}` pair.
/// 3. Parse; on failure, strip `//` and `/* */` comments and trailing
///    commas, then parse once more.
pub fn extract_object(response: &str) -> Result<Value, JsonExtractError> {
    let content = response.replace("```json", "").replace("```", "");

    let start = content.find('{').ok_or(JsonExtractError::NotFound)?;
    let end = content.rfind('}').ok_or(JsonExtractError::NotFound)?;
    if end < start {
        return Err(JsonExtractError::NotFound);
    }
    let json_str = &content[start..=end];

    match serde_json::from_str(json_str) {
        Ok(value) => Ok(value),
        Err(first_error) => {
            debug!("First JSON parse failed ({}), attempting repair", first_error);
            let repaired = repair(json_str);
            serde_json::from_str(&repaired)
                .map_err(|e| JsonExtractError::Parse(e.to_string()))
        }
    }
}

fn repair(json_str: &str) -> String {
    static LINE_COMMENT: OnceLock<Regex> = OnceLock::new();
    static BLOCK_COMMENT: OnceLock<Regex> = OnceLock::new();
    static TRAILING_COMMA: OnceLock<Regex> = OnceLock::new();

    let line_comment = LINE_COMMENT.get_or_init(|| Regex::new(r"//[^\n]*").unwrap());
    let block_comment =
        BLOCK_COMMENT.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
    let trailing_comma =
        TRAILING_COMMA.get_or_init(|| Regex::new(r",(\s*[}\]])").unwrap());

    let without_line = line_comment.replace_all(json_str, "");
    let without_block = block_comment.replace_all(&without_line, "");
    trailing_comma.replace_all(&without_block, "$1").into_owned()
}
