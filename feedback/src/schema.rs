//! # Schema Validator
//!
//! Verifies that a provider's raw response conforms to the expected annotation schema.
//! The policy is deliberately asymmetric: the whole response is rejected only when it
//! cannot be parsed as the declared shape at all (not an object, or no `annotations`
//! array); individually malformed array elements are dropped one by one and the rest
//! of the run continues. Partial credit beats total failure. Every dropped element is
//! recorded as a [`SchemaWarning`] so nothing disappears silently.

use crate::error::{FeedbackError, FeedbackResult};
use crate::types::{Annotation, RawVerdict};
use regex::Regex;
use serde_json::Value;
use tracing::warn;

/// A malformed response element that was dropped instead of failing the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaWarning {
    /// Index of the element within its array.
    pub index: usize,
    pub reason: String,
}

/// The provider response after schema validation.
#[derive(Debug, Default)]
pub struct ValidatedResponse {
    pub annotations: Vec<Annotation>,
    pub verdicts: Vec<RawVerdict>,
    pub warnings: Vec<SchemaWarning>,
}

/// Validates a raw provider response against the annotation schema.
///
/// # Errors
///
/// Returns [`FeedbackError::Schema`] only when no JSON object with an `annotations`
/// array can be recovered from the response text.
pub fn validate(raw: &str) -> FeedbackResult<ValidatedResponse> {
    let root = parse_response_object(raw)?;
    let annotations_raw = root
        .get("annotations")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            FeedbackError::Schema("response object has no \"annotations\" array".to_string())
        })?;

    let mut validated = ValidatedResponse::default();

    for (index, element) in annotations_raw.iter().enumerate() {
        match validate_annotation(element) {
            Ok(annotation) => validated.annotations.push(annotation),
            Err(reason) => {
                warn!(index, %reason, "dropping malformed annotation element");
                validated.warnings.push(SchemaWarning { index, reason });
            }
        }
    }

    // Verdicts are optional: an absent array degrades to synthesized rows downstream.
    if let Some(verdicts_raw) = root.get("verdicts").and_then(Value::as_array) {
        for (index, element) in verdicts_raw.iter().enumerate() {
            match serde_json::from_value::<RawVerdict>(element.clone()) {
                Ok(verdict) => validated.verdicts.push(verdict),
                Err(e) => {
                    let reason = format!("malformed verdict element: {e}");
                    warn!(index, %reason, "dropping malformed verdict element");
                    validated.warnings.push(SchemaWarning { index, reason });
                }
            }
        }
    }

    Ok(validated)
}

/// Recovers the response's JSON object.
///
/// Tries the whole (trimmed) text first; models that ignore the formatting
/// constraints wrap the object in markdown fences or prose, so as a fallback the
/// text is scanned for balanced brace blocks and the first one that parses to an
/// object with an `annotations` key wins.
fn parse_response_object(raw: &str) -> FeedbackResult<Value> {
    let trimmed = raw.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if value.is_object() {
            return Ok(value);
        }
    }

    let object_pattern =
        Regex::new(r"(\{(?:[^{}]|(?:\{(?:[^{}]|(?:\{[^{}]*\}))*\}))*\})").unwrap();
    for candidate in object_pattern.find_iter(raw) {
        if let Ok(value) = serde_json::from_str::<Value>(candidate.as_str()) {
            if value.get("annotations").is_some() {
                return Ok(value);
            }
        }
    }

    Err(FeedbackError::Schema(
        "response is not parseable as a JSON object".to_string(),
    ))
}

/// Checks one annotation element: all fields present with correct primitive types
/// (columns defaulting to 0), lines 1-based and in order.
fn validate_annotation(element: &Value) -> Result<Annotation, String> {
    let annotation: Annotation =
        serde_json::from_value(element.clone()).map_err(|e| format!("malformed annotation: {e}"))?;

    if annotation.line_start < 1 {
        return Err(format!(
            "line_start must be >= 1, got {}",
            annotation.line_start
        ));
    }
    if annotation.line_end < annotation.line_start {
        return Err(format!(
            "line_start {} exceeds line_end {}",
            annotation.line_start, annotation.line_end
        ));
    }

    Ok(annotation)
}
