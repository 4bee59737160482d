//! # Types Module
//!
//! This module defines the core data structures used throughout the feedback pipeline:
//! the question under assessment, the annotation wire shape, and the verdict types that
//! make up the per-criterion table.

use serde::{Deserialize, Serialize};

/// The question a submission is graded against.
///
/// The text is embedded verbatim in the prompt; the id is carried through to the report.
#[derive(Debug, Clone)]
pub struct Question {
    pub id: String,
    pub text: String,
}

impl Question {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A located note pointing at a specific file/line/column range describing one mistake.
///
/// This is the wire contract with the provider and must be preserved exactly:
/// `filename` and `content` are strings, `line_start`/`line_end` are 1-based and
/// `column_start`/`column_end` 0-based. The column fields default to zero because
/// models frequently emit line-only annotations; a zero-width span is treated as
/// "whole line" and widened later from the actual source content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// The name of the student's file, exactly as shown in the prompt.
    pub filename: String,
    /// A short description of the mistake.
    pub content: String,
    /// First line of the mistake (1-based, matching the prompt's numbering).
    pub line_start: u32,
    /// Last line of the mistake (1-based, inclusive).
    pub line_end: u32,
    /// First column of the mistake (0-based).
    #[serde(default)]
    pub column_start: u32,
    /// Last column of the mistake (0-based).
    #[serde(default)]
    pub column_end: u32,
}

/// The discrete satisfaction level assigned to a criterion.
///
/// This is a closed enumeration; no other values are permitted in output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerdictLevel {
    Excellent,
    Good,
    Partially,
    No,
}

impl VerdictLevel {
    /// Parses a level token by exact, case-insensitive match.
    ///
    /// Anything that is not one of the four tokens returns `None`; the caller
    /// treats that verdict as missing rather than guessing a level.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "excellent" => Some(VerdictLevel::Excellent),
            "good" => Some(VerdictLevel::Good),
            "partially" => Some(VerdictLevel::Partially),
            "no" => Some(VerdictLevel::No),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VerdictLevel::Excellent => "Excellent",
            VerdictLevel::Good => "Good",
            VerdictLevel::Partially => "Partially",
            VerdictLevel::No => "No",
        }
    }
}

/// A criterion-level judgment as the model reported it, before validation.
///
/// The model echoes the stable criterion id it was shown in the prompt; the level
/// is kept as a raw string here because it may not be one of the allowed tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct RawVerdict {
    pub criterion_id: String,
    pub level: String,
    #[serde(default)]
    pub explanation: String,
}

/// One row of the final verdict table: exactly one per rubric criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerdictRow {
    /// Stable identifier of the criterion this row answers.
    pub criterion_id: String,
    /// The criterion description, carried along for rendering.
    pub criterion: String,
    pub level: VerdictLevel,
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parse_case_insensitive() {
        assert_eq!(VerdictLevel::parse("Excellent"), Some(VerdictLevel::Excellent));
        assert_eq!(VerdictLevel::parse("gOOd"), Some(VerdictLevel::Good));
        assert_eq!(VerdictLevel::parse(" partially "), Some(VerdictLevel::Partially));
        assert_eq!(VerdictLevel::parse("NO"), Some(VerdictLevel::No));
    }

    #[test]
    fn test_level_parse_rejects_unknown_tokens() {
        assert_eq!(VerdictLevel::parse("great"), None);
        assert_eq!(VerdictLevel::parse("excellent!"), None);
        assert_eq!(VerdictLevel::parse(""), None);
    }

    #[test]
    fn test_annotation_columns_default_to_zero() {
        let annotation: Annotation = serde_json::from_str(
            r#"{"filename":"a.py","content":"Variable 'x' is unused.","line_start":5,"line_end":5}"#,
        )
        .unwrap();
        assert_eq!(annotation.column_start, 0);
        assert_eq!(annotation.column_end, 0);
    }

    #[test]
    fn test_annotation_rejects_negative_lines() {
        let result = serde_json::from_str::<Annotation>(
            r#"{"filename":"a.py","content":"x","line_start":-1,"line_end":3}"#,
        );
        assert!(result.is_err());
    }
}
