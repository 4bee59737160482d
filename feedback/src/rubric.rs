//! # Rubric Module
//!
//! Loads and represents the ordered set of marking criteria for a question.
//! The rubric is an input to the pipeline: constructed once, never mutated, and its
//! order is significant because the output verdict table preserves it.

use crate::error::{FeedbackError, FeedbackResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One gradable dimension of a rubric, identified stably.
///
/// The id is passed into the prompt and echoed back by the model, so it must be
/// unique within a rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// Ordered list of marking criteria for a question.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rubric {
    pub criteria: Vec<Criterion>,
}

impl Rubric {
    pub fn new(criteria: Vec<Criterion>) -> Self {
        Self { criteria }
    }

    /// Parses a rubric from its JSON representation.
    pub fn from_json(raw: &str) -> FeedbackResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Loads a rubric from a JSON file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackError::Io`] if the file cannot be read and
    /// [`FeedbackError::Json`] if its content is not a valid rubric.
    pub fn from_file(path: &Path) -> FeedbackResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            FeedbackError::Io(format!("Failed to read rubric file {:?}: {e}", path))
        })?;
        Self::from_json(&raw)
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_rubric_from_json_preserves_order() {
        let rubric = Rubric::from_json(
            r#"{"criteria":[
                {"id":"c1","description":"Correct output","weight":2.0},
                {"id":"c2","description":"Code style"},
                {"id":"c3","description":"Plot labelling"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(rubric.len(), 3);
        assert_eq!(rubric.criteria[0].id, "c1");
        assert_eq!(rubric.criteria[0].weight, Some(2.0));
        assert_eq!(rubric.criteria[1].weight, None);
        assert_eq!(rubric.criteria[2].id, "c3");
    }

    #[test]
    fn test_rubric_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"criteria":[{{"id":"c1","description":"Correct output"}}]}}"#
        )
        .unwrap();

        let rubric = Rubric::from_file(file.path()).unwrap();
        assert_eq!(rubric.len(), 1);
        assert!(!rubric.is_empty());
    }

    #[test]
    fn test_rubric_missing_file_is_io_error() {
        let result = Rubric::from_file(Path::new("does/not/exist.json"));
        match result {
            Err(FeedbackError::Io(msg)) => assert!(msg.contains("rubric file")),
            other => panic!("Expected Io error, got: {other:?}"),
        }
    }

    #[test]
    fn test_rubric_invalid_json_is_json_error() {
        let result = Rubric::from_json("{not json");
        assert!(matches!(result, Err(FeedbackError::Json(_))));
    }
}
