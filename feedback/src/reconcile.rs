//! # Location Reconciler
//!
//! Cross-checks each annotation's file/line/column references against the actual
//! submission content. An annotation referencing an unknown filename or an
//! out-of-range line is rejected outright, never clamped: a wrong location must not
//! be silently moved onto real code. Column references are less reliable than line
//! references in model output, so a column span that does not fit the referenced
//! line only downgrades confidence instead of rejecting.
//!
//! Rejected annotations are kept in a side list for diagnostics and logging; they
//! are never surfaced to the student.

use crate::submission::{SourceFile, Submission};
use crate::types::Annotation;
use std::fmt;
use tracing::warn;

/// How much the column information of a reconciled annotation can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    High,
    Low,
}

/// Why an annotation failed reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The referenced filename does not exist in the submission (exact match).
    UnknownFile,
    /// The referenced line range extends past the end of the file.
    LineOutOfRange { line_end: u32, line_count: usize },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::UnknownFile => write!(f, "unknown file"),
            RejectReason::LineOutOfRange {
                line_end,
                line_count,
            } => write!(f, "line_end {line_end} exceeds file length {line_count}"),
        }
    }
}

/// An annotation that resolved against the submission.
#[derive(Debug, Clone)]
pub struct ValidAnnotation {
    pub annotation: Annotation,
    pub confidence: Confidence,
}

/// An annotation that failed reconciliation, kept for diagnostics.
#[derive(Debug, Clone)]
pub struct RejectedAnnotation {
    pub annotation: Annotation,
    pub reason: RejectReason,
}

/// Reconciles annotations against the submission they claim to reference.
///
/// Filename resolution is case-sensitive exact match only. Line ranges must fit
/// within the referenced file. Zero-width column spans are widened from the actual
/// source content (indentation to line extent); non-zero column spans that do not
/// fit their line are kept with [`Confidence::Low`].
pub fn reconcile(
    annotations: Vec<Annotation>,
    submission: &Submission,
) -> (Vec<ValidAnnotation>, Vec<RejectedAnnotation>) {
    let mut valid = Vec::new();
    let mut rejected = Vec::new();

    for mut annotation in annotations {
        let Some(file) = submission.file(&annotation.filename) else {
            warn!(
                filename = %annotation.filename,
                "rejecting annotation for unknown file"
            );
            rejected.push(RejectedAnnotation {
                annotation,
                reason: RejectReason::UnknownFile,
            });
            continue;
        };

        let line_count = file.line_count();
        if annotation.line_end as usize > line_count {
            warn!(
                filename = %annotation.filename,
                line_end = annotation.line_end,
                line_count,
                "rejecting annotation with out-of-range line"
            );
            rejected.push(RejectedAnnotation {
                reason: RejectReason::LineOutOfRange {
                    line_end: annotation.line_end,
                    line_count,
                },
                annotation,
            });
            continue;
        }

        let mut confidence = Confidence::High;
        if annotation.column_start == 0 && annotation.column_end == 0 {
            let (column_start, column_end) =
                derive_columns(file, annotation.line_start, annotation.line_end);
            annotation.column_start = column_start;
            annotation.column_end = column_end;
        } else if annotation.line_start == annotation.line_end {
            if let Some(line) = file.line(annotation.line_start) {
                if annotation.column_start > annotation.column_end
                    || annotation.column_end as usize > line.len()
                {
                    warn!(
                        filename = %annotation.filename,
                        line = annotation.line_start,
                        column_start = annotation.column_start,
                        column_end = annotation.column_end,
                        "column span does not fit the referenced line, keeping with low confidence"
                    );
                    confidence = Confidence::Low;
                }
            }
        }

        valid.push(ValidAnnotation {
            annotation,
            confidence,
        });
    }

    (valid, rejected)
}

/// Derives a column span for a whole-line annotation from the referenced lines.
///
/// Per line: start at the indentation width, end at the line length; blank lines
/// contribute (0, 1). The annotation takes the minimum start and maximum end over
/// the range, falling back to (0, 1) when the range holds nothing at all.
fn derive_columns(file: &SourceFile, line_start: u32, line_end: u32) -> (u32, u32) {
    let mut starts = Vec::new();
    let mut ends = Vec::new();

    for number in line_start..=line_end {
        let Some(line) = file.line(number) else {
            continue;
        };
        if line.trim().is_empty() {
            starts.push(0);
            ends.push(1);
        } else {
            let indent = line.len() - line.trim_start().len();
            starts.push(indent as u32);
            ends.push(line.len() as u32);
        }
    }

    match (starts.iter().min(), ends.iter().max()) {
        (Some(&start), Some(&end)) => (start, end),
        _ => (0, 1),
    }
}
