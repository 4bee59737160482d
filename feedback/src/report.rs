//! # Feedback Report Module
//!
//! This module defines the data structures and response envelope for returning feedback
//! results from the pipeline. It provides a standardized, serializable format for the
//! per-criterion verdict table and the ordered annotation list.
//!
//! ## Overview
//!
//! The main types are:
//! - [`FeedbackReport`]: the terminal artifact of one grading run - verdict rows in
//!   rubric order plus annotations in a deterministic sort order.
//! - [`FeedbackReportResponse`]: a response envelope that wraps a [`FeedbackReport`]
//!   with success and message fields for API responses.
//!
//! ## Design Notes
//!
//! - Assembly is a pure function: timestamps are injected by the caller, so assembling
//!   the same inputs twice yields byte-identical serialized output. That determinism is
//!   what makes report fixtures diffable and re-runs comparable for students.
//! - The [`From<FeedbackReport> for FeedbackReportResponse`] implementation provides
//!   ergonomic conversion for API handlers.

use crate::reconcile::ValidAnnotation;
use crate::types::{Annotation, VerdictRow};
use serde::Serialize;

/// The final feedback artifact for one grading run.
#[derive(Debug, Serialize)]
pub struct FeedbackReport {
    /// The question this feedback answers.
    pub question_id: String,
    /// RFC 3339 timestamp of assembly, injected by the caller.
    pub created_at: String,
    /// One row per rubric criterion, in rubric order.
    pub verdict_rows: Vec<VerdictRow>,
    /// Reconciled annotations, sorted by (filename, line_start, column_start).
    pub annotations: Vec<Annotation>,
}

/// The API response envelope for feedback results.
#[derive(Debug, Serialize)]
pub struct FeedbackReportResponse {
    /// Indicates the run was successful.
    success: bool,
    /// A human-readable message for the client.
    message: String,
    /// The detailed feedback report.
    pub data: FeedbackReport,
}

/// Enables ergonomic conversion from [`FeedbackReport`] to [`FeedbackReportResponse`].
impl From<FeedbackReport> for FeedbackReportResponse {
    fn from(report: FeedbackReport) -> Self {
        FeedbackReportResponse {
            success: true,
            message: "Feedback generation complete.".to_string(),
            data: report,
        }
    }
}

/// Assembles the final report from validated parts.
///
/// Verdict rows keep the order they were built in (rubric order); annotations are
/// sorted by (filename, line_start, column_start) with a stable sort so equal keys
/// keep their incoming order. Rejected annotations never reach this function.
pub fn assemble(
    question_id: String,
    created_at: String,
    verdict_rows: Vec<VerdictRow>,
    valid_annotations: Vec<ValidAnnotation>,
) -> FeedbackReport {
    let mut annotations: Vec<Annotation> = valid_annotations
        .into_iter()
        .map(|valid| valid.annotation)
        .collect();
    annotations.sort_by(|a, b| {
        a.filename
            .cmp(&b.filename)
            .then(a.line_start.cmp(&b.line_start))
            .then(a.column_start.cmp(&b.column_start))
    });

    FeedbackReport {
        question_id,
        created_at,
        verdict_rows,
        annotations,
    }
}
