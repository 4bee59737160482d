//! Plain-text rendering of a feedback report, suitable for stdout.

use crate::report::FeedbackReport;
use crate::traits::render::Renderer;
use std::fmt::Write;

pub struct PlainRenderer;

impl Renderer for PlainRenderer {
    fn render(&self, report: &FeedbackReport) -> String {
        let mut out = String::new();

        for row in &report.verdict_rows {
            writeln!(
                out,
                "[{}] {}: {} - {}",
                row.criterion_id,
                row.criterion,
                row.level.as_str(),
                row.explanation
            )
            .ok();
        }

        for annotation in &report.annotations {
            writeln!(
                out,
                "{}:{}-{} ({}-{}): {}",
                annotation.filename,
                annotation.line_start,
                annotation.line_end,
                annotation.column_start,
                annotation.column_end,
                annotation.content
            )
            .ok();
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Annotation, VerdictLevel, VerdictRow};

    #[test]
    fn test_plain_rendering() {
        let report = FeedbackReport {
            question_id: "q1".to_string(),
            created_at: "2025-01-01T00:00:00+00:00".to_string(),
            verdict_rows: vec![VerdictRow {
                criterion_id: "c1".to_string(),
                criterion: "Correct output".to_string(),
                level: VerdictLevel::No,
                explanation: "Output missing.".to_string(),
            }],
            annotations: vec![Annotation {
                filename: "a.py".to_string(),
                content: "No print statement.".to_string(),
                line_start: 1,
                line_end: 2,
                column_start: 0,
                column_end: 1,
            }],
        };

        let rendered = PlainRenderer.render(&report);
        assert!(rendered.contains("[c1] Correct output: No - Output missing."));
        assert!(rendered.contains("a.py:1-2 (0-1): No print statement."));
    }
}
