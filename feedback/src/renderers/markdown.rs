//! Markdown rendering of a feedback report: the verdict table followed by the
//! annotation list. Cell text is pipe-escaped so criterion descriptions and model
//! explanations cannot break the table.

use crate::report::FeedbackReport;
use crate::traits::render::Renderer;
use std::fmt::Write;

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, report: &FeedbackReport) -> String {
        let mut out = String::new();

        out.push_str("| Criterion | Level | Explanation |\n");
        out.push_str("| --- | --- | --- |\n");
        for row in &report.verdict_rows {
            writeln!(
                out,
                "| {} | {} | {} |",
                escape_cell(&row.criterion),
                row.level.as_str(),
                escape_cell(&row.explanation)
            )
            .ok();
        }

        if !report.annotations.is_empty() {
            out.push_str("\n### Annotations\n\n");
            for annotation in &report.annotations {
                writeln!(
                    out,
                    "- `{}` lines {}-{}, columns {}-{}: {}",
                    annotation.filename,
                    annotation.line_start,
                    annotation.line_end,
                    annotation.column_start,
                    annotation.column_end,
                    annotation.content
                )
                .ok();
            }
        }

        out
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Annotation, VerdictLevel, VerdictRow};

    #[test]
    fn test_markdown_table_and_annotations() {
        let report = FeedbackReport {
            question_id: "q1".to_string(),
            created_at: "2025-01-01T00:00:00+00:00".to_string(),
            verdict_rows: vec![VerdictRow {
                criterion_id: "c1".to_string(),
                criterion: "Correct | output".to_string(),
                level: VerdictLevel::Partially,
                explanation: "Off by one.".to_string(),
            }],
            annotations: vec![Annotation {
                filename: "a.py".to_string(),
                content: "Loop bound excludes the last element.".to_string(),
                line_start: 3,
                line_end: 3,
                column_start: 4,
                column_end: 20,
            }],
        };

        let rendered = MarkdownRenderer.render(&report);
        assert!(rendered.starts_with("| Criterion | Level | Explanation |"));
        assert!(rendered.contains("| Correct \\| output | Partially | Off by one. |"));
        assert!(rendered.contains("### Annotations"));
        assert!(rendered.contains("- `a.py` lines 3-3, columns 4-20: Loop bound excludes the last element."));
    }

    #[test]
    fn test_no_annotation_section_when_empty() {
        let report = FeedbackReport {
            question_id: "q1".to_string(),
            created_at: "2025-01-01T00:00:00+00:00".to_string(),
            verdict_rows: vec![],
            annotations: vec![],
        };
        let rendered = MarkdownRenderer.render(&report);
        assert!(!rendered.contains("Annotations"));
    }
}
