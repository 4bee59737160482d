//! # Criterion Verdict Builder
//!
//! Merges the rubric with the model's criterion-level judgments into exactly one row
//! per criterion, in rubric order. The cardinality guarantee holds no matter what the
//! model returned: omitted or unparseable judgments become synthesized `No` rows so a
//! gap in the evaluation stays visible in the report instead of disappearing from it.

use crate::rubric::{Criterion, Rubric};
use crate::types::{RawVerdict, VerdictLevel, VerdictRow};
use std::collections::HashMap;
use tracing::warn;

/// Explanation used when the model gave no usable judgment for a criterion.
const UNADDRESSED: &str = "Criterion was not addressed by the evaluator.";

/// Builds the verdict table: one row per rubric criterion, in rubric order.
///
/// Raw verdicts are indexed by criterion id; the first occurrence wins and
/// duplicates are logged. A verdict whose level is not one of the four allowed
/// tokens (matched case-insensitively) is treated as missing: levels are never
/// guessed or coerced.
pub fn build_verdict_rows(rubric: &Rubric, raw_verdicts: &[RawVerdict]) -> Vec<VerdictRow> {
    let mut by_id: HashMap<&str, &RawVerdict> = HashMap::new();
    for verdict in raw_verdicts {
        if by_id.contains_key(verdict.criterion_id.as_str()) {
            warn!(
                criterion_id = %verdict.criterion_id,
                "duplicate verdict for criterion, keeping the first"
            );
            continue;
        }
        by_id.insert(verdict.criterion_id.as_str(), verdict);
    }

    rubric
        .criteria
        .iter()
        .map(|criterion| match by_id.get(criterion.id.as_str()) {
            Some(raw) => match VerdictLevel::parse(&raw.level) {
                Some(level) => VerdictRow {
                    criterion_id: criterion.id.clone(),
                    criterion: criterion.description.clone(),
                    level,
                    explanation: raw.explanation.clone(),
                },
                None => {
                    warn!(
                        criterion_id = %criterion.id,
                        level = %raw.level,
                        "unknown verdict level, treating the criterion as unaddressed"
                    );
                    unaddressed_row(criterion)
                }
            },
            None => unaddressed_row(criterion),
        })
        .collect()
}

fn unaddressed_row(criterion: &Criterion) -> VerdictRow {
    VerdictRow {
        criterion_id: criterion.id.clone(),
        criterion: criterion.description.clone(),
        level: VerdictLevel::No,
        explanation: UNADDRESSED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rubric() -> Rubric {
        Rubric::new(vec![
            Criterion {
                id: "c1".to_string(),
                description: "Correct output".to_string(),
                weight: None,
            },
            Criterion {
                id: "c2".to_string(),
                description: "Code style".to_string(),
                weight: None,
            },
            Criterion {
                id: "c3".to_string(),
                description: "Plot labelling".to_string(),
                weight: None,
            },
        ])
    }

    fn raw(criterion_id: &str, level: &str, explanation: &str) -> RawVerdict {
        RawVerdict {
            criterion_id: criterion_id.to_string(),
            level: level.to_string(),
            explanation: explanation.to_string(),
        }
    }

    #[test]
    fn test_one_row_per_criterion_in_rubric_order() {
        let rows = build_verdict_rows(
            &rubric(),
            &[
                raw("c3", "Good", "Axes are labelled."),
                raw("c1", "Excellent", "Output matches."),
                raw("c2", "Partially", "Inconsistent naming."),
            ],
        );

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].criterion_id, "c1");
        assert_eq!(rows[0].level, VerdictLevel::Excellent);
        assert_eq!(rows[1].criterion_id, "c2");
        assert_eq!(rows[2].criterion_id, "c3");
        assert_eq!(rows[2].level, VerdictLevel::Good);
    }

    #[test]
    fn test_missing_verdict_synthesizes_no_row() {
        let rows = build_verdict_rows(
            &rubric(),
            &[
                raw("c1", "Good", "Fine."),
                raw("c2", "Good", "Also fine."),
            ],
        );

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].criterion_id, "c3");
        assert_eq!(rows[2].level, VerdictLevel::No);
        assert_eq!(rows[2].explanation, UNADDRESSED);
    }

    #[test]
    fn test_level_matching_is_case_insensitive() {
        let rows = build_verdict_rows(&rubric(), &[raw("c1", "eXcElLeNt", "ok")]);
        assert_eq!(rows[0].level, VerdictLevel::Excellent);
        assert_eq!(rows[0].explanation, "ok");
    }

    #[test]
    fn test_unknown_level_token_is_treated_as_missing() {
        let rows = build_verdict_rows(&rubric(), &[raw("c1", "great", "Nice work!")]);
        assert_eq!(rows[0].level, VerdictLevel::No);
        assert_eq!(rows[0].explanation, UNADDRESSED);
    }

    #[test]
    fn test_duplicate_verdict_keeps_first() {
        let rows = build_verdict_rows(
            &rubric(),
            &[
                raw("c1", "Good", "first judgment"),
                raw("c1", "No", "second judgment"),
            ],
        );
        assert_eq!(rows[0].level, VerdictLevel::Good);
        assert_eq!(rows[0].explanation, "first judgment");
    }

    #[test]
    fn test_verdict_for_unknown_criterion_is_ignored() {
        let rows = build_verdict_rows(&rubric(), &[raw("c9", "Good", "nonexistent")]);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.level == VerdictLevel::No));
    }
}
