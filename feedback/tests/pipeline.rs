//tests/pipeline.rs
use async_trait::async_trait;
use feedback::FeedbackJob;
use feedback::error::FeedbackResult;
use feedback::rubric::Rubric;
use feedback::submission::{NotebookCell, Submission, SubmissionSource};
use feedback::traits::provider::Provider;
use feedback::types::Question;
use serde_json::Value;

/// Provider double returning one canned response.
struct CannedProvider {
    response: String,
}

#[async_trait]
impl Provider for CannedProvider {
    async fn generate(&self, prompt: &str, schema: &str) -> FeedbackResult<String> {
        // The pipeline must send the numbered submission and the schema it validates against.
        assert!(prompt.contains("<<<START OF UNTRUSTED DATA>>>"));
        assert!(prompt.contains("<<FILE analysis.ipynb (lines 1-5)>>"));
        assert!(schema.contains("\"annotations\""));
        Ok(self.response.clone())
    }
}

fn rubric() -> Rubric {
    Rubric::from_json(
        r#"{"criteria":[
            {"id":"correctness","description":"Analysis produces the right statistics","weight":3.0},
            {"id":"plotting","description":"Plot has labelled axes and a title"},
            {"id":"style","description":"Code follows the course style guide"}
        ]}"#,
    )
    .expect("rubric fixture parses")
}

fn submission() -> Submission {
    Submission::from_sources(vec![
        SubmissionSource::Notebook {
            filename: "analysis.ipynb".to_string(),
            cells: vec![
                NotebookCell::markdown("# Question 2"),
                NotebookCell::code("import pandas as pd\ndf = pd.read_csv('data.csv')"),
                NotebookCell::code("mean = df['x'].mean()\nprint(mean)"),
            ],
        },
        SubmissionSource::Image {
            filename: "plot.png".to_string(),
        },
    ])
}

#[tokio::test]
async fn test_full_pipeline_with_fenced_response() {
    // The model ignores the no-fence instruction and wraps the JSON in markdown,
    // references one out-of-range line, one unknown file, and skips one criterion.
    let response_text = r#"Here is the feedback:
```json
{
  "annotations": [
    {"filename":"analysis.ipynb","content":"Mean is printed without rounding.","line_start":5,"line_end":5},
    {"filename":"analysis.ipynb","content":"Past the end of the notebook.","line_start":6,"line_end":9},
    {"filename":"answers.py","content":"No such file.","line_start":1,"line_end":1},
    {"filename":"analysis.ipynb","content":"Hard-coded filename.","line_start":3,"line_end":3,"column_start":5,"column_end":30}
  ],
  "verdicts": [
    {"criterion_id":"correctness","level":"good","explanation":"Statistics are close but unrounded."},
    {"criterion_id":"style","level":"Partially","explanation":"Missing docstrings."}
  ]
}
```"#;

    let job = FeedbackJob::new(rubric(), submission(), Question::new("q2", "Summarize the dataset and plot x."))
        .with_provider(CannedProvider {
            response: response_text.to_string(),
        });

    let response = job.run().await.expect("pipeline should succeed");
    let value: Value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["success"], true);
    assert_eq!(value["message"], "Feedback generation complete.");
    assert_eq!(value["data"]["question_id"], "q2");

    // One verdict row per criterion, in rubric order; the unaddressed criterion
    // is synthesized as a visible No row.
    let rows = value["data"]["verdict_rows"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["criterion_id"], "correctness");
    assert_eq!(rows[0]["level"], "Good");
    assert_eq!(rows[1]["criterion_id"], "plotting");
    assert_eq!(rows[1]["level"], "No");
    assert!(
        rows[1]["explanation"]
            .as_str()
            .unwrap()
            .contains("not addressed")
    );
    assert_eq!(rows[2]["criterion_id"], "style");
    assert_eq!(rows[2]["level"], "Partially");

    // Out-of-range and unknown-file annotations are dropped, never clamped; the
    // survivors are sorted by (filename, line_start, column_start).
    let annotations = value["data"]["annotations"].as_array().unwrap();
    assert_eq!(annotations.len(), 2);
    assert_eq!(annotations[0]["line_start"], 3);
    assert_eq!(annotations[0]["column_start"], 5);
    assert_eq!(annotations[1]["line_start"], 5);
    // The line-only annotation had its columns derived from the source line.
    assert_eq!(annotations[1]["column_start"], 0);
    assert_eq!(annotations[1]["column_end"], 11);
}

#[tokio::test]
async fn test_pipeline_with_no_verdicts_still_fills_the_table() {
    let job = FeedbackJob::new(rubric(), submission(), Question::new("q2", "Summarize."))
        .with_provider(CannedProvider {
            response: r#"{"annotations":[]}"#.to_string(),
        });

    let response = job.run().await.expect("pipeline should succeed");
    let value: Value = serde_json::to_value(&response).unwrap();

    let rows = value["data"]["verdict_rows"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    for row in rows {
        assert_eq!(row["level"], "No");
    }
    assert!(value["data"]["annotations"].as_array().unwrap().is_empty());
}
