//! # Feedback Library
//!
//! This crate provides the core logic for generating rubric-based AI feedback on
//! student submissions. It builds a prompt from a submission and a marking rubric,
//! invokes an LLM provider, validates the provider's structured annotation output,
//! reconciles every reported source location against the actual submission content,
//! and assembles a deterministic feedback report.
//!
//! ## Key Concepts
//! - **FeedbackJob**: The main struct representing one grading run for a single submission.
//! - **Providers**: Pluggable LLM backends implementing the `generate(prompt, schema)` boundary.
//! - **Reconciliation**: Validation of model-reported file/line/column references so every
//!   location in the report is real; unverifiable data is dropped and logged, never guessed.
//! - **Reports**: One verdict row per rubric criterion plus an ordered annotation list.

pub mod error;
pub mod prompt;
pub mod providers;
pub mod reconcile;
pub mod renderers;
pub mod report;
pub mod rubric;
pub mod runner;
pub mod schema;
pub mod submission;
pub mod traits;
pub mod types;
pub mod verdict;

use crate::error::{FeedbackError, FeedbackResult};
use crate::prompt::PromptPayload;
use crate::providers::gemini::GeminiProvider;
use crate::report::FeedbackReportResponse;
use crate::rubric::Rubric;
use crate::schema::ValidatedResponse;
use crate::submission::Submission;
use crate::traits::provider::Provider;
use crate::types::Question;

use chrono::Utc;
use common::config;
use std::time::Duration;
use tracing::{info, warn};

/// Represents one grading run for a single student submission.
///
/// This struct encapsulates the inputs and configuration needed to generate feedback:
/// the marking rubric, the normalized submission, the question under assessment, and
/// the provider to call. Rubric, question and submission are immutable once the job
/// is constructed, so independent jobs are safe to run concurrently.
///
/// # Fields
/// - `rubric`: Ordered marking criteria; the report has exactly one row per criterion.
/// - `submission`: The files shown to the model, with the line numbering the
///   reconciler later enforces.
/// - `question`: The question text embedded verbatim in the prompt.
/// - `provider`: LLM backend strategy (defaults to Gemini).
pub struct FeedbackJob {
    rubric: Rubric,
    submission: Submission,
    question: Question,
    extra_instructions: Option<String>,
    provider: Box<dyn Provider + Send + Sync>,
    timeout: Duration,
    max_retries: u32,
}

impl FeedbackJob {
    /// Create a new grading job with the default provider and configured limits.
    ///
    /// # Arguments
    /// * `rubric` - Ordered marking criteria for the question.
    /// * `submission` - Normalized student submission.
    /// * `question` - The question the submission answers.
    pub fn new(rubric: Rubric, submission: Submission, question: Question) -> Self {
        Self {
            rubric,
            submission,
            question,
            extra_instructions: None,
            provider: Box::new(GeminiProvider::new()),
            timeout: Duration::from_secs(config::provider_timeout_secs()),
            max_retries: config::provider_max_retries(),
        }
    }

    /// Set a custom provider strategy for this job.
    pub fn with_provider<P: Provider + Send + Sync + 'static>(mut self, provider: P) -> Self {
        self.provider = Box::new(provider);
        self
    }

    /// Bound the provider call; expiry surfaces as [`FeedbackError::ProviderTimeout`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set how many times a failed provider call is retried before giving up.
    pub fn with_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Append assignment-specific instructions to the prompt.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.extra_instructions = Some(instructions.into());
        self
    }

    /// Run the grading pipeline and generate a feedback report.
    ///
    /// # Returns
    /// * `Ok(FeedbackReportResponse)` on success, containing the verdict table and
    ///   the reconciled annotation list.
    /// * `Err(FeedbackError)` if the inputs are empty, the provider cannot be
    ///   reached within the retry budget, or the response never parses as the
    ///   declared schema.
    ///
    /// # Steps
    /// 1. Validates that rubric and submission are non-empty.
    /// 2. Builds the prompt payload (pure; records what was sent).
    /// 3. Calls the provider, bounded by the timeout, with bounded retries.
    /// 4. Validates the structured response; malformed elements are dropped with warnings.
    /// 5. Reconciles annotation locations against the submission; failures are
    ///    rejected into a logged side list.
    /// 6. Builds exactly one verdict row per rubric criterion.
    /// 7. Assembles the deterministic report.
    pub async fn run(self) -> FeedbackResult<FeedbackReportResponse> {
        if self.rubric.is_empty() {
            return Err(FeedbackError::MissingInput(
                "rubric has no criteria".to_string(),
            ));
        }
        if self.submission.is_empty() {
            return Err(FeedbackError::MissingInput(
                "submission has no files".to_string(),
            ));
        }

        let payload = prompt::build(
            &self.rubric,
            &self.submission,
            &self.question,
            self.extra_instructions.as_deref(),
        )?;

        let validated = self.generate_validated(&payload).await?;

        let (valid_annotations, rejected) =
            reconcile::reconcile(validated.annotations, &self.submission);
        if !rejected.is_empty() {
            warn!(
                question_id = %self.question.id,
                rejected = rejected.len(),
                "annotations rejected during reconciliation"
            );
        }

        let verdict_rows = verdict::build_verdict_rows(&self.rubric, &validated.verdicts);

        info!(
            question_id = %self.question.id,
            verdict_rows = verdict_rows.len(),
            annotations = valid_annotations.len(),
            dropped = validated.warnings.len() + rejected.len(),
            "feedback run complete"
        );

        let report = report::assemble(
            self.question.id.clone(),
            Utc::now().to_rfc3339(),
            verdict_rows,
            valid_annotations,
        );
        Ok(report.into())
    }

    /// Calls the provider and validates the response.
    ///
    /// Provider failures (including timeouts) are retried up to `max_retries` times
    /// with doubling backoff, re-issuing the identical prompt. A response that fails
    /// top-level schema validation is retried exactly once; a second schema failure
    /// is fatal for the run.
    async fn generate_validated(&self, payload: &PromptPayload) -> FeedbackResult<ValidatedResponse> {
        let mut provider_attempts = 0u32;
        let mut schema_retried = false;
        let mut backoff = Duration::from_millis(500);

        loop {
            let raw = match tokio::time::timeout(
                self.timeout,
                self.provider.generate(&payload.text, &payload.schema),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(FeedbackError::ProviderTimeout(self.timeout.as_secs())),
            };

            match raw {
                Ok(raw) => match schema::validate(&raw) {
                    Ok(validated) => return Ok(validated),
                    Err(err) if !schema_retried => {
                        schema_retried = true;
                        warn!(%err, "response failed schema validation, retrying once with the same prompt");
                    }
                    Err(err) => return Err(err),
                },
                Err(err) if provider_attempts < self.max_retries => {
                    provider_attempts += 1;
                    warn!(%err, attempt = provider_attempts, "provider call failed, backing off");
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
