//! Retry / fallback policy around the evaluator call.
//!
//! At most two evaluator invocations per analysis. A call error, a timeout, a blank
//! reply and a JSON parse failure all count as a failed attempt. When both attempts
//! fail the caller still gets the fixed safe-default report.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::json_parser::{self, ParseFailure};
use crate::analysis::prompts::{EVALUATOR_JSON_SYSTEM, EVALUATOR_TEXT_SYSTEM};
use crate::analysis::text_parser::parse_report;
use crate::llm_client::prompts::{EVIDENCE_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{LlmError, TextGenerator};
use crate::models::report::{ContentItem, Decision, Provenance, StructuredReport, Verdict};

pub const SAFE_DEFAULT_REASON: &str = "Automated evaluation could not be completed for this resume. \
    The result is a low-confidence placeholder and the resume requires manual review.";

/// Which prompting contract the evaluator was asked to follow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    #[default]
    Text,
    Json,
}

impl EvaluationMode {
    pub fn system_prompt(self) -> String {
        match self {
            EvaluationMode::Text => {
                EVALUATOR_TEXT_SYSTEM.replace("{evidence_instruction}", EVIDENCE_INSTRUCTION)
            }
            EvaluationMode::Json => EVALUATOR_JSON_SYSTEM
                .replace("{evidence_instruction}", EVIDENCE_INSTRUCTION)
                .replace("{json_only}", JSON_ONLY_SYSTEM),
        }
    }
}

/// Passed to the prompt builder so the second call can carry a retry instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Initial,
    Retry,
}

#[derive(Debug, Error)]
pub enum AttemptFailure {
    #[error("evaluator call failed: {0}")]
    Call(#[from] LlmError),

    #[error("evaluator call timed out after {0:?}")]
    Timeout(Duration),

    #[error("evaluator returned an empty response")]
    Blank,

    #[error(transparent)]
    Parse(#[from] ParseFailure),
}

/// The report plus how it was obtained.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub report: StructuredReport,
    pub attempts: u8,
    pub fallback_used: bool,
}

pub struct RetryFallbackPolicy {
    pub mode: EvaluationMode,
    pub role: String,
    pub call_timeout: Duration,
}

impl RetryFallbackPolicy {
    pub fn new(mode: EvaluationMode, role: impl Into<String>, call_timeout: Duration) -> Self {
        Self {
            mode,
            role: role.into(),
            call_timeout,
        }
    }

    /// Runs the evaluator at most twice and always returns a usable report.
    pub async fn resolve<G, F>(
        &self,
        generator: &G,
        prompt_builder: F,
        structured_resume: &str,
    ) -> Resolution
    where
        G: TextGenerator + ?Sized,
        F: Fn(&str, Attempt) -> String,
    {
        let system = self.mode.system_prompt();

        for (attempt_no, attempt) in (1u8..).zip([Attempt::Initial, Attempt::Retry]) {
            let prompt = prompt_builder(structured_resume, attempt);
            match self.attempt(generator, &prompt, &system).await {
                Ok(report) => {
                    info!(
                        "Evaluation parsed on attempt {} ({:?} mode)",
                        attempt_no, self.mode
                    );
                    return Resolution {
                        report,
                        attempts: attempt_no,
                        fallback_used: false,
                    };
                }
                Err(e) => warn!("Evaluation attempt {}/2 failed: {e}", attempt_no),
            }
        }

        warn!("Both evaluation attempts failed, returning safe-default report");
        Resolution {
            report: safe_default_report(),
            attempts: 2,
            fallback_used: true,
        }
    }

    async fn attempt<G>(
        &self,
        generator: &G,
        prompt: &str,
        system: &str,
    ) -> Result<StructuredReport, AttemptFailure>
    where
        G: TextGenerator + ?Sized,
    {
        let text = tokio::time::timeout(self.call_timeout, generator.generate(prompt, system))
            .await
            .map_err(|_| AttemptFailure::Timeout(self.call_timeout))??;

        if text.trim().is_empty() {
            return Err(AttemptFailure::Blank);
        }

        match self.mode {
            EvaluationMode::Text => Ok(parse_report(&text, &self.role)),
            EvaluationMode::Json => Ok(json_parser::parse(&text)?.into_report(&self.role)),
        }
    }
}

/// Fixed record returned when every attempt failed. One item per list; the
/// question minimum does not apply to this placeholder.
pub fn safe_default_report() -> StructuredReport {
    let placeholder = |text: &str| ContentItem::new(text, Some(Provenance::SystemGenerated));
    StructuredReport {
        strengths: vec![placeholder(
            "The resume was received, but strengths could not be assessed automatically.",
        )],
        skill_gaps: vec![placeholder(
            "Skill gaps could not be determined automatically; compare the resume against the role requirements manually.",
        )],
        improvement_suggestions: vec![ContentItem::new(
            "Ensure the resume lists skills, projects, education and experience in clearly labelled sections.",
            None,
        )],
        interview_questions: vec![placeholder(
            "Walk us through the project on your resume that best matches this role.",
        )],
        final_verdict: Verdict {
            decision: Decision::NotApplicable,
            confidence: None,
            reason: SAFE_DEFAULT_REASON.to_string(),
        },
    }
}
