//! Analysis pipeline: clean -> structure -> retrieve -> evaluate.
//!
//! One sequential chain per request. Preparation steps degrade to the previous
//! stage's text; evaluation degrades to the safe-default report. Nothing here
//! returns an error to the caller.

use std::time::Duration;

use tracing::{info, warn};

use crate::analysis::fallback::{Attempt, EvaluationMode, Resolution, RetryFallbackPolicy};
use crate::analysis::prompts::{
    DOCUMENT_PROCESSOR_SYSTEM, EVALUATION_PROMPT_TEMPLATE, RESUME_READER_SYSTEM,
};
use crate::llm_client::prompts::RETRY_INSTRUCTION;
use crate::llm_client::TextGenerator;
use crate::retrieval::Retriever;

/// Number of role expectation snippets placed in the evaluator prompt.
pub const EXPECTATIONS_K: usize = 5;

#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub role: String,
    pub resume_text: String,
    pub mode: EvaluationMode,
}

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub resolution: Resolution,
    pub expectations_used: usize,
}

pub async fn run_analysis(
    generator: &dyn TextGenerator,
    retriever: &dyn Retriever,
    request: &AnalysisRequest,
    call_timeout: Duration,
) -> AnalysisOutcome {
    info!(
        "Starting analysis for role '{}' ({:?} mode, {} chars)",
        request.role,
        request.mode,
        request.resume_text.len()
    );

    // Step 1: clean
    let cleaned = prepare(
        generator,
        "clean",
        &request.resume_text,
        DOCUMENT_PROCESSOR_SYSTEM,
        call_timeout,
    )
    .await;

    // Step 2: structure
    let structured = prepare(
        generator,
        "structure",
        &cleaned,
        RESUME_READER_SYSTEM,
        call_timeout,
    )
    .await;

    // Step 3: retrieve
    let expectations = match retriever.query(&structured, EXPECTATIONS_K).await {
        Ok(snippets) => snippets,
        Err(e) => {
            warn!("Role expectation retrieval failed, continuing without: {e}");
            Vec::new()
        }
    };
    info!("Retrieved {} role expectations", expectations.len());
    let expectations_text = expectations.join("\n");

    // Step 4: evaluate
    let policy = RetryFallbackPolicy::new(request.mode, request.role.clone(), call_timeout);
    let resolution = policy
        .resolve(
            generator,
            |resume, attempt| {
                build_evaluation_prompt(&request.role, resume, &expectations_text, attempt)
            },
            &structured,
        )
        .await;

    AnalysisOutcome {
        resolution,
        expectations_used: expectations.len(),
    }
}

pub fn build_evaluation_prompt(
    role: &str,
    structured_resume: &str,
    expectations: &str,
    attempt: Attempt,
) -> String {
    let prompt = EVALUATION_PROMPT_TEMPLATE
        .replace("{role}", role)
        .replace("{structured_resume}", structured_resume)
        .replace("{expectations}", expectations);
    match attempt {
        Attempt::Initial => prompt,
        Attempt::Retry => format!("{prompt}\n\n{RETRY_INSTRUCTION}"),
    }
}

/// Runs one preparation step. A failed, timed-out or blank call hands back `input`.
async fn prepare(
    generator: &dyn TextGenerator,
    step: &str,
    input: &str,
    system: &str,
    call_timeout: Duration,
) -> String {
    match tokio::time::timeout(call_timeout, generator.generate(input, system)).await {
        Ok(Ok(text)) if !text.trim().is_empty() => text,
        Ok(Ok(_)) => {
            warn!("Step '{step}' returned blank output, keeping previous text");
            input.to_string()
        }
        Ok(Err(e)) => {
            warn!("Step '{step}' failed, keeping previous text: {e}");
            input.to_string()
        }
        Err(_) => {
            warn!("Step '{step}' timed out after {call_timeout:?}, keeping previous text");
            input.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::fake::{Scripted, ScriptedGenerator};
    use crate::models::report::Decision;
    use crate::retrieval::{KeywordRetriever, RetrievalError};
    use async_trait::async_trait;

    struct BrokenRetriever;

    #[async_trait]
    impl Retriever for BrokenRetriever {
        async fn query(&self, _query: &str, _k: usize) -> Result<Vec<String>, RetrievalError> {
            Err(RetrievalError::Backend("index offline".into()))
        }
    }

    fn request(mode: EvaluationMode) -> AnalysisRequest {
        AnalysisRequest {
            role: "AI / ML Intern".to_string(),
            resume_text: "raw resume: Python, PyTorch".to_string(),
            mode,
        }
    }

    const EVALUATION: &str = "Strengths:\n- Python\nFinal Verdict:\nDecision: Applicable\nReason: Core skills present";

    #[tokio::test]
    async fn test_full_chain_threads_each_stage() {
        let generator =
            ScriptedGenerator::replies(&["cleaned resume", "SKILLS: Python", EVALUATION]);
        let retriever = KeywordRetriever::from_text("Python programming\nSQL basics");

        let outcome = run_analysis(
            &generator,
            &retriever,
            &request(EvaluationMode::Text),
            Duration::from_secs(30),
        )
        .await;

        let calls = generator.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].0, "raw resume: Python, PyTorch");
        assert_eq!(calls[0].1, DOCUMENT_PROCESSOR_SYSTEM);
        assert_eq!(calls[1].0, "cleaned resume");
        assert_eq!(calls[1].1, RESUME_READER_SYSTEM);
        assert!(calls[2].0.contains("Target Role: AI / ML Intern"));
        assert!(calls[2].0.contains("SKILLS: Python"));
        assert!(calls[2].0.contains("Python programming\nSQL basics"));

        assert_eq!(outcome.expectations_used, 2);
        assert_eq!(outcome.resolution.attempts, 1);
        assert_eq!(
            outcome.resolution.report.final_verdict.decision,
            Decision::Applicable
        );
    }

    #[tokio::test]
    async fn test_failed_preparation_falls_back_to_previous_text() {
        let generator = ScriptedGenerator::new(vec![
            Scripted::Fail,
            Scripted::Reply("  ".into()),
            Scripted::Reply(EVALUATION.into()),
        ]);
        let retriever = KeywordRetriever::default();

        run_analysis(
            &generator,
            &retriever,
            &request(EvaluationMode::Text),
            Duration::from_secs(30),
        )
        .await;

        let calls = generator.calls();
        assert_eq!(calls[1].0, "raw resume: Python, PyTorch");
        assert!(calls[2].0.contains("raw resume: Python, PyTorch"));
    }

    #[tokio::test]
    async fn test_retrieval_error_is_an_empty_result() {
        let generator = ScriptedGenerator::replies(&["c", "s", EVALUATION]);
        let outcome = run_analysis(
            &generator,
            &BrokenRetriever,
            &request(EvaluationMode::Text),
            Duration::from_secs(30),
        )
        .await;
        assert_eq!(outcome.expectations_used, 0);
        assert!(!outcome.resolution.fallback_used);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_generator_still_produces_report() {
        let generator = ScriptedGenerator::new(vec![
            Scripted::Hang,
            Scripted::Hang,
            Scripted::Hang,
            Scripted::Hang,
        ]);
        let outcome = run_analysis(
            &generator,
            &KeywordRetriever::default(),
            &request(EvaluationMode::Json),
            Duration::from_secs(10),
        )
        .await;
        assert_eq!(generator.call_count(), 4);
        assert!(outcome.resolution.fallback_used);
        assert_eq!(
            outcome.resolution.report.final_verdict.decision,
            Decision::NotApplicable
        );
    }

    #[test]
    fn test_retry_prompt_appends_instruction() {
        let initial = build_evaluation_prompt("Data Science Intern", "r", "e", Attempt::Initial);
        let retry = build_evaluation_prompt("Data Science Intern", "r", "e", Attempt::Retry);
        assert!(!initial.contains(RETRY_INSTRUCTION));
        assert!(retry.starts_with(&initial));
        assert!(retry.ends_with(RETRY_INSTRUCTION));
    }
}
