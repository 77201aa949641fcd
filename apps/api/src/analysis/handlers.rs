use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::analysis::fallback::EvaluationMode;
use crate::analysis::pipeline::{run_analysis, AnalysisRequest};
use crate::analysis::render::render_text;
use crate::errors::AppError;
use crate::intake::{extract_pdf_text, json_to_resume_text};
use crate::models::report::StructuredReport;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub role: String,
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub resume_json: Option<Value>,
    #[serde(default)]
    pub mode: EvaluationMode,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis_id: Uuid,
    pub role: String,
    pub mode: EvaluationMode,
    pub attempts: u8,
    pub fallback_used: bool,
    pub generated_at: DateTime<Utc>,
    pub report: StructuredReport,
}

#[derive(Debug, Serialize)]
pub struct RolesResponse {
    pub roles: Vec<&'static str>,
}

/// GET /api/v1/roles
pub async fn handle_list_roles(State(state): State<AppState>) -> Json<RolesResponse> {
    Json(RolesResponse {
        roles: state.roles.role_names(),
    })
}

/// POST /api/v1/analyses
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let resume_text = match (req.resume_text, req.resume_json) {
        (Some(_), Some(_)) => {
            return Err(AppError::Validation(
                "Provide either resume_text or resume_json, not both".to_string(),
            ))
        }
        (Some(text), None) => text,
        (None, Some(Value::Object(map))) => json_to_resume_text(&map),
        (None, Some(_)) => {
            return Err(AppError::Validation(
                "resume_json must be a JSON object".to_string(),
            ))
        }
        (None, None) => String::new(),
    };

    analyze(&state, req.role, resume_text, req.mode).await.map(Json)
}

/// POST /api/v1/analyses/pdf
/// Multipart fields: `role`, optional `mode`, `file`.
pub async fn handle_analyze_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let mut role = None;
    let mut mode = EvaluationMode::default();
    let mut pdf: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "role" => role = Some(field.text().await?),
            "mode" => mode = parse_mode(&field.text().await?)?,
            "file" => pdf = Some(field.bytes().await?),
            _ => {}
        }
    }

    let role = role.ok_or_else(|| AppError::Validation("Missing 'role' field".to_string()))?;
    let pdf = pdf.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;

    let resume_text = tokio::task::spawn_blocking(move || extract_pdf_text(&pdf))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    analyze(&state, role, resume_text, mode).await.map(Json)
}

/// POST /api/v1/reports/text
pub async fn handle_render_text(Json(report): Json<StructuredReport>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_text(&report),
    )
}

async fn analyze(
    state: &AppState,
    role: String,
    resume_text: String,
    mode: EvaluationMode,
) -> Result<AnalysisResponse, AppError> {
    let role = role.trim().to_string();
    if role.is_empty() {
        return Err(AppError::Validation("role must not be empty".to_string()));
    }
    if resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Resume input is empty; provide resume text, JSON or a PDF with a text layer"
                .to_string(),
        ));
    }

    let retriever = state.roles.retriever_for(&role);
    let request = AnalysisRequest {
        role,
        resume_text,
        mode,
    };
    let outcome = run_analysis(
        state.llm.as_ref(),
        retriever.as_ref(),
        &request,
        state.config.llm_timeout,
    )
    .await;

    let response = AnalysisResponse {
        analysis_id: Uuid::new_v4(),
        role: request.role,
        mode,
        attempts: outcome.resolution.attempts,
        fallback_used: outcome.resolution.fallback_used,
        generated_at: Utc::now(),
        report: outcome.resolution.report,
    };
    info!(
        "Analysis {} finished: {} after {} attempt(s), fallback_used={}",
        response.analysis_id,
        response.report.final_verdict.decision.label(),
        response.attempts,
        response.fallback_used
    );
    Ok(response)
}

fn parse_mode(raw: &str) -> Result<EvaluationMode, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "text" => Ok(EvaluationMode::Text),
        "json" => Ok(EvaluationMode::Json),
        other => Err(AppError::Validation(format!(
            "Unknown mode '{other}', expected 'text' or 'json'"
        ))),
    }
}
