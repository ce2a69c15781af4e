//! Rewrites short resume passages through the AI gateway.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AuthUser;
use crate::enhance::prompts::{JOB_DESCRIPTION_SYSTEM, PROFESSIONAL_SUMMARY_SYSTEM};
use crate::errors::{ApiJson, AppError};
use crate::llm_client::TextGenerator;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnhanceKind {
    ProfessionalSummary,
    JobDescription,
}

impl EnhanceKind {
    fn system_prompt(self) -> &'static str {
        match self {
            EnhanceKind::ProfessionalSummary => PROFESSIONAL_SUMMARY_SYSTEM,
            EnhanceKind::JobDescription => JOB_DESCRIPTION_SYSTEM,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceRequest {
    pub user_content: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceResponse {
    pub enhanced_content: String,
}

/// Validates input before touching the gateway: blank content never costs an AI call.
pub async fn enhance_text(
    llm: &dyn TextGenerator,
    kind: EnhanceKind,
    content: Option<&str>,
) -> Result<String, AppError> {
    let content = content
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::Validation("Missing required fields".to_string()))?;

    let enhanced = llm.invoke(kind.system_prompt(), content).await?;
    Ok(enhanced.trim().to_string())
}

/// POST /api/ai/enhance-prof-summ
pub async fn handle_enhance_summary(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(req): ApiJson<EnhanceRequest>,
) -> Result<Json<EnhanceResponse>, AppError> {
    info!("Enhancing professional summary for user {user}");
    let enhanced_content = enhance_text(
        state.llm.as_ref(),
        EnhanceKind::ProfessionalSummary,
        req.user_content.as_deref(),
    )
    .await?;
    Ok(Json(EnhanceResponse { enhanced_content }))
}

/// POST /api/ai/enhance-job-desc
pub async fn handle_enhance_job_description(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(req): ApiJson<EnhanceRequest>,
) -> Result<Json<EnhanceResponse>, AppError> {
    info!("Enhancing job description for user {user}");
    let enhanced_content = enhance_text(
        state.llm.as_ref(),
        EnhanceKind::JobDescription,
        req.user_content.as_deref(),
    )
    .await?;
    Ok(Json(EnhanceResponse { enhanced_content }))
}
