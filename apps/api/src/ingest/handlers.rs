use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::{ApiJson, AppError};
use crate::ingest::extract_resume;
use crate::resumes::service::import_resume;
use crate::state::AppState;

const DEFAULT_IMPORT_TITLE: &str = "Untitled Resume";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResumeRequest {
    pub resume_text: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResumeResponse {
    pub resume_id: Uuid,
    pub quarantined_fields: Vec<String>,
    pub reclassified: usize,
}

/// POST /api/ai/upload-resume
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    ApiJson(req): ApiJson<UploadResumeRequest>,
) -> Result<Json<UploadResumeResponse>, AppError> {
    let resume_text = req
        .resume_text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("Missing required fields".to_string()))?;

    let mapped = extract_resume(state.llm.as_ref(), resume_text).await?;

    let title = req
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_IMPORT_TITLE.to_string());
    let resume = import_resume(state.resumes.as_ref(), owner, title, mapped.content).await?;

    info!(
        "Imported resume {} for user {owner} ({} quarantined, {} reclassified)",
        resume.id,
        mapped.quarantined_fields.len(),
        mapped.reclassified
    );

    Ok(Json(UploadResumeResponse {
        resume_id: resume.id,
        quarantined_fields: mapped.quarantined_fields,
        reclassified: mapped.reclassified,
    }))
}
