use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::AuthUser;
use crate::errors::{ApiJson, AppError};
use crate::models::resume::{Resume, ResumeView};
use crate::resumes::service;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateResumeRequest {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResumeRequest {
    pub resume_id: Option<String>,
    /// Either a resume object or that object JSON-encoded as a string.
    #[serde(default)]
    pub resume_data: Value,
    /// Opt-in optimistic concurrency. Omit for last-write-wins.
    pub expected_version: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct SavedResumeResponse {
    pub message: &'static str,
    pub resume: Resume,
}

#[derive(Debug, Serialize)]
pub struct ResumeResponse {
    pub resume: ResumeView,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// POST /api/resumes/create
pub async fn handle_create(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    ApiJson(req): ApiJson<CreateResumeRequest>,
) -> Result<(StatusCode, Json<SavedResumeResponse>), AppError> {
    let resume = service::create_resume(state.resumes.as_ref(), owner, req.title.as_deref()).await?;
    Ok((
        StatusCode::CREATED,
        Json(SavedResumeResponse {
            message: "Resume Created Successfully",
            resume,
        }),
    ))
}

/// PUT /api/resumes/update
pub async fn handle_update(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    ApiJson(req): ApiJson<UpdateResumeRequest>,
) -> Result<Json<SavedResumeResponse>, AppError> {
    let raw_id = req
        .resume_id
        .ok_or_else(|| AppError::Validation("Missing required fields".to_string()))?;
    let id = service::parse_resume_id(&raw_id)?;
    let resume = service::update_resume(
        state.resumes.as_ref(),
        owner,
        id,
        req.resume_data,
        req.expected_version,
    )
    .await?;
    Ok(Json(SavedResumeResponse {
        message: "Saved Successfully!",
        resume,
    }))
}

/// DELETE /api/resumes/delete/:resumeId
pub async fn handle_delete(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    Path(resume_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = service::parse_resume_id(&resume_id)?;
    service::delete_resume(state.resumes.as_ref(), owner, id).await?;
    Ok(Json(MessageResponse {
        message: "Resume Deleted Successfully",
    }))
}

/// GET /api/resumes/get/:resumeId
pub async fn handle_get(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    Path(resume_id): Path<String>,
) -> Result<Json<ResumeResponse>, AppError> {
    let id = service::parse_resume_id(&resume_id)?;
    let resume = service::get_resume(state.resumes.as_ref(), owner, id).await?;
    Ok(Json(ResumeResponse { resume }))
}

/// GET /api/resumes/public/:resumeId
pub async fn handle_get_public(
    State(state): State<AppState>,
    Path(resume_id): Path<String>,
) -> Result<Json<ResumeResponse>, AppError> {
    let id = service::parse_resume_id(&resume_id)?;
    let resume = service::get_public_resume(state.resumes.as_ref(), id).await?;
    Ok(Json(ResumeResponse { resume }))
}
