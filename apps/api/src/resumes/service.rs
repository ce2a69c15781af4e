//! Resume CRUD operations. Owner scoping is enforced by the store; this layer validates
//! input and translates "no match" into `AppError::NotFound`.

use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{Resume, ResumeContent, ResumePatch, ResumeView};
use crate::resumes::store::ResumeStore;

const NOT_FOUND: &str = "Resume Not Found";

pub fn parse_resume_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::Validation(format!("Invalid resume id '{raw}'")))
}

pub async fn create_resume(
    store: &dyn ResumeStore,
    owner: Uuid,
    title: Option<&str>,
) -> Result<Resume, AppError> {
    let title = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("Missing required fields".to_string()))?;

    let resume = Resume::new(owner, title.to_string(), ResumeContent::default());
    store.insert(&resume).await?;
    Ok(resume)
}

/// Persists content produced by the AI import pipeline.
pub async fn import_resume(
    store: &dyn ResumeStore,
    owner: Uuid,
    title: String,
    content: ResumeContent,
) -> Result<Resume, AppError> {
    let resume = Resume::new(owner, title, content);
    store.insert(&resume).await?;
    Ok(resume)
}

pub async fn get_resume(
    store: &dyn ResumeStore,
    owner: Uuid,
    id: Uuid,
) -> Result<ResumeView, AppError> {
    store
        .find_owned(owner, id)
        .await?
        .map(ResumeView::from)
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
}

/// No owner check: anyone holding the id can read a public resume.
pub async fn get_public_resume(store: &dyn ResumeStore, id: Uuid) -> Result<ResumeView, AppError> {
    store
        .find_public(id)
        .await?
        .map(ResumeView::from)
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
}

/// Decodes an update payload sent either as a JSON object or as a JSON-encoded string.
pub fn decode_update_payload(payload: Value) -> Result<ResumePatch, AppError> {
    let object = match payload {
        Value::Null => {
            return Err(AppError::Validation("Missing required fields".to_string()));
        }
        Value::String(encoded) => serde_json::from_str::<Value>(&encoded)
            .map_err(|e| AppError::Parse(format!("resumeData is not valid JSON: {e}")))?,
        other => other,
    };
    ResumePatch::from_object(object)
        .map_err(|e| AppError::Validation(format!("Invalid resume data: {e}")))
}

pub async fn update_resume(
    store: &dyn ResumeStore,
    owner: Uuid,
    id: Uuid,
    payload: Value,
    expected_version: Option<i32>,
) -> Result<Resume, AppError> {
    let patch = decode_update_payload(payload)?;
    store
        .update_owned(owner, id, patch, expected_version)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
}

pub async fn delete_resume(store: &dyn ResumeStore, owner: Uuid, id: Uuid) -> Result<(), AppError> {
    if store.delete_owned(owner, id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound(
            "Resume not found or unauthorized".to_string(),
        ))
    }
}
