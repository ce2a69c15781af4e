//! Resume import: raw resume text → AI extraction → normalized JSON → typed content.

pub mod classify;
pub mod handlers;
pub mod mapper;
pub mod normalize;
pub mod prompts;

use tracing::debug;

use crate::errors::AppError;
use crate::ingest::mapper::{map_resume, MappedResume};
use crate::ingest::normalize::normalize_response;
use crate::ingest::prompts::{resume_parse_prompt, RESUME_PARSE_SYSTEM};
use crate::llm_client::TextGenerator;

pub async fn extract_resume(
    llm: &dyn TextGenerator,
    resume_text: &str,
) -> Result<MappedResume, AppError> {
    let raw = llm
        .invoke(RESUME_PARSE_SYSTEM, &resume_parse_prompt(resume_text))
        .await?;
    let candidate = normalize_response(&raw);
    debug!(
        "Normalized AI reply from {} to {} bytes",
        raw.len(),
        candidate.len()
    );
    map_resume(&candidate)
}
