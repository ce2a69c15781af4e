pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::enhance::handlers as enhance;
use crate::ingest::handlers as ingest;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::live_handler))
        .route("/health", get(health::health_handler))
        // AI API
        .route(
            "/api/ai/enhance-prof-summ",
            post(enhance::handle_enhance_summary),
        )
        .route(
            "/api/ai/enhance-job-desc",
            post(enhance::handle_enhance_job_description),
        )
        .route("/api/ai/upload-resume", post(ingest::handle_upload_resume))
        // Resume API
        .route("/api/resumes/create", post(resumes::handle_create))
        .route("/api/resumes/update", put(resumes::handle_update))
        .route(
            "/api/resumes/delete/:resumeId",
            delete(resumes::handle_delete),
        )
        .route("/api/resumes/get/:resumeId", get(resumes::handle_get))
        .route(
            "/api/resumes/public/:resumeId",
            get(resumes::handle_get_public),
        )
        .with_state(state)
}
