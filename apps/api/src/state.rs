use std::sync::Arc;

use crate::auth::TokenValidator;
use crate::llm_client::TextGenerator;
use crate::resumes::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is an immutable handle; per-request work never mutates it.
#[derive(Clone)]
pub struct AppState {
    /// Resume persistence. Production: `PgResumeStore` over the startup pool.
    pub resumes: Arc<dyn ResumeStore>,
    /// AI gateway. Production: `GeminiClient`.
    pub llm: Arc<dyn TextGenerator>,
    pub tokens: Arc<TokenValidator>,
}
