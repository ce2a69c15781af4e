//! Fakes and helpers shared by handler tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use crate::auth::TokenValidator;
use crate::llm_client::{LlmError, TextGenerator};
use crate::resumes::memory::MemoryResumeStore;
use crate::routes::build_router;
use crate::state::AppState;

pub const TEST_SECRET: &[u8] = b"test-secret-key-at-least-32-bytes";

/// Gateway fake that returns a canned reply and records every prompt it receives.
pub struct ScriptedGenerator {
    reply: Option<String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails the way an empty Gemini response does.
    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<(String, String)> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn invoke(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));
        self.reply.clone().ok_or(LlmError::EmptyContent)
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryResumeStore>,
    pub llm: Arc<ScriptedGenerator>,
}

impl TestApp {
    pub fn new(llm: ScriptedGenerator) -> Self {
        let store = Arc::new(MemoryResumeStore::default());
        let llm = Arc::new(llm);
        let state = AppState {
            resumes: store.clone(),
            llm: llm.clone(),
            tokens: Arc::new(TokenValidator::with_hs256(TEST_SECRET)),
        };
        Self {
            router: build_router(state),
            store,
            llm,
        }
    }

    /// Sends one request through the router. `body` of `None` sends no body.
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, json)
    }
}

pub fn token_for(user_id: Uuid) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        &json!({ "sub": user_id, "exp": chrono::Utc::now().timestamp() + 3600 }),
        &EncodingKey::from_secret(TEST_SECRET),
    )
    .unwrap()
}
