/// AI gateway: the single point of entry for all generative-model calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// Handlers depend on the `TextGenerator` trait, never on `GeminiClient`.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod prompts;

#[derive(Debug, Error)]
pub enum LlmError {
    /// Transport failure. The request URL is stripped before storing.
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("AI service error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("No response from Gemini")]
    EmptyContent,
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Http(err.without_url())
    }
}

/// Prompt text in, free-form text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn invoke(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata")]
    pub usage: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate.
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

const API_KEY_HEADER: &str = "x-goog-api-key";
const RETRY_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Gemini `generateContent` client with timeout and bounded retry.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.ai_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            endpoint: generate_content_url(&config.gemini_api_base, &config.gemini_model),
            max_retries: config.ai_max_retries,
            retry_base_delay: RETRY_BASE_DELAY,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Makes a raw call to the Gemini API, returning the full response object.
    /// Retries on transport failures, 429 and 5xx with exponential backoff.
    pub async fn call(&self, prompt: &str) -> Result<GenerateContentResponse, LlmError> {
        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, ...
                let delay = self.retry_base_delay * (1 << (attempt - 1).min(5));
                warn!(
                    "AI call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .header(API_KEY_HEADER, self.api_key.as_str())
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::from(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("AI service returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: extract_error_message(body),
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message: extract_error_message(body),
                });
            }

            let parsed: GenerateContentResponse = response.json().await?;

            if let Some(usage) = &parsed.usage {
                debug!(
                    "AI call succeeded: prompt_tokens={}, candidate_tokens={}",
                    usage.prompt_token_count, usage.candidates_token_count
                );
            }

            return Ok(parsed);
        }

        Err(last_error.unwrap_or(LlmError::EmptyContent))
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn invoke(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        let prompt = prompts::combine_prompt(system_prompt, user_prompt);
        let response = self.call(&prompt).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

fn generate_content_url(base: &str, model: &str) -> String {
    format!(
        "{}/v1beta/models/{}:generateContent",
        base.trim_end_matches('/'),
        model
    )
}

/// Pulls `error.message` out of a Gemini error body, falling back to the raw body.
fn extract_error_message(body: String) -> String {
    serde_json::from_str::<GeminiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_text_from_first_candidate_first_part() {
        let response = parse(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "first" }, { "text": "second" }] } },
                { "content": { "parts": [{ "text": "other candidate" }] } }
            ],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 3 }
        }));
        assert_eq!(response.text(), Some("first"));
        assert_eq!(response.usage.unwrap().prompt_token_count, 12);
    }

    #[test]
    fn test_text_missing_candidates() {
        assert_eq!(parse(json!({})).text(), None);
        assert_eq!(parse(json!({ "candidates": [] })).text(), None);
    }

    #[test]
    fn test_text_missing_content_or_parts() {
        assert_eq!(parse(json!({ "candidates": [{}] })).text(), None);
        assert_eq!(
            parse(json!({ "candidates": [{ "content": { "parts": [] } }] })).text(),
            None
        );
        assert_eq!(
            parse(json!({ "candidates": [{ "content": { "parts": [{}] } }] })).text(),
            None
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: "hello" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "contents": [{ "parts": [{ "text": "hello" }] }] })
        );
    }

    #[test]
    fn test_generate_content_url() {
        assert_eq!(
            generate_content_url("https://example.test/", "gemma-3-4b-it"),
            "https://example.test/v1beta/models/gemma-3-4b-it:generateContent"
        );
    }

    #[test]
    fn test_extract_error_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid"}}"#.to_string();
        assert_eq!(extract_error_message(body), "API key not valid");
        assert_eq!(extract_error_message("plain".to_string()), "plain");
    }

    mod gateway {
        use std::time::Duration;

        use serde_json::json;

        use crate::config::Config;
        use crate::errors::AppError;
        use crate::llm_client::{GeminiClient, LlmError, TextGenerator};
        use wiremock::matchers::{body_string_contains, header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        const TEST_KEY: &str = "SECRET-KEY-123";
        const ENDPOINT: &str = "/v1beta/models/test-model:generateContent";

        fn client_for(base: &str, max_retries: u32) -> GeminiClient {
            let config = Config::from_lookup(|key| {
                let value = match key {
                    "DATABASE_URL" => "postgres://localhost/unused",
                    "JWT_SECRET" => "secret",
                    "GEMINI_API_KEY" => TEST_KEY,
                    "GEMINI_MODEL" => "test-model",
                    "GEMINI_API_BASE" => base,
                    "AI_TIMEOUT_SECS" => "5",
                    "AI_MAX_RETRIES" => return Some(max_retries.to_string()),
                    _ => return None,
                };
                Some(value.to_string())
            })
            .unwrap();
            let mut client = GeminiClient::new(&config).unwrap();
            client.retry_base_delay = Duration::from_millis(10);
            client
        }

        fn reply(text: &str) -> ResponseTemplate {
            ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": text }] } }]
            }))
        }

        async fn attempts(server: &MockServer) -> usize {
            server.received_requests().await.unwrap_or_default().len()
        }

        #[tokio::test]
        async fn test_retries_server_error_then_succeeds() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path(ENDPOINT))
                .respond_with(ResponseTemplate::new(503))
                .up_to_n_times(1)
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(path(ENDPOINT))
                .and(header("x-goog-api-key", TEST_KEY))
                .and(body_string_contains("User Input:"))
                .respond_with(reply("Polished text"))
                .mount(&server)
                .await;

            let client = client_for(&server.uri(), 2);
            let text = client.invoke("Be brief.", "raw text").await.unwrap();

            assert_eq!(text, "Polished text");
            assert_eq!(attempts(&server).await, 2);
        }

        #[tokio::test]
        async fn test_api_key_not_in_query_string() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path(ENDPOINT))
                .respond_with(reply("ok"))
                .mount(&server)
                .await;

            client_for(&server.uri(), 0)
                .invoke("sys", "user")
                .await
                .unwrap();

            let requests = server.received_requests().await.unwrap();
            assert_eq!(requests.len(), 1);
            assert!(!requests[0].url.as_str().contains(TEST_KEY));
            let sent_key = requests[0].headers.get("x-goog-api-key").unwrap();
            assert_eq!(sent_key.to_str().unwrap(), TEST_KEY);
        }

        #[tokio::test]
        async fn test_client_error_not_retried() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path(ENDPOINT))
                .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                    "error": { "code": 400, "message": "Invalid argument" }
                })))
                .mount(&server)
                .await;

            let err = client_for(&server.uri(), 2)
                .invoke("sys", "user")
                .await
                .unwrap_err();

            match err {
                LlmError::Api { status, message } => {
                    assert_eq!(status, 400);
                    assert_eq!(message, "Invalid argument");
                }
                other => panic!("expected Api error, got {other:?}"),
            }
            assert_eq!(attempts(&server).await, 1);
        }

        #[tokio::test]
        async fn test_rate_limit_exhausts_retries() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path(ENDPOINT))
                .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                    "error": { "message": "Quota exceeded" }
                })))
                .mount(&server)
                .await;

            let err = client_for(&server.uri(), 2)
                .invoke("sys", "user")
                .await
                .unwrap_err();

            assert!(matches!(err, LlmError::Api { status: 429, .. }));
            assert_eq!(attempts(&server).await, 3);
        }

        #[tokio::test]
        async fn test_missing_text_is_empty_content() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path(ENDPOINT))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
                .mount(&server)
                .await;

            let err = client_for(&server.uri(), 2)
                .invoke("sys", "user")
                .await
                .unwrap_err();

            assert!(matches!(err, LlmError::EmptyContent));
            assert_eq!(attempts(&server).await, 1);
        }

        #[tokio::test]
        async fn test_transport_error_hides_api_key() {
            // Nothing listens on port 1.
            let err = client_for("http://127.0.0.1:1", 0)
                .invoke("sys", "user")
                .await
                .unwrap_err();

            assert!(matches!(err, LlmError::Http(_)));
            assert!(!err.to_string().contains(TEST_KEY));

            let message = AppError::from(err).to_string();
            assert!(!message.contains(TEST_KEY));
            assert!(!message.contains("127.0.0.1"));
        }
    }
}
