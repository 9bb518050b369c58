//! Google Gemini backend
//!
//! Calls the `generateContent` REST method of the Generative Language API.
//! API documentation: https://ai.google.dev/api/generate-content
//!
//! The key is sent in the `x-goog-api-key` header so it never shows up in
//! request URLs or logs.

use crate::ai::{ApiKey, TextGenerator};
use crate::config::AiConfig;
use crate::error::{Error, Result};
use crate::retry::{with_retry, RetryPolicy};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Gemini text-generation client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: ApiKey,
    endpoint: String,
    model: String,
    policy: RetryPolicy,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// `generateContent` response
///
/// Example: `{"candidates": [{"content": {"parts": [{"text": "..."}]}, "finishReason": "STOP"}]}`
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    /// Create a client for `model` at `base_url`
    pub fn new(
        api_key: ApiKey,
        base_url: &str,
        model: impl Into<String>,
        policy: RetryPolicy,
    ) -> Result<Self> {
        let model = model.into();
        let client = reqwest::Client::builder()
            .user_agent(crate::constants::api::USER_AGENT)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                base_url.trim_end_matches('/'),
                model
            ),
            model,
            policy,
        })
    }

    /// Create a client from the `[ai]` config section
    pub fn from_config(api_key: ApiKey, config: &AiConfig) -> Result<Self> {
        Self::new(api_key, &config.base_url, config.model.as_str(), config.retry_policy())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One generateContent call, no retry
    async fn generate_once(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", self.api_key.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let message = format!("Gemini API error {}: {}", status, detail.trim());
            return if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                Err(Error::Network(message))
            } else {
                Err(Error::Upstream(message))
            };
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("Failed to parse Gemini response: {}", e)))?;

        Self::extract_text(parsed)
    }

    /// Concatenate the text parts of the first candidate
    fn extract_text(response: GenerateResponse) -> Result<String> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| Error::Upstream("Gemini returned no candidates".to_string()))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
            return Err(Error::Upstream(format!(
                "Gemini returned an empty reply (finish reason: {})",
                reason
            )));
        }

        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!("Sending {} byte prompt to {}", prompt.len(), self.model);
        let text = with_retry(&self.policy, "Gemini generateContent", || self.generate_once(prompt)).await?;
        debug!("Received {} byte reply from {}", text.len(), self.model);
        Ok(text)
    }
}
