//! Gemini `generateContent` over HTTP with a constrained `responseSchema`.

use super::StructuredGenerator;
use crate::error::{TransportCategory, TransportError};
use crate::schema::SchemaDescriptor;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub struct GeminiGenerator {
    client: Client,
    base_url: String,
    api_key: Secret<String>,
    model: String,
    thinking_budget: Option<u32>,
}

impl GeminiGenerator {
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        thinking_budget: Option<u32>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: Secret::new(api_key.to_string()),
            model: model.to_string(),
            thinking_budget,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn build_request(&self, prompt: &str, schema: &SchemaDescriptor) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: schema.to_gemini(),
                thinking_config: self.thinking_budget.map(|thinking_budget| ThinkingConfig {
                    thinking_budget,
                }),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    thought: Option<bool>,
}

impl GenerateResponse {
    /// Answer text of the first candidate, thought parts excluded
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter(|p| p.thought != Some(true))
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Map an error response onto a transport category
fn map_error_status(status: StatusCode, body: &str) -> TransportError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(|m| m.to_string())
        })
        .unwrap_or_else(|| body.trim().to_string());
    let message = format!("{} ({})", message, status.as_u16());

    let category = match status {
        StatusCode::TOO_MANY_REQUESTS => TransportCategory::RateLimited,
        StatusCode::FORBIDDEN => TransportCategory::PermissionDenied,
        StatusCode::UNAUTHORIZED => TransportCategory::AuthInvalid,
        // Gemini reports a bad key as 400 INVALID_ARGUMENT
        StatusCode::BAD_REQUEST if message.to_lowercase().contains("api key") => {
            TransportCategory::AuthInvalid
        }
        StatusCode::BAD_REQUEST => TransportCategory::MalformedRequest,
        s if s.is_server_error() => TransportCategory::ServerUnavailable,
        _ => TransportCategory::Other,
    };

    TransportError::new(category, message)
}

#[async_trait]
impl StructuredGenerator for GeminiGenerator {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(
        &self,
        prompt: &str,
        schema: &SchemaDescriptor,
    ) -> Result<Value, TransportError> {
        let request = self.build_request(prompt, schema);

        debug!(
            "Calling {} with {} byte prompt",
            self.model,
            prompt.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::other(format!("Request to {} timed out", self.model))
                } else if e.is_connect() {
                    TransportError::other(format!("Connection failed: {}", e))
                } else {
                    TransportError::other(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::other(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(map_error_status(status, &body));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body).map_err(|e| {
            TransportError::other(format!("Unexpected response envelope: {}", e))
        })?;

        let text = parsed.text();
        if text.trim().is_empty() {
            return Err(TransportError::new(
                TransportCategory::EmptyResult,
                "Received an empty response from the AI.",
            ));
        }

        // responseMimeType is JSON, so the text should parse as-is
        Ok(serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text)))
    }
}
