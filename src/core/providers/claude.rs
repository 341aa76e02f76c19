use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::config::ModelConfig;
use crate::core::providers::{validate_endpoint, CompletionBackend, CompletionFuture};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct MessageRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    system: &'a str,
    messages: [RequestMessage<'a>; 1],
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Deserialize)]
struct MessageResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: Option<ApiErrorBody>,
}

/// Join every text block of a Messages API reply.
fn extract_text(response: MessageResponse) -> Result<String> {
    let text: Vec<String> = response
        .content
        .into_iter()
        .filter(|b| b.block_type == "text")
        .filter_map(|b| b.text)
        .collect();
    if text.is_empty() {
        anyhow::bail!("Response contained no text content");
    }
    Ok(text.join(""))
}

/// Pull a readable message out of an error body, falling back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.to_string())
}

/// Anthropic Messages API client. One blocking-style request per call,
/// no retries.
pub struct ClaudeBackend {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl ClaudeBackend {
    pub fn new(api_key: String, config: &ModelConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| MESSAGES_URL.to_string());
        validate_endpoint(&endpoint).context("Invalid model endpoint")?;
        let (max_tokens, temperature) = config.generation();
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint,
            model: config.model.clone(),
            max_tokens,
            temperature,
        })
    }

    async fn send(&self, system: &str, user: &str) -> Result<String> {
        let body = MessageRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system,
            messages: [RequestMessage {
                role: "user",
                content: user,
            }],
        };

        tracing::debug!(model = %self.model, max_tokens = self.max_tokens, "sending messages request");
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .context("Failed to send request to Claude API")?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            anyhow::bail!("Unauthorized: check ANTHROPIC_API_KEY or the api_key setting");
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("HTTP {}: {}", status.as_u16(), error_message(&body));
        }

        let data: MessageResponse = response
            .json()
            .await
            .context("Failed to parse Claude response")?;
        extract_text(data)
    }
}

impl CompletionBackend for ClaudeBackend {
    fn model(&self) -> &str {
        &self.model
    }

    fn complete<'a>(&'a self, system: &'a str, user: &'a str) -> CompletionFuture<'a> {
        Box::pin(self.send(system, user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let body = MessageRequest {
            model: "claude-sonnet-4-20250514",
            max_tokens: 1000,
            temperature: 0.0,
            system: "be brief",
            messages: [RequestMessage {
                role: "user",
                content: "milk",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "claude-sonnet-4-20250514");
        assert_eq!(json["max_tokens"], 1000);
        assert_eq!(json["system"], "be brief");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "milk");
    }

    #[test]
    fn extract_text_joins_text_blocks() {
        let json = r#"{
            "id": "msg_1",
            "type": "message",
            "content": [
                {"type": "text", "text": "Here is "},
                {"type": "tool_use", "id": "t1"},
                {"type": "text", "text": "{\"a\":1}"}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 5}
        }"#;
        let response: MessageResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_text(response).unwrap(), "Here is {\"a\":1}");
    }

    #[test]
    fn extract_text_fails_without_text() {
        let response: MessageResponse = serde_json::from_str(r#"{"content": []}"#).unwrap();
        assert!(extract_text(response).is_err());
    }

    #[test]
    fn error_message_prefers_api_message() {
        let body = r#"{"type":"error","error":{"type":"not_found_error","message":"model: claude-x"}}"#;
        assert_eq!(error_message(body), "model: claude-x");
        assert_eq!(error_message("gateway timeout"), "gateway timeout");
    }

    #[test]
    fn new_rejects_plain_http_endpoint() {
        let config = ModelConfig {
            endpoint: Some("http://localhost/v1/messages".to_string()),
            ..ModelConfig::default()
        };
        assert!(ClaudeBackend::new("key".into(), &config).is_err());
    }

    #[test]
    fn new_applies_profile() {
        let config = ModelConfig {
            profile: Some(crate::core::config::Profile::Minimal),
            ..ModelConfig::default()
        };
        let backend = ClaudeBackend::new("key".into(), &config).unwrap();
        assert_eq!(backend.max_tokens, 1000);
        assert_eq!(backend.temperature, 0.0);
        assert_eq!(backend.model(), "claude-sonnet-4-20250514");
    }
}
