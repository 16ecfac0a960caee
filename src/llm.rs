use crate::config::LlmConfig;
use crate::error::{AnalyticsError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Returned when the model answers with something other than text
pub const NO_TEXT_RESPONSE: &str = "Sorry, I could not process your request.";

/// Text completion service the narrative is handed to
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    fn into_text(self) -> String {
        match self.content.into_iter().next() {
            Some(ContentBlock { block_type, text: Some(text) }) if block_type == "text" => text,
            _ => NO_TEXT_RESPONSE.to_string(),
        }
    }
}

pub struct LlmClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AnalyticsError::Config(format!("Failed to create HTTP client for LLM: {}", e)))?;
        Ok(Self { config, http })
    }

    fn offline_response(prompt: &str) -> String {
        let data_lines = prompt
            .lines()
            .skip_while(|line| !line.starts_with("REAL GA4 DATA") && !line.starts_with("DATA FETCH ERROR"))
            .take_while(|line| !line.starts_with("User question:"))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "## Key Findings\n\nThe language model is not configured (set ANTHROPIC_API_KEY), so no analysis was generated.\n\n{}",
            data_lines.trim()
        )
        .trim_end()
        .to_string()
    }
}

#[async_trait]
impl CompletionClient for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        if self.config.is_offline() {
            debug!("Offline LLM key - returning placeholder answer");
            return Ok(Self::offline_response(prompt));
        }

        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        info!("🤖 Requesting analysis from {}", self.config.model);
        let response = self
            .http
            .post(format!("{}/v1/messages", self.config.base_url.trim_end_matches('/')))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalyticsError::Generation(format!("LLM API call failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AnalyticsError::Generation(format!(
                "LLM API returned status {}: {}",
                status, text
            )));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AnalyticsError::Generation(format!("Failed to parse LLM response: {}", e)))?;

        Ok(parsed.into_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_ANTHROPIC_BASE_URL, DEFAULT_MODEL, OFFLINE_API_KEY};
    use serde_json::json;
    use std::time::Duration;

    fn config(api_key: &str, base_url: &str) -> LlmConfig {
        LlmConfig {
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1500,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_request_body() {
        let body = MessagesRequest {
            model: DEFAULT_MODEL,
            max_tokens: 1500,
            messages: vec![Message { role: "user", content: "hi" }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "model": "claude-3-5-sonnet-20241022",
                "max_tokens": 1500,
                "messages": [{"role": "user", "content": "hi"}]
            })
        );
    }

    #[test]
    fn test_first_text_block() {
        let response: MessagesResponse = serde_json::from_value(json!({
            "id": "msg_01",
            "content": [{"type": "text", "text": "## Key Findings"}, {"type": "text", "text": "ignored"}]
        }))
        .unwrap();
        assert_eq!(response.into_text(), "## Key Findings");
    }

    #[test]
    fn test_non_text_block() {
        let response: MessagesResponse = serde_json::from_value(json!({
            "content": [{"type": "tool_use", "id": "t1", "name": "x", "input": {}}]
        }))
        .unwrap();
        assert_eq!(response.into_text(), NO_TEXT_RESPONSE);

        let empty: MessagesResponse = serde_json::from_value(json!({"content": []})).unwrap();
        assert_eq!(empty.into_text(), NO_TEXT_RESPONSE);
    }

    #[tokio::test]
    async fn test_offline_mode_echoes_data_context() {
        let client = LlmClient::new(config(OFFLINE_API_KEY, DEFAULT_ANTHROPIC_BASE_URL)).unwrap();
        let prompt = crate::prompts::analysis_prompt(
            "\n\nDATA FETCH ERROR: quota exceeded\nPlease provide analysis.",
            "traffic?",
        );

        let text = client.complete(&prompt).await.unwrap();
        assert!(text.contains("ANTHROPIC_API_KEY"));
        assert!(text.contains("DATA FETCH ERROR: quota exceeded"));
        assert!(!text.contains("User question"));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_generation_error() {
        let client = LlmClient::new(config("sk-ant-test", "http://127.0.0.1:9")).unwrap();
        let err = client.complete("hello").await.unwrap_err();
        assert!(matches!(err, AnalyticsError::Generation(_)));
    }
}
