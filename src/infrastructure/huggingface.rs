//! # Hugging Face Inference
//!
//! OpenAI-compatible chat-completions client for the Hugging Face router.
//! Implements `LlmProvider` for the question path and the `/recommend` command.

use anyhow::{Context as AnyhowContext, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::domain::config::HuggingFaceConfig;
use crate::domain::traits::LlmProvider;
use crate::domain::types::{RequestContext, ServiceError};
use crate::strings::messages;

const SERVICE: &str = "huggingface";

/// Chat-completions request format
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

pub struct HuggingFaceClient {
    http: Client,
    url: String,
    model: String,
    api_key: String,
    timeout: Duration,
    max_tokens: u32,
    temperature: f32,
}

impl HuggingFaceClient {
    pub fn new(config: &HuggingFaceConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;
        let http = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            http,
            url: config.completions_url(),
            model: config.model.clone(),
            api_key,
            timeout: config.timeout(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl LlmProvider for HuggingFaceClient {
    async fn completion(
        &self,
        ctx: &RequestContext,
        system: &str,
        prompt: &str,
    ) -> Result<String, ServiceError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .http
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .timeout(ctx.bounded(self.timeout))
            .json(&request)
            .send()
            .await
            .map_err(|e| ServiceError::new(SERVICE, format!("API request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::new(SERVICE, format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(ServiceError::new(
                SERVICE,
                format!("API request failed with status {}: {}", status, body),
            ));
        }

        let json: Value = serde_json::from_str(&body)
            .map_err(|e| ServiceError::new(SERVICE, format!("Failed to decode response: {}", e)))?;

        Ok(extract_answer(&json).unwrap_or_else(|| {
            tracing::warn!("Unrecognized completion payload: {}", body);
            messages::AI_UNPARSEABLE.to_string()
        }))
    }
}

/// Pull the answer out of the shapes the router returns, in order of preference:
/// `choices[0].message.content`, `answer`, `answers[0].answer`.
fn extract_answer(json: &Value) -> Option<String> {
    let text = |pointer: &str| json.pointer(pointer).and_then(Value::as_str);
    text("/choices/0/message/content")
        .or_else(|| text("/answer"))
        .or_else(|| text("/answers/0/answer"))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_chat_completion() {
        let payload = json!({
            "choices": [{"message": {"role": "assistant", "content": "42"}, "finish_reason": "stop"}]
        });
        assert_eq!(extract_answer(&payload).as_deref(), Some("42"));
    }

    #[test]
    fn test_extract_alternative_shapes() {
        assert_eq!(extract_answer(&json!({"answer": "yes"})).as_deref(), Some("yes"));
        assert_eq!(
            extract_answer(&json!({"answers": [{"answer": "first"}, {"answer": "second"}]})).as_deref(),
            Some("first")
        );
        assert_eq!(
            extract_answer(&json!({"choices": [{"message": {"content": null}}], "answer": "x"}))
                .as_deref(),
            Some("x")
        );
    }

    #[test]
    fn test_extract_unknown_shape() {
        assert_eq!(extract_answer(&json!({"choices": []})), None);
        assert_eq!(extract_answer(&json!({"generated_text": 1})), None);
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest {
            model: "mistral",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            temperature: 0.0,
            max_tokens: 250,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "mistral");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["max_tokens"], 250);
    }

    #[test]
    fn test_client_requires_key() {
        let config = HuggingFaceConfig {
            model: "mistral".to_string(),
            api_key: None,
            api_key_env: "BLOCKMIND_TEST_UNSET_HF_KEY".to_string(),
            ..HuggingFaceConfig::default()
        };
        assert!(HuggingFaceClient::new(&config).is_err());
    }
}
