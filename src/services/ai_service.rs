use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub temperature: f32,
    pub messages: Vec<ChatMessage>,
    pub json_response: bool,
}

/// The single outbound call: one chat completion, returned as raw text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<String>;
}

/// Chat-completions client for an OpenAI-compatible endpoint (Groq by default).
#[derive(Clone)]
pub struct AIService {
    client: Client,
    api_key: String,
    endpoint: String,
    timeout: Duration,
}

impl AIService {
    pub fn new(api_key: String, endpoint: String, client: Client, timeout: Duration) -> Self {
        Self {
            client,
            api_key,
            endpoint,
            timeout,
        }
    }

    fn payload(request: &ChatRequest) -> JsonValue {
        let mut payload = serde_json::json!({
            "model": request.model,
            "messages": request.messages,
            "temperature": request.temperature,
        });
        if request.json_response {
            payload["response_format"] = serde_json::json!({ "type": "json_object" });
        }
        payload
    }
}

#[async_trait]
impl ChatModel for AIService {
    async fn complete(&self, request: ChatRequest) -> Result<String> {
        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&Self::payload(&request))
            .timeout(self.timeout)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Model API error {}: {}", status, text).into());
        }

        let body: JsonValue = res.json().await?;

        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("Invalid model response format").into())
    }
}
