use crate::config::Config;
use crate::errors::AppError;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Model used for every completion request.
pub const CHAT_MODEL: &str = "gpt-4o-mini";

// ============ Completion wire types ============

#[derive(Debug, Clone, Serialize)]
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

#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

impl ResponseFormat {
    /// Requests a strict JSON-object reply from the model.
    pub fn json_object() -> Self {
        Self {
            format_type: "json_object".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

// ============ Client ============

/// Client for the external reasoning service (chat completions).
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_url: config.openai_api_url.clone(),
            api_key: config.openai_api_key.clone(),
        }
    }

    /// Sends one completion request and returns the reply text.
    ///
    /// Transport and service failures are hard errors; this layer never
    /// downgrades them.
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<String, AppError> {
        tracing::info!(
            "Requesting completion from {} ({} messages)",
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::Model(format!("Completion request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Model(format!(
                "Completion API returned status {}: {}",
                status, error_text
            )));
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|e| {
            AppError::Model(format!("Failed to parse completion response: {}", e))
        })?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AppError::Model("Completion response had no choices".to_string()))?;

        Ok(content)
    }
}
