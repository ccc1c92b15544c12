use std::time::Duration;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::providers::{classify_api_error, Provider, ProviderSettings};

/// Default public endpoint for the Anthropic API
const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com";

/// API version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Claude client for the Anthropic Messages API
#[derive(Debug)]
pub struct Claude {
    /// HTTP client for API requests
    client: Client,
    /// Provider settings (key, model, endpoint, sampling)
    settings: ProviderSettings,
}

/// Anthropic message request
#[derive(Debug, Serialize)]
struct ClaudeRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<ClaudeMessage>,

    /// System prompt to guide the generation
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,

    /// Temperature for generation
    temperature: f32,

    /// Maximum number of tokens to generate
    max_tokens: u32,
}

/// Anthropic message format
#[derive(Debug, Serialize, Deserialize)]
struct ClaudeMessage {
    /// Role of the message sender (user, assistant)
    role: String,

    /// Content of the message
    content: String,
}

/// Anthropic response
#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    /// Content blocks of the response
    #[serde(default)]
    content: Vec<ClaudeContent>,
}

/// Individual content block in an Anthropic response
#[derive(Debug, Deserialize)]
struct ClaudeContent {
    /// The type of content
    #[serde(rename = "type")]
    content_type: String,

    /// The actual text content
    #[serde(default)]
    text: String,
}

impl Claude {
    /// Create a new Claude client
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            settings,
        }
    }

    /// URL of the messages endpoint
    fn api_url(&self) -> String {
        let base = if self.settings.endpoint.is_empty() {
            DEFAULT_ENDPOINT
        } else {
            self.settings.endpoint.trim_end_matches('/')
        };
        format!("{}/v1/messages", base)
    }

    /// Send a request and extract the generated text
    async fn complete(&self, request: ClaudeRequest) -> Result<String, ProviderError> {
        let response = self.client.post(self.api_url())
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.settings.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Anthropic request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Anthropic API error ({}): {}", status, error_text);
            return Err(classify_api_error(status.as_u16(), error_text));
        }

        let claude_response = response.json::<ClaudeResponse>().await
            .map_err(|e| ProviderError::ParseError(format!("Anthropic response: {}", e)))?;

        let text: String = claude_response.content.iter()
            .filter(|c| c.content_type == "text")
            .map(|c| c.text.as_str())
            .collect();

        if text.is_empty() {
            return Err(ProviderError::ParseError(
                "Anthropic response contained no text content".to_string(),
            ));
        }

        Ok(text)
    }
}

#[async_trait]
impl Provider for Claude {
    async fn translate(&self, text: &str, system_prompt: &str) -> Result<String, ProviderError> {
        let request = ClaudeRequest {
            model: self.settings.model.clone(),
            messages: vec![ClaudeMessage {
                role: "user".to_string(),
                content: text.to_string(),
            }],
            system: Some(system_prompt.to_string()),
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        let translated = self.complete(request).await?;
        Ok(translated.trim().to_string())
    }

    fn model(&self) -> &str {
        &self.settings.model
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let request = ClaudeRequest {
            model: self.settings.model.clone(),
            messages: vec![ClaudeMessage {
                role: "user".to_string(),
                content: "Hello".to_string(),
            }],
            system: None,
            temperature: 0.0,
            max_tokens: 10,
        };

        self.complete(request).await?;
        Ok(())
    }
}
