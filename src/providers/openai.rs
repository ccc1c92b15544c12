use std::time::Duration;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::providers::{classify_api_error, Provider, ProviderSettings};

/// Default public endpoint for the OpenAI API
const DEFAULT_ENDPOINT: &str = "https://api.openai.com";

/// OpenAI client for the Chat Completions API
#[derive(Debug)]
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// Provider settings (key, model, endpoint, sampling)
    settings: ProviderSettings,
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct OpenAIRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<OpenAIMessage>,

    /// Temperature for generation
    temperature: f32,

    /// Maximum number of tokens to generate
    max_tokens: u32,
}

/// OpenAI message format
#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    /// Role of the message sender (system, user, assistant)
    role: String,

    /// Content of the message
    content: String,
}

/// OpenAI chat completion response
#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    /// Generated choices, usually one
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

impl OpenAI {
    /// Create a new OpenAI client
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            settings,
        }
    }

    /// URL of the chat completions endpoint
    fn api_url(&self) -> String {
        let base = if self.settings.endpoint.is_empty() {
            DEFAULT_ENDPOINT
        } else {
            self.settings.endpoint.trim_end_matches('/')
        };
        format!("{}/v1/chat/completions", base)
    }

    /// Send a request and extract the generated text
    async fn complete(&self, request: OpenAIRequest) -> Result<String, ProviderError> {
        let response = self.client.post(self.api_url())
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.settings.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("OpenAI request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("OpenAI API error ({}): {}", status, error_text);
            return Err(classify_api_error(status.as_u16(), error_text));
        }

        let openai_response = response.json::<OpenAIResponse>().await
            .map_err(|e| ProviderError::ParseError(format!("OpenAI response: {}", e)))?;

        openai_response.choices.into_iter().next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::ParseError(
                "OpenAI response contained no choices".to_string(),
            ))
    }
}

#[async_trait]
impl Provider for OpenAI {
    async fn translate(&self, text: &str, system_prompt: &str) -> Result<String, ProviderError> {
        let request = OpenAIRequest {
            model: self.settings.model.clone(),
            messages: vec![
                OpenAIMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                OpenAIMessage {
                    role: "user".to_string(),
                    content: text.to_string(),
                },
            ],
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
        let request = OpenAIRequest {
            model: self.settings.model.clone(),
            messages: vec![OpenAIMessage {
                role: "user".to_string(),
                content: "Hello".to_string(),
            }],
            temperature: 0.0,
            max_tokens: 10,
        };

        self.complete(request).await?;
        Ok(())
    }
}
