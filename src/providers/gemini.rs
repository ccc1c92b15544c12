use std::time::Duration;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::providers::{classify_api_error, Provider, ProviderSettings};

/// Default public endpoint for the Generative Language API
const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Gemini client for the Google Generative Language API
#[derive(Debug)]
pub struct Gemini {
    /// HTTP client for API requests
    client: Client,
    /// Provider settings (key, model, endpoint, sampling)
    settings: ProviderSettings,
}

/// Gemini generateContent request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    /// System prompt guiding the generation
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,

    /// Conversation turns
    contents: Vec<GeminiContent>,

    /// Sampling configuration
    generation_config: GenerationConfig,
}

/// A single content entry (system instruction or turn)
#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    /// Role of the content, omitted for system instructions
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,

    /// Text parts of the content
    parts: Vec<GeminiPart>,
}

/// One text part inside a content entry
#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

/// Sampling configuration
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

/// Gemini generateContent response
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    /// Generated candidates, usually one
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

impl Gemini {
    /// Create a new Gemini client
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            settings,
        }
    }

    /// URL of the generateContent endpoint for the configured model
    fn api_url(&self) -> String {
        let base = if self.settings.endpoint.is_empty() {
            DEFAULT_ENDPOINT
        } else {
            self.settings.endpoint.trim_end_matches('/')
        };
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            base, self.settings.model, self.settings.api_key
        )
    }

    /// Send a request and extract the generated text
    async fn complete(&self, request: GeminiRequest) -> Result<String, ProviderError> {
        let response = self.client.post(self.api_url())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Gemini API error ({}): {}", status, error_text);
            return Err(classify_api_error(status.as_u16(), error_text));
        }

        let gemini_response = response.json::<GeminiResponse>().await
            .map_err(|e| ProviderError::ParseError(format!("Gemini response: {}", e)))?;

        let text: String = gemini_response.candidates.first()
            .map(|c| c.content.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ProviderError::ParseError(
                "Gemini response contained no candidates".to_string(),
            ));
        }

        Ok(text)
    }
}

#[async_trait]
impl Provider for Gemini {
    async fn translate(&self, text: &str, system_prompt: &str) -> Result<String, ProviderError> {
        let request = GeminiRequest {
            system_instruction: Some(GeminiContent {
                role: None,
                parts: vec![GeminiPart { text: system_prompt.to_string() }],
            }),
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart { text: text.to_string() }],
            }],
            generation_config: GenerationConfig {
                temperature: self.settings.temperature,
                max_output_tokens: self.settings.max_tokens,
            },
        };

        let translated = self.complete(request).await?;
        Ok(translated.trim().to_string())
    }

    fn model(&self) -> &str {
        &self.settings.model
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let request = GeminiRequest {
            system_instruction: None,
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart { text: "Hello".to_string() }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                max_output_tokens: 10,
            },
        };

        self.complete(request).await?;
        Ok(())
    }
}
