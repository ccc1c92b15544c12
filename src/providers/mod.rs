/*!
 * Provider implementations for different translation engines.
 *
 * This module contains client implementations for the supported LLM
 * providers:
 * - Gemini: Google Generative Language API
 * - OpenAI: Chat Completions API
 * - Claude: Anthropic Messages API
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::app_config::TranslationProvider;
use crate::errors::ProviderError;

pub mod anthropic;
pub mod gemini;
pub mod openai;

/// Common trait for all translation engines
///
/// This trait defines the interface that all provider implementations must
/// follow, allowing them to be used interchangeably behind a trait object.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Translate a text fragment under the given system prompt
    ///
    /// # Arguments
    /// * `text` - The fragment to translate
    /// * `system_prompt` - Instructions controlling style and preservation
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate(&self, text: &str, system_prompt: &str) -> Result<String, ProviderError>;

    /// The model identifier this provider was configured with
    fn model(&self) -> &str;

    /// Test the connection to the provider with a minimal request
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

/// Settings shared by every provider client
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// API key for authentication
    pub api_key: String,

    /// Model identifier to request
    pub model: String,

    /// Custom API endpoint, empty for the public default
    pub endpoint: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens to generate per request
    pub max_tokens: u32,
}

/// Map an HTTP error status and body to a provider error. Rate-limit
/// responses are identified by status 429 or quota wording so the retry
/// policy can single them out.
pub(crate) fn classify_api_error(status_code: u16, message: String) -> ProviderError {
    let lowered = message.to_lowercase();
    if status_code == 429 || lowered.contains("rate limit") || lowered.contains("quota") {
        return ProviderError::RateLimitExceeded(message);
    }
    if status_code == 401 || status_code == 403 {
        return ProviderError::AuthenticationError(message);
    }
    ProviderError::ApiError { status_code, message }
}

/// Create a provider client for the configured engine
pub fn create_provider(
    provider: TranslationProvider,
    settings: ProviderSettings,
) -> Box<dyn Provider> {
    match provider {
        TranslationProvider::Gemini => Box::new(gemini::Gemini::new(settings)),
        TranslationProvider::OpenAI => Box::new(openai::OpenAI::new(settings)),
        TranslationProvider::Claude => Box::new(anthropic::Claude::new(settings)),
    }
}
