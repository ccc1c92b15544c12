use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.

/// Configuration file name searched in the working directory
const LOCAL_CONFIG_FILE: &str = "mdtranslate.json";

/// Configuration file name under the user's home directory
const HOME_CONFIG_DIR: &str = ".mdtranslate";
const HOME_CONFIG_FILE: &str = "config.json";

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google Generative Language API
    #[default]
    Gemini,
    // @provider: OpenAI Chat Completions
    OpenAI,
    // @provider: Anthropic Messages API
    Claude,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Gemini => "Gemini",
            Self::OpenAI => "OpenAI",
            Self::Claude => "Claude",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Gemini => "gemini".to_string(),
            Self::OpenAI => "openai".to_string(),
            Self::Claude => "claude".to_string(),
        }
    }

    /// Environment variable holding the provider's API key
    pub fn api_key_env(&self) -> &str {
        match self {
            Self::Gemini => "GOOGLE_API_KEY",
            Self::OpenAI => "OPENAI_API_KEY",
            Self::Claude => "ANTHROPIC_API_KEY",
        }
    }

    /// Default model for the provider
    pub fn default_model(&self) -> &str {
        match self {
            Self::Gemini => "gemini-1.5-flash",
            Self::OpenAI => "gpt-4o-mini",
            Self::Claude => "claude-3-5-sonnet-20241022",
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAI),
            "claude" => Ok(Self::Claude),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Translation style steering the prompt wording
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationStyle {
    // @style: Word-for-word technical accuracy
    #[default]
    Literal,
    // @style: Idiomatic, reader-friendly
    Natural,
}

impl std::fmt::Display for TranslationStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal => write!(f, "literal"),
            Self::Natural => write!(f, "natural"),
        }
    }
}

impl std::str::FromStr for TranslationStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "literal" => Ok(Self::Literal),
            "natural" => Ok(Self::Natural),
            _ => Err(anyhow!("Invalid translation style: {}", s)),
        }
    }
}

/// Configuration for a single provider
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: Environment variable holding the API key
    #[serde(default = "String::new")]
    pub api_key_env: String,

    // @field: Service URL override, empty for the public default
    #[serde(default = "String::new")]
    pub endpoint: String,
}

impl ProviderConfig {
    // @param provider: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider: TranslationProvider) -> Self {
        Self {
            model: provider.default_model().to_string(),
            api_key_env: provider.api_key_env().to_string(),
            endpoint: String::new(),
        }
    }
}

/// Translation settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationSettings {
    /// Prompt style (literal or natural)
    #[serde(default)]
    pub style: TranslationStyle,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens generated per request
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Maximum attempts for rate-limited requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Base backoff in milliseconds, doubled per attempt
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            style: TranslationStyle::default(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Default language pair
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LanguageSettings {
    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub default_source: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub default_target: String,
}

impl Default for LanguageSettings {
    fn default() -> Self {
        Self {
            default_source: default_source_language(),
            default_target: default_target_language(),
        }
    }
}

/// Directory layout
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DirectorySettings {
    /// Default input directory for batch runs
    #[serde(default = "default_input_dir")]
    pub input: String,

    /// Default output directory for batch runs
    #[serde(default = "default_output_dir")]
    pub output: String,

    /// Translation memory directory
    #[serde(default = "default_cache_dir")]
    pub cache: String,
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            input: default_input_dir(),
            output: default_output_dir(),
            cache: default_cache_dir(),
        }
    }
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to the log crate's level filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Config schema version
    #[serde(default = "default_version")]
    pub version: String,

    /// Provider used for translation requests
    #[serde(default)]
    pub active_provider: TranslationProvider,

    /// Per-provider configuration keyed by lowercase provider name
    #[serde(default = "default_providers")]
    pub providers: BTreeMap<String, ProviderConfig>,

    /// Translation settings
    #[serde(default)]
    pub translation: TranslationSettings,

    /// Default language pair
    #[serde(default)]
    pub languages: LanguageSettings,

    /// Terms never altered by translation
    #[serde(default = "default_preserve_terms")]
    pub preserve_terms: Vec<String>,

    /// Directory layout
    #[serde(default)]
    pub directories: DirectorySettings,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            active_provider: TranslationProvider::default(),
            providers: default_providers(),
            translation: TranslationSettings::default(),
            languages: LanguageSettings::default(),
            preserve_terms: default_preserve_terms(),
            directories: DirectorySettings::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration, searching the explicit path, then the working
    /// directory, then the home directory. Missing config is not an error;
    /// defaults apply.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            if !path.exists() {
                return Err(anyhow!("Config file not found: {}", path.display()));
            }
            return Self::load_from_file(path);
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Self::load_from_file(&local);
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(HOME_CONFIG_DIR).join(HOME_CONFIG_FILE);
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the given path, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory: {}", parent.display())
                })?;
            }
        }
        let data = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, data)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Default location for persisted configuration
    pub fn default_save_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(HOME_CONFIG_DIR)
            .join(HOME_CONFIG_FILE)
    }

    /// Validate settings that would otherwise fail deep inside a run
    pub fn validate(&self) -> Result<()> {
        language_utils::validate_language_code(&self.languages.default_source)?;
        language_utils::validate_language_code(&self.languages.default_target)?;

        if !(0.0..=2.0).contains(&self.translation.temperature) {
            return Err(anyhow!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.translation.temperature
            ));
        }
        if self.translation.max_tokens == 0 {
            return Err(anyhow!("max_tokens must be greater than zero"));
        }
        if self.translation.retry_count == 0 {
            return Err(anyhow!("retry_count must be greater than zero"));
        }
        Ok(())
    }

    /// Configuration block for the active provider
    pub fn active_provider_config(&self) -> ProviderConfig {
        self.provider_config(self.active_provider)
    }

    /// Configuration block for a provider, defaults when not configured
    pub fn provider_config(&self, provider: TranslationProvider) -> ProviderConfig {
        self.providers
            .get(&provider.to_lowercase_string())
            .cloned()
            .unwrap_or_else(|| ProviderConfig::new(provider))
    }

    /// Resolve the API key for a provider from its environment variable
    pub fn get_api_key(&self, provider: TranslationProvider) -> Result<String> {
        let provider_config = self.provider_config(provider);
        let env_var = if provider_config.api_key_env.is_empty() {
            provider.api_key_env().to_string()
        } else {
            provider_config.api_key_env
        };

        env::var(&env_var).map_err(|_| {
            anyhow!(
                "No API key for {}: set the {} environment variable",
                provider.display_name(),
                env_var
            )
        })
    }

    /// Model to use for a provider, falling back to the provider default
    pub fn get_model(&self, provider: TranslationProvider) -> String {
        let model = self.provider_config(provider).model;
        if model.is_empty() {
            provider.default_model().to_string()
        } else {
            model
        }
    }

    /// Switch the active provider
    pub fn switch_provider(&mut self, provider: TranslationProvider) {
        self.active_provider = provider;
        self.providers
            .entry(provider.to_lowercase_string())
            .or_insert_with(|| ProviderConfig::new(provider));
    }

    /// Set the model for a provider
    pub fn set_model(&mut self, provider: TranslationProvider, model: &str) {
        self.providers
            .entry(provider.to_lowercase_string())
            .or_insert_with(|| ProviderConfig::new(provider))
            .model = model.to_string();
    }

    /// Add a preserve term if not already present (case-insensitive)
    pub fn add_preserve_term(&mut self, term: &str) -> bool {
        let lowered = term.to_lowercase();
        if self
            .preserve_terms
            .iter()
            .any(|t| t.to_lowercase() == lowered)
        {
            return false;
        }
        self.preserve_terms.push(term.to_string());
        true
    }

    /// Remove a preserve term (case-insensitive); returns whether it existed
    pub fn remove_preserve_term(&mut self, term: &str) -> bool {
        let lowered = term.to_lowercase();
        let before = self.preserve_terms.len();
        self.preserve_terms.retain(|t| t.to_lowercase() != lowered);
        self.preserve_terms.len() != before
    }
}

// Default value functions for serde

fn default_version() -> String {
    "1.0".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_source_language() -> String {
    "vi".to_string()
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_input_dir() -> String {
    "docs".to_string()
}

fn default_output_dir() -> String {
    "docs/translated".to_string()
}

fn default_cache_dir() -> String {
    ".translation_cache".to_string()
}

fn default_providers() -> BTreeMap<String, ProviderConfig> {
    let mut providers = BTreeMap::new();
    for provider in [
        TranslationProvider::Gemini,
        TranslationProvider::OpenAI,
        TranslationProvider::Claude,
    ] {
        providers.insert(provider.to_lowercase_string(), ProviderConfig::new(provider));
    }
    providers
}

fn default_preserve_terms() -> Vec<String> {
    [
        "API Gateway",
        "gRPC",
        "PostgreSQL",
        "Redis",
        "Docker",
        "Kubernetes",
        "CQRS",
        "Clean Architecture",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
