/*!
 * Tests for app configuration functionality
 */

use std::str::FromStr;

use mdtranslate::app_config::{Config, TranslationProvider, TranslationStyle};

use crate::common;

#[tokio::test]
async fn test_defaultConfig_shouldUseGeminiAndLiteralStyle() {
    let config = Config::default();

    assert_eq!(config.active_provider, TranslationProvider::Gemini);
    assert_eq!(config.translation.style, TranslationStyle::Literal);
    assert!((config.translation.temperature - 0.3).abs() < f32::EPSILON);
    assert_eq!(config.translation.max_tokens, 4096);
    assert_eq!(config.languages.default_source, "vi");
    assert_eq!(config.languages.default_target, "en");
    assert_eq!(config.directories.cache, ".translation_cache");
    assert!(!config.preserve_terms.is_empty());
}

#[tokio::test]
async fn test_defaultConfig_shouldValidate() {
    assert!(Config::default().validate().is_ok());
}

#[tokio::test]
async fn test_saveAndLoad_shouldRoundTrip() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("config.json");

    let mut config = Config::default();
    config.switch_provider(TranslationProvider::Claude);
    config.translation.style = TranslationStyle::Natural;
    config.languages.default_target = "fr".to_string();
    config.save(&path).unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded.active_provider, TranslationProvider::Claude);
    assert_eq!(loaded.translation.style, TranslationStyle::Natural);
    assert_eq!(loaded.languages.default_target, "fr");
}

#[tokio::test]
async fn test_load_withPartialFile_shouldFillDefaults() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        temp_dir.path(),
        "config.json",
        r#"{ "active_provider": "openai" }"#,
    )
    .unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded.active_provider, TranslationProvider::OpenAI);
    assert_eq!(loaded.translation.max_tokens, 4096);
    assert_eq!(loaded.directories.cache, ".translation_cache");
}

#[tokio::test]
async fn test_load_withMissingExplicitPath_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let result = Config::load(Some(&temp_dir.path().join("nope.json")));
    assert!(result.is_err());
}

#[tokio::test]
async fn test_validate_withBadTemperature_shouldFail() {
    let mut config = Config::default();
    config.translation.temperature = 3.5;
    assert!(config.validate().is_err());
}

#[tokio::test]
async fn test_validate_withBadLanguageCode_shouldFail() {
    let mut config = Config::default();
    config.languages.default_target = "zzz".to_string();
    assert!(config.validate().is_err());
}

#[tokio::test]
async fn test_providerFromStr_shouldParseKnownNames() {
    assert_eq!(
        TranslationProvider::from_str("gemini").unwrap(),
        TranslationProvider::Gemini
    );
    assert_eq!(
        TranslationProvider::from_str("OpenAI").unwrap(),
        TranslationProvider::OpenAI
    );
    assert_eq!(
        TranslationProvider::from_str("claude").unwrap(),
        TranslationProvider::Claude
    );
    assert!(TranslationProvider::from_str("ollama").is_err());
}

#[tokio::test]
async fn test_providerDisplay_shouldBeLowercase() {
    assert_eq!(TranslationProvider::Claude.to_string(), "claude");
    assert_eq!(TranslationProvider::Claude.display_name(), "Claude");
}

#[tokio::test]
async fn test_getModel_withUnconfiguredProvider_shouldFallBackToDefault() {
    let mut config = Config::default();
    config.providers.clear();

    assert_eq!(
        config.get_model(TranslationProvider::Gemini),
        "gemini-1.5-flash"
    );
    assert_eq!(config.get_model(TranslationProvider::OpenAI), "gpt-4o-mini");
    assert_eq!(
        config.get_model(TranslationProvider::Claude),
        "claude-3-5-sonnet-20241022"
    );
}

#[tokio::test]
async fn test_setModel_shouldOverrideDefault() {
    let mut config = Config::default();
    config.set_model(TranslationProvider::Gemini, "gemini-2.0-flash");
    assert_eq!(
        config.get_model(TranslationProvider::Gemini),
        "gemini-2.0-flash"
    );
}

#[tokio::test]
async fn test_getApiKey_withEnvVar_shouldResolve() {
    let mut config = Config::default();
    config
        .providers
        .get_mut("gemini")
        .unwrap()
        .api_key_env = "MDTRANSLATE_TEST_GEMINI_KEY".to_string();

    unsafe { std::env::set_var("MDTRANSLATE_TEST_GEMINI_KEY", "secret-key") };
    let key = config.get_api_key(TranslationProvider::Gemini).unwrap();
    assert_eq!(key, "secret-key");
    unsafe { std::env::remove_var("MDTRANSLATE_TEST_GEMINI_KEY") };
}

#[tokio::test]
async fn test_getApiKey_withoutEnvVar_shouldFail() {
    let mut config = Config::default();
    config
        .providers
        .get_mut("claude")
        .unwrap()
        .api_key_env = "MDTRANSLATE_TEST_UNSET_KEY".to_string();

    let result = config.get_api_key(TranslationProvider::Claude);
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("MDTRANSLATE_TEST_UNSET_KEY"));
}

#[tokio::test]
async fn test_addPreserveTerm_withDuplicate_shouldNotAddTwice() {
    let mut config = Config::default();
    config.preserve_terms.clear();

    assert!(config.add_preserve_term("GraphQL"));
    assert!(!config.add_preserve_term("graphql"));
    assert_eq!(config.preserve_terms.len(), 1);
}

#[tokio::test]
async fn test_removePreserveTerm_shouldBeCaseInsensitive() {
    let mut config = Config::default();
    config.preserve_terms = vec!["GraphQL".to_string()];

    assert!(config.remove_preserve_term("GRAPHQL"));
    assert!(config.preserve_terms.is_empty());
    assert!(!config.remove_preserve_term("GraphQL"));
}

#[tokio::test]
async fn test_switchProvider_shouldCreateMissingProviderEntry() {
    let mut config = Config::default();
    config.providers.clear();
    config.switch_provider(TranslationProvider::OpenAI);

    assert_eq!(config.active_provider, TranslationProvider::OpenAI);
    assert!(config.providers.contains_key("openai"));
}
