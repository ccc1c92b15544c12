/*!
 * Tests for language code utilities
 */

use mdtranslate::language_utils::{language_codes_match, language_name, validate_language_code};

#[tokio::test]
async fn test_validateLanguageCode_withTwoLetterCodes_shouldAccept() {
    assert!(validate_language_code("en").is_ok());
    assert!(validate_language_code("vi").is_ok());
    assert!(validate_language_code("FR").is_ok());
}

#[tokio::test]
async fn test_validateLanguageCode_withThreeLetterCodes_shouldAccept() {
    assert!(validate_language_code("eng").is_ok());
    assert!(validate_language_code("vie").is_ok());
}

#[tokio::test]
async fn test_validateLanguageCode_withInvalidCodes_shouldReject() {
    assert!(validate_language_code("zz").is_err());
    assert!(validate_language_code("zzz").is_err());
    assert!(validate_language_code("english").is_err());
    assert!(validate_language_code("").is_err());
}

#[tokio::test]
async fn test_languageName_withKnownCodes_shouldReturnEnglishName() {
    assert_eq!(language_name("en"), "English");
    assert_eq!(language_name("vi"), "Vietnamese");
    assert_eq!(language_name("fra"), "French");
}

#[tokio::test]
async fn test_languageName_withUnknownCode_shouldFallBackToCode() {
    assert_eq!(language_name("xx"), "xx");
}

#[tokio::test]
async fn test_languageCodesMatch_withEquivalentCodes_shouldMatch() {
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("vi", "vie"));
    assert!(language_codes_match("en", "EN"));
}

#[tokio::test]
async fn test_languageCodesMatch_withDifferentLanguages_shouldNotMatch() {
    assert!(!language_codes_match("en", "fr"));
    assert!(!language_codes_match("en", "zz"));
}
