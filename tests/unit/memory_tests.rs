/*!
 * Tests for the translation memory
 */

use std::fs;

use mdtranslate::translation::TranslationMemory;

use crate::common;

#[tokio::test]
async fn test_fingerprint_withSameInputs_shouldBeDeterministic() {
    let a = TranslationMemory::fingerprint("Xin chào", "vi", "en", "heading");
    let b = TranslationMemory::fingerprint("Xin chào", "vi", "en", "heading");

    assert_eq!(a, b);
    assert_eq!(a.len(), 16);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn test_fingerprint_withDifferentContext_shouldDiffer() {
    let heading = TranslationMemory::fingerprint("Xin chào", "vi", "en", "heading");
    let paragraph = TranslationMemory::fingerprint("Xin chào", "vi", "en", "paragraph");

    assert_ne!(heading, paragraph);
}

#[tokio::test]
async fn test_fingerprint_withDifferentLanguagePair_shouldDiffer() {
    let to_en = TranslationMemory::fingerprint("Xin chào", "vi", "en", "heading");
    let to_fr = TranslationMemory::fingerprint("Xin chào", "vi", "fr", "heading");

    assert_ne!(to_en, to_fr);
}

#[tokio::test]
async fn test_get_withMissingEntry_shouldCountMiss() {
    let temp_dir = common::create_temp_dir().unwrap();
    let mut memory = TranslationMemory::new(temp_dir.path());

    assert_eq!(memory.get("chưa có", "vi", "en", "paragraph"), None);
    let stats = memory.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 0);
}

#[tokio::test]
async fn test_setAndGet_shouldReturnStoredTranslation() {
    let temp_dir = common::create_temp_dir().unwrap();
    let mut memory = TranslationMemory::new(temp_dir.path());

    memory.set("Xin chào", "Hello", "vi", "en", "heading", "mock-model");
    let result = memory.get("Xin chào", "vi", "en", "heading");

    assert_eq!(result, Some("Hello".to_string()));
    assert_eq!(memory.stats().hits, 1);
}

#[tokio::test]
async fn test_get_withRepeatedLookups_shouldCountEachHit() {
    let temp_dir = common::create_temp_dir().unwrap();
    let mut memory = TranslationMemory::new(temp_dir.path());

    memory.set("Xin chào", "Hello", "vi", "en", "heading", "mock-model");
    memory.get("Xin chào", "vi", "en", "heading");
    memory.get("Xin chào", "vi", "en", "heading");

    let stats = memory.stats();
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 0);
}

#[tokio::test]
async fn test_get_withDifferentContext_shouldMiss() {
    let temp_dir = common::create_temp_dir().unwrap();
    let mut memory = TranslationMemory::new(temp_dir.path());

    memory.set("Xin chào", "Hello", "vi", "en", "heading", "mock-model");

    assert_eq!(memory.get("Xin chào", "vi", "en", "paragraph"), None);
}

#[tokio::test]
async fn test_set_withSameKey_shouldOverwrite() {
    let temp_dir = common::create_temp_dir().unwrap();
    let mut memory = TranslationMemory::new(temp_dir.path());

    memory.set("Xin chào", "Hello", "vi", "en", "heading", "mock-model");
    memory.set("Xin chào", "Hi", "vi", "en", "heading", "mock-model");

    assert_eq!(memory.get("Xin chào", "vi", "en", "heading"), Some("Hi".to_string()));
    assert_eq!(memory.len(), 1);
}

#[tokio::test]
async fn test_contains_shouldNotTouchCounters() {
    let temp_dir = common::create_temp_dir().unwrap();
    let mut memory = TranslationMemory::new(temp_dir.path());
    memory.set("Xin chào", "Hello", "vi", "en", "heading", "mock-model");

    assert!(memory.contains("Xin chào", "vi", "en", "heading"));
    assert!(!memory.contains("khác", "vi", "en", "heading"));

    let stats = memory.stats();
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.misses, 0);
}

#[tokio::test]
async fn test_saveAndReload_shouldRoundTrip() {
    let temp_dir = common::create_temp_dir().unwrap();

    {
        let mut memory = TranslationMemory::new(temp_dir.path());
        memory.set("Xin chào", "Hello", "vi", "en", "heading", "mock-model");
        memory.set("Tạm biệt", "Goodbye", "vi", "en", "paragraph", "mock-model");
        memory.save().unwrap();
    }

    let mut reloaded = TranslationMemory::new(temp_dir.path());
    assert_eq!(reloaded.len(), 2);
    assert_eq!(
        reloaded.get("Xin chào", "vi", "en", "heading"),
        Some("Hello".to_string())
    );
}

#[tokio::test]
async fn test_save_shouldCreateCacheDirectory() {
    let temp_dir = common::create_temp_dir().unwrap();
    let nested = temp_dir.path().join("deep").join("cache");

    let mut memory = TranslationMemory::new(&nested);
    memory.set("Xin chào", "Hello", "vi", "en", "heading", "mock-model");
    memory.save().unwrap();

    assert!(nested.join("translation_memory.json").exists());
}

#[tokio::test]
async fn test_new_withCorruptFile_shouldStartEmpty() {
    let temp_dir = common::create_temp_dir().unwrap();
    fs::write(temp_dir.path().join("translation_memory.json"), "not json {{{").unwrap();

    let memory = TranslationMemory::new(temp_dir.path());
    assert!(memory.is_empty());
}

#[tokio::test]
async fn test_new_withMissingFile_shouldStartEmpty() {
    let temp_dir = common::create_temp_dir().unwrap();
    let memory = TranslationMemory::new(temp_dir.path().join("nope"));
    assert!(memory.is_empty());
}

#[tokio::test]
async fn test_clear_shouldRemoveEntriesAndRewriteFile() {
    let temp_dir = common::create_temp_dir().unwrap();
    let mut memory = TranslationMemory::new(temp_dir.path());
    memory.set("Xin chào", "Hello", "vi", "en", "heading", "mock-model");
    memory.save().unwrap();

    memory.clear().unwrap();
    assert!(memory.is_empty());

    let reloaded = TranslationMemory::new(temp_dir.path());
    assert!(reloaded.is_empty());
}

#[tokio::test]
async fn test_hitRate_withMixedLookups_shouldComputePercent() {
    let temp_dir = common::create_temp_dir().unwrap();
    let mut memory = TranslationMemory::new(temp_dir.path());
    memory.set("Xin chào", "Hello", "vi", "en", "heading", "mock-model");

    memory.get("Xin chào", "vi", "en", "heading");
    memory.get("không có", "vi", "en", "heading");

    let stats = memory.stats();
    assert!((stats.hit_rate() - 50.0).abs() < f64::EPSILON);
}
