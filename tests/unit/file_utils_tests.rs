/*!
 * Tests for file system utilities
 */

use std::fs;
use std::path::Path;

use mdtranslate::file_utils::FileManager;

use crate::common;

#[tokio::test]
async fn test_findMarkdownFiles_withFlatDir_shouldIgnoreSubdirsAndOtherTypes() {
    let temp_dir = common::create_temp_dir().unwrap();
    let nested = temp_dir.path().join("sub");
    fs::create_dir_all(&nested).unwrap();
    common::create_test_file(temp_dir.path(), "b.md", "b").unwrap();
    common::create_test_file(temp_dir.path(), "a.md", "a").unwrap();
    common::create_test_file(temp_dir.path(), "c.txt", "c").unwrap();
    common::create_test_file(&nested, "d.md", "d").unwrap();

    let files = FileManager::find_markdown_files(temp_dir.path(), false).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    assert_eq!(names, vec!["a.md", "b.md"]);
}

#[tokio::test]
async fn test_findMarkdownFiles_withRecursive_shouldIncludeSubdirs() {
    let temp_dir = common::create_temp_dir().unwrap();
    let nested = temp_dir.path().join("sub");
    fs::create_dir_all(&nested).unwrap();
    common::create_test_file(temp_dir.path(), "a.md", "a").unwrap();
    common::create_test_file(&nested, "d.md", "d").unwrap();

    let files = FileManager::find_markdown_files(temp_dir.path(), true).unwrap();
    assert_eq!(files.len(), 2);
}

#[tokio::test]
async fn test_findMarkdownFiles_withUppercaseExtension_shouldMatch() {
    let temp_dir = common::create_temp_dir().unwrap();
    common::create_test_file(temp_dir.path(), "README.MD", "x").unwrap();

    let files = FileManager::find_markdown_files(temp_dir.path(), false).unwrap();
    assert_eq!(files.len(), 1);
}

#[tokio::test]
async fn test_findMarkdownFiles_withMissingDir_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let result = FileManager::find_markdown_files(&temp_dir.path().join("nope"), false);
    assert!(result.is_err());
}

#[tokio::test]
async fn test_generateOutputPath_shouldAppendLanguageSuffix() {
    let output = FileManager::generate_output_path(
        Path::new("docs/guide.md"),
        Path::new("out"),
        "en",
    );
    assert_eq!(output, Path::new("out/guide_en.md"));
}

#[tokio::test]
async fn test_writeToFile_shouldCreateParentDirectories() {
    let temp_dir = common::create_temp_dir().unwrap();
    let target = temp_dir.path().join("a").join("b").join("out.md");

    FileManager::write_to_file(&target, "nội dung").unwrap();

    assert_eq!(fs::read_to_string(&target).unwrap(), "nội dung");
}

#[tokio::test]
async fn test_ensureDir_withExistingDir_shouldSucceed() {
    let temp_dir = common::create_temp_dir().unwrap();
    FileManager::ensure_dir(temp_dir.path()).unwrap();
    FileManager::ensure_dir(&temp_dir.path().join("new")).unwrap();
    assert!(temp_dir.path().join("new").is_dir());
}

#[tokio::test]
async fn test_readToString_withMissingFile_shouldFailWithContext() {
    let temp_dir = common::create_temp_dir().unwrap();
    let result = FileManager::read_to_string(&temp_dir.path().join("nope.md"));
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("nope.md"));
}
