/*!
 * Common test utilities for the mdtranslate test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;


/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample Markdown document for testing
pub fn create_test_markdown(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = r#"# Tài liệu thử nghiệm

Đây là đoạn văn đầu tiên.

```rust
fn main() {}
```

- Mục thứ nhất
- Mục thứ hai
"#;
    create_test_file(dir, filename, content)
}

/// Builds a config whose cache directory points inside the given temp dir
pub fn test_config(cache_dir: &Path) -> mdtranslate::Config {
    let mut config = mdtranslate::Config::default();
    config.directories.cache = cache_dir.display().to_string();
    config.translation.retry_backoff_ms = 1;
    config
}
