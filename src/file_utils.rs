use anyhow::{anyhow, Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File system utilities
///
/// Collects the file operations the application needs: discovering Markdown
/// files, deriving output paths, and reading/writing with context-rich
/// errors.
pub struct FileManager;

impl FileManager {
    /// Find Markdown files under a directory, sorted by path. Recursive
    /// traversal follows subdirectories; otherwise only direct children
    /// are considered.
    pub fn find_markdown_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(anyhow!("Not a directory: {}", dir.display()));
        }

        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
            })
            .map(|entry| entry.into_path())
            .collect();

        files.sort();
        debug!("Found {} markdown files in {}", files.len(), dir.display());
        Ok(files)
    }

    /// Ensure a directory exists, creating it and its parents if needed
    pub fn ensure_dir(dir: &Path) -> Result<()> {
        if !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string(path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    /// Write content to a file, creating parent directories as needed
    pub fn write_to_file(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                Self::ensure_dir(parent)?;
            }
        }
        fs::write(path, content)
            .with_context(|| format!("Failed to write file: {}", path.display()))
    }

    /// Derive the output path for a translated file: the stem gains a
    /// `_{target_lang}` suffix, e.g. `guide.md` becomes `guide_en.md`.
    pub fn generate_output_path(input: &Path, output_dir: &Path, target_lang: &str) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        let extension = input
            .extension()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "md".to_string());

        output_dir.join(format!("{}_{}.{}", stem, target_lang, extension))
    }
}
