/*!
 * Application controller.
 *
 * Drives translation runs from CLI options: single files with a per-unit
 * progress bar, directories with a per-file bar, and quick one-off text
 * translations. Result summaries are logged, not returned.
 */

use std::path::Path;

use anyhow::{anyhow, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{error, info, warn};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::parser::UnitContext;
use crate::translation::core::{TranslationResult, Translator};

/// Main controller for translation runs
pub struct Controller {
    /// Application configuration
    config: Config,
}

impl Controller {
    /// Create a controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Translate a single file, reporting per-unit progress
    pub async fn run_file(
        &self,
        input_path: &Path,
        output_path: Option<&Path>,
        source_lang: Option<&str>,
        target_lang: Option<&str>,
        dry_run: bool,
        use_cache: bool,
    ) -> Result<()> {
        if !input_path.is_file() {
            return Err(anyhow!("Input file does not exist: {}", input_path.display()));
        }

        let mut translator = Translator::new(self.config.clone(), use_cache);

        let result = if dry_run {
            translator
                .translate_file(input_path, output_path, source_lang, target_lang, true, None)
                .await
        } else {
            let progress_bar = unit_progress_bar();
            let mut callback = |current: usize, total: usize| {
                if progress_bar.length().unwrap_or(0) != total as u64 {
                    progress_bar.set_length(total as u64);
                }
                progress_bar.set_position(current as u64);
            };
            let result = translator
                .translate_file(
                    input_path,
                    output_path,
                    source_lang,
                    target_lang,
                    false,
                    Some(&mut callback),
                )
                .await;
            progress_bar.finish_and_clear();
            result
        };

        self.report_result(&result, dry_run);
        self.report_memory_stats(&translator);

        if result.success {
            Ok(())
        } else {
            Err(anyhow!(
                "Translation failed: {}",
                result.error.as_deref().unwrap_or("unknown error")
            ))
        }
    }

    /// Translate every Markdown file in a directory
    pub async fn run_directory(
        &self,
        input_dir: &Path,
        output_dir: Option<&Path>,
        source_lang: Option<&str>,
        target_lang: Option<&str>,
        recursive: bool,
        dry_run: bool,
        use_cache: bool,
    ) -> Result<()> {
        if !input_dir.is_dir() {
            return Err(anyhow!("Input directory does not exist: {}", input_dir.display()));
        }

        let mut translator = Translator::new(self.config.clone(), use_cache);

        let file_count = FileManager::find_markdown_files(input_dir, recursive)?.len();

        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(file_progress_bar());
        folder_pb.set_length(file_count as u64);
        let mut per_file = |path: &Path, result: &TranslationResult| {
            folder_pb.inc(1);
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let status = if result.success { "ok" } else { "failed" };
            folder_pb.set_message(format!("{} ({})", name, status));
        };

        let results = translator
            .translate_directory(
                input_dir,
                output_dir,
                source_lang,
                target_lang,
                recursive,
                dry_run,
                Some(&mut per_file),
            )
            .await?;
        folder_pb.finish_and_clear();

        self.report_batch(&results, dry_run);
        self.report_memory_stats(&translator);

        let failures = results.iter().filter(|r| !r.success).count();
        if failures > 0 {
            Err(anyhow!("{} of {} files failed", failures, results.len()))
        } else {
            Ok(())
        }
    }

    /// Translate a text snippet and print the result to stdout
    pub async fn run_quick(
        &self,
        text: &str,
        source_lang: Option<&str>,
        target_lang: Option<&str>,
        use_cache: bool,
    ) -> Result<()> {
        let source = source_lang
            .unwrap_or(&self.config.languages.default_source)
            .to_string();
        let target = target_lang
            .unwrap_or(&self.config.languages.default_target)
            .to_string();

        let mut translator = Translator::new(self.config.clone(), use_cache);
        let translated = translator
            .translate_text(text, &source, &target, UnitContext::Paragraph)
            .await?;

        println!("{}", translated);

        if let Some(memory) = translator.memory() {
            if let Err(e) = memory.save() {
                warn!("Failed to persist translation memory: {}", e);
            }
        }
        Ok(())
    }

    /// Test the connection to the configured provider
    pub async fn test_connection(&self) -> Result<()> {
        let mut translator = Translator::new(self.config.clone(), false);
        translator.test_connection().await?;
        info!(
            "Connection to {} succeeded",
            self.config.active_provider.display_name()
        );
        Ok(())
    }

    /// Log the outcome of one file
    fn report_result(&self, result: &TranslationResult, dry_run: bool) {
        if dry_run {
            info!(
                "Dry run for {}: {} blocks, {} units to translate, {} cached, {} blocks skipped",
                result.source_path,
                result.total_blocks,
                result.translated_blocks,
                result.cached_blocks,
                result.skipped_blocks
            );
            return;
        }

        if result.success {
            info!(
                "Translated {} -> {} ({} blocks: {} translated, {} skipped, {} cached units) in {:.1}s",
                result.source_path,
                result.output_path,
                result.total_blocks,
                result.translated_blocks,
                result.skipped_blocks,
                result.cached_blocks,
                result.duration_seconds
            );
            if let Some(cache_error) = &result.cache_error {
                warn!("Output written but cache not saved: {}", cache_error);
            }
        } else {
            error!(
                "Failed to translate {}: {}",
                result.source_path,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    /// Log a batch summary
    fn report_batch(&self, results: &[TranslationResult], dry_run: bool) {
        let succeeded = results.iter().filter(|r| r.success).count();
        let failed = results.len() - succeeded;
        let total_duration: f64 = results.iter().map(|r| r.duration_seconds).sum();

        if dry_run {
            let to_translate: usize = results.iter().map(|r| r.translated_blocks).sum();
            let cached: usize = results.iter().map(|r| r.cached_blocks).sum();
            info!(
                "Dry run: {} files, {} units to translate, {} cached",
                results.len(),
                to_translate,
                cached
            );
        } else {
            info!(
                "Batch finished: {} ok, {} failed in {:.1}s",
                succeeded, failed, total_duration
            );
        }

        for result in results.iter().filter(|r| !r.success) {
            error!(
                "  {}: {}",
                result.source_path,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    /// Log the session's cache statistics
    fn report_memory_stats(&self, translator: &Translator) {
        if let Some(memory) = translator.memory() {
            let stats = memory.stats();
            if stats.hits + stats.misses > 0 {
                info!(
                    "Cache: {} hits, {} misses ({:.0}% hit rate), {} entries",
                    stats.hits,
                    stats.misses,
                    stats.hit_rate(),
                    stats.total_entries
                );
            }
        }
    }
}

/// Per-unit progress bar for single-file runs
fn unit_progress_bar() -> ProgressBar {
    let progress_bar = ProgressBar::new(0);
    let template_result = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} units ({percent}%) {msg}")
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(template_result.progress_chars("█▓▒░"));
    progress_bar
}

/// Per-file progress bar for directory runs
fn file_progress_bar() -> ProgressBar {
    let progress_bar = ProgressBar::new(0);
    let template_result = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(template_result.progress_chars("█▓▒░"));
    progress_bar
}
