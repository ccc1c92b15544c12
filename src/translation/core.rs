/*!
 * Translation orchestration.
 *
 * The [`Translator`] wires the parser, the translation memory, and the
 * configured provider into file and directory runs. Units are translated
 * sequentially; the per-unit flow is cache lookup, prompt build, provider
 * request with rate-limit retry, cache store.
 */

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use log::{debug, info, warn};

use crate::app_config::Config;
use crate::errors::TranslationError;
use crate::file_utils::FileManager;
use crate::parser::{MarkdownParser, ParsedDocument, TranslationAction, UnitContext};
use crate::providers::{create_provider, Provider, ProviderSettings};
use crate::translation::memory::TranslationMemory;
use crate::translation::prompts::PromptBuilder;
use crate::translation::reconstruct;

/// Backoff ceiling for rate-limit retries
const MAX_BACKOFF_MS: u64 = 60_000;

/// Progress callback invoked after each translated unit (current, total)
pub type ProgressFn<'a> = &'a mut (dyn FnMut(usize, usize) + Send);

/// Result of translating one file
#[derive(Debug, Clone)]
pub struct TranslationResult {
    /// Input file path
    pub source_path: String,

    /// Output file path
    pub output_path: String,

    /// Whether the translation completed
    pub success: bool,

    /// Total document blocks
    pub total_blocks: usize,

    /// Blocks (units on dry runs) that were or would be translated
    pub translated_blocks: usize,

    /// Units served from the translation memory
    pub cached_blocks: usize,

    /// Blocks passed through untranslated
    pub skipped_blocks: usize,

    /// Failure description when `success` is false
    pub error: Option<String>,

    /// Wall-clock duration of the run
    pub duration_seconds: f64,

    /// Set when the translation succeeded but the memory could not be
    /// persisted; the output file is still valid
    pub cache_error: Option<String>,
}

impl TranslationResult {
    fn new(source_path: &str, output_path: &str) -> Self {
        Self {
            source_path: source_path.to_string(),
            output_path: output_path.to_string(),
            success: false,
            total_blocks: 0,
            translated_blocks: 0,
            cached_blocks: 0,
            skipped_blocks: 0,
            error: None,
            duration_seconds: 0.0,
            cache_error: None,
        }
    }
}

/// Main translator orchestrating parse, cache, provider, and reconstruction
pub struct Translator {
    /// Application configuration
    config: Config,

    /// Markdown parser configured with the preserve terms
    parser: MarkdownParser,

    /// Provider client, created lazily on the first real translation
    provider: Option<Box<dyn Provider>>,

    /// Translation memory, absent when caching is disabled
    memory: Option<TranslationMemory>,
}

impl Translator {
    /// Create a translator from configuration
    pub fn new(config: Config, use_cache: bool) -> Self {
        let parser = MarkdownParser::new(config.preserve_terms.clone());
        let memory = if use_cache {
            Some(TranslationMemory::new(&config.directories.cache))
        } else {
            None
        };

        Self {
            config,
            parser,
            provider: None,
            memory,
        }
    }

    /// Create a translator with a pre-built provider client
    pub fn with_provider(config: Config, provider: Box<dyn Provider>, use_cache: bool) -> Self {
        let mut translator = Self::new(config, use_cache);
        translator.provider = Some(provider);
        translator
    }

    /// The translation memory, when caching is enabled
    pub fn memory(&self) -> Option<&TranslationMemory> {
        self.memory.as_ref()
    }

    /// Mutable access to the translation memory
    pub fn memory_mut(&mut self) -> Option<&mut TranslationMemory> {
        self.memory.as_mut()
    }

    /// Create the provider client from configuration if not yet present
    fn ensure_provider(&mut self) -> Result<()> {
        if self.provider.is_some() {
            return Ok(());
        }

        let provider = self.config.active_provider;
        let api_key = self.config.get_api_key(provider)?;
        let provider_config = self.config.active_provider_config();

        let settings = ProviderSettings {
            api_key,
            model: self.config.get_model(provider),
            endpoint: provider_config.endpoint,
            temperature: self.config.translation.temperature,
            max_tokens: self.config.translation.max_tokens,
        };

        info!(
            "Using provider {} with model {}",
            provider.display_name(),
            settings.model
        );
        self.provider = Some(create_provider(provider, settings));
        Ok(())
    }

    /// Test the connection to the configured provider
    pub async fn test_connection(&mut self) -> Result<()> {
        self.ensure_provider()?;
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| anyhow!("Provider not initialized"))?;
        provider.test_connection().await?;
        Ok(())
    }

    /// Translate a single text fragment, consulting the memory first
    pub async fn translate_text(
        &mut self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
        context: UnitContext,
    ) -> Result<String> {
        if let Some(memory) = self.memory.as_mut() {
            if let Some(cached) = memory.get(text, source_lang, target_lang, context.as_str()) {
                debug!("Cache hit for {} fragment", context);
                return Ok(cached);
            }
        }

        self.ensure_provider()?;
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| anyhow!("Provider not initialized"))?;

        let system_prompt = PromptBuilder::build_system_prompt(
            source_lang,
            target_lang,
            &self.config.preserve_terms,
            self.config.translation.style,
            context,
        );

        let translated = request_with_retry(
            provider.as_ref(),
            text,
            &system_prompt,
            self.config.translation.retry_count,
            self.config.translation.retry_backoff_ms,
        )
        .await?;

        let model = provider.model().to_string();
        if let Some(memory) = self.memory.as_mut() {
            memory.set(text, &translated, source_lang, target_lang, context.as_str(), &model);
        }

        Ok(translated)
    }

    /// Translate a Markdown file. Failures are captured in the result
    /// rather than returned, so batch runs can continue past a bad file.
    pub async fn translate_file(
        &mut self,
        input_path: &Path,
        output_path: Option<&Path>,
        source_lang: Option<&str>,
        target_lang: Option<&str>,
        dry_run: bool,
        progress: Option<ProgressFn<'_>>,
    ) -> TranslationResult {
        let start = Instant::now();
        let source = source_lang
            .unwrap_or(&self.config.languages.default_source)
            .to_string();
        let target = target_lang
            .unwrap_or(&self.config.languages.default_target)
            .to_string();

        let output = match output_path {
            Some(path) => path.to_path_buf(),
            None => FileManager::generate_output_path(
                input_path,
                input_path.parent().unwrap_or_else(|| Path::new(".")),
                &target,
            ),
        };

        let mut result = TranslationResult::new(
            &input_path.display().to_string(),
            &output.display().to_string(),
        );

        match self
            .translate_file_inner(input_path, &output, &source, &target, dry_run, progress, &mut result)
            .await
        {
            Ok(()) => result.success = true,
            Err(e) => {
                result.error = Some(e.to_string());
                result.success = false;
            }
        }

        result.duration_seconds = start.elapsed().as_secs_f64();
        result
    }

    async fn translate_file_inner(
        &mut self,
        input_path: &Path,
        output_path: &Path,
        source: &str,
        target: &str,
        dry_run: bool,
        progress: Option<ProgressFn<'_>>,
        result: &mut TranslationResult,
    ) -> Result<()> {
        let mut doc = self.parser.parse_file(input_path)?;
        result.total_blocks = doc.total_blocks;

        if dry_run {
            self.analyze_document(&doc, source, target, result);
            return Ok(());
        }

        let hits_before = self.memory.as_ref().map_or(0, |m| m.stats().hits);

        let content = self
            .translate_document(&mut doc, source, target, progress)
            .await?;

        for block in &doc.blocks {
            if block.needs_translation() {
                result.translated_blocks += 1;
            } else {
                result.skipped_blocks += 1;
            }
        }

        FileManager::write_to_file(output_path, &content)?;

        if let Some(memory) = self.memory.as_ref() {
            result.cached_blocks = memory.stats().hits - hits_before;
            if let Err(e) = memory.save() {
                warn!("Failed to persist translation memory: {}", e);
                result.cache_error = Some(e.to_string());
            }
        }

        Ok(())
    }

    /// Count what a real run would do, without touching the provider or
    /// the memory's hit/miss counters
    fn analyze_document(
        &self,
        doc: &ParsedDocument,
        source: &str,
        target: &str,
        result: &mut TranslationResult,
    ) {
        for block in &doc.blocks {
            if !block.needs_translation() {
                result.skipped_blocks += 1;
                continue;
            }
            for unit in &block.units {
                if unit.action != TranslationAction::Translate {
                    continue;
                }
                let cached = self.memory.as_ref().is_some_and(|m| {
                    m.contains(&unit.content, source, target, unit.context.as_str())
                });
                if cached {
                    result.cached_blocks += 1;
                } else {
                    result.translated_blocks += 1;
                }
            }
        }
    }

    /// Translate a parsed document and reconstruct the Markdown text,
    /// recording the translations back onto the units and blocks
    async fn translate_document(
        &mut self,
        doc: &mut ParsedDocument,
        source: &str,
        target: &str,
        mut progress: Option<ProgressFn<'_>>,
    ) -> Result<String> {
        let total_units = doc.translatable_units().len();
        let mut current_unit = 0usize;
        let mut parts = Vec::with_capacity(doc.blocks.len());

        for block in &mut doc.blocks {
            if !block.needs_translation() {
                parts.push(block.raw_content.clone());
                continue;
            }

            let mut texts = Vec::with_capacity(block.units.len());
            for unit in &mut block.units {
                if unit.action == TranslationAction::Translate {
                    let translated = self
                        .translate_text(&unit.content, source, target, unit.context)
                        .await?;
                    unit.translated = Some(translated.clone());
                    texts.push(translated);

                    current_unit += 1;
                    if let Some(callback) = progress.as_deref_mut() {
                        callback(current_unit, total_units);
                    }
                } else {
                    texts.push(unit.content.clone());
                }
            }

            let rebuilt = reconstruct::rebuild(block, &texts);
            block.translated_content = Some(rebuilt.clone());
            parts.push(rebuilt);
        }

        Ok(reconstruct::join_document(&parts))
    }

    /// Translate every Markdown file under a directory. A failing file is
    /// recorded in its result; the batch continues.
    #[allow(clippy::too_many_arguments)]
    pub async fn translate_directory(
        &mut self,
        input_dir: &Path,
        output_dir: Option<&Path>,
        source_lang: Option<&str>,
        target_lang: Option<&str>,
        recursive: bool,
        dry_run: bool,
        mut per_file: Option<&mut (dyn FnMut(&Path, &TranslationResult) + Send)>,
    ) -> Result<Vec<TranslationResult>> {
        let target = target_lang
            .unwrap_or(&self.config.languages.default_target)
            .to_string();

        let files = FileManager::find_markdown_files(input_dir, recursive)?;
        info!(
            "Translating {} files from {}",
            files.len(),
            input_dir.display()
        );

        let mut results = Vec::with_capacity(files.len());
        for file_path in &files {
            let output = self.directory_output_path(file_path, input_dir, output_dir, &target);
            let result = self
                .translate_file(
                    file_path,
                    Some(&output),
                    source_lang,
                    target_lang,
                    dry_run,
                    None,
                )
                .await;

            if let Some(callback) = per_file.as_deref_mut() {
                callback(file_path, &result);
            }
            results.push(result);
        }

        if let Some(memory) = self.memory.as_ref() {
            if let Err(e) = memory.save() {
                warn!("Failed to persist translation memory: {}", e);
                let message = e.to_string();
                for result in results.iter_mut().filter(|r| r.cache_error.is_none()) {
                    result.cache_error = Some(message.clone());
                }
            }
        }

        Ok(results)
    }

    /// Output path for one file of a batch: relative structure preserved
    /// under the output directory, or alongside the input otherwise
    fn directory_output_path(
        &self,
        file_path: &Path,
        input_dir: &Path,
        output_dir: Option<&Path>,
        target: &str,
    ) -> PathBuf {
        match output_dir {
            Some(out) => {
                let relative_parent = file_path
                    .strip_prefix(input_dir)
                    .ok()
                    .and_then(|rel| rel.parent().map(Path::to_path_buf))
                    .unwrap_or_default();
                FileManager::generate_output_path(file_path, &out.join(relative_parent), target)
            }
            None => FileManager::generate_output_path(
                file_path,
                file_path.parent().unwrap_or_else(|| Path::new(".")),
                target,
            ),
        }
    }
}

/// Send a provider request, retrying rate-limit errors with exponential
/// backoff. Other errors fail immediately.
async fn request_with_retry(
    provider: &dyn Provider,
    text: &str,
    system_prompt: &str,
    retry_count: u32,
    backoff_base_ms: u64,
) -> Result<String, TranslationError> {
    let mut attempt = 1u32;
    loop {
        match provider.translate(text, system_prompt).await {
            Ok(translated) => return Ok(translated),
            Err(e) if e.is_retryable() && attempt < retry_count => {
                let backoff_ms = backoff_base_ms
                    .saturating_mul(1u64 << (attempt - 1).min(16))
                    .min(MAX_BACKOFF_MS);
                warn!(
                    "Rate limited (attempt {}/{}), backing off {}ms",
                    attempt, retry_count, backoff_ms
                );
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                attempt += 1;
            }
            Err(e) if e.is_retryable() => {
                return Err(TranslationError::RetryExhausted {
                    attempts: attempt,
                    message: e.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        }
    }
}
