// Module-specific lints configuration
#![allow(dead_code)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use crate::app_config::{Config, TranslationProvider, TranslationStyle};
use app_controller::Controller;
use translation::TranslationMemory;

mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod language_utils;
mod parser;
mod providers;
mod translation;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Gemini,
    OpenAI,
    Claude,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Gemini => TranslationProvider::Gemini,
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::Claude => TranslationProvider::Claude,
        }
    }
}

/// CLI Wrapper for TranslationStyle to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationStyle {
    Literal,
    Natural,
}

impl From<CliTranslationStyle> for TranslationStyle {
    fn from(cli_style: CliTranslationStyle) -> Self {
        match cli_style {
            CliTranslationStyle::Literal => TranslationStyle::Literal,
            CliTranslationStyle::Natural => TranslationStyle::Natural,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a Markdown file or directory
    Translate(TranslateArgs),

    /// Translate a text snippet and print the result
    Quick(QuickArgs),

    /// Show or modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions for mdtranslate
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input Markdown file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output file or directory (auto-generated when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Source language code (e.g., 'vi', 'en', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Process subdirectories when input is a directory
    #[arg(short, long)]
    recursive: bool,

    /// Analyze without calling the translation provider
    #[arg(long)]
    dry_run: bool,

    /// Disable the translation memory for this run
    #[arg(long)]
    no_cache: bool,

    /// Clear the translation memory before running
    #[arg(long)]
    clear_cache: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    config_path: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct QuickArgs {
    /// Text to translate
    #[arg(value_name = "TEXT")]
    text: String,

    /// Source language code
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code
    #[arg(short, long)]
    target_language: Option<String>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Configuration file path
    #[arg(short, long)]
    config_path: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Switch the active provider
    Use {
        #[arg(value_enum)]
        provider: CliTranslationProvider,
    },

    /// Set the model for a provider (the active one by default)
    Model {
        model: String,

        #[arg(short, long, value_enum)]
        provider: Option<CliTranslationProvider>,
    },

    /// Set the translation style
    Style {
        #[arg(value_enum)]
        style: CliTranslationStyle,
    },

    /// Add a term that must never be translated
    AddTerm { term: String },

    /// Remove a preserve term
    RemoveTerm { term: String },

    /// Show or clear the translation memory
    Cache {
        /// Delete all cached translations
        #[arg(long)]
        clear: bool,
    },
}

/// mdtranslate - AI-powered Markdown translation
///
/// Translates Markdown documentation while keeping its structure intact:
/// code blocks, inline code, URLs, and configured terms pass through
/// untouched.
#[derive(Parser, Debug)]
#[command(name = "mdtranslate")]
#[command(version = "0.9.0")]
#[command(about = "AI-powered Markdown translation tool")]
#[command(long_about = "mdtranslate parses Markdown documents into blocks and translates the
translatable text with an AI provider, reconstructing the document with its
structure intact.

EXAMPLES:
    mdtranslate translate README.md                      # Use configured languages
    mdtranslate translate -s vi -t en README.md          # Vietnamese to English
    mdtranslate translate --dry-run docs/                # Count work without translating
    mdtranslate translate -r -o out/ docs/               # Recurse, write under out/
    mdtranslate quick \"Xin chào\" -s vi -t en             # One-off snippet
    mdtranslate config use openai                        # Switch provider
    mdtranslate completions bash > mdtranslate.bash      # Shell completions

CONFIGURATION:
    Configuration is read from mdtranslate.json in the working directory or
    ~/.mdtranslate/config.json. API keys come from environment variables
    (GOOGLE_API_KEY, OPENAI_API_KEY, ANTHROPIC_API_KEY).

SUPPORTED PROVIDERS:
    gemini - Google Generative Language API (default: gemini-1.5-flash)
    openai - OpenAI API (default: gpt-4o-mini)
    claude - Anthropic API (default: claude-3-5-sonnet-20241022)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // The level is updated after the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "mdtranslate", &mut std::io::stdout());
            Ok(())
        }
        Commands::Translate(args) => run_translate(args).await,
        Commands::Quick(args) => run_quick(args).await,
        Commands::Config { command } => run_config(command),
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(config_log_level.to_level_filter());
    }

    let mut config = Config::load(options.config_path.as_deref())?;

    // Override config with CLI options if provided
    if let Some(provider) = &options.provider {
        config.switch_provider(provider.clone().into());
    }
    if let Some(model) = &options.model {
        let provider = config.active_provider;
        config.set_model(provider, model);
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    config.validate().context("Configuration validation failed")?;

    if options.clear_cache {
        let mut memory = TranslationMemory::new(&config.directories.cache);
        memory.clear().context("Failed to clear translation memory")?;
        info!("Translation memory cleared");
    }

    let use_cache = !options.no_cache;
    let controller = Controller::with_config(config)?;

    if options.input_path.is_file() {
        controller
            .run_file(
                &options.input_path,
                options.output.as_deref(),
                options.source_language.as_deref(),
                options.target_language.as_deref(),
                options.dry_run,
                use_cache,
            )
            .await
    } else if options.input_path.is_dir() {
        controller
            .run_directory(
                &options.input_path,
                options.output.as_deref(),
                options.source_language.as_deref(),
                options.target_language.as_deref(),
                options.recursive,
                options.dry_run,
                use_cache,
            )
            .await
    } else {
        Err(anyhow!("Input path does not exist: {:?}", options.input_path))
    }
}

async fn run_quick(options: QuickArgs) -> Result<()> {
    let mut config = Config::load(options.config_path.as_deref())?;
    if let Some(provider) = &options.provider {
        config.switch_provider(provider.clone().into());
    }

    let controller = Controller::with_config(config)?;
    controller
        .run_quick(
            &options.text,
            options.source_language.as_deref(),
            options.target_language.as_deref(),
            true,
        )
        .await
}

fn run_config(command: ConfigCommands) -> Result<()> {
    let mut config = Config::load(None)?;
    let save_path = Config::default_save_path();

    match command {
        ConfigCommands::Show => {
            let rendered = serde_json::to_string_pretty(&config)
                .context("Failed to serialize config")?;
            println!("{}", rendered);
        }
        ConfigCommands::Use { provider } => {
            let provider: TranslationProvider = provider.into();
            config.switch_provider(provider);
            config.save(&save_path)?;
            info!(
                "Active provider set to {} (model {})",
                provider.display_name(),
                config.get_model(provider)
            );
        }
        ConfigCommands::Model { model, provider } => {
            let provider = provider
                .map(TranslationProvider::from)
                .unwrap_or(config.active_provider);
            config.set_model(provider, &model);
            config.save(&save_path)?;
            info!("Model for {} set to {}", provider.display_name(), model);
        }
        ConfigCommands::Style { style } => {
            config.translation.style = style.into();
            config.save(&save_path)?;
            info!("Translation style set to {}", config.translation.style);
        }
        ConfigCommands::AddTerm { term } => {
            if config.add_preserve_term(&term) {
                config.save(&save_path)?;
                info!("Added preserve term: {}", term);
            } else {
                warn!("Preserve term already present: {}", term);
            }
        }
        ConfigCommands::RemoveTerm { term } => {
            if config.remove_preserve_term(&term) {
                config.save(&save_path)?;
                info!("Removed preserve term: {}", term);
            } else {
                warn!("Preserve term not found: {}", term);
            }
        }
        ConfigCommands::Cache { clear } => {
            let mut memory = TranslationMemory::new(&config.directories.cache);
            if clear {
                memory.clear().context("Failed to clear translation memory")?;
                info!("Translation memory cleared");
            } else {
                let stats = memory.stats();
                info!(
                    "Translation memory: {} entries in {}",
                    stats.total_entries, config.directories.cache
                );
            }
        }
    }

    Ok(())
}
