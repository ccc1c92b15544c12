/*!
 * Translation services for Markdown documents.
 *
 * This module contains the translation pipeline:
 * - core: Orchestration of parse, cache, provider, and reconstruction
 * - memory: Content-addressed translation cache
 * - prompts: System prompt construction
 * - reconstruct: Rebuilding Markdown from translated units
 */

pub mod core;
pub mod memory;
pub mod prompts;
pub mod reconstruct;

pub use core::{TranslationResult, Translator};
pub use memory::{MemoryStats, TranslationMemory};
