/*!
 * Translation memory: a content-addressed cache of previously obtained
 * translations, persisted as a JSON file under the cache directory.
 *
 * Entries are keyed by a 16-hex-character SHA-256 fingerprint of
 * `source_lang|target_lang|context|text`, so the same fragment translated
 * in a different structural context gets its own entry. A missing or
 * malformed cache file is treated as an empty memory, never an error.
 */

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// File name of the persisted memory inside the cache directory
const MEMORY_FILE_NAME: &str = "translation_memory.json";

/// Schema version written to the cache file
const MEMORY_FILE_VERSION: &str = "1.0";

/// One cached translation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationMemoryEntry {
    /// Fingerprint this entry is stored under
    pub source_hash: String,

    /// Original text
    pub source_text: String,

    /// Translated text
    pub target_text: String,

    /// Source language code
    pub source_lang: String,

    /// Target language code
    pub target_lang: String,

    /// Structural context tag
    pub context: String,

    /// ISO-8601 creation timestamp
    pub timestamp: String,

    /// Model that produced the translation
    pub model: String,
}

/// On-disk representation of the memory file
#[derive(Debug, Serialize, Deserialize)]
struct MemoryFile {
    version: String,
    memory: HashMap<String, TranslationMemoryEntry>,
    stats: MemoryFileStats,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct MemoryFileStats {
    total_entries: usize,
    hits: usize,
    misses: usize,
}

/// Cache statistics for the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryStats {
    pub hits: usize,
    pub misses: usize,
    pub total_entries: usize,
}

impl MemoryStats {
    /// Hit rate in percent over this session's lookups
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hits as f64 / total as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// Translation memory for caching translations across files and runs
pub struct TranslationMemory {
    /// Directory holding the cache file
    cache_dir: PathBuf,

    /// In-memory entries keyed by fingerprint
    memory: HashMap<String, TranslationMemoryEntry>,

    /// Cache hit counter for this session
    hits: usize,

    /// Cache miss counter for this session
    misses: usize,
}

impl TranslationMemory {
    /// Create a memory backed by `cache_dir`, loading any existing entries
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Self {
        let cache_dir = cache_dir.as_ref().to_path_buf();
        let mut memory = HashMap::new();

        let cache_file = cache_dir.join(MEMORY_FILE_NAME);
        if cache_file.exists() {
            match fs::read_to_string(&cache_file) {
                Ok(data) => match serde_json::from_str::<MemoryFile>(&data) {
                    Ok(file) => {
                        memory = file.memory;
                        debug!("Loaded {} translation memory entries", memory.len());
                    }
                    Err(e) => {
                        warn!("Ignoring malformed translation memory file: {}", e);
                    }
                },
                Err(e) => {
                    warn!("Could not read translation memory file: {}", e);
                }
            }
        }

        Self {
            cache_dir,
            memory,
            hits: 0,
            misses: 0,
        }
    }

    /// Compute the fingerprint for a cache lookup. Deterministic: the same
    /// inputs always produce the same 16-hex-character key.
    pub fn fingerprint(text: &str, source_lang: &str, target_lang: &str, context: &str) -> String {
        let composite = format!("{}|{}|{}|{}", source_lang, target_lang, context, text);
        let digest = Sha256::digest(composite.as_bytes());
        let hex = format!("{:x}", digest);
        hex[..16].to_string()
    }

    /// Get a cached translation, counting the lookup as a hit or miss
    pub fn get(&mut self, text: &str, source_lang: &str, target_lang: &str, context: &str) -> Option<String> {
        let key = Self::fingerprint(text, source_lang, target_lang, context);
        match self.memory.get(&key) {
            Some(entry) => {
                self.hits += 1;
                Some(entry.target_text.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Whether a translation is cached, without touching the hit/miss
    /// counters. Used by dry runs.
    pub fn contains(&self, text: &str, source_lang: &str, target_lang: &str, context: &str) -> bool {
        let key = Self::fingerprint(text, source_lang, target_lang, context);
        self.memory.contains_key(&key)
    }

    /// Store a translation, overwriting any previous entry for the same
    /// fingerprint (last write wins)
    pub fn set(
        &mut self,
        text: &str,
        translation: &str,
        source_lang: &str,
        target_lang: &str,
        context: &str,
        model: &str,
    ) {
        let key = Self::fingerprint(text, source_lang, target_lang, context);
        self.memory.insert(
            key.clone(),
            TranslationMemoryEntry {
                source_hash: key,
                source_text: text.to_string(),
                target_text: translation.to_string(),
                source_lang: source_lang.to_string(),
                target_lang: target_lang.to_string(),
                context: context.to_string(),
                timestamp: Local::now().to_rfc3339(),
                model: model.to_string(),
            },
        );
    }

    /// Persist all entries and the session counters to disk. The write is a
    /// full-file rewrite, never an append.
    pub fn save(&self) -> Result<()> {
        fs::create_dir_all(&self.cache_dir)
            .with_context(|| format!("Failed to create cache directory: {}", self.cache_dir.display()))?;

        let file = MemoryFile {
            version: MEMORY_FILE_VERSION.to_string(),
            memory: self.memory.clone(),
            stats: MemoryFileStats {
                total_entries: self.memory.len(),
                hits: self.hits,
                misses: self.misses,
            },
        };

        let cache_file = self.cache_dir.join(MEMORY_FILE_NAME);
        let data = serde_json::to_string_pretty(&file)
            .context("Failed to serialize translation memory")?;
        fs::write(&cache_file, data)
            .with_context(|| format!("Failed to write translation memory: {}", cache_file.display()))?;

        debug!("Saved {} translation memory entries", self.memory.len());
        Ok(())
    }

    /// Drop all entries and rewrite the cache file empty
    pub fn clear(&mut self) -> Result<()> {
        self.memory.clear();
        self.hits = 0;
        self.misses = 0;
        self.save()
    }

    /// Session statistics
    pub fn stats(&self) -> MemoryStats {
        MemoryStats {
            hits: self.hits,
            misses: self.misses,
            total_entries: self.memory.len(),
        }
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// Whether the memory holds no entries
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }
}
