use std::fmt;

// @module: Document model for parsed Markdown

/// Action to take for a translation unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationAction {
    /// Send to the translation engine
    Translate,
    /// Keep as-is (code blocks, inline code)
    Skip,
    /// Keep a specific literal pattern (requirement IDs, URLs)
    Preserve,
}

/// Structural role of a translation unit, used both for prompt tailoring
/// and as part of the cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitContext {
    Heading,
    Paragraph,
    TableCell,
    ListItem,
    Blockquote,
    Hr,
    CodeFence,
    CodeBlock,
    Html,
}

impl UnitContext {
    /// Stable identifier used in cache keys and prompts
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Heading => "heading",
            Self::Paragraph => "paragraph",
            Self::TableCell => "table_cell",
            Self::ListItem => "list_item",
            Self::Blockquote => "blockquote",
            Self::Hr => "hr",
            Self::CodeFence => "code_fence",
            Self::CodeBlock => "code_block",
            Self::Html => "html",
        }
    }
}

impl fmt::Display for UnitContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The smallest fragment of document text individually routed to the
/// translation engine or kept verbatim.
#[derive(Debug, Clone)]
pub struct TranslationUnit {
    /// The original text content
    pub content: String,

    /// Action to take
    pub action: TranslationAction,

    /// Structural context of this unit
    pub context: UnitContext,

    /// Original position in the document
    pub line_start: usize,
    pub line_end: usize,

    /// Reason for skipping/preserving
    pub preserve_reason: Option<String>,

    /// Translated content, set once translation has completed
    pub translated: Option<String>,
}

impl TranslationUnit {
    /// Create a unit marked for translation
    pub fn translate(content: impl Into<String>, context: UnitContext) -> Self {
        Self {
            content: content.into(),
            action: TranslationAction::Translate,
            context,
            line_start: 0,
            line_end: 0,
            preserve_reason: None,
            translated: None,
        }
    }

    /// Create a unit kept verbatim
    pub fn skip(content: impl Into<String>, context: UnitContext, reason: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            action: TranslationAction::Skip,
            context,
            line_start: 0,
            line_end: 0,
            preserve_reason: Some(reason.into()),
            translated: None,
        }
    }
}

/// Structural kind of a document block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    Heading,
    Paragraph,
    Fence,
    CodeBlock,
    List,
    Blockquote,
    Table,
    Hr,
    Html,
}

/// A structural Markdown element carrying its verbatim source slice and
/// the translation units extracted from it.
#[derive(Debug, Clone)]
pub struct DocumentBlock {
    /// Block kind
    pub block_type: BlockType,

    /// Verbatim source slice of the block
    pub raw_content: String,

    /// Translation units in left-to-right, top-to-bottom order of occurrence
    pub units: Vec<TranslationUnit>,

    /// Heading depth (headings only)
    pub level: usize,

    /// Fence info string (fenced code blocks only)
    pub language: String,

    /// Whether the list is ordered (lists only)
    pub is_ordered: bool,

    /// Original line numbers (zero-based, end exclusive)
    pub line_start: usize,
    pub line_end: usize,

    /// Reconstructed block text, set after translation
    pub translated_content: Option<String>,
}

impl DocumentBlock {
    pub fn new(block_type: BlockType, raw_content: impl Into<String>, line_start: usize, line_end: usize) -> Self {
        Self {
            block_type,
            raw_content: raw_content.into(),
            units: Vec::new(),
            level: 0,
            language: String::new(),
            is_ordered: false,
            line_start,
            line_end,
            translated_content: None,
        }
    }

    /// Whether this block contains translatable content
    pub fn needs_translation(&self) -> bool {
        self.units.iter().any(|u| u.action == TranslationAction::Translate)
    }
}

/// A fully parsed document ready for translation. Blocks keep source order
/// throughout the pipeline; reconstruction must never reorder them.
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    /// Original file path
    pub source_path: String,

    /// All blocks in source order
    pub blocks: Vec<DocumentBlock>,

    /// First level-1 heading's first unit content, if any
    pub title: Option<String>,

    /// Derived statistics, recomputed after parse
    pub total_blocks: usize,
    pub translatable_blocks: usize,
    pub skipped_blocks: usize,
}

impl ParsedDocument {
    pub fn new(source_path: impl Into<String>, blocks: Vec<DocumentBlock>) -> Self {
        let mut doc = Self {
            source_path: source_path.into(),
            blocks,
            title: None,
            total_blocks: 0,
            translatable_blocks: 0,
            skipped_blocks: 0,
        };
        doc.update_statistics();
        doc
    }

    /// All units that need translation, in document order
    pub fn translatable_units(&self) -> Vec<&TranslationUnit> {
        self.blocks
            .iter()
            .flat_map(|b| b.units.iter())
            .filter(|u| u.action == TranslationAction::Translate)
            .collect()
    }

    /// All translation units, in document order
    pub fn all_units(&self) -> Vec<&TranslationUnit> {
        self.blocks.iter().flat_map(|b| b.units.iter()).collect()
    }

    /// Recompute the block statistics
    pub fn update_statistics(&mut self) {
        self.total_blocks = self.blocks.len();
        self.translatable_blocks = self.blocks.iter().filter(|b| b.needs_translation()).count();
        self.skipped_blocks = self.total_blocks - self.translatable_blocks;
    }
}
