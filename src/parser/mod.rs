/*!
 * Markdown parsing with structure preservation.
 *
 * The parser tokenizes a document with pulldown-cmark, folds the top-level
 * events into typed [`DocumentBlock`]s, and extracts [`TranslationUnit`]s
 * per block. List items and table cells are re-derived from the block's raw
 * lines with fixed marker patterns so that unit order matches physical
 * line/cell order; the reconstructor relies on that alignment.
 */

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};
use regex::Regex;

use crate::errors::ParseError;

pub mod model;

pub use model::{
    BlockType, DocumentBlock, ParsedDocument, TranslationAction, TranslationUnit, UnitContext,
};

// @const: ATX heading marker
static HEADING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(#{1,6})\s+(.*?)\s*$").unwrap()
});

// @const: List item marker (indentation, bullet or number, text)
static LIST_ITEM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*)([-*+]|\d+\.)\s+(.*)$").unwrap()
});

// @const: Table header-separator row
static TABLE_SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\|?\s*[-:]+").unwrap()
});

// @const: Table cell content after a pipe
static TABLE_CELL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\|([^|]+)").unwrap()
});

// @const: Blockquote marker at line start
static BLOCKQUOTE_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^>\s*").unwrap()
});

// @const: Inline code span
static INLINE_CODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"`[^`]+`").unwrap()
});

// @const: URL-shaped substring
static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"https?://[^\s)\]"'>]+"#).unwrap()
});

// @const: Requirement ID shapes (never translated)
static REQUIREMENT_ID_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\b(FR|BR|NFR|TC|M|REQ|US|EPIC)-[A-Z0-9]+-?[A-Z0-9]*\b$").unwrap(),
        Regex::new(r"^\b[A-Z]{2,4}-\d{1,5}\b$").unwrap(),
    ]
});

/// Parse Markdown files into structured translation units.
pub struct MarkdownParser {
    /// Terms that must never be altered by translation
    preserve_terms: Vec<String>,
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl MarkdownParser {
    /// Create a parser with the given preserve terms
    pub fn new(preserve_terms: Vec<String>) -> Self {
        Self { preserve_terms }
    }

    /// Parse a Markdown file into a structured document
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<ParsedDocument, ParseError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ParseError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path).map_err(|e| ParseError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(self.parse_content(&content, &path.display().to_string()))
    }

    /// Parse Markdown content into a structured document
    pub fn parse_content(&self, content: &str, source_path: &str) -> ParsedDocument {
        let blocks = self.process_events(content);
        let mut doc = ParsedDocument::new(source_path, blocks);

        // Title comes from the first level-1 heading
        for block in &doc.blocks {
            if block.block_type == BlockType::Heading && block.level == 1 {
                if let Some(unit) = block.units.first() {
                    doc.title = Some(unit.content.clone());
                }
                break;
            }
        }

        doc
    }

    /// Fold the pulldown-cmark event stream into top-level document blocks
    fn process_events(&self, content: &str) -> Vec<DocumentBlock> {
        let lines: Vec<&str> = content.split('\n').collect();
        let line_starts = line_start_offsets(content);

        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        let parser = Parser::new_ext(content, options);

        let mut blocks = Vec::new();
        let mut events = parser.into_offset_iter();

        while let Some((event, range)) = events.next() {
            match event {
                Event::Start(tag) => {
                    let (line_start, line_end) = line_span(&line_starts, range.start, range.end);
                    let raw_content = lines[line_start..line_end].join("\n");

                    // Skip everything nested inside this block; for code
                    // blocks, collect the literal text on the way.
                    let mut depth = 1usize;
                    let mut code_text = String::new();
                    for (nested, _) in events.by_ref() {
                        match nested {
                            Event::Start(_) => depth += 1,
                            Event::End(_) => {
                                depth -= 1;
                                if depth == 0 {
                                    break;
                                }
                            }
                            Event::Text(text) => {
                                if matches!(tag, Tag::CodeBlock(_)) {
                                    code_text.push_str(&text);
                                }
                            }
                            _ => {}
                        }
                    }

                    if let Some(block) =
                        self.block_from_tag(&tag, raw_content, &code_text, line_start, line_end)
                    {
                        blocks.push(block);
                    }
                }
                Event::Rule => {
                    let (line_start, line_end) = line_span(&line_starts, range.start, range.end);
                    let raw_content = lines[line_start..line_end].join("\n");
                    let mut block = DocumentBlock::new(BlockType::Hr, raw_content.clone(), line_start, line_end);
                    block.units.push(TranslationUnit::skip(raw_content, UnitContext::Hr, "horizontal_rule"));
                    blocks.push(block);
                }
                _ => {}
            }
        }

        blocks
    }

    /// Build a document block for a top-level opening tag
    fn block_from_tag(
        &self,
        tag: &Tag<'_>,
        raw_content: String,
        code_text: &str,
        line_start: usize,
        line_end: usize,
    ) -> Option<DocumentBlock> {
        match tag {
            Tag::Heading { level, .. } => {
                let text = heading_text(&raw_content);
                let mut block = DocumentBlock::new(BlockType::Heading, raw_content, line_start, line_end);
                block.level = *level as usize;
                block.units = self.extract_units(&text, UnitContext::Heading);
                Some(block)
            }
            Tag::Paragraph => {
                let mut block = DocumentBlock::new(BlockType::Paragraph, raw_content.clone(), line_start, line_end);
                block.units = self.extract_units(&raw_content, UnitContext::Paragraph);
                Some(block)
            }
            Tag::CodeBlock(kind) => {
                let (block_type, context, language, reason) = match kind {
                    CodeBlockKind::Fenced(info) => {
                        (BlockType::Fence, UnitContext::CodeFence, info.to_string(), "code_block")
                    }
                    CodeBlockKind::Indented => {
                        (BlockType::CodeBlock, UnitContext::CodeBlock, String::new(), "indented_code")
                    }
                };
                let mut block = DocumentBlock::new(block_type, raw_content, line_start, line_end);
                block.language = language;
                let mut unit = TranslationUnit::skip(code_text, context, reason);
                unit.line_start = line_start;
                unit.line_end = line_end;
                block.units.push(unit);
                Some(block)
            }
            Tag::List(start) => {
                let mut block = DocumentBlock::new(BlockType::List, raw_content.clone(), line_start, line_end);
                block.is_ordered = start.is_some();
                for line in raw_content.split('\n') {
                    if let Some(caps) = LIST_ITEM_REGEX.captures(line) {
                        let item_text = caps.get(3).map_or("", |m| m.as_str());
                        if !item_text.trim().is_empty() {
                            block.units.extend(self.extract_units(item_text, UnitContext::ListItem));
                        }
                    }
                }
                Some(block)
            }
            Tag::BlockQuote(_) => {
                let text = BLOCKQUOTE_MARKER_REGEX.replace_all(&raw_content, "").into_owned();
                let mut block = DocumentBlock::new(BlockType::Blockquote, raw_content, line_start, line_end);
                block.units = self.extract_units(&text, UnitContext::Blockquote);
                Some(block)
            }
            Tag::Table(_) => {
                let mut block = DocumentBlock::new(BlockType::Table, raw_content.clone(), line_start, line_end);
                for line in raw_content.split('\n') {
                    if TABLE_SEPARATOR_REGEX.is_match(line) {
                        continue;
                    }
                    for caps in TABLE_CELL_REGEX.captures_iter(line) {
                        let cell_text = caps.get(1).map_or("", |m| m.as_str()).trim();
                        if !cell_text.is_empty() {
                            block.units.extend(self.extract_units(cell_text, UnitContext::TableCell));
                        }
                    }
                }
                Some(block)
            }
            Tag::HtmlBlock => {
                let mut block = DocumentBlock::new(BlockType::Html, raw_content.clone(), line_start, line_end);
                block.units.push(TranslationUnit::skip(raw_content, UnitContext::Html, "html_block"));
                Some(block)
            }
            _ => None,
        }
    }

    /// Extract translation units from a text fragment. Most fragments become
    /// a single Translate unit carrying the whole text; inline code and URLs
    /// inside it are left for the engine to preserve. A fragment that is
    /// nothing but inline code or URLs becomes a single Skip unit.
    fn extract_units(&self, text: &str, context: UnitContext) -> Vec<TranslationUnit> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        if Self::should_skip_entirely(text) {
            return vec![TranslationUnit::skip(text, context, "all_code_or_preserved")];
        }

        vec![TranslationUnit::translate(text, context)]
    }

    /// Whether a fragment consists only of inline code spans or only of URLs
    fn should_skip_entirely(text: &str) -> bool {
        if INLINE_CODE_REGEX.replace_all(text, "").trim().is_empty() {
            return true;
        }
        URL_REGEX.replace_all(text, "").trim().is_empty()
    }

    /// Whether a fragment is a bare requirement ID (FR-01, ABC-123, ...)
    pub fn is_requirement_id(text: &str) -> bool {
        let trimmed = text.trim();
        REQUIREMENT_ID_REGEXES.iter().any(|re| re.is_match(trimmed))
    }

    /// The first configured preserve term contained in the text, if any
    pub fn contains_preserve_term(&self, text: &str) -> Option<&str> {
        let lowered = text.to_lowercase();
        self.preserve_terms
            .iter()
            .find(|term| lowered.contains(&term.to_lowercase()))
            .map(String::as_str)
    }
}

/// Byte offset of every line start
fn line_start_offsets(content: &str) -> Vec<usize> {
    let mut starts = vec![0usize];
    for (i, b) in content.bytes().enumerate() {
        if b == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}

/// Map a byte range to a zero-based, end-exclusive line span
fn line_span(line_starts: &[usize], start: usize, end: usize) -> (usize, usize) {
    let line_of = |offset: usize| line_starts.partition_point(|&s| s <= offset) - 1;
    let line_start = line_of(start);
    let line_end = if end > start { line_of(end - 1) + 1 } else { line_start + 1 };
    (line_start, line_end)
}

/// Inline text of a heading's first raw line. Setext headings fall back to
/// the raw line itself, which converts them to ATX on reconstruction.
fn heading_text(raw: &str) -> String {
    let first_line = raw.split('\n').next().unwrap_or("");
    match HEADING_REGEX.captures(first_line) {
        Some(caps) => caps.get(2).map_or("", |m| m.as_str()).to_string(),
        None => first_line.trim().to_string(),
    }
}
