/*!
 * Document reconstruction.
 *
 * Rebuilds block-level Markdown text from a block's type, its original raw
 * text, and the (possibly translated) unit texts, then joins blocks back
 * into a full document. Non-translatable blocks pass through verbatim.
 *
 * List and table rebuilds walk the raw lines and consume translated texts
 * positionally: one text per matching item line or non-empty cell. The
 * 1:1 alignment assumption matches extraction; multi-line items or cells
 * with literal pipes are not specially handled.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::{BlockType, DocumentBlock};

// @const: List item marker including trailing whitespace
static ITEM_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*)([-*+]|\d+\.)\s+").unwrap()
});

// @const: Table header-separator row
static SEPARATOR_ROW_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\|?\s*[-:]+").unwrap()
});

/// Rebuild a block's Markdown text with the given unit texts substituted in.
/// Blocks that carry no translatable text return their raw content.
pub fn rebuild(block: &DocumentBlock, texts: &[String]) -> String {
    match block.block_type {
        BlockType::Heading => {
            let text = texts.first().map(String::as_str).unwrap_or("");
            format!("{} {}\n", "#".repeat(block.level), text)
        }
        BlockType::Paragraph => format!("{}\n", texts.join("\n")),
        BlockType::Fence | BlockType::CodeBlock => block.raw_content.clone(),
        BlockType::List => rebuild_list(&block.raw_content, texts),
        BlockType::Table => rebuild_table(&block.raw_content, texts),
        BlockType::Blockquote => {
            let text = texts.first().map(String::as_str).unwrap_or("");
            let quoted: Vec<String> = text.lines().map(|line| format!("> {}", line)).collect();
            format!("{}\n", quoted.join("\n"))
        }
        BlockType::Hr => "---\n\n".to_string(),
        BlockType::Html => block.raw_content.clone(),
    }
}

/// Re-emit list lines, substituting each item's text after its original
/// marker and indentation. Non-item lines pass through unchanged.
fn rebuild_list(raw_content: &str, texts: &[String]) -> String {
    let mut result_lines = Vec::new();
    let mut text_idx = 0;

    for line in raw_content.split('\n') {
        match ITEM_PREFIX_REGEX.find(line) {
            Some(prefix) if text_idx < texts.len() => {
                result_lines.push(format!("{}{}", prefix.as_str(), texts[text_idx]));
                text_idx += 1;
            }
            _ => result_lines.push(line.to_string()),
        }
    }

    result_lines.join("\n")
}

/// Re-emit table lines. Separator rows pass through; data row cells consume
/// translated texts in order, padded with the original cell's leading
/// whitespace and at least one trailing space.
fn rebuild_table(raw_content: &str, texts: &[String]) -> String {
    let mut result_lines = Vec::new();
    let mut text_idx = 0;

    for line in raw_content.split('\n') {
        if SEPARATOR_ROW_REGEX.is_match(line) {
            result_lines.push(line.to_string());
            continue;
        }

        let cells: Vec<&str> = line.split('|').collect();
        let mut new_cells = Vec::with_capacity(cells.len());

        for cell in cells {
            if !cell.trim().is_empty() && text_idx < texts.len() {
                let leading = cell.len() - cell.trim_start().len();
                let trailing = cell.len() - cell.trim_end().len();
                new_cells.push(format!(
                    "{}{}{}",
                    " ".repeat(leading),
                    texts[text_idx],
                    " ".repeat(trailing.max(1))
                ));
                text_idx += 1;
            } else {
                new_cells.push(cell.to_string());
            }
        }

        result_lines.push(new_cells.join("|"));
    }

    result_lines.join("\n")
}

/// Join reconstructed block texts into a full document: strip trailing
/// newlines per block, drop empty blocks, separate with one blank line,
/// end with a single trailing newline.
pub fn join_document(parts: &[String]) -> String {
    let surviving: Vec<&str> = parts
        .iter()
        .map(|part| part.trim_end_matches('\n'))
        .filter(|part| !part.is_empty())
        .collect();

    format!("{}\n", surviving.join("\n\n"))
}
