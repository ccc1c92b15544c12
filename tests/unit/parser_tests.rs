/*!
 * Tests for Markdown parsing and translation unit extraction
 */

use mdtranslate::parser::{BlockType, MarkdownParser, TranslationAction, UnitContext};
use mdtranslate::errors::ParseError;

use crate::common;

#[tokio::test]
async fn test_parseContent_withHeadingAndParagraph_shouldProduceBlocks() {
    let parser = MarkdownParser::default();
    let doc = parser.parse_content("# Tiêu đề\n\nĐây là nội dung.\n", "test.md");

    assert_eq!(doc.total_blocks, 2);
    assert_eq!(doc.blocks[0].block_type, BlockType::Heading);
    assert_eq!(doc.blocks[0].level, 1);
    assert_eq!(doc.blocks[0].units[0].content, "Tiêu đề");
    assert_eq!(doc.blocks[1].block_type, BlockType::Paragraph);
    assert_eq!(doc.blocks[1].units[0].content, "Đây là nội dung.");
    assert_eq!(doc.blocks[1].units[0].action, TranslationAction::Translate);
}

#[tokio::test]
async fn test_parseContent_withLevel1Heading_shouldSetTitle() {
    let parser = MarkdownParser::default();
    let doc = parser.parse_content("## Phụ\n\n# Chính\n", "test.md");

    assert_eq!(doc.title, Some("Chính".to_string()));
}

#[tokio::test]
async fn test_parseContent_withFencedCode_shouldSkipBlock() {
    let parser = MarkdownParser::default();
    let doc = parser.parse_content("```rust\nfn main() {}\n```\n", "test.md");

    assert_eq!(doc.total_blocks, 1);
    let block = &doc.blocks[0];
    assert_eq!(block.block_type, BlockType::Fence);
    assert_eq!(block.language, "rust");
    assert!(!block.needs_translation());
    assert_eq!(block.units[0].action, TranslationAction::Skip);
    assert_eq!(block.units[0].context, UnitContext::CodeFence);
}

#[tokio::test]
async fn test_parseContent_withInlineCodeOnlyParagraph_shouldSkipUnit() {
    let parser = MarkdownParser::default();
    let doc = parser.parse_content("`cargo build`\n", "test.md");

    let unit = &doc.blocks[0].units[0];
    assert_eq!(unit.action, TranslationAction::Skip);
    assert_eq!(unit.preserve_reason.as_deref(), Some("all_code_or_preserved"));
}

#[tokio::test]
async fn test_parseContent_withUrlInProse_shouldTranslateWholeFragment() {
    let parser = MarkdownParser::default();
    let doc = parser.parse_content("Xem https://example.com để biết thêm.\n", "test.md");

    let units = &doc.blocks[0].units;
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].action, TranslationAction::Translate);
    assert!(units[0].content.contains("https://example.com"));
}

#[tokio::test]
async fn test_parseContent_withBareUrl_shouldSkip() {
    let parser = MarkdownParser::default();
    let doc = parser.parse_content("https://example.com/docs\n", "test.md");

    assert_eq!(doc.blocks[0].units[0].action, TranslationAction::Skip);
}

#[tokio::test]
async fn test_parseContent_withList_shouldExtractItemsInOrder() {
    let parser = MarkdownParser::default();
    let content = "- Mục một\n- Mục hai\n- Mục ba\n";
    let doc = parser.parse_content(content, "test.md");

    assert_eq!(doc.total_blocks, 1);
    let block = &doc.blocks[0];
    assert_eq!(block.block_type, BlockType::List);
    assert!(!block.is_ordered);
    let texts: Vec<&str> = block.units.iter().map(|u| u.content.as_str()).collect();
    assert_eq!(texts, vec!["Mục một", "Mục hai", "Mục ba"]);
    assert!(block.units.iter().all(|u| u.context == UnitContext::ListItem));
}

#[tokio::test]
async fn test_parseContent_withOrderedList_shouldSetOrderedFlag() {
    let parser = MarkdownParser::default();
    let doc = parser.parse_content("1. Đầu tiên\n2. Thứ hai\n", "test.md");

    assert!(doc.blocks[0].is_ordered);
    assert_eq!(doc.blocks[0].units.len(), 2);
}

#[tokio::test]
async fn test_parseContent_withTable_shouldExtractCellsRowMajor() {
    let parser = MarkdownParser::default();
    let content = "| Cột A | Cột B |\n| --- | --- |\n| một | hai |\n| ba | bốn |\n";
    let doc = parser.parse_content(content, "test.md");

    assert_eq!(doc.total_blocks, 1);
    let block = &doc.blocks[0];
    assert_eq!(block.block_type, BlockType::Table);
    let texts: Vec<&str> = block.units.iter().map(|u| u.content.as_str()).collect();
    assert_eq!(texts, vec!["Cột A", "Cột B", "một", "hai", "ba", "bốn"]);
    assert!(block.units.iter().all(|u| u.context == UnitContext::TableCell));
}

#[tokio::test]
async fn test_parseContent_withBlockquote_shouldStripMarkers() {
    let parser = MarkdownParser::default();
    let doc = parser.parse_content("> Lời trích dẫn\n", "test.md");

    let block = &doc.blocks[0];
    assert_eq!(block.block_type, BlockType::Blockquote);
    assert_eq!(block.units[0].content.trim(), "Lời trích dẫn");
    assert_eq!(block.units[0].context, UnitContext::Blockquote);
}

#[tokio::test]
async fn test_parseContent_withHorizontalRule_shouldCreateHrBlock() {
    let parser = MarkdownParser::default();
    let doc = parser.parse_content("trước\n\n---\n\nsau\n", "test.md");

    let hr = doc
        .blocks
        .iter()
        .find(|b| b.block_type == BlockType::Hr)
        .expect("hr block");
    assert!(!hr.needs_translation());
}

#[tokio::test]
async fn test_parseContent_withMixedDocument_shouldCountStatistics() {
    let parser = MarkdownParser::default();
    let content = "# Tiêu đề\n\nVăn bản.\n\n```\ncode\n```\n";
    let doc = parser.parse_content(content, "test.md");

    assert_eq!(doc.total_blocks, 3);
    assert_eq!(doc.translatable_blocks, 2);
    assert_eq!(doc.skipped_blocks, 1);
    assert_eq!(doc.translatable_units().len(), 2);
}

#[tokio::test]
async fn test_parseFile_withMissingFile_shouldReturnFileNotFound() {
    let parser = MarkdownParser::default();
    let result = parser.parse_file("does/not/exist.md");

    assert!(matches!(result, Err(ParseError::FileNotFound(_))));
}

#[tokio::test]
async fn test_parseFile_withExistingFile_shouldParse() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_markdown(temp_dir.path(), "doc.md").unwrap();

    let parser = MarkdownParser::default();
    let doc = parser.parse_file(&path).unwrap();

    assert!(doc.total_blocks >= 3);
    assert_eq!(doc.title, Some("Tài liệu thử nghiệm".to_string()));
}

#[tokio::test]
async fn test_isRequirementId_withKnownShapes_shouldMatch() {
    assert!(MarkdownParser::is_requirement_id("FR-01"));
    assert!(MarkdownParser::is_requirement_id("NFR-P01"));
    assert!(MarkdownParser::is_requirement_id("ABC-123"));
    assert!(!MarkdownParser::is_requirement_id("không phải ID"));
    assert!(!MarkdownParser::is_requirement_id("FR-01 và thêm chữ"));
}

#[tokio::test]
async fn test_containsPreserveTerm_withCaseDifference_shouldMatch() {
    let parser = MarkdownParser::new(vec!["PostgreSQL".to_string()]);

    assert_eq!(
        parser.contains_preserve_term("chạy trên postgresql"),
        Some("PostgreSQL")
    );
    assert_eq!(parser.contains_preserve_term("không có gì"), None);
}
