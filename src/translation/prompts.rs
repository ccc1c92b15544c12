/*!
 * System prompt construction for translation requests.
 *
 * The prompt wording steers the engine toward structure preservation: it
 * names the preserve terms, forbids touching inline code, URLs, and
 * requirement IDs, and carries the structural context of the fragment.
 */

use crate::app_config::TranslationStyle;
use crate::language_utils;
use crate::parser::UnitContext;

/// Word-for-word template for technical accuracy
const LITERAL_TEMPLATE: &str = "You are a professional technical documentation translator.
Translation style: LITERAL (word-for-word technical accuracy)

RULES:
1. Translate from {source_lang} to {target_lang}
2. Preserve EXACT technical meaning - no paraphrasing
3. NEVER translate these terms (keep them exactly as-is): {preserve_terms}
4. NEVER translate:
   - Requirement IDs (FR-01, NFR-P01, BR-001, US-001, etc.)
   - Technical terms in backticks (`variable`, `function_name`)
   - Code snippets and commands
   - URLs and file paths
   - Image paths and links
5. Use formal, technical tone
6. Maintain sentence structure as close to original as possible
7. Keep all Markdown formatting intact (**, *, #, etc.)
8. Context: This is a {context} in technical documentation

CRITICAL: Only output the translated text. Do not add explanations or notes.";

/// Idiomatic, reader-friendly template
const NATURAL_TEMPLATE: &str = "You are a professional technical documentation translator.
Translation style: NATURAL (idiomatic, reader-friendly)

RULES:
1. Translate from {source_lang} to {target_lang}
2. Make translation sound natural to native {target_lang} speakers
3. NEVER translate these terms (keep them exactly as-is): {preserve_terms}
4. NEVER translate:
   - Requirement IDs (FR-01, NFR-P01, BR-001, US-001, etc.)
   - Technical terms in backticks (`variable`, `function_name`)
   - Code snippets and commands
   - URLs and file paths
   - Image paths and links
5. Use conversational but professional tone
6. Prioritize readability and flow over literal accuracy
7. Keep all Markdown formatting intact (**, *, #, etc.)
8. Context: This is a {context} in user-facing documentation

CRITICAL: Only output the translated text. Do not add explanations or notes.";

/// Maximum number of preserve terms spelled out in the prompt
const MAX_LISTED_TERMS: usize = 20;

/// Builds system prompts for translation requests
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the system prompt for one translation unit
    pub fn build_system_prompt(
        source_lang: &str,
        target_lang: &str,
        preserve_terms: &[String],
        style: TranslationStyle,
        context: UnitContext,
    ) -> String {
        let template = match style {
            TranslationStyle::Literal => LITERAL_TEMPLATE,
            TranslationStyle::Natural => NATURAL_TEMPLATE,
        };

        template
            .replace("{source_lang}", &language_utils::language_name(source_lang))
            .replace("{target_lang}", &language_utils::language_name(target_lang))
            .replace("{preserve_terms}", &Self::format_preserve_terms(preserve_terms))
            .replace("{context}", context.as_str())
    }

    /// Render the preserve-term list for prompt inclusion
    fn format_preserve_terms(terms: &[String]) -> String {
        if terms.is_empty() {
            return "(none specified)".to_string();
        }

        let listed: Vec<String> = terms
            .iter()
            .take(MAX_LISTED_TERMS)
            .map(|t| format!("\"{}\"", t))
            .collect();

        let mut result = listed.join(", ");
        if terms.len() > MAX_LISTED_TERMS {
            result.push_str(&format!(", ... ({} more)", terms.len() - MAX_LISTED_TERMS));
        }
        result
    }
}
