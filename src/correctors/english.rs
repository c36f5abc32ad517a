/*!
 * Conservative corrector for English subtitle text.
 *
 * Fixes a fixed table of common misspellings, normalizes punctuation
 * spacing without breaking decimals, and capitalizes sentence starts.
 * When a LanguageTool client is configured, a grammar pass runs after
 * the typo pass; its failure downgrades the cue to typo-only output.
 */

use std::sync::Once;

use async_trait::async_trait;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::correctors::language_tool::LanguageToolClient;
use crate::correctors::{Correction, Corrector};
use crate::errors::CorrectorError;

/// Common misspellings seen in fan-made subtitles
const MISSPELLINGS: [(&str, &str); 12] = [
    ("teh", "the"),
    ("adn", "and"),
    ("taht", "that"),
    ("thier", "their"),
    ("recieve", "receive"),
    ("wierd", "weird"),
    ("definately", "definitely"),
    ("seperate", "separate"),
    ("occured", "occurred"),
    ("untill", "until"),
    ("alot", "a lot"),
    ("dont", "don't"),
];

/// Punctuation immediately followed by a letter, e.g. "Hello,world".
/// Letters only on the right side, so "3.5" and "1,000" survive.
static PUNCT_THEN_LETTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([.,!?;:])([A-Za-z])").unwrap_or_else(|e| panic!("Invalid regex: {}", e))
});

/// Spaces or tabs squeezed in front of closing punctuation. Never matches
/// a newline, so punctuation fixes cannot collapse the cue's line layout.
static SPACE_BEFORE_PUNCT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[ \t]+([.,!?;:])").unwrap_or_else(|e| panic!("Invalid regex: {}", e))
});

static MULTI_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" {2,}").unwrap_or_else(|e| panic!("Invalid regex: {}", e)));

/// Emitted at most once per run when the grammar server is unreachable
static GRAMMAR_WARNING: Once = Once::new();

/// Corrector for predominantly English cues
pub struct EnglishCorrector {
    grammar: Option<LanguageToolClient>,
}

impl EnglishCorrector {
    pub fn new(grammar: Option<LanguageToolClient>) -> Self {
        EnglishCorrector { grammar }
    }

    fn fix_spelling(text: &str) -> String {
        let words: Vec<String> = text
            .split(' ')
            .map(|word| {
                let (core, trailing) = split_trailing_punctuation(word);
                match lookup_misspelling(core) {
                    Some(fixed) => format!("{}{}", match_case(core, fixed), trailing),
                    None => word.to_string(),
                }
            })
            .collect();
        words.join(" ")
    }

    fn normalize_punctuation(text: &str) -> String {
        let text = SPACE_BEFORE_PUNCT.replace_all(text, "$1");
        let text = PUNCT_THEN_LETTER.replace_all(&text, "$1 $2");
        MULTI_SPACE.replace_all(&text, " ").into_owned()
    }

    /// Uppercase the first letter of the text and of each sentence.
    /// A line break is treated like any other whitespace, so a sentence
    /// wrapped across lines keeps its continuation lowercase.
    fn capitalize_sentences(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut at_sentence_start = true;
        for c in text.chars() {
            if at_sentence_start && c.is_ascii_lowercase() {
                out.push(c.to_ascii_uppercase());
                at_sentence_start = false;
            } else {
                if matches!(c, '.' | '!' | '?') {
                    at_sentence_start = true;
                } else if !c.is_whitespace() {
                    at_sentence_start = false;
                }
                out.push(c);
            }
        }
        out
    }
}

/// Split a token into its word core and trailing punctuation
fn split_trailing_punctuation(word: &str) -> (&str, &str) {
    let core_end = word
        .rfind(|c: char| c.is_alphanumeric() || c == '\'')
        .map(|i| i + word[i..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(0);
    word.split_at(core_end)
}

fn lookup_misspelling(word: &str) -> Option<&'static str> {
    let lower = word.to_ascii_lowercase();
    MISSPELLINGS
        .iter()
        .find(|(wrong, _)| *wrong == lower)
        .map(|(_, right)| *right)
}

/// Carry the original token's capitalization onto the replacement
fn match_case(original: &str, replacement: &str) -> String {
    let mut orig_chars = original.chars();
    match orig_chars.next() {
        Some(first) if first.is_uppercase() => {
            if orig_chars.all(|c| c.is_uppercase()) && original.chars().count() > 1 {
                replacement.to_uppercase()
            } else {
                let mut out = String::with_capacity(replacement.len());
                let mut rep_chars = replacement.chars();
                if let Some(r) = rep_chars.next() {
                    out.extend(r.to_uppercase());
                }
                out.extend(rep_chars);
                out
            }
        }
        _ => replacement.to_string(),
    }
}

#[async_trait]
impl Corrector for EnglishCorrector {
    fn name(&self) -> &'static str {
        "english"
    }

    async fn correct(&self, text: &str, _context: &str) -> Result<Correction, CorrectorError> {
        // Spelling and punctuation are per-line fixes; capitalization runs
        // over the joined text so sentence state survives line breaks.
        let lines: Vec<String> = text
            .split('\n')
            .map(|line| Self::normalize_punctuation(&Self::fix_spelling(line)))
            .collect();
        let mut corrected = Self::capitalize_sentences(&lines.join("\n"));

        if let Some(client) = &self.grammar {
            match client.check(&corrected).await {
                Ok(checked) => corrected = checked,
                Err(e) => {
                    // Typo fixes still apply; only the grammar pass is lost
                    GRAMMAR_WARNING.call_once(|| {
                        warn!("Grammar checker unavailable, continuing without it: {}", e);
                    });
                    debug!("Grammar pass skipped for cue text: {}", e);
                }
            }
        }

        Ok(Correction::from_pair(text, corrected))
    }
}
