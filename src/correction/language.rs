/*!
 * Per-cue language detection.
 *
 * Detection is deliberately coarse: a cheap script-ratio heuristic decides
 * which corrector a cue goes through, nothing more.
 */

use serde::{Deserialize, Serialize};

/// Minimum share of CJK characters for a cue to be treated as Chinese
const CJK_RATIO_THRESHOLD: f64 = 0.30;

/// Cues shorter than this many visible characters skip correction entirely
const MIN_VISIBLE_CHARS: usize = 3;

/// Correction route for a single cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Chinese,
    English,
    /// Too short or too ambiguous to correct safely
    Passthrough,
}

impl Language {
    /// Classify a cue's full text
    pub fn detect(text: &str) -> Self {
        let visible: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
        if visible.len() < MIN_VISIBLE_CHARS {
            return Language::Passthrough;
        }

        let cjk_count = visible.iter().filter(|c| is_cjk(**c)).count();
        let ratio = cjk_count as f64 / visible.len() as f64;
        if ratio >= CJK_RATIO_THRESHOLD {
            Language::Chinese
        } else {
            Language::English
        }
    }
}

/// Whether a character belongs to a CJK script block.
///
/// Covers the unified ideograph blocks plus kana and hangul, which is enough
/// for routing; exhaustive Unicode coverage is not the goal here.
pub fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'   // CJK Unified Ideographs
        | '\u{3400}'..='\u{4DBF}' // Extension A
        | '\u{F900}'..='\u{FAFF}' // Compatibility Ideographs
        | '\u{3040}'..='\u{309F}' // Hiragana
        | '\u{30A0}'..='\u{30FF}' // Katakana
        | '\u{AC00}'..='\u{D7AF}' // Hangul Syllables
    )
}
