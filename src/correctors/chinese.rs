/*!
 * Conservative corrector for Chinese subtitle text.
 *
 * Normalizes punctuation width and spacing, applies a small table of known
 * typo substitutions, and folds stray traditional variants into simplified
 * script when the line is predominantly simplified. Anything beyond these
 * mechanical fixes is left alone.
 */

use std::collections::HashMap;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::correction::language::is_cjk;
use crate::correctors::{Correction, Corrector};
use crate::errors::CorrectorError;

/// Whitespace preceding CJK punctuation
static SPACE_BEFORE_CJK_PUNCT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+([，。！？；：、])").unwrap_or_else(|e| panic!("Invalid regex: {}", e))
});

/// Halfwidth comma or period sandwiched between CJK characters
static HALFWIDTH_BETWEEN_CJK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([\x{4E00}-\x{9FFF}])\s*([,.])\s*([\x{4E00}-\x{9FFF}])")
        .unwrap_or_else(|e| panic!("Invalid regex: {}", e))
});

/// Missing space between a CJK character and a Latin word
static CJK_THEN_LATIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([\x{4E00}-\x{9FFF}])([A-Za-z0-9])")
        .unwrap_or_else(|e| panic!("Invalid regex: {}", e))
});

static LATIN_THEN_CJK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z0-9])([\x{4E00}-\x{9FFF}])")
        .unwrap_or_else(|e| panic!("Invalid regex: {}", e))
});

/// Traditional variants folded to simplified when the line is simplified.
///
/// Deliberately tiny: only unambiguous one-to-one pairs that show up as
/// encoding or source-mix artifacts in otherwise simplified subtitles.
const VARIANT_PAIRS: [(char, char); 8] = [
    ('裏', '里'),
    ('臺', '台'),
    ('爲', '为'),
    ('麼', '么'),
    ('祕', '秘'),
    ('來', '来'),
    ('們', '们'),
    ('說', '说'),
];

/// Corrector for predominantly Chinese cues
pub struct ChineseCorrector {
    typo_map: HashMap<String, String>,
}

impl ChineseCorrector {
    pub fn new(typo_map: HashMap<String, String>) -> Self {
        ChineseCorrector { typo_map }
    }

    fn normalize_punctuation(text: &str) -> String {
        let text = SPACE_BEFORE_CJK_PUNCT.replace_all(text, "$1");
        let text = HALFWIDTH_BETWEEN_CJK.replace_all(&text, |caps: &regex::Captures| {
            let punct = match &caps[2] {
                "," => "，",
                _ => "。",
            };
            format!("{}{}{}", &caps[1], punct, &caps[3])
        });
        text.into_owned()
    }

    fn normalize_spacing(text: &str) -> String {
        let text = CJK_THEN_LATIN.replace_all(text, "$1 $2");
        LATIN_THEN_CJK.replace_all(&text, "$1 $2").into_owned()
    }

    /// Fold stray traditional variants when the line is mostly simplified
    fn normalize_variants(text: &str) -> String {
        let traditional_hits = text
            .chars()
            .filter(|c| VARIANT_PAIRS.iter().any(|(t, _)| t == c))
            .count();
        if traditional_hits == 0 {
            return text.to_string();
        }

        let cjk_total = text.chars().filter(|c| is_cjk(*c)).count();
        // A mostly-traditional line is left as written
        if cjk_total > 0 && traditional_hits * 2 > cjk_total {
            return text.to_string();
        }

        text.chars()
            .map(|c| {
                VARIANT_PAIRS
                    .iter()
                    .find(|(t, _)| *t == c)
                    .map(|(_, s)| *s)
                    .unwrap_or(c)
            })
            .collect()
    }

    fn apply_typo_map(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (wrong, right) in &self.typo_map {
            if out.contains(wrong.as_str()) {
                out = out.replace(wrong.as_str(), right);
            }
        }
        out
    }
}

#[async_trait]
impl Corrector for ChineseCorrector {
    fn name(&self) -> &'static str {
        "chinese"
    }

    async fn correct(&self, text: &str, _context: &str) -> Result<Correction, CorrectorError> {
        // Each line is normalized on its own so the whitespace rules can
        // never eat a line break, and the variant heuristic judges the
        // line it applies to.
        let corrected: Vec<String> = text
            .split('\n')
            .map(|line| {
                let line = Self::normalize_punctuation(line);
                let line = Self::normalize_spacing(&line);
                let line = Self::normalize_variants(&line);
                self.apply_typo_map(&line)
            })
            .collect();
        Ok(Correction::from_pair(text, corrected.join("\n")))
    }
}
