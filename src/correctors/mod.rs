/*!
 * Language-specific text correctors.
 *
 * Each corrector receives a single line of cue text plus the assembled
 * context window and returns a conservatively corrected line. Correctors
 * never rewrite wholesale; when in doubt they return the input unchanged.
 */

pub mod chinese;
pub mod english;
pub mod language_tool;

use async_trait::async_trait;

use crate::errors::CorrectorError;

pub use chinese::ChineseCorrector;
pub use english::EnglishCorrector;
pub use language_tool::LanguageToolClient;

/// Outcome of one correction call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub text: String,
    pub changed: bool,
}

impl Correction {
    /// Build from an original/corrected pair, detecting the change
    pub fn from_pair(original: &str, corrected: String) -> Self {
        let changed = corrected != original;
        Correction {
            text: corrected,
            changed,
        }
    }
}

/// One language route through the correction pipeline
#[async_trait]
pub trait Corrector: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Correct one line of text given the surrounding context window
    async fn correct(&self, text: &str, context: &str) -> Result<Correction, CorrectorError>;
}
