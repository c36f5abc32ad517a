/*!
 * Orchestrates the per-cue correction pass.
 *
 * The context window is assembled from the text cues had BEFORE this pass
 * started, so cache keys do not depend on correction order and a cue's
 * correction never feeds into a neighbour's context.
 */

use log::debug;

use crate::correction::cache::{CacheKey, CacheStats, CorrectionCache};
use crate::correction::language::Language;
use crate::correctors::{ChineseCorrector, Corrector, EnglishCorrector};
use crate::report::{CueOperation, FixReport};
use crate::subtitle_processor::SubtitleCue;

/// Cues on each side of the current cue contributing to its context
pub const DEFAULT_CONTEXT_WINDOW: usize = 3;

/// Context-aware corrector dispatch with memoization
pub struct CorrectionPipeline {
    chinese: ChineseCorrector,
    english: EnglishCorrector,
    cache: CorrectionCache,
    context_window: usize,
}

impl CorrectionPipeline {
    pub fn new(
        chinese: ChineseCorrector,
        english: EnglishCorrector,
        cache: CorrectionCache,
        context_window: usize,
    ) -> Self {
        CorrectionPipeline {
            chinese,
            english,
            cache,
            context_window,
        }
    }

    /// Correct every cue in place, recording text changes in the report
    pub async fn correct_all(&self, cues: &mut [SubtitleCue], report: &mut FixReport) {
        // Pre-correction snapshot; context always reads from here
        let snapshot: Vec<String> = cues.iter().map(|c| c.text()).collect();

        for (position, cue) in cues.iter_mut().enumerate() {
            let language = Language::detect(&snapshot[position]);
            if language == Language::Passthrough {
                debug!("Cue {} skipped: too short to correct safely", cue.index);
                continue;
            }

            let context = self.assemble_context(&snapshot, position);
            let corrected = self
                .correct_text(language, &snapshot[position], &context)
                .await;
            if corrected != snapshot[position] {
                cue.lines = corrected.split('\n').map(|l| l.to_string()).collect();
                report.record(cue.index, CueOperation::TextChanged);
            }
        }

        let stats = self.cache.stats();
        report.cache_hits = stats.hits as usize;
        report.cache_misses = stats.misses as usize;
    }

    /// Correct one cue's full text, consulting the cache first. The cue is
    /// corrected as a single unit so that sentence state survives line
    /// breaks inside it.
    async fn correct_text(&self, language: Language, text: &str, context: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        let key = CacheKey::new(language, text, context);
        if let Some(hit) = self.cache.get(&key) {
            return hit;
        }

        let corrector: &dyn Corrector = match language {
            Language::Chinese => &self.chinese,
            Language::English => &self.english,
            Language::Passthrough => return text.to_string(),
        };

        let corrected = match corrector.correct(text, context).await {
            Ok(correction) => correction.text,
            Err(e) => {
                debug!("Corrector {} failed, leaving text as is: {}", corrector.name(), e);
                text.to_string()
            }
        };

        self.cache.insert(key, corrected.clone());
        corrected
    }

    /// Join the pre-correction text of the surrounding cues
    fn assemble_context(&self, snapshot: &[String], position: usize) -> String {
        let lo = position.saturating_sub(self.context_window);
        let hi = (position + self.context_window + 1).min(snapshot.len());
        snapshot[lo..hi]
            .iter()
            .enumerate()
            .filter(|(i, _)| lo + i != position)
            .map(|(_, text)| text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
