/*!
 * Context-aware text correction pipeline.
 *
 * Routes each cue to a language-specific corrector, assembling a context
 * window from the pre-correction text of surrounding cues and memoizing
 * results in per-language bounded caches.
 */

pub mod cache;
pub mod language;
pub mod pipeline;

pub use cache::CorrectionCache;
pub use language::Language;
pub use pipeline::CorrectionPipeline;
