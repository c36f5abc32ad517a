/*!
 * # subfix - Subtitle timeline repair and text correction
 *
 * A Rust library for repairing broken subtitle timelines and conservatively
 * correcting subtitle text.
 *
 * ## Features
 *
 * - Parse and serialize SubRip (SRT) and WebVTT subtitle files
 * - Repair zero-length, inverted and overlapping cue timings
 * - Merge short sentence-fragment cues split across two timestamps
 * - Context-aware text correction for Chinese and English cues
 * - Optional grammar pass through a local LanguageTool server
 * - Dry-run mode with a per-cue operation report
 * - Batch processing of whole subtitle folders
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: Subtitle file parsing and serialization
 * - `repair`: Timeline repair and cue merging:
 *   - `repair::timeline`: Duration and overlap repair
 *   - `repair::merge`: Sentence-fragment merge heuristic
 * - `correction`: Text correction pipeline:
 *   - `correction::language`: Per-cue language detection
 *   - `correction::cache`: Bounded per-language memoization
 *   - `correction::pipeline`: Corrector dispatch with context windows
 * - `correctors`: Language-specific correctors:
 *   - `correctors::chinese`: Punctuation, spacing and variant fixes
 *   - `correctors::english`: Spelling, punctuation and grammar fixes
 *   - `correctors::language_tool`: LanguageTool HTTP client
 * - `report`: Per-run operation reporting
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod correction;
pub mod correctors;
pub mod errors;
pub mod file_utils;
pub mod repair;
pub mod report;
pub mod subtitle_processor;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, OutputTarget};
pub use report::{CueOperation, FixReport};
pub use subtitle_processor::{CueCollection, SubtitleCue, SubtitleFormat};
