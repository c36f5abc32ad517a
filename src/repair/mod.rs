/*!
 * Timeline repair and merge heuristics.
 *
 * This module restores the timing invariants of a cue sequence:
 * - `timeline`: ordering, minimum-duration and non-overlap repair
 * - `merge`: conservative merging of short sentence-fragment cues
 */

pub mod timeline;
pub mod merge;

pub use timeline::TimelineRepairer;
pub use merge::MergePolicy;
