/*!
 * Merge heuristic for short sentence-fragment cues.
 *
 * Runs exactly once, after timeline repair, in left-to-right order.
 * A freshly merged cue is never re-evaluated against its new neighbour,
 * so the pass is O(n) and merges never cascade.
 */

use log::debug;

use crate::correction::language::is_cjk;
use crate::report::{CueOperation, FixReport};
use crate::subtitle_processor::SubtitleCue;

/// Cues at or above this duration are never merge candidates
pub const MERGE_MAX_DURATION_MS: u64 = 1000;

/// Default terminal punctuation across Latin and CJK scripts
pub const DEFAULT_TERMINAL_PUNCTUATION: [char; 6] = ['.', '!', '?', '。', '！', '？'];

/// Decides which adjacent cues are collapsed into one
#[derive(Debug, Clone)]
pub struct MergePolicy {
    /// Characters that end a sentence for the cue's script; configurable data,
    /// not a fixed law
    terminal_punctuation: Vec<char>,
    max_duration_ms: u64,
}

impl MergePolicy {
    /// Create a policy with the given terminal punctuation set
    pub fn new(terminal_punctuation: Vec<char>) -> Self {
        MergePolicy {
            terminal_punctuation,
            max_duration_ms: MERGE_MAX_DURATION_MS,
        }
    }

    /// Merge eligible adjacent cues, consuming the repaired sequence.
    ///
    /// Adjacent cues merge when both durations are under the threshold and
    /// the first cue's text does not end in terminal punctuation. The merged
    /// cue spans the union interval and keeps the first cue's index and
    /// identifier.
    pub fn merge(&self, cues: Vec<SubtitleCue>, report: &mut FixReport) -> Vec<SubtitleCue> {
        let mut out: Vec<SubtitleCue> = Vec::with_capacity(cues.len());
        let mut last_was_merged = false;

        for cue in cues {
            let absorb = match out.last() {
                Some(prev) if !last_was_merged => {
                    prev.duration_ms() < self.max_duration_ms
                        && cue.duration_ms() < self.max_duration_ms
                        && !self.ends_in_terminal_punctuation(&prev.text())
                }
                _ => false,
            };

            if absorb {
                if let Some(prev) = out.last_mut() {
                    debug!("Merging cue {} into cue {}", cue.index, prev.index);
                    report.record(
                        cue.index,
                        CueOperation::MergedWith { into: prev.index },
                    );
                    Self::join_into(prev, cue);
                    last_was_merged = true;
                    continue;
                }
            }
            out.push(cue);
            last_was_merged = false;
        }

        out
    }

    /// Whether the text's last visible character terminates a sentence
    fn ends_in_terminal_punctuation(&self, text: &str) -> bool {
        match text.trim_end().chars().last() {
            Some(c) => self.terminal_punctuation.contains(&c),
            None => false,
        }
    }

    /// Absorb `next` into `prev`: union interval, joined text.
    ///
    /// CJK text is concatenated directly; Latin text gets a joining space.
    fn join_into(prev: &mut SubtitleCue, next: SubtitleCue) {
        prev.end_ms = prev.end_ms.max(next.end_ms);

        let mut next_lines = next.lines.into_iter();
        let first_next = loop {
            match next_lines.next() {
                Some(line) if line.is_empty() => continue,
                other => break other,
            }
        };

        let first_next = match first_next {
            Some(line) => line,
            None => return,
        };

        match prev.lines.pop() {
            Some(last_prev) if !last_prev.is_empty() => {
                let boundary_is_cjk = last_prev.chars().last().is_some_and(is_cjk)
                    || first_next.chars().next().is_some_and(is_cjk);
                let joined = if boundary_is_cjk {
                    format!("{}{}", last_prev.trim_end(), first_next.trim_start())
                } else {
                    format!("{} {}", last_prev.trim_end(), first_next.trim_start())
                };
                prev.lines.push(joined);
            }
            _ => prev.lines.push(first_next),
        }

        prev.lines.extend(next_lines);
    }
}

impl Default for MergePolicy {
    fn default() -> Self {
        MergePolicy::new(DEFAULT_TERMINAL_PUNCTUATION.to_vec())
    }
}
