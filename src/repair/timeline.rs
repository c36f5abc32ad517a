/*!
 * Timeline repair engine.
 *
 * Restores the timing invariants of a cue sequence in bounded work:
 * one left-to-right repair pass with single-neighbour lookback, then one
 * residual overlap scan. Two passes total; re-running on already-repaired
 * input is a no-op. Cues are never discarded: when the invariants cannot
 * be satisfied the cue keeps its largest feasible duration and is flagged
 * infeasible in the report.
 */

use log::debug;

use crate::report::{CueOperation, FixReport};
use crate::subtitle_processor::SubtitleCue;

/// Default minimum cue duration in milliseconds
pub const DEFAULT_MIN_DURATION_MS: u64 = 500;

/// Upper bound on a repaired duration in milliseconds. A collapsed cue in
/// front of a long silence gets a readable duration, not the whole gap.
pub const MAX_REPAIR_DURATION_MS: u64 = 5_000;

/// Repairs ordering, minimum-duration and overlap violations
#[derive(Debug, Clone)]
pub struct TimelineRepairer {
    min_duration_ms: u64,
}

impl TimelineRepairer {
    /// Create a repairer with the given minimum duration
    pub fn new(min_duration_ms: u64) -> Self {
        TimelineRepairer { min_duration_ms }
    }

    /// Repair the sequence in place, recording every adjustment in the report.
    ///
    /// After this call the cues are sorted by start time and non-overlapping;
    /// every cue either has duration >= `min_duration_ms`, has a positive
    /// duration below it (left for the merge pass), or is flagged infeasible.
    pub fn repair(&self, cues: &mut [SubtitleCue], report: &mut FixReport) {
        if cues.is_empty() {
            return;
        }

        // Canonical order: stable sort keeps original order on equal starts.
        cues.sort_by_key(|c| c.start_ms);

        self.repair_durations(cues, report);
        self.clamp_residual_overlap(cues, report);
    }

    /// Pass 1: fix zero/negative durations and obvious overlaps, looking at
    /// most one neighbour ahead.
    fn repair_durations(&self, cues: &mut [SubtitleCue], report: &mut FixReport) {
        for i in 0..cues.len() {
            if cues[i].end_ms <= cues[i].start_ms {
                self.repair_collapsed_cue(cues, i, report);
            }

            // Overlap with the next cue: clamp our end to its start. A clamp
            // that would drop below the minimum duration is applied anyway;
            // such cues stay candidates for the merge pass.
            if i + 1 < cues.len() && cues[i].end_ms > cues[i + 1].start_ms {
                let next_start = cues[i + 1].start_ms;
                if next_start > cues[i].start_ms {
                    debug!(
                        "Cue {}: clamping end {} -> {} to resolve overlap",
                        cues[i].index, cues[i].end_ms, next_start
                    );
                    cues[i].end_ms = next_start;
                    report.record(cues[i].index, CueOperation::OverlapClamped);
                } else {
                    // Next cue starts at or before ours; nothing to clamp to.
                    // The residual scan will shift the next cue forward.
                    report.record(cues[i].index, CueOperation::Infeasible);
                }
            }
        }
    }

    /// Repair one cue with `end <= start`.
    ///
    /// Tries, in order: an even split of the slack before the next cue's
    /// start; the minimum duration with a forward shift of the next cue's
    /// start (never past its own end nor the cue after it); and finally the
    /// largest feasible duration, flagged infeasible.
    fn repair_collapsed_cue(&self, cues: &mut [SubtitleCue], i: usize, report: &mut FixReport) {
        let min = self.min_duration_ms;
        let start = cues[i].start_ms;
        let next_start = cues.get(i + 1).map(|c| c.start_ms);
        let gap_end = next_start.unwrap_or(start + min);
        let slack = gap_end.saturating_sub(start);

        if slack >= min {
            // Even split of the open interval: take half the slack, capped
            // at the repair ceiling, at least the minimum duration, and
            // never past the next start.
            let duration = (slack / 2).min(MAX_REPAIR_DURATION_MS).max(min).min(slack);
            cues[i].end_ms = start + duration;
            report.record(cues[i].index, CueOperation::DurationRepaired);
            return;
        }

        // Not enough room before the next cue: extend to the minimum and try
        // to push the next start forward by the collision delta.
        let end = start + min;

        let next_start = match next_start {
            Some(ns) if end > ns => ns,
            _ => {
                cues[i].end_ms = end;
                report.record(cues[i].index, CueOperation::DurationRepaired);
                return;
            }
        };

        let shift_limit = cues
            .get(i + 2)
            .map(|c| c.start_ms)
            .unwrap_or(u64::MAX)
            .min(cues[i + 1].end_ms);

        if end <= shift_limit {
            debug!(
                "Cue {}: shifting next start {} -> {} after duration repair",
                cues[i + 1].index,
                next_start,
                end
            );
            cues[i].end_ms = end;
            report.record(cues[i].index, CueOperation::DurationRepaired);
            cues[i + 1].start_ms = end;
            report.record(cues[i + 1].index, CueOperation::OverlapClamped);
        } else {
            // No room to shift the neighbour: keep the largest feasible
            // duration and flag the cue rather than discard it. The feasible
            // duration can be zero; re-running then flags it again instead
            // of oscillating.
            let feasible_end = next_start.max(start);
            if feasible_end > start {
                cues[i].end_ms = feasible_end;
                report.record(cues[i].index, CueOperation::DurationRepaired);
            }
            report.record(cues[i].index, CueOperation::Infeasible);
        }
    }

    /// Pass 2: residual overlap scan. Starts only ever move forward, and a
    /// later cue's start never lands before its predecessor's end.
    fn clamp_residual_overlap(&self, cues: &mut [SubtitleCue], report: &mut FixReport) {
        for j in 1..cues.len() {
            let prev_end = cues[j - 1].end_ms;
            if cues[j].start_ms >= prev_end {
                continue;
            }

            if prev_end < cues[j].end_ms {
                // Ample room before our own end: shift our start forward.
                cues[j].start_ms = prev_end;
                report.record(cues[j].index, CueOperation::OverlapClamped);
            } else {
                // Shifting would invert us; pull the predecessor's end back
                // instead, never past our (original) start.
                cues[j - 1].end_ms = cues[j].start_ms;
                report.record(cues[j - 1].index, CueOperation::OverlapClamped);
                if cues[j - 1].duration_ms() < self.min_duration_ms {
                    report.record(cues[j - 1].index, CueOperation::Infeasible);
                }
            }
        }
    }

    /// Flag every surviving cue still below the minimum duration.
    ///
    /// Runs after the merge pass so cues absorbed by a merge are never
    /// flagged; what remains genuinely could not be repaired.
    pub fn flag_infeasible(&self, cues: &[SubtitleCue], report: &mut FixReport) {
        for cue in cues {
            if cue.duration_ms() < self.min_duration_ms {
                report.record(cue.index, CueOperation::Infeasible);
            }
        }
    }
}

impl Default for TimelineRepairer {
    fn default() -> Self {
        TimelineRepairer::new(DEFAULT_MIN_DURATION_MS)
    }
}
