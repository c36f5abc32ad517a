/*!
 * Change report for a single fix run.
 *
 * Every repair, merge and correction decision is recorded per cue so a
 * dry run can show exactly what an apply run would do; apply mode emits
 * the identical report alongside the written output.
 */

use std::collections::BTreeMap;
use std::fmt;
use serde::Serialize;

use crate::subtitle_processor::SubtitleFormat;

/// One operation applied to a cue during the fix pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CueOperation {
    /// The cue's output index differs from its original number
    Renumbered,
    /// Zero or negative duration was repaired
    DurationRepaired,
    /// Start or end was moved to resolve an overlap
    OverlapClamped,
    /// The cue was absorbed into the cue with the given original index
    MergedWith { into: usize },
    /// The cue's text was changed by the correction pipeline
    TextChanged,
    /// Timing invariants could not be fully satisfied; best effort kept
    Infeasible,
}

/// Accumulated report for one file
#[derive(Debug, Clone, Default, Serialize)]
pub struct FixReport {
    /// Detected input format
    pub input_format: String,
    /// Chosen output format
    pub output_format: String,
    /// Cue count after parsing
    pub original_count: usize,
    /// Cue count after repair and merge
    pub final_count: usize,
    /// Number of timing adjustments (duration repairs and overlap clamps)
    pub adjusted: usize,
    /// Number of merged-away cues
    pub merged: usize,
    /// Number of cues whose text changed
    pub text_changes: usize,
    /// Number of cues flagged infeasible
    pub infeasible: usize,
    /// Correction cache hits for this file
    pub cache_hits: usize,
    /// Correction cache misses for this file
    pub cache_misses: usize,
    /// Whether this was a preview run with no output written
    pub dry_run: bool,
    /// Per-cue operations, keyed by the cue's original index
    operations: BTreeMap<usize, Vec<CueOperation>>,
}

impl FixReport {
    /// Create a report for a run over `original_count` parsed cues
    pub fn new(
        input_format: SubtitleFormat,
        output_format: SubtitleFormat,
        original_count: usize,
        dry_run: bool,
    ) -> Self {
        FixReport {
            input_format: input_format.to_string(),
            output_format: output_format.to_string(),
            original_count,
            final_count: original_count,
            dry_run,
            ..Default::default()
        }
    }

    /// Record an operation for a cue. Each operation is stored once per cue;
    /// counters are only bumped on first insertion.
    pub fn record(&mut self, cue_index: usize, operation: CueOperation) {
        let ops = self.operations.entry(cue_index).or_default();
        if ops.contains(&operation) {
            return;
        }

        match &operation {
            CueOperation::DurationRepaired | CueOperation::OverlapClamped => self.adjusted += 1,
            CueOperation::MergedWith { .. } => self.merged += 1,
            CueOperation::TextChanged => self.text_changes += 1,
            CueOperation::Infeasible => self.infeasible += 1,
            CueOperation::Renumbered => {}
        }

        ops.push(operation);
    }

    /// Operations recorded for a cue, by original index
    pub fn operations_for(&self, cue_index: usize) -> &[CueOperation] {
        self.operations
            .get(&cue_index)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Whether a given operation was recorded for a cue
    pub fn has_operation(&self, cue_index: usize, operation: &CueOperation) -> bool {
        self.operations_for(cue_index).contains(operation)
    }

    /// Total number of cues with at least one recorded operation
    pub fn touched_cues(&self) -> usize {
        self.operations.len()
    }

    /// Render the report as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for FixReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.dry_run {
            writeln!(f, "Preview (no file written)")?;
        }
        writeln!(
            f,
            "Cues: {} -> {} ({} -> {})",
            self.original_count, self.final_count, self.input_format, self.output_format
        )?;
        writeln!(
            f,
            "Timing adjustments: {}, merged: {}, text corrections: {}, infeasible: {}",
            self.adjusted, self.merged, self.text_changes, self.infeasible
        )?;
        write!(
            f,
            "Correction cache: {} hits / {} misses",
            self.cache_hits, self.cache_misses
        )
    }
}
