/*!
 * Tests for timeline repair
 */

use subfix::repair::TimelineRepairer;
use subfix::repair::timeline::MAX_REPAIR_DURATION_MS;
use subfix::report::{CueOperation, FixReport};
use subfix::subtitle_processor::SubtitleCue;

fn cue(index: usize, start_ms: u64, end_ms: u64) -> SubtitleCue {
    SubtitleCue::new(index, start_ms, end_ms, &format!("cue {}", index))
}

#[test]
fn test_repair_withOutOfOrderCues_shouldSortByStart() {
    let mut cues = vec![cue(2, 5000, 6000), cue(1, 1000, 2000)];
    let mut report = FixReport::default();

    TimelineRepairer::default().repair(&mut cues, &mut report);

    assert_eq!(cues[0].index, 1);
    assert_eq!(cues[1].index, 2);
}

#[test]
fn test_repair_withZeroDurationCue_shouldSplitSlackEvenly() {
    // Matches a real broken file: a zero-length cue sharing its start with
    // the next one gets half the following cue's span.
    let mut cues = vec![
        cue(91, 227000, 229000),
        cue(92, 229000, 229000),
        cue(93, 229000, 234000),
    ];
    let mut report = FixReport::default();

    TimelineRepairer::default().repair(&mut cues, &mut report);

    assert_eq!(cues[1].end_ms, 229500);
    assert_eq!(cues[2].start_ms, 229500);
    assert!(report.has_operation(92, &CueOperation::DurationRepaired));
    assert!(report.has_operation(93, &CueOperation::OverlapClamped));

    // No cue lost any content
    assert!(cues.iter().all(|c| c.end_ms > c.start_ms));
}

#[test]
fn test_repair_withDistantNextCue_shouldCapRepairedDuration() {
    // A minute of slack; the repaired cue gets the ceiling, not half of it
    let mut cues = vec![cue(1, 1000, 900), cue(2, 61000, 63000)];
    let mut report = FixReport::default();

    TimelineRepairer::default().repair(&mut cues, &mut report);

    assert_eq!(cues[0].end_ms, 1000 + MAX_REPAIR_DURATION_MS);
    assert!(report.has_operation(1, &CueOperation::DurationRepaired));
}

#[test]
fn test_repair_withInvertedRange_shouldRestoreDuration() {
    let mut cues = vec![cue(1, 2000, 1500), cue(2, 6000, 8000)];
    let mut report = FixReport::default();

    TimelineRepairer::default().repair(&mut cues, &mut report);

    assert!(cues[0].end_ms > cues[0].start_ms);
    assert!(cues[0].end_ms <= cues[1].start_ms);
    assert!(report.has_operation(1, &CueOperation::DurationRepaired));
}

#[test]
fn test_repair_withOverlappingCues_shouldClampToNextStart() {
    let mut cues = vec![cue(1, 1000, 4000), cue(2, 3000, 6000)];
    let mut report = FixReport::default();

    TimelineRepairer::default().repair(&mut cues, &mut report);

    assert_eq!(cues[0].end_ms, 3000);
    assert!(report.has_operation(1, &CueOperation::OverlapClamped));
}

#[test]
fn test_repair_withValidTimeline_shouldChangeNothing() {
    let mut cues = vec![cue(1, 1000, 2500), cue(2, 3000, 4500), cue(3, 5000, 8000)];
    let original = cues.clone();
    let mut report = FixReport::default();

    TimelineRepairer::default().repair(&mut cues, &mut report);

    assert_eq!(cues, original);
    assert_eq!(report.adjusted, 0);
}

#[test]
fn test_repair_runTwice_shouldBeIdempotent() {
    let mut cues = vec![
        cue(1, 1000, 1000),
        cue(2, 2000, 2100),
        cue(3, 2050, 5000),
    ];
    let mut report = FixReport::default();
    let repairer = TimelineRepairer::default();

    repairer.repair(&mut cues, &mut report);
    let after_first = cues.clone();

    let mut second_report = FixReport::default();
    repairer.repair(&mut cues, &mut second_report);

    assert_eq!(cues, after_first);
    assert_eq!(second_report.adjusted, 0);
    assert_eq!(second_report.infeasible, 0);
}

#[test]
fn test_repair_withNoRoomAtAll_shouldFlagInfeasible() {
    // Three cues crammed into the same instant cannot all reach the floor
    let mut cues = vec![cue(1, 1000, 1000), cue(2, 1000, 1000), cue(3, 1000, 1000)];
    let mut report = FixReport::default();

    TimelineRepairer::new(500).repair(&mut cues, &mut report);

    // Starts stay ordered and nothing panicked; at least one cue is flagged
    assert!(cues.windows(2).all(|w| w[0].start_ms <= w[1].start_ms));
    assert!(report.infeasible > 0);
}

#[test]
fn test_flagInfeasible_withShortSurvivor_shouldRecordIt() {
    let cues = vec![cue(1, 1000, 1200)];
    let mut report = FixReport::default();

    TimelineRepairer::new(500).flag_infeasible(&cues, &mut report);

    assert!(report.has_operation(1, &CueOperation::Infeasible));
}
