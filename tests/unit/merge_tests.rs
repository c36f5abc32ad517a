/*!
 * Tests for the sentence-fragment merge heuristic
 */

use subfix::repair::MergePolicy;
use subfix::report::{CueOperation, FixReport};
use subfix::subtitle_processor::SubtitleCue;

fn cue(index: usize, start_ms: u64, end_ms: u64, text: &str) -> SubtitleCue {
    SubtitleCue::new(index, start_ms, end_ms, text)
}

#[test]
fn test_merge_withTwoShortFragments_shouldCombineThem() {
    let cues = vec![
        cue(1, 1000, 1400, "I was going"),
        cue(2, 1400, 1700, "to tell you."),
    ];
    let mut report = FixReport::default();

    let merged = MergePolicy::default().merge(cues, &mut report);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].index, 1);
    assert_eq!(merged[0].start_ms, 1000);
    assert_eq!(merged[0].end_ms, 1700);
    assert_eq!(merged[0].text(), "I was going to tell you.");
    assert!(report.has_operation(2, &CueOperation::MergedWith { into: 1 }));
    assert_eq!(report.merged, 1);
}

#[test]
fn test_merge_withLongFirstCue_shouldNotCombine() {
    let cues = vec![
        cue(1, 1000, 2500, "A full sentence here"),
        cue(2, 2500, 2800, "and a fragment"),
    ];
    let mut report = FixReport::default();

    let merged = MergePolicy::default().merge(cues, &mut report);

    assert_eq!(merged.len(), 2);
    assert_eq!(report.merged, 0);
}

#[test]
fn test_merge_withTerminalPunctuation_shouldNotCombine() {
    let cues = vec![
        cue(1, 1000, 1400, "Done."),
        cue(2, 1400, 1700, "Next one"),
    ];
    let mut report = FixReport::default();

    let merged = MergePolicy::default().merge(cues, &mut report);

    assert_eq!(merged.len(), 2);
}

#[test]
fn test_merge_withCjkTerminalPunctuation_shouldNotCombine() {
    let cues = vec![cue(1, 1000, 1400, "好。"), cue(2, 1400, 1700, "走吧")];
    let mut report = FixReport::default();

    let merged = MergePolicy::default().merge(cues, &mut report);

    assert_eq!(merged.len(), 2);
}

#[test]
fn test_merge_withCjkFragments_shouldConcatenateWithoutSpace() {
    let cues = vec![cue(1, 1000, 1400, "我们走"), cue(2, 1400, 1700, "好不好")];
    let mut report = FixReport::default();

    let merged = MergePolicy::default().merge(cues, &mut report);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].text(), "我们走好不好");
}

#[test]
fn test_merge_withThreeFragments_shouldNotCascade() {
    // The merged cue is not itself reconsidered against the third fragment
    let cues = vec![
        cue(1, 1000, 1300, "one"),
        cue(2, 1300, 1600, "two"),
        cue(3, 1600, 1900, "three"),
    ];
    let mut report = FixReport::default();

    let merged = MergePolicy::default().merge(cues, &mut report);

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].text(), "one two");
    assert_eq!(merged[1].text(), "three");
    assert_eq!(report.merged, 1);
}

#[test]
fn test_merge_withCustomPunctuation_shouldRespectIt() {
    let policy = MergePolicy::new(vec!['~']);
    let cues = vec![
        cue(1, 1000, 1400, "Done~"),
        cue(2, 1400, 1700, "Next one"),
    ];
    let mut report = FixReport::default();

    let merged = policy.merge(cues, &mut report);

    assert_eq!(merged.len(), 2);
}

#[test]
fn test_merge_withMultiLineFirstCue_shouldJoinAtBoundaryLine() {
    let cues = vec![
        cue(1, 1000, 1400, "First line\nand then"),
        cue(2, 1400, 1700, "the rest"),
    ];
    let mut report = FixReport::default();

    let merged = MergePolicy::default().merge(cues, &mut report);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].text(), "First line\nand then the rest");
}

#[test]
fn test_merge_withContainedInterval_shouldKeepWiderEnd() {
    // The second cue ends before the first; the union keeps the later end
    let cues = vec![
        cue(1, 1000, 1900, "almost a second"),
        cue(2, 1100, 1500, "inside it"),
    ];
    let mut report = FixReport::default();

    let merged = MergePolicy::default().merge(cues, &mut report);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].start_ms, 1000);
    assert_eq!(merged[0].end_ms, 1900);
}
