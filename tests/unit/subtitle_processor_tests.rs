/*!
 * Tests for subtitle parsing and serialization
 */

use std::path::PathBuf;

use subfix::errors::SubtitleError;
use subfix::subtitle_processor::{CueCollection, SubtitleCue, SubtitleFormat};

/// Test timestamp parsing and formatting
#[test]
fn test_timestamp_parsing_withValidTimestamp_shouldParseAndFormat() {
    let ms = SubtitleCue::parse_timestamp("01:23:45,678").unwrap();
    assert_eq!(ms, 5025678);

    assert_eq!(
        SubtitleCue::format_timestamp(ms, SubtitleFormat::Srt),
        "01:23:45,678"
    );
    assert_eq!(
        SubtitleCue::format_timestamp(ms, SubtitleFormat::Vtt),
        "01:23:45.678"
    );
}

#[test]
fn test_timestamp_parsing_withOutOfRangeComponents_shouldFail() {
    assert!(SubtitleCue::parse_timestamp("00:61:00,000").is_err());
    assert!(SubtitleCue::parse_timestamp("00:00:75,000").is_err());
    assert!(SubtitleCue::parse_timestamp("not a timestamp").is_err());
}

#[test]
fn test_format_detection_withWebvttHeader_shouldBeVtt() {
    let content = "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHello\n";
    assert_eq!(SubtitleFormat::detect(content), SubtitleFormat::Vtt);
}

#[test]
fn test_format_detection_withPeriodSeparator_shouldBeVtt() {
    let content = "00:00:01.000 --> 00:00:02.000\nHello\n";
    assert_eq!(SubtitleFormat::detect(content), SubtitleFormat::Vtt);
}

#[test]
fn test_format_detection_withNumberedCommaBlocks_shouldBeSrt() {
    let content = "1\n00:00:01,000 --> 00:00:02,000\nHello\n";
    assert_eq!(SubtitleFormat::detect(content), SubtitleFormat::Srt);
}

#[test]
fn test_parse_withValidSrt_shouldProduceCues() {
    let content = crate::common::CLEAN_SRT;
    let collection = CueCollection::parse(content, PathBuf::from("test.srt")).unwrap();

    assert_eq!(collection.format, SubtitleFormat::Srt);
    assert_eq!(collection.cues.len(), 3);
    assert_eq!(collection.cues[0].index, 1);
    assert_eq!(collection.cues[0].start_ms, 1000);
    assert_eq!(collection.cues[0].end_ms, 4000);
    assert_eq!(collection.cues[0].text(), "This is a test subtitle.");
}

#[test]
fn test_parse_withMultiLineCue_shouldKeepLineStructure() {
    let content = "1\n00:00:01,000 --> 00:00:04,000\nFirst line\nSecond line\n";
    let collection = CueCollection::parse(content, PathBuf::from("test.srt")).unwrap();

    assert_eq!(collection.cues[0].lines.len(), 2);
    assert_eq!(collection.cues[0].text(), "First line\nSecond line");
}

#[test]
fn test_parse_withVttIdentifiers_shouldPreserveThem() {
    let content = "WEBVTT\n\nintro\n00:00:01.000 --> 00:00:04.000\nHello\n\n\
00:00:05.000 --> 00:00:06.000\nWorld\n";
    let collection = CueCollection::parse(content, PathBuf::from("test.vtt")).unwrap();

    assert_eq!(collection.cues.len(), 2);
    assert_eq!(collection.cues[0].identifier.as_deref(), Some("intro"));
    assert_eq!(collection.cues[1].identifier, None);
}

#[test]
fn test_parse_withMalformedTimestampLine_shouldFailWithLocation() {
    let content = "1\n00:00:01,000 --> bogus\nHello\n";
    let result = CueCollection::parse(content, PathBuf::from("test.srt"));

    match result {
        Err(SubtitleError::ParseError { block, line, .. }) => {
            assert_eq!(block, 1);
            assert_eq!(line, 2);
        }
        other => panic!("Expected ParseError, got {:?}", other),
    }
}

#[test]
fn test_parse_withNoCues_shouldFailWithEmpty() {
    let result = CueCollection::parse("\n\n\n", PathBuf::from("empty.srt"));
    assert!(matches!(result, Err(SubtitleError::Empty)));
}

#[test]
fn test_serialize_withSrtOutput_shouldRenumberSequentially() {
    let cues = vec![
        SubtitleCue::new(7, 1000, 2000, "one"),
        SubtitleCue::new(9, 3000, 4000, "two"),
    ];
    let out = CueCollection::serialize(&cues, SubtitleFormat::Srt, false);

    assert!(out.starts_with("1\n00:00:01,000 --> 00:00:02,000\none\n"));
    assert!(out.contains("2\n00:00:03,000 --> 00:00:04,000\ntwo\n"));
}

#[test]
fn test_serialize_withPreserveNumbering_shouldKeepOriginalIndices() {
    let cues = vec![
        SubtitleCue::new(7, 1000, 2000, "one"),
        SubtitleCue::new(9, 3000, 4000, "two"),
    ];
    let out = CueCollection::serialize(&cues, SubtitleFormat::Srt, true);

    assert!(out.starts_with("7\n"));
    assert!(out.contains("\n9\n"));
}

#[test]
fn test_serialize_withVttOutput_shouldEmitHeaderAndPeriods() {
    let cues = vec![SubtitleCue::new(1, 1000, 2000, "one")];
    let out = CueCollection::serialize(&cues, SubtitleFormat::Vtt, false);

    assert!(out.starts_with("WEBVTT\n\n"));
    assert!(out.contains("00:00:01.000 --> 00:00:02.000\n"));
}

#[test]
fn test_roundtrip_withVttInput_shouldPreserveCuesAndText() {
    let content = "WEBVTT\n\nintro\n00:00:01.000 --> 00:00:04.000\nHello there\n\n\
00:00:05.000 --> 00:00:06.500\nSecond cue\n";
    let first = CueCollection::parse(content, PathBuf::from("test.vtt")).unwrap();
    let out = CueCollection::serialize(&first.cues, SubtitleFormat::Vtt, false);
    let second = CueCollection::parse(&out, PathBuf::from("test.vtt")).unwrap();

    assert_eq!(second.cues.len(), first.cues.len());
    for (a, b) in first.cues.iter().zip(&second.cues) {
        assert_eq!(a.text(), b.text());
        assert_eq!(a.identifier, b.identifier);
        assert_eq!(a.start_ms, b.start_ms);
        assert_eq!(a.end_ms, b.end_ms);
    }
}

#[test]
fn test_roundtrip_withIndentedTextLines_shouldPreserveWhitespace() {
    let content = "WEBVTT\n\n00:00:01.000 --> 00:00:04.000\n- First speaker\n  \
continued reply\n";
    let collection = CueCollection::parse(content, PathBuf::from("test.vtt")).unwrap();

    assert_eq!(collection.cues[0].lines, vec!["- First speaker", "  continued reply"]);

    let out = CueCollection::serialize(&collection.cues, SubtitleFormat::Vtt, false);
    assert_eq!(out.trim_end(), content.trim_end());
}

#[test]
fn test_roundtrip_withSrtInput_shouldPreserveContent() {
    let content = crate::common::CLEAN_SRT;
    let collection = CueCollection::parse(content, PathBuf::from("test.srt")).unwrap();
    let out = CueCollection::serialize(&collection.cues, SubtitleFormat::Srt, false);

    assert_eq!(out.trim_end(), content.trim_end());
}
