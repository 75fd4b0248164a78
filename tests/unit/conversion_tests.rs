/*!
 * Tests for the full conversion pipeline
 */

use serde_json::json;
use json3vtt::conversion::{convert, convert_with_options, ConversionOptions, ReconcileOptions, SkipReason};
use json3vtt::errors::ConversionError;
use crate::common;

/// The single-caption document converts to the exact expected WebVTT text
#[test]
fn test_convert_withSingleHelloEvent_shouldProduceExactDocument() {
    let input = r#"{"events":[{"tStartMs":0,"dDurationMs":3000,"segs":[{"utf8":"Hello"}]}]}"#;
    let conversion = convert(input).unwrap();

    assert_eq!(
        conversion.vtt,
        "WEBVTT\n\n1\n00:00:00.000 --> 00:00:03.000\nHello\n\n"
    );
}

/// Overlapping events truncate the first cue at the start of the second
#[test]
fn test_convert_withOverlappingEvents_shouldTruncateFirstCue() {
    let input = common::json3(vec![
        common::event(0, 5000, "A"),
        common::event(2000, 4000, "B"),
    ]);
    let conversion = convert(&input).unwrap();

    assert_eq!(
        conversion.vtt,
        "WEBVTT\n\n\
         1\n00:00:00.000 --> 00:00:02.000\nA\n\n\
         2\n00:00:02.000 --> 00:00:06.000\nB\n\n"
    );
    assert_eq!(conversion.diagnostics.truncated_cues, 1);
}

/// Non-JSON input is a format error
#[test]
fn test_convert_withNonJsonInput_shouldReturnFormatError() {
    let err = convert("WEBVTT\n\nnot json").unwrap_err();
    assert!(matches!(err, ConversionError::Format(_)));
    assert_eq!(err.category(), "format");
}

/// JSON without an events array is a format error
#[test]
fn test_convert_withWrongShape_shouldReturnFormatError() {
    for input in [
        r#"{"wireMagic":"pb3"}"#,
        r#"{"events":{"tStartMs":0}}"#,
        r#"[{"tStartMs":0}]"#,
        r#""events""#,
        "",
    ] {
        let result = convert(input);
        assert!(result.is_err(), "expected format error for {:?}", input);
    }
}

/// Every event lacking a start time gives a header-only document and a warning
#[test]
fn test_convert_withAllStartsMissing_shouldWarnAndEmitHeaderOnly() {
    let input = common::json3(vec![
        json!({ "dDurationMs": 1000, "segs": [{ "utf8": "one" }] }),
        json!({ "dDurationMs": 2000, "segs": [{ "utf8": "two" }] }),
    ]);
    let conversion = convert(&input).unwrap();

    assert_eq!(conversion.vtt, "WEBVTT\n\n");
    assert!(conversion.diagnostics.is_empty_result());
    assert_eq!(conversion.diagnostics.skip_counts().get(&SkipReason::MissingStart), Some(&2));
    assert_eq!(conversion.diagnostics.emitted_cues, 0);
}

/// An empty events array is valid and produces no cues
#[test]
fn test_convert_withEmptyEvents_shouldEmitHeaderOnly() {
    let conversion = convert(r#"{"events":[]}"#).unwrap();
    assert_eq!(conversion.vtt, "WEBVTT\n\n");
    assert!(conversion.diagnostics.is_empty_result());
}

/// A realistic auto-caption document skips window and newline events
#[test]
fn test_convert_withSampleDocument_shouldReportDiagnostics() {
    let conversion = convert(&common::sample_json3()).unwrap();
    let diagnostics = &conversion.diagnostics;

    assert_eq!(diagnostics.total_events, 4);
    assert_eq!(diagnostics.accepted_cues, 2);
    assert_eq!(diagnostics.emitted_cues, 2);
    assert_eq!(diagnostics.skip_counts().get(&SkipReason::EmptyText), Some(&2));
    assert_eq!(
        conversion.vtt,
        "WEBVTT\n\n\
         1\n00:00:01.000 --> 00:00:03.000\nso today we\n\n\
         2\n00:00:03.000 --> 00:00:07.000\nare talking about [Music]\n\n"
    );
}

/// Mixed valid and invalid events keep the valid ones in time order
#[test]
fn test_convert_withMixedEvents_shouldKeepValidOnesSorted() {
    let input = common::json3(vec![
        common::event(9000, 1000, "last"),
        json!("not an object"),
        common::event(-5, 1000, "negative"),
        common::event(1000, 0, "zero duration"),
        common::event(1000, 500, "first"),
        json!({ "tStartMs": 4000, "segs": [{ "utf8": "no duration" }] }),
    ]);
    let conversion = convert(&input).unwrap();
    let texts: Vec<&str> = conversion.cues.iter().map(|c| c.text()).collect();

    assert_eq!(texts, vec!["first", "last"]);
    let counts = conversion.diagnostics.skip_counts();
    assert_eq!(counts.get(&SkipReason::NotAnObject), Some(&1));
    assert_eq!(counts.get(&SkipReason::InvalidStart), Some(&1));
    assert_eq!(counts.get(&SkipReason::InvalidDuration), Some(&1));
    assert_eq!(counts.get(&SkipReason::MissingDuration), Some(&1));
}

/// Repeat merging is off by default and collapses duplicates when enabled
#[test]
fn test_convertWithOptions_withMergeRepeats_shouldCoalesceDuplicates() {
    let input = common::json3(vec![
        common::event(0, 1000, "same line"),
        common::event(1200, 1000, "Same line"),
    ]);

    let plain = convert(&input).unwrap();
    assert_eq!(plain.cues.len(), 2);

    let options = ConversionOptions {
        reconcile: ReconcileOptions { merge_repeats_within_ms: Some(500) },
        ..Default::default()
    };
    let merged = convert_with_options(&input, &options).unwrap();
    assert_eq!(merged.cues.len(), 1);
    assert_eq!(merged.cues[0].start_ms(), 0);
    assert_eq!(merged.cues[0].end_ms(), 2200);
    assert_eq!(merged.diagnostics.merged_repeats, 1);
}

/// Converting the same input twice gives byte-identical output
#[test]
fn test_convert_withSameInput_shouldBeDeterministic() {
    let input = common::sample_json3();
    assert_eq!(convert(&input).unwrap().vtt, convert(&input).unwrap().vtt);
}
