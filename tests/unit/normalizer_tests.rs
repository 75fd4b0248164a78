/*!
 * Tests for caption text cleaning and event normalization
 */

use json3vtt::conversion::{RawEvent, RawTiming, SkipReason};
use json3vtt::conversion::normalizer::{clean_text, decode_entities, normalize_event, normalize_events};
use json3vtt::conversion::Diagnostics;

fn raw(index: usize, start: RawTiming, duration: RawTiming, segments: &[&str]) -> RawEvent {
    RawEvent {
        index,
        start_ms: start,
        duration_ms: duration,
        segments: segments.iter().map(|s| s.to_string()).collect(),
    }
}

/// Tags are removed while encoded angle brackets survive as text
#[test]
fn test_cleanText_withTagsAndEncodedBrackets_shouldKeepOnlyText() {
    assert_eq!(clean_text("<font color=\"#E5E5E5\">hi</font> there"), "hi there");
    assert_eq!(clean_text("x &lt;i&gt;y&lt;/i&gt;"), "x <i>y</i>");
    assert_eq!(clean_text("<c.colorE5E5E5>word</c>"), "word");
}

/// Whitespace of any kind collapses to single spaces and is trimmed
#[test]
fn test_cleanText_withMixedWhitespace_shouldCollapse() {
    assert_eq!(clean_text("\u{00a0} a \r\n\t b \u{2003}c  "), "a b c");
}

/// Non-ASCII text and emoji are kept byte for byte
#[test]
fn test_cleanText_withUnicode_shouldPreserve() {
    let text = "Ça va? 🎵 مرحبا 👩🏽‍💻";
    assert_eq!(clean_text(text), text);
}

/// Control characters are removed, not replaced by spaces
#[test]
fn test_cleanText_withControlCharacters_shouldStrip() {
    assert_eq!(clean_text("ab\u{0000}c\u{001b}d\u{007f}"), "abcd");
    assert_eq!(clean_text("&#7;beep"), "beep");
}

/// Entity decoding is a single pass and leaves unknown entities alone
#[test]
fn test_decodeEntities_withNestedAndUnknown_shouldDecodeOnce() {
    assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    assert_eq!(decode_entities("&copy; &#128512; &#x1F600;"), "&copy; 😀 😀");
    assert_eq!(decode_entities("&#xD800;"), "&#xD800;");
    assert_eq!(decode_entities("AT&T"), "AT&T");
}

/// Fragments are joined before cleaning so boundary spaces are kept
#[test]
fn test_normalizeEvent_withFragmentSpaces_shouldJoinWords() {
    let cue = normalize_event(&raw(
        0,
        RawTiming::Value(500),
        RawTiming::Value(1500),
        &["we're", " going", " to", "\n", "see"],
    ))
    .unwrap();
    assert_eq!(cue.text(), "we're going to see");
    assert_eq!(cue.end_ms(), 2000);
}

/// A start time that is not an integer is invalid
#[test]
fn test_normalizeEvent_withMalformedTiming_shouldSkip() {
    assert_eq!(
        normalize_event(&raw(0, RawTiming::Malformed, RawTiming::Value(10), &["x"])),
        Err(SkipReason::InvalidStart)
    );
    assert_eq!(
        normalize_event(&raw(0, RawTiming::Value(10), RawTiming::Malformed, &["x"])),
        Err(SkipReason::InvalidDuration)
    );
    assert_eq!(
        normalize_event(&raw(0, RawTiming::Value(10), RawTiming::Value(-10), &["x"])),
        Err(SkipReason::InvalidDuration)
    );
}

/// The largest representable timings still produce a valid cue
#[test]
fn test_normalizeEvent_withMaximalTiming_shouldNotOverflow() {
    let cue = normalize_event(&raw(0, RawTiming::Value(i64::MAX), RawTiming::Value(i64::MAX), &["x"])).unwrap();
    assert_eq!(cue.start_ms(), i64::MAX as u64);
    assert_eq!(cue.end_ms(), (i64::MAX as u64) * 2);
}

/// Output order follows input order and skips are recorded with their index
#[test]
fn test_normalizeEvents_withMixedEvents_shouldRecordSkips() {
    let mut diagnostics = Diagnostics::default();
    let cues = normalize_events(
        vec![
            raw(0, RawTiming::Value(5000), RawTiming::Value(100), &["late"]),
            raw(1, RawTiming::Missing, RawTiming::Value(100), &["lost"]),
            raw(2, RawTiming::Value(0), RawTiming::Value(100), &["early"]),
            raw(3, RawTiming::Value(0), RawTiming::Value(100), &[]),
        ],
        &mut diagnostics,
    );

    let texts: Vec<&str> = cues.iter().map(|c| c.text()).collect();
    assert_eq!(texts, vec!["late", "early"]);
    assert_eq!(diagnostics.accepted_cues, 2);
    assert_eq!(diagnostics.skipped[0].index, 1);
    assert_eq!(diagnostics.skipped[0].reason, SkipReason::MissingStart);
    assert_eq!(diagnostics.skipped[1].index, 3);
    assert_eq!(diagnostics.skipped[1].reason, SkipReason::EmptyText);
}
