/*!
 * JSON3 loading and structural validation.
 *
 * Only the document shape is checked here: a top-level object with an
 * `events` array. Whether an event has usable timing or text is decided
 * later by the normalizer.
 */

use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::conversion::cue::Cue;
use crate::conversion::diagnostics::{Diagnostics, SkipReason};
use crate::conversion::serializer::escape_cue_text;
use crate::errors::ConversionError;

/// A timing field as found in the source event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawTiming {
    /// Field not present
    Missing,
    /// Present but not an integer
    Malformed,
    Value(i64),
}

impl RawTiming {
    fn from_field(event: &Map<String, Value>, key: &str) -> Self {
        match event.get(key) {
            None => Self::Missing,
            Some(value) => value.as_i64().map_or(Self::Malformed, Self::Value),
        }
    }
}

/// One entry of the `events` array, before normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    /// Position in the source `events` array
    pub index: usize,
    pub start_ms: RawTiming,
    pub duration_ms: RawTiming,
    /// Segment text fragments, in order, uncleaned
    pub segments: Vec<String>,
}

impl RawEvent {
    fn from_object(index: usize, event: &Map<String, Value>) -> Self {
        let segments = event
            .get("segs")
            .and_then(Value::as_array)
            .map(|segs| segs.iter().filter_map(segment_text).collect())
            .unwrap_or_default();

        RawEvent {
            index,
            start_ms: RawTiming::from_field(event, "tStartMs"),
            duration_ms: RawTiming::from_field(event, "dDurationMs"),
            segments,
        }
    }
}

// `utf8` is the JSON3 field; some exporters write `text` instead.
fn segment_text(segment: &Value) -> Option<String> {
    let segment = segment.as_object()?;
    ["utf8", "text"]
        .iter()
        .filter_map(|key| segment.get(*key).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

/// Parse a JSON3 document into raw events.
///
/// Non-object entries of `events` are recorded in `diagnostics` and skipped.
pub fn load_events(input: &str, diagnostics: &mut Diagnostics) -> Result<Vec<RawEvent>, ConversionError> {
    let document: Value = serde_json::from_str(input)?;

    let root = document
        .as_object()
        .ok_or_else(|| ConversionError::Format("top-level value must be an object".to_string()))?;

    let events = match root.get("events") {
        Some(Value::Array(events)) => events,
        Some(_) => return Err(ConversionError::Format("'events' must be an array".to_string())),
        None => return Err(ConversionError::Format("missing 'events' field".to_string())),
    };

    diagnostics.total_events = events.len();

    let mut raw_events = Vec::with_capacity(events.len());
    for (index, event) in events.iter().enumerate() {
        match event.as_object() {
            Some(object) => raw_events.push(RawEvent::from_object(index, object)),
            None => diagnostics.skip(index, SkipReason::NotAnObject),
        }
    }

    debug!(
        "Loaded JSON3 document: {} events, {} objects",
        events.len(),
        raw_events.len()
    );

    Ok(raw_events)
}

/// Serializable JSON3 document, used to rebuild an input from finished cues
#[derive(Debug, Clone, Serialize)]
pub struct Json3Document {
    pub events: Vec<Json3Event>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Json3Event {
    #[serde(rename = "tStartMs")]
    pub start_ms: u64,
    #[serde(rename = "dDurationMs")]
    pub duration_ms: u64,
    pub segs: Vec<Json3Segment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Json3Segment {
    pub utf8: String,
}

impl Json3Document {
    /// Build the JSON3 equivalent of a cue sequence, one event per cue.
    ///
    /// Cue text is entity-encoded so that loading and cleaning it again
    /// yields the same text.
    pub fn from_cues(cues: &[Cue]) -> Self {
        let events = cues
            .iter()
            .map(|cue| Json3Event {
                start_ms: cue.start_ms(),
                duration_ms: cue.duration_ms(),
                segs: vec![Json3Segment { utf8: escape_cue_text(cue.text()) }],
            })
            .collect();
        Json3Document { events }
    }

    pub fn to_json(&self) -> Result<String, ConversionError> {
        serde_json::to_string(self).map_err(ConversionError::from)
    }
}
