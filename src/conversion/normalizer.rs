/*!
 * Event normalization: raw JSON3 events to canonical cues.
 *
 * Each raw event yields at most one cue. Events without a usable start,
 * a positive duration or any text after cleaning are dropped and recorded
 * in the diagnostics.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::conversion::cue::Cue;
use crate::conversion::diagnostics::{Diagnostics, SkipReason};
use crate::conversion::loader::{RawEvent, RawTiming};

// @const: Markup tag regex
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^<>]+>").unwrap()
});

// @const: HTML entity regex (named, decimal and hex)
static ENTITY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|([a-zA-Z]+));").unwrap()
});

// @const: Whitespace run regex (Unicode, includes NBSP and newlines)
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").unwrap()
});

/// Normalize raw events into cues, preserving input order.
pub fn normalize_events(events: Vec<RawEvent>, diagnostics: &mut Diagnostics) -> Vec<Cue> {
    let mut cues = Vec::with_capacity(events.len());

    for event in events {
        match normalize_event(&event) {
            Ok(cue) => cues.push(cue),
            Err(reason) => {
                debug!("Skipping event {}: {}", event.index, reason);
                diagnostics.skip(event.index, reason);
            }
        }
    }

    diagnostics.accepted_cues = cues.len();
    cues
}

/// Turn a single raw event into a cue, or say why it cannot be one.
pub fn normalize_event(event: &RawEvent) -> Result<Cue, SkipReason> {
    let start_ms = match event.start_ms {
        RawTiming::Missing => return Err(SkipReason::MissingStart),
        RawTiming::Malformed => return Err(SkipReason::InvalidStart),
        RawTiming::Value(value) => u64::try_from(value).map_err(|_| SkipReason::InvalidStart)?,
    };

    let duration_ms = match event.duration_ms {
        RawTiming::Missing => return Err(SkipReason::MissingDuration),
        RawTiming::Malformed => return Err(SkipReason::InvalidDuration),
        RawTiming::Value(value) if value <= 0 => return Err(SkipReason::InvalidDuration),
        RawTiming::Value(value) => value as u64,
    };

    let end_ms = start_ms
        .checked_add(duration_ms)
        .ok_or(SkipReason::InvalidDuration)?;

    let text = clean_text(&event.segments.concat());
    if text.is_empty() {
        return Err(SkipReason::EmptyText);
    }

    Cue::new(start_ms, end_ms, text).map_err(|_| SkipReason::EmptyText)
}

/// Clean caption text for display.
///
/// Strips markup tags, decodes HTML entities, removes control characters,
/// collapses whitespace runs to a single space and trims. Everything else,
/// emoji included, is kept as is.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let without_tags = TAG_REGEX.replace_all(text, "");
    let decoded = decode_entities(&without_tags);

    // Control characters other than whitespace are dropped outright,
    // whitespace ones are left for the collapse below.
    let printable: String = decoded
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect();

    WHITESPACE_REGEX
        .replace_all(&printable, " ")
        .trim()
        .to_string()
}

/// Decode HTML character references in a single pass.
///
/// Unknown named entities and invalid code points are left verbatim.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    ENTITY_REGEX
        .replace_all(text, |caps: &Captures| {
            let decoded = if let Some(decimal) = caps.get(1) {
                decimal.as_str().parse::<u32>().ok().and_then(char::from_u32)
            } else if let Some(hex) = caps.get(2) {
                u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
            } else {
                caps.get(3).and_then(|name| named_entity(name.as_str()))
            };

            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00a0}'),
        _ => None,
    }
}
