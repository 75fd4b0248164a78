/*!
 * Per-conversion diagnostics.
 *
 * The pipeline never logs its own warnings at user-facing levels. Instead it
 * accumulates skipped events and reconciliation counters here and hands the
 * value back next to the output, so the caller decides how loud to be.
 */

use std::collections::BTreeMap;
use std::fmt;

/// Why a single event did not become a cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkipReason {
    /// The `events` entry is not a JSON object
    NotAnObject,
    /// `tStartMs` is absent
    MissingStart,
    /// `tStartMs` is negative or not an integer
    InvalidStart,
    /// `dDurationMs` is absent
    MissingDuration,
    /// `dDurationMs` is zero, negative, not an integer, or overflows the end time
    InvalidDuration,
    /// No text left after cleaning the segments
    EmptyText,
}

impl SkipReason {
    /// Stable lowercase identifier, used in log lines and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotAnObject => "not_an_object",
            Self::MissingStart => "missing_start",
            Self::InvalidStart => "invalid_start",
            Self::MissingDuration => "missing_duration",
            Self::InvalidDuration => "invalid_duration",
            Self::EmptyText => "empty_text",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A skipped event and its position in the input `events` array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEvent {
    pub index: usize,
    pub reason: SkipReason,
}

/// Non-fatal conditions worth surfacing for a successful conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionWarning {
    /// Every event was skipped; the document has a header and no cues
    EmptyResult,
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyResult => write!(f, "No usable caption events found; output contains no cues"),
        }
    }
}

/// Counters and findings collected over one conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Number of entries in the input `events` array
    pub total_events: usize,
    /// Cues produced by the normalizer, before reconciliation
    pub accepted_cues: usize,
    /// Cues in the final document
    pub emitted_cues: usize,
    /// Cues shortened because the following cue started before they ended
    pub truncated_cues: usize,
    /// Cues dropped in favour of a later cue with the same or earlier start
    pub discarded_cues: usize,
    /// Cue pairs coalesced because they repeat the same caption
    pub merged_repeats: usize,
    /// Events that did not make it past loading or normalization
    pub skipped: Vec<SkippedEvent>,
    pub warnings: Vec<ConversionWarning>,
}

impl Diagnostics {
    pub fn skip(&mut self, index: usize, reason: SkipReason) {
        self.skipped.push(SkippedEvent { index, reason });
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Skipped events grouped by reason
    pub fn skip_counts(&self) -> BTreeMap<SkipReason, usize> {
        let mut counts = BTreeMap::new();
        for skipped in &self.skipped {
            *counts.entry(skipped.reason).or_insert(0) += 1;
        }
        counts
    }

    pub fn is_empty_result(&self) -> bool {
        self.warnings.contains(&ConversionWarning::EmptyResult)
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} events, {} cues written, {} skipped",
            self.total_events, self.emitted_cues, self.skipped_count()
        )?;
        let counts = self.skip_counts();
        if !counts.is_empty() {
            let parts: Vec<String> = counts
                .iter()
                .map(|(reason, count)| format!("{}={}", reason, count))
                .collect();
            write!(f, " ({})", parts.join(", "))?;
        }
        if self.truncated_cues > 0 || self.discarded_cues > 0 {
            write!(f, ", {} truncated, {} discarded", self.truncated_cues, self.discarded_cues)?;
        }
        if self.merged_repeats > 0 {
            write!(f, ", {} repeats merged", self.merged_repeats)?;
        }
        Ok(())
    }
}
