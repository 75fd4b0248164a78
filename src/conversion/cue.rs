use std::fmt;
use anyhow::{Result, Context, anyhow};

// @module: Canonical caption cue and WebVTT timestamps

// @struct: Single caption cue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    // @field: Start time in ms
    start_ms: u64,

    // @field: End time in ms, always greater than start
    end_ms: u64,

    // @field: Cleaned, non-empty caption text
    text: String,
}

impl Cue {
    // @creates: Validated cue
    // @validates: Time range and non-empty text
    pub fn new(start_ms: u64, end_ms: u64, text: impl Into<String>) -> Result<Self> {
        if end_ms <= start_ms {
            return Err(anyhow!(
                "Invalid time range: end time {} <= start time {}",
                end_ms, start_ms
            ));
        }

        let text = text.into();
        let trimmed_text = text.trim();
        if trimmed_text.is_empty() {
            return Err(anyhow!("Empty cue text at {}ms", start_ms));
        }

        Ok(Cue {
            start_ms,
            end_ms,
            text: trimmed_text.to_string(),
        })
    }

    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    pub fn end_ms(&self) -> u64 {
        self.end_ms
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }

    /// Returns a copy of this cue ending at `end_ms`, or `None` when that
    /// would leave no positive duration.
    pub fn truncated_to(&self, end_ms: u64) -> Option<Self> {
        if end_ms <= self.start_ms {
            return None;
        }
        Some(Cue {
            start_ms: self.start_ms,
            end_ms: end_ms.min(self.end_ms),
            text: self.text.clone(),
        })
    }

    /// Returns a copy of this cue stretched to end at `end_ms`.
    pub fn extended_to(&self, end_ms: u64) -> Self {
        Cue {
            start_ms: self.start_ms,
            end_ms: end_ms.max(self.end_ms),
            text: self.text.clone(),
        }
    }

    /// Format a timestamp in milliseconds to WebVTT format (HH:MM:SS.mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms / 60_000) % 60;
        let seconds = (ms / 1_000) % 60;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
    }

    /// Parse a WebVTT timestamp (`HH:MM:SS.mmm` or `MM:SS.mmm`) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        let (clock, millis) = timestamp
            .trim()
            .split_once('.')
            .ok_or_else(|| anyhow!("Missing milliseconds in timestamp: {}", timestamp))?;

        if millis.len() != 3 {
            return Err(anyhow!("Milliseconds must have 3 digits: {}", timestamp));
        }

        let parts: Vec<&str> = clock.split(':').collect();
        let (hours, minutes, seconds) = match parts.as_slice() {
            [h, m, s] => (
                h.parse::<u64>().context("Failed to parse hours")?,
                m.parse::<u64>().context("Failed to parse minutes")?,
                s.parse::<u64>().context("Failed to parse seconds")?,
            ),
            [m, s] => (
                0,
                m.parse::<u64>().context("Failed to parse minutes")?,
                s.parse::<u64>().context("Failed to parse seconds")?,
            ),
            _ => return Err(anyhow!("Invalid timestamp format: {}", timestamp)),
        };
        let millis: u64 = millis.parse().context("Failed to parse milliseconds")?;

        if minutes >= 60 || seconds >= 60 {
            return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        hours
            .checked_mul(3_600_000)
            .and_then(|ms| ms.checked_add(minutes * 60_000 + seconds * 1_000 + millis))
            .ok_or_else(|| anyhow!("Timestamp out of range: {}", timestamp))
    }

    /// Convert start time to formatted WebVTT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_ms)
    }

    /// Convert end time to formatted WebVTT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_ms)
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} --> {} {}", self.format_start_time(), self.format_end_time(), self.text)
    }
}
