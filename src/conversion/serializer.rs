use std::fmt::Write;
use anyhow::{Result, anyhow};
use log::warn;

use crate::conversion::cue::Cue;
use crate::conversion::normalizer::decode_entities;

// @module: WebVTT rendering and reading

/// WebVTT file signature
pub const WEBVTT_HEADER: &str = "WEBVTT";

/// Options for rendering cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Escape `&`, `<` and `>` in cue text
    pub escape_text: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self { escape_text: true }
    }
}

/// Render cues as a WebVTT document.
///
/// Cues are numbered from 1 in the given order. Each cue block is followed
/// by a blank line; nothing comes after the last one.
pub fn serialize(cues: &[Cue], options: &SerializeOptions) -> String {
    let text_len: usize = cues.iter().map(|cue| cue.text().len() + 40).sum();
    let mut output = String::with_capacity(WEBVTT_HEADER.len() + 2 + text_len);

    output.push_str(WEBVTT_HEADER);
    output.push_str("\n\n");

    for (i, cue) in cues.iter().enumerate() {
        let text = if options.escape_text {
            escape_cue_text(cue.text())
        } else {
            cue.text().to_string()
        };
        // Writing to a String cannot fail.
        let _ = write!(
            output,
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            cue.format_start_time(),
            cue.format_end_time(),
            text
        );
    }

    output
}

/// Escape the characters WebVTT treats as markup in cue payloads
pub fn escape_cue_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Parse a WebVTT document back into cues.
///
/// Handles optional cue identifiers, `NOTE`/`STYLE` blocks, cue settings
/// after the end timestamp and multi-line payloads (joined with `\n`).
/// Blocks whose timing or text is unusable are skipped with a warning.
pub fn parse_webvtt(content: &str) -> Result<Vec<Cue>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let normalized = content.replace("\r\n", "\n");
    let mut blocks = normalized.split("\n\n").filter(|block| !block.trim().is_empty());

    let header = blocks.next().ok_or_else(|| anyhow!("Empty WebVTT document"))?;
    let signature = header.lines().next().unwrap_or_default();
    if signature != WEBVTT_HEADER
        && !signature.starts_with("WEBVTT ")
        && !signature.starts_with("WEBVTT\t")
    {
        return Err(anyhow!("Missing WEBVTT header"));
    }

    let mut cues = Vec::new();
    for block in blocks {
        let mut lines = block.lines().skip_while(|line| line.trim().is_empty()).peekable();

        let Some(first) = lines.peek().copied() else { continue };
        if first.starts_with("NOTE") || first.starts_with("STYLE") || first.starts_with("REGION") {
            continue;
        }
        if !first.contains("-->") {
            // Cue identifier
            lines.next();
        }

        let Some(timing) = lines.next() else { continue };
        let Some((start, rest)) = timing.split_once("-->") else {
            warn!("Skipping WebVTT block without timing line: {}", timing);
            continue;
        };
        let end = rest.split_whitespace().next().unwrap_or_default();

        let text: Vec<String> = lines.map(decode_entities).collect();
        let parsed = Cue::parse_timestamp(start)
            .and_then(|start_ms| Ok((start_ms, Cue::parse_timestamp(end)?)))
            .and_then(|(start_ms, end_ms)| Cue::new(start_ms, end_ms, text.join("\n")));

        match parsed {
            Ok(cue) => cues.push(cue),
            Err(e) => warn!("Skipping invalid WebVTT cue '{}': {}", timing.trim(), e),
        }
    }

    Ok(cues)
}
