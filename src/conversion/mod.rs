/*!
 * JSON3 to WebVTT conversion pipeline.
 *
 * The pipeline is four pure stages run in order:
 *
 * - `loader`: parse the JSON3 document and check its shape
 * - `normalizer`: turn raw events into cues with cleaned text
 * - `reconciler`: sort cues and resolve overlaps
 * - `serializer`: render the cues as WebVTT
 *
 * Nothing here touches the filesystem. Non-fatal findings are returned in
 * `Diagnostics`; only a malformed document is an error.
 */

pub mod cue;
pub mod diagnostics;
pub mod loader;
pub mod normalizer;
pub mod reconciler;
pub mod serializer;

use log::debug;

use crate::errors::ConversionError;

// Re-export main types
pub use cue::Cue;
pub use diagnostics::{ConversionWarning, Diagnostics, SkipReason, SkippedEvent};
pub use loader::{Json3Document, RawEvent, RawTiming};
pub use reconciler::ReconcileOptions;
pub use serializer::{SerializeOptions, parse_webvtt};

/// Options for a whole conversion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionOptions {
    pub reconcile: ReconcileOptions,
    pub serialize: SerializeOptions,
}

/// Result of a successful conversion
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The rendered WebVTT document
    pub vtt: String,
    /// The cues that were rendered, in output order
    pub cues: Vec<Cue>,
    pub diagnostics: Diagnostics,
}

/// Convert a JSON3 document to WebVTT with default options.
pub fn convert(input: &str) -> Result<Conversion, ConversionError> {
    convert_with_options(input, &ConversionOptions::default())
}

/// Convert a JSON3 document to WebVTT.
///
/// Fails only when the document itself is malformed; in that case nothing
/// is rendered.
pub fn convert_with_options(input: &str, options: &ConversionOptions) -> Result<Conversion, ConversionError> {
    let mut diagnostics = Diagnostics::default();

    let raw_events = loader::load_events(input, &mut diagnostics)?;
    let cues = normalizer::normalize_events(raw_events, &mut diagnostics);
    let cues = reconciler::reconcile(cues, &options.reconcile, &mut diagnostics);
    let vtt = serializer::serialize(&cues, &options.serialize);

    diagnostics.emitted_cues = cues.len();
    if cues.is_empty() {
        diagnostics.warnings.push(ConversionWarning::EmptyResult);
    }

    debug!("Conversion finished: {}", diagnostics);

    Ok(Conversion { vtt, cues, diagnostics })
}
