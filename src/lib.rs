/*!
 * # json3vtt - YouTube JSON3 captions to WebVTT
 *
 * A Rust library and command line tool converting YouTube's JSON3 caption
 * format into WebVTT subtitle files.
 *
 * ## Features
 *
 * - Structural validation of JSON3 documents
 * - Caption text cleanup (markup, HTML entities, control characters, whitespace)
 * - Overlap reconciliation of auto-caption revisions
 * - WebVTT rendering, plus a reader for round-trip checks
 * - Per-conversion diagnostics instead of hard failures for bad events
 * - Single file, stdout and recursive directory conversion
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `conversion`: the conversion pipeline:
 *   - `conversion::loader`: JSON3 parsing and shape validation
 *   - `conversion::normalizer`: raw events to cues, text cleaning
 *   - `conversion::reconciler`: sorting and overlap resolution
 *   - `conversion::serializer`: WebVTT output and parsing
 * - `app_config`: Configuration management
 * - `app_controller`: File and directory conversion driver
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod conversion;
pub mod errors;
pub mod file_utils;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use conversion::{convert, convert_with_options, Conversion, ConversionOptions, Cue, Diagnostics};
pub use errors::{AppError, ConversionError};
