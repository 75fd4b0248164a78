/*!
 * Error types for the json3vtt application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Fatal errors raised by the conversion pipeline.
///
/// A conversion that fails with one of these produces no output at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// Input is not valid JSON or does not have the JSON3 shape
    #[error("Invalid JSON3 document: {0}")]
    Format(String),
}

impl ConversionError {
    /// Short machine-readable category name for this failure
    pub fn category(&self) -> &'static str {
        match self {
            Self::Format(_) => "format",
        }
    }
}

impl From<serde_json::Error> for ConversionError {
    fn from(error: serde_json::Error) -> Self {
        Self::Format(format!("JSON parse error: {}", error))
    }
}

/// Application error type raised by the controller.
///
/// Callers receive it inside `anyhow::Error` and can recover it with
/// `downcast_ref::<AppError>()`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error in the configuration file or CLI overrides
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the conversion pipeline
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
