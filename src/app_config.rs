use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::conversion::{ConversionOptions, ReconcileOptions, SerializeOptions};

/// Application configuration module
/// This module handles loading, validating and saving the converter settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Extension given to generated files (without the dot)
    #[serde(default = "default_output_extension")]
    pub output_extension: String,

    /// Extensions picked up when converting a directory
    #[serde(default = "default_input_extensions")]
    pub input_extensions: Vec<String>,

    /// Maximum number of files converted at the same time in directory mode
    #[serde(default = "default_concurrent_files")]
    pub concurrent_files: usize,

    /// Conversion pipeline settings
    #[serde(default)]
    pub conversion: ConversionConfig,
}

/// Settings passed through to the conversion pipeline
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConversionConfig {
    /// Merge consecutive cues with identical text when the gap between them
    /// is at most this many milliseconds. Disabled when absent.
    #[serde(default)]
    pub merge_repeats_within_ms: Option<u64>,

    /// Escape `&`, `<` and `>` in cue text
    #[serde(default = "default_true")]
    pub escape_text: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            merge_repeats_within_ms: None,
            escape_text: true,
        }
    }
}

impl ConversionConfig {
    /// Pipeline options for these settings
    pub fn options(&self) -> ConversionOptions {
        ConversionOptions {
            reconcile: ReconcileOptions {
                merge_repeats_within_ms: self.merge_repeats_within_ms,
            },
            serialize: SerializeOptions {
                escape_text: self.escape_text,
            },
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` crate filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_output_extension() -> String {
    "vtt".to_string()
}

fn default_input_extensions() -> Vec<String> {
    vec!["json3".to_string()]
}

fn default_concurrent_files() -> usize {
    4
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let output_extension = self.output_extension.trim_start_matches('.');
        if output_extension.is_empty() {
            return Err(anyhow!("Output extension must not be empty"));
        }

        if self.input_extensions.is_empty()
            || self.input_extensions.iter().any(|ext| ext.trim_start_matches('.').is_empty())
        {
            return Err(anyhow!("Input extensions must be a non-empty list of non-empty extensions"));
        }

        if self
            .input_extensions
            .iter()
            .any(|ext| ext.trim_start_matches('.').eq_ignore_ascii_case(output_extension))
        {
            return Err(anyhow!(
                "Output extension '{}' must differ from the input extensions",
                output_extension
            ));
        }

        if self.concurrent_files == 0 {
            return Err(anyhow!("concurrent_files must be at least 1"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: LogLevel::default(),
            output_extension: default_output_extension(),
            input_extensions: default_input_extensions(),
            concurrent_files: default_concurrent_files(),
            conversion: ConversionConfig::default(),
        }
    }
}
