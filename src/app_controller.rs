use anyhow::{Result, Context};
use futures::stream::{self, StreamExt};
use log::{error, warn, info, debug};
use std::io::Write;
use std::path::{Path, PathBuf};
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::errors::AppError;
use crate::conversion::{self, ConversionOptions, Diagnostics};
use crate::file_utils::FileManager;

// @module: Application controller for JSON3 conversion

/// Output path value meaning "write to standard output"
pub const STDOUT_MARKER: &str = "-";

/// What happened to a single input file
#[derive(Debug)]
pub enum FileOutcome {
    /// Document written to the given path
    Written { path: PathBuf, diagnostics: Diagnostics },
    /// Document written to standard output
    Printed { diagnostics: Diagnostics },
    /// Output already existed and overwriting was not requested
    SkippedExisting { path: PathBuf },
}

/// Totals for a directory run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FolderSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config
            .validate()
            .map_err(|e| AppError::Config(format!("{:#}", e)))?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn options(&self) -> ConversionOptions {
        self.config.conversion.options()
    }

    /// Convert a single file.
    ///
    /// `output` defaults to the input path with the configured extension;
    /// `-` prints the document to stdout instead.
    pub async fn run(&self, input_file: &Path, output: Option<PathBuf>, force_overwrite: bool) -> Result<FileOutcome> {
        let start_time = std::time::Instant::now();

        if !FileManager::file_exists(input_file) {
            return Err(AppError::File(format!("Input file does not exist: {:?}", input_file)).into());
        }

        let outcome = match output {
            Some(path) if path.as_os_str() == STDOUT_MARKER => {
                let diagnostics = self.convert_to_stdout(input_file).await?;
                FileOutcome::Printed { diagnostics }
            }
            Some(path) => self.convert_file(input_file, &path, force_overwrite).await?,
            None => {
                let path = FileManager::generate_output_path(input_file, &self.config.output_extension);
                self.convert_file(input_file, &path, force_overwrite).await?
            }
        };

        debug!("Processed {:?} in {}", input_file, Self::format_duration(start_time.elapsed()));
        Ok(outcome)
    }

    /// Convert `input_file` and write the result to `output_path`.
    ///
    /// Nothing is written when the input is not a valid JSON3 document.
    pub async fn convert_file(&self, input_file: &Path, output_path: &Path, force_overwrite: bool) -> Result<FileOutcome> {
        if output_path.exists() && !force_overwrite {
            warn!("Output file already exists: {:?}. Use -f to force overwrite.", output_path);
            return Ok(FileOutcome::SkippedExisting { path: output_path.to_path_buf() });
        }

        debug!("Converting {:?} -> {:?}", input_file, output_path);
        let content = FileManager::read_to_string_async(input_file).await?;

        let conversion = conversion::convert_with_options(&content, &self.options())
            .map_err(AppError::from)
            .with_context(|| format!("Failed to convert {:?}", input_file))?;

        Self::report_diagnostics(input_file, &conversion.diagnostics);

        FileManager::write_to_file_async(output_path, &conversion.vtt).await?;

        Ok(FileOutcome::Written {
            path: output_path.to_path_buf(),
            diagnostics: conversion.diagnostics,
        })
    }

    async fn convert_to_stdout(&self, input_file: &Path) -> Result<Diagnostics> {
        let content = FileManager::read_to_string_async(input_file).await?;
        let conversion = conversion::convert_with_options(&content, &self.options())
            .map_err(AppError::from)
            .with_context(|| format!("Failed to convert {:?}", input_file))?;

        Self::report_diagnostics(input_file, &conversion.diagnostics);

        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(conversion.vtt.as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(AppError::from)
            .context("Failed to write to stdout")?;

        Ok(conversion.diagnostics)
    }

    /// Convert every matching file under `input_dir`, writing each result next to its source.
    ///
    /// A failing file is logged and counted; it does not stop the others.
    pub async fn run_folder(&self, input_dir: &Path, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(input_dir) {
            return Err(AppError::File(format!("Input directory does not exist: {:?}", input_dir)).into());
        }

        let files = FileManager::find_files(input_dir, &self.config.input_extensions)?;
        if files.is_empty() {
            warn!(
                "No files with extension(s) {} found in {:?}",
                self.config.input_extensions.join(", "),
                input_dir
            );
            return Ok(FolderSummary::default());
        }

        info!("Converting {} file(s) in {:?}", files.len(), input_dir);

        let folder_pb = if log::max_level() >= log::LevelFilter::Info {
            ProgressBar::new(files.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));

        let results = stream::iter(files)
            .map(|path| {
                let folder_pb = folder_pb.clone();
                async move {
                    let output_path = FileManager::generate_output_path(&path, &self.config.output_extension);
                    let result = self.convert_file(&path, &output_path, force_overwrite).await;
                    folder_pb.inc(1);
                    (path, result)
                }
            })
            .buffer_unordered(self.config.concurrent_files)
            .collect::<Vec<_>>()
            .await;

        folder_pb.finish_and_clear();

        let mut summary = FolderSummary::default();
        for (path, result) in results {
            match result {
                Ok(FileOutcome::SkippedExisting { .. }) => summary.skipped += 1,
                Ok(_) => summary.converted += 1,
                Err(e) => {
                    error!("Error converting {:?}: {:#}", path, e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Finished in {}: {} converted, {} skipped, {} failed",
            Self::format_duration(start_time.elapsed()),
            summary.converted,
            summary.skipped,
            summary.failed
        );

        Ok(summary)
    }

    /// Render conversion diagnostics as log records
    pub fn report_diagnostics(input_file: &Path, diagnostics: &Diagnostics) {
        for skipped in &diagnostics.skipped {
            debug!("{:?}: skipped event {} ({})", input_file, skipped.index, skipped.reason);
        }

        for (reason, count) in diagnostics.skip_counts() {
            warn!("{:?}: skipped {} event(s): {}", input_file, count, reason);
        }

        for warning in &diagnostics.warnings {
            warn!("{:?}: {}", input_file, warning);
        }

        info!("{:?}: {}", input_file, diagnostics);
    }

    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
