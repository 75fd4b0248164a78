// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
// Add other lints specific to this module that you want to allow but not auto-fix

use anyhow::{Result, anyhow, Context};
use log::{info, warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use json3vtt::app_config::{self, Config};
use json3vtt::app_controller::{Controller, FileOutcome};

/// Config file picked up from the working directory when no -c is given
const DEFAULT_CONFIG_PATH: &str = "json3vtt.json";

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert JSON3 captions to WebVTT (default command)
    Convert(ConvertArgs),

    /// Generate shell completions for json3vtt
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Input JSON3 file, or a directory to convert recursively
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output WebVTT file (default: input name with .vtt extension, '-' for stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Verbose output with per-event details
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report errors
    #[arg(short, long)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long)]
    config_path: Option<PathBuf>,

    /// Set logging level (overrides --verbose/--quiet)
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Merge consecutive identical captions separated by at most MS milliseconds
    #[arg(long, value_name = "MS")]
    merge_repeats: Option<u64>,

    /// Write '&', '<' and '>' in cue text unescaped
    #[arg(long)]
    no_escape: bool,
}

/// json3vtt - YouTube JSON3 captions to WebVTT
///
/// Converts YouTube's JSON3 caption files into WebVTT subtitles, cleaning
/// caption text and resolving overlapping caption revisions.
#[derive(Parser, Debug)]
#[command(name = "json3vtt")]
#[command(version)]
#[command(about = "Convert YouTube JSON3 captions to WebVTT")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "json3vtt converts YouTube JSON3 caption files into WebVTT subtitles.

EXAMPLES:
    json3vtt input.json3 -o output.vtt          # Convert to an explicit output file
    json3vtt subtitles.json3 --verbose          # Write subtitles.vtt with debug logging
    json3vtt video.json3 -o -                   # Print the WebVTT document to stdout
    json3vtt -f captions/                       # Convert every .json3 file in a directory
    json3vtt completions bash > json3vtt.bash   # Generate bash completions

CONFIGURATION:
    Settings are read from json3vtt.json in the working directory when present,
    or from the file given with --config-path. Command line flags take precedence.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    args: ConvertArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The logger itself lets everything through; log::set_max_level does the filtering.
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌",
            Level::Warn => "🚧",
            Level::Info => " ",
            Level::Debug => "🔍",
            Level::Trace => "📋",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // The level is adjusted after the config and flags are known
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "json3vtt", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Convert(args)) => run_convert(args).await,
        None => run_convert(cli.args).await,
    }
}

/// Pick the effective log level: explicit level, then quiet/verbose, then config
fn resolve_log_level(options: &ConvertArgs, config: &Config) -> app_config::LogLevel {
    if let Some(level) = &options.log_level {
        level.clone().into()
    } else if options.quiet {
        app_config::LogLevel::Error
    } else if options.verbose {
        app_config::LogLevel::Debug
    } else {
        config.log_level
    }
}

fn load_config(options: &ConvertArgs) -> Result<Config> {
    let mut config = match &options.config_path {
        Some(path) => Config::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Config::from_file(DEFAULT_CONFIG_PATH)?,
        None => Config::default(),
    };

    // Override config with CLI options if provided
    if let Some(merge_ms) = options.merge_repeats {
        config.conversion.merge_repeats_within_ms = Some(merge_ms);
    }
    if options.no_escape {
        config.conversion.escape_text = false;
    }
    config.log_level = resolve_log_level(options, &config);

    Ok(config)
}

async fn run_convert(options: ConvertArgs) -> Result<()> {
    let input_path = options
        .input_path
        .clone()
        .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

    let controller = Controller::with_config(load_config(&options)?)?;
    log::set_max_level(controller.config().log_level.to_level_filter());

    if input_path.is_dir() {
        if options.output.is_some() {
            return Err(anyhow!("--output cannot be used when the input is a directory"));
        }

        let summary = controller
            .run_folder(&input_path, options.force_overwrite)
            .await
            .context("Directory conversion failed")?;

        if summary.failed > 0 {
            return Err(anyhow!("{} file(s) failed to convert", summary.failed));
        }
        return Ok(());
    }

    if !input_path.is_file() {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    let outcome = controller
        .run(&input_path, options.output.clone(), options.force_overwrite)
        .await?;

    match outcome {
        FileOutcome::Written { path, diagnostics } => {
            if diagnostics.is_empty_result() {
                warn!("Wrote a WebVTT file without cues: {:?}", path);
            }
            info!("Success: {:?}", path);
        }
        FileOutcome::Printed { .. } => {
            info!("Success: written to stdout");
        }
        FileOutcome::SkippedExisting { .. } => {}
    }

    Ok(())
}
