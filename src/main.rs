// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};

use crate::app_config::Config;
use crate::app_controller::{Controller, OutputTarget};
use crate::subtitle_processor::SubtitleFormat;

mod app_config;
mod app_controller;
mod correction;
mod correctors;
mod errors;
mod file_utils;
mod repair;
mod report;
mod subtitle_processor;

/// CLI Wrapper for SubtitleFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliOutputFormat {
    Srt,
    Vtt,
}

impl From<CliOutputFormat> for SubtitleFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Srt => SubtitleFormat::Srt,
            CliOutputFormat::Vtt => SubtitleFormat::Vtt,
        }
    }
}

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
    /// Repair subtitle timings and correct subtitle text (default command)
    #[command(alias = "repair")]
    Fix(FixArgs),

    /// Generate shell completions for subfix
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct FixArgs {
    /// Input subtitle file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Input subtitle file or directory (named form of INPUT_PATH)
    #[arg(short = 'i', long = "input", value_name = "INPUT_PATH", conflicts_with = "input_path")]
    input: Option<PathBuf>,

    /// Output file path (single-file mode only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format, overriding extension detection
    #[arg(long, value_enum)]
    output_format: Option<CliOutputFormat>,

    /// Overwrite the input file(s) instead of writing elsewhere
    #[arg(long, conflicts_with = "output")]
    in_place: bool,

    /// Report what would change without writing any file
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Run the grammar pass against a LanguageTool server
    #[arg(long, alias = "enable-lt")]
    enable_grammar: bool,

    /// Cues on each side contributing to correction context
    #[arg(long)]
    context_window: Option<usize>,

    /// Minimum cue duration after repair, in seconds
    #[arg(long)]
    min_duration: Option<f64>,

    /// Keep original cue numbers instead of renumbering
    #[arg(short, long)]
    preserve_numbering: bool,

    /// Print the full per-cue report as JSON on stdout
    #[arg(long)]
    json_report: bool,

    /// Configuration file path
    #[arg(short, long)]
    config_path: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// subfix - Subtitle timeline repair and text correction
///
/// Repairs zero-length, inverted and overlapping cue timings, merges short
/// sentence fragments, and conservatively corrects Chinese and English text.
#[derive(Parser, Debug)]
#[command(name = "subfix")]
#[command(version = "1.0.0")]
#[command(about = "Subtitle timeline repair and text correction tool")]
#[command(long_about = "subfix repairs broken subtitle timelines and conservatively corrects subtitle text.

EXAMPLES:
    subfix movie.srt -o fixed.srt            # Fix into a new file
    subfix --in-place movie.srt              # Overwrite the input
    subfix -n movie.srt                      # Dry run, report only
    subfix --input movie.srt -o fixed.vtt    # Fix and convert to WebVTT
    subfix --enable-lt --in-place movie.srt  # Fix with a LanguageTool grammar pass
    subfix --min-duration 0.8 --in-place /subs/   # Fix a whole folder with a custom floor
    subfix completions bash > subfix.bash    # Generate bash completions

CONFIGURATION:
    An optional JSON config file can be given with --config-path. Every setting
    has a default, so running without one works.

GRAMMAR PASS:
    The grammar pass needs a running LanguageTool server (default
    http://localhost:8010). When the server is unreachable the pass is skipped
    and typo-only correction still applies.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input subtitle file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Input subtitle file or directory (named form of INPUT_PATH)
    #[arg(short = 'i', long = "input", value_name = "INPUT_PATH", conflicts_with = "input_path")]
    input: Option<PathBuf>,

    /// Output file path (single-file mode only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format, overriding extension detection
    #[arg(long, value_enum)]
    output_format: Option<CliOutputFormat>,

    /// Overwrite the input file(s) instead of writing elsewhere
    #[arg(long, conflicts_with = "output")]
    in_place: bool,

    /// Report what would change without writing any file
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Run the grammar pass against a LanguageTool server
    #[arg(long, alias = "enable-lt")]
    enable_grammar: bool,

    /// Cues on each side contributing to correction context
    #[arg(long)]
    context_window: Option<usize>,

    /// Minimum cue duration after repair, in seconds
    #[arg(long)]
    min_duration: Option<f64>,

    /// Keep original cue numbers instead of renumbering
    #[arg(short, long)]
    preserve_numbering: bool,

    /// Print the full per-cue report as JSON on stdout
    #[arg(long)]
    json_report: bool,

    /// Configuration file path
    #[arg(short, long)]
    config_path: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
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
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
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
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} [{}] {}\x1B[0m",
                color,
                now,
                record.level(),
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
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subfix", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Fix(args)) => run_fix(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let fix_args = FixArgs {
                input_path: cli.input_path,
                input: cli.input,
                output: cli.output,
                output_format: cli.output_format,
                in_place: cli.in_place,
                dry_run: cli.dry_run,
                enable_grammar: cli.enable_grammar,
                context_window: cli.context_window,
                min_duration: cli.min_duration,
                preserve_numbering: cli.preserve_numbering,
                json_report: cli.json_report,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_fix(fix_args).await
        }
    }
}

/// Overwriting the source is only done when asked for explicitly
fn check_destination(options: &FixArgs) -> Result<()> {
    if options.dry_run || options.in_place || options.output.is_some() {
        return Ok(());
    }
    Err(anyhow!(
        "No destination given: pass --output <path>, or --in-place to overwrite the input"
    ))
}

async fn run_fix(options: FixArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.into());
    }

    let mut config = Config::from_optional_file(options.config_path.as_deref())?;

    // Override config with CLI options if provided
    if options.enable_grammar {
        config.enable_grammar = true;
    }
    if options.preserve_numbering {
        config.preserve_numbering = true;
    }
    if let Some(window) = options.context_window {
        config.context_window = window;
    }
    if let Some(min_duration) = options.min_duration {
        if !min_duration.is_finite() || min_duration <= 0.0 {
            return Err(anyhow!("--min-duration must be a positive number of seconds"));
        }
        config.min_duration_ms = (min_duration * 1000.0).round() as u64;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.into());
    }

    let controller = Controller::new(config);
    let input = options
        .input
        .as_ref()
        .or(options.input_path.as_ref())
        .ok_or_else(|| anyhow!("An input path is required, positional or via --input"))?;

    check_destination(&options)?;

    if input.is_file() {
        let target = OutputTarget {
            path: options.output.clone(),
            format: options.output_format.clone().map(Into::into),
        };
        let report = controller.run_file(input, &target, options.dry_run).await?;
        if options.json_report {
            println!("{}", report.to_json()?);
        } else {
            println!("{}", report);
        }
        Ok(())
    } else if input.is_dir() {
        if options.output.is_some() || options.output_format.is_some() {
            return Err(anyhow!(
                "--output and --output-format only apply to single-file mode"
            ));
        }
        let reports = controller.run_folder(input, options.dry_run).await?;
        info!("Fixed {} file(s)", reports.len());
        for report in &reports {
            println!("{}", report);
        }
        Ok(())
    } else {
        Err(anyhow!("Input path does not exist: {}", input.display()))
    }
}
