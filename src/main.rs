//! ledanim - LED Matrix Animator
//!
//! A terminal editor for 8x13 LED matrix animations.
//!
//! ## Usage
//!
//! ```bash
//! ledanim                              # New animation
//! ledanim anim.json                    # Edit a project
//! ledanim anim.json -o frames.h        # Convert without opening the editor
//! ledanim anim.json -o - -f sketch     # Print an Arduino sketch
//! ```
//!
//! ## Supported Formats
//!
//! - JSON project (.json) - import and export
//! - C source (.h, .c, .txt) - export
//! - Arduino sketch (.ino) - export

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use ledanim::controller::run_app;
use ledanim::formats::{detect_format_from_extension, export_to_file, export_to_string, import_file, FileFormat};
use ledanim::model::{Animation, AppState};
use ledanim::ui::glyphs;

/// Runs CLI mode: load a project and write it in another format.
fn run_cli_mode(file_path: &Path, forced_format: Option<FileFormat>, output: &str) -> Result<()> {
    let animation = import_file(file_path)
        .with_context(|| format!("Failed to load {}", file_path.display()))?;

    if output == "-" {
        // Write to stdout, C source unless told otherwise
        let format = forced_format.unwrap_or(FileFormat::Source);
        let text = export_to_string(&animation, format)?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{}", text)?;
    } else {
        let format = forced_format.or_else(|| detect_format_from_extension(output));
        let written = export_to_file(&animation, output, format)
            .with_context(|| format!("Failed to write {}", output))?;
        eprintln!(
            "Wrote {} frames to {} ({})",
            animation.frame_count(),
            output,
            written
        );
    }

    Ok(())
}

/// Opens the editor, loading `file_path` if it exists.
fn run_tui_mode(file_path: Option<PathBuf>, ascii: bool) -> Result<()> {
    let glyphs = glyphs::select(!ascii);
    let state = match file_path {
        Some(path) if path.exists() => {
            let animation = import_file(&path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            AppState::new(animation).with_file_path(path)
        }
        // New project that will be saved to this path
        Some(path) => AppState::new(Animation::new()).with_file_path(path),
        None => AppState::new(Animation::new()),
    };

    run_app(state.with_glyphs(glyphs))
}

/// Sets up tracing.
///
/// In editor mode the terminal belongs to the UI, so logs only go to
/// `log_file`. Returns the guard that flushes the file writer on drop.
fn setup_logging(
    log_file: Option<&Path>,
    to_stderr: bool,
    level: LevelFilter,
) -> Result<Option<WorkerGuard>> {
    let mut guard = None;
    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let (writer, file_guard) = tracing_appender::non_blocking(file);
            guard = Some(file_guard);
            Some(
                fmt::layer()
                    .with_writer(writer)
                    .with_line_number(true)
                    .with_ansi(false),
            )
        }
        None => None,
    };
    let stderr_layer = to_stderr.then(|| fmt::layer().with_writer(io::stderr));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .with(level)
        .try_init()
        .context("Failed to set up logging")?;

    Ok(guard)
}

/// Maps the number of -v flags to a log level.
fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Output format specification for command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// JSON project file
    Json,
    /// C arrays for embedding in firmware
    Source,
    /// Complete Arduino sketch
    Sketch,
    /// Detect from the output file extension
    Auto,
}

impl From<FormatArg> for Option<FileFormat> {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => Some(FileFormat::Json),
            FormatArg::Source => Some(FileFormat::Source),
            FormatArg::Sketch => Some(FileFormat::Sketch),
            FormatArg::Auto => None,
        }
    }
}

/// ledanim - An editor for 8x13 LED matrix animations
///
/// When run without -o/--output, opens the interactive editor.
/// With -o/--output, converts FILE and writes the result to a file (or stdout with "-").
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON project to open (created on first save if it does not exist)
    file: Option<PathBuf>,

    /// Output format (overrides detection from the output extension)
    #[arg(short = 'f', long = "format", value_enum, default_value = "auto")]
    format: FormatArg,

    /// Output file (enables CLI mode). Use "-" for stdout.
    #[arg(short = 'o', long = "output", requires = "file")]
    output: Option<String>,

    /// Draw with plain ASCII characters
    #[arg(long = "ascii")]
    ascii: bool,

    /// Write logs to this file
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let cli_mode = args.output.is_some();

    let _log_guard = setup_logging(args.log_file.as_deref(), cli_mode, level_for(args.verbose))?;
    info!(version = env!("CARGO_PKG_VERSION"), cli_mode, "starting ledanim");

    let forced_format: Option<FileFormat> = args.format.into();

    match (args.output, args.file) {
        // CLI mode: output to file/stdout
        (Some(output), Some(file)) => run_cli_mode(&file, forced_format, &output)?,
        (Some(_), None) => anyhow::bail!("An input file is required with -o/--output"),
        (None, file) => run_tui_mode(file, args.ascii)?,
    }

    Ok(())
}
