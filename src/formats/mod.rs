//! Animation import and export.
//!
//! Supported formats:
//! - JSON project (.json) - import and export
//! - Embedded C source (.h, .c, .txt) - export only
//! - Arduino sketch (.ino) - export only
//!
//! Format selection priority:
//! 1. Explicit format specification (-f option)
//! 2. File extension

pub mod json;
pub mod sketch;
pub mod source;

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::model::Animation;

/// Default file name for JSON project exports.
pub const DEFAULT_JSON_FILE: &str = "led_animation.json";
/// Default file name for sketch exports.
pub const DEFAULT_SKETCH_FILE: &str = "led_animation.ino";

/// Output/input file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Source,
    Sketch,
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileFormat::Json => write!(f, "JSON"),
            FileFormat::Source => write!(f, "C source"),
            FileFormat::Sketch => write!(f, "Arduino sketch"),
        }
    }
}

/// Errors that can occur while reading or writing animation files.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("File error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Could not determine output format for '{0}'.\n\
             Hint: Use -f/--format to specify the format explicitly:\n  \
             ledanim -f json <file>     # JSON project\n  \
             ledanim -f source <file>   # C arrays\n  \
             ledanim -f sketch <file>   # Arduino sketch")]
    UnknownFormat(String),

    #[error("Only JSON project files can be imported ({0} is export-only)")]
    NotImportable(FileFormat),

    #[error("Import failed: {0}")]
    ImportError(#[from] json::ImportError),

    #[error("Export failed: {0}")]
    ExportError(#[from] source::ExportError),

    #[error("JSON encoding failed: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for file operations.
pub type FormatResult<T> = Result<T, FormatError>;

/// Detects format from file extension.
pub fn detect_format_from_extension<P: AsRef<Path>>(path: P) -> Option<FileFormat> {
    let ext = path.as_ref().extension().and_then(OsStr::to_str)?;
    match ext.to_lowercase().as_str() {
        "json" => Some(FileFormat::Json),
        "h" | "c" | "txt" => Some(FileFormat::Source),
        "ino" => Some(FileFormat::Sketch),
        _ => None,
    }
}

/// Renders the animation in the given format.
///
/// Sketches are stamped with the current local time.
pub fn export_to_string(animation: &Animation, format: FileFormat) -> FormatResult<String> {
    let text = match format {
        FileFormat::Json => json::export(animation)?,
        FileFormat::Source => source::export(animation)?,
        FileFormat::Sketch => sketch::export_now(animation)?,
    };
    Ok(text)
}

/// Writes the animation to a file.
///
/// The format is `forced_format` if given, otherwise detected from the
/// extension. Returns the format that was written.
#[tracing::instrument(skip(animation, path), fields(path = %path.as_ref().display()))]
pub fn export_to_file<P: AsRef<Path>>(
    animation: &Animation,
    path: P,
    forced_format: Option<FileFormat>,
) -> FormatResult<FileFormat> {
    let path = path.as_ref();
    let format = forced_format
        .or_else(|| detect_format_from_extension(path))
        .ok_or_else(|| FormatError::UnknownFormat(path.display().to_string()))?;

    let text = export_to_string(animation, format)?;
    fs::write(path, text)?;
    info!(%format, frames = animation.frame_count(), "wrote animation");
    Ok(format)
}

/// Reads a JSON project file.
///
/// The live animation is only replaced by the caller once this succeeds.
#[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn import_file<P: AsRef<Path>>(path: P) -> FormatResult<Animation> {
    let path = path.as_ref();
    if let Some(format) = detect_format_from_extension(path) {
        if format != FileFormat::Json {
            return Err(FormatError::NotImportable(format));
        }
    }

    let content = fs::read_to_string(path)?;
    let animation = json::import(&content)?;
    info!(frames = animation.frame_count(), "imported animation");
    Ok(animation)
}
