//! JSON project files.
//!
//! ## Format
//!
//! ```text
//! {
//!   "rows": 8,
//!   "cols": 13,
//!   "frames": [
//!     { "name": "Frame_1", "data": [0, 1, ...] }
//!   ]
//! }
//! ```
//!
//! Import validates the whole document before building an [`Animation`],
//! stopping at the first problem. Nothing is applied on failure.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::model::{has_whitespace, Animation, Frame, CELLS, COLS, ROWS};

/// Errors that can occur during JSON import.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("Invalid project file: expected a JSON object")]
    NotAnObject,

    #[error("Matrix size mismatch: expected 8x13")]
    SizeMismatch,

    #[error("Missing or invalid 'frames' array")]
    MissingFrames,

    #[error("Invalid frame at index {0}")]
    InvalidFrame(usize),

    #[error("Frame '{0}' has spaces in name")]
    SpacesInName(String),

    #[error("Frame '{name}' has incorrect data length ({found}, expected 104)")]
    DataLength { name: String, found: usize },

    #[error("Frame '{0}' has invalid LED values (only 0 and 1 allowed)")]
    InvalidLedValues(String),

    #[error("Project file contains no frames")]
    NoFrames,
}

/// Result type for JSON import.
pub type ImportResult<T> = Result<T, ImportError>;

#[derive(Serialize)]
struct ProjectFile<'a> {
    rows: usize,
    cols: usize,
    frames: Vec<FrameRecord<'a>>,
}

#[derive(Serialize)]
struct FrameRecord<'a> {
    name: &'a str,
    data: &'a [u8],
}

/// Exports the animation as a pretty-printed JSON project.
pub fn export(animation: &Animation) -> serde_json::Result<String> {
    let project = ProjectFile {
        rows: ROWS,
        cols: COLS,
        frames: animation
            .frames()
            .iter()
            .map(|f| FrameRecord {
                name: &f.name,
                data: &f.data,
            })
            .collect(),
    };
    serde_json::to_string_pretty(&project)
}

/// Imports a JSON project.
pub fn import(content: &str) -> ImportResult<Animation> {
    let value: Value = serde_json::from_str(content)?;
    let root = value.as_object().ok_or(ImportError::NotAnObject)?;

    if !is_number(root, "rows", ROWS) || !is_number(root, "cols", COLS) {
        return Err(ImportError::SizeMismatch);
    }

    let records = root
        .get("frames")
        .and_then(Value::as_array)
        .ok_or(ImportError::MissingFrames)?;

    let frames = records
        .iter()
        .enumerate()
        .map(|(index, record)| parse_frame(index, record))
        .collect::<ImportResult<Vec<Frame>>>()?;

    debug!(frames = frames.len(), "validated project file");
    Animation::from_frames(frames).ok_or(ImportError::NoFrames)
}

/// True if `key` holds a number equal to `expected`.
fn is_number(root: &Map<String, Value>, key: &str, expected: usize) -> bool {
    root.get(key)
        .and_then(Value::as_f64)
        .is_some_and(|v| v == expected as f64)
}

fn parse_frame(index: usize, record: &Value) -> ImportResult<Frame> {
    let name = record.get("name").and_then(Value::as_str);
    let data = record.get("data").and_then(Value::as_array);
    let (Some(name), Some(data)) = (name, data) else {
        return Err(ImportError::InvalidFrame(index));
    };

    if has_whitespace(name) {
        return Err(ImportError::SpacesInName(name.to_string()));
    }
    if data.len() != CELLS {
        return Err(ImportError::DataLength {
            name: name.to_string(),
            found: data.len(),
        });
    }

    let mut cells = [0u8; CELLS];
    for (cell, value) in cells.iter_mut().zip(data) {
        *cell = match value.as_f64() {
            Some(v) if v == 0.0 => 0,
            Some(v) if v == 1.0 => 1,
            _ => return Err(ImportError::InvalidLedValues(name.to_string())),
        };
    }
    Ok(Frame::from_cells(name, cells))
}
