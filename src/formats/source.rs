//! Embedded C source export.
//!
//! Each frame becomes a named `uint8_t` array with one line per matrix row,
//! followed by a pointer array listing every frame in playback order:
//!
//! ```text
//! // Frame_1
//! uint8_t Frame_1[104] = {
//!   0,0,0,0,0,0,0,0,0,0,0,0,0,
//!   ...
//! };
//!
//! uint8_t* animation[] = { Frame_1 };
//! ```

use thiserror::Error;

use crate::model::{Animation, Frame, CELLS};

/// Errors that can occur while generating C source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("Duplicate frame name '{0}': rename frames so each C array has a unique identifier")]
    DuplicateName(String),
}

/// Result type for source export.
pub type ExportResult<T> = Result<T, ExportError>;

/// Renders one frame as a commented C array declaration.
pub fn frame_array(frame: &Frame) -> String {
    let rows: Vec<String> = frame
        .rows()
        .map(|row| {
            let values: Vec<String> = row.iter().map(u8::to_string).collect();
            format!("  {},", values.join(","))
        })
        .collect();
    format!(
        "// {name}\nuint8_t {name}[{CELLS}] = {{\n{rows}\n}};",
        name = frame.name,
        rows = rows.join("\n")
    )
}

/// Renders the array of pointers to every frame.
pub fn pointer_array(animation: &Animation) -> String {
    let names: Vec<&str> = animation.frames().iter().map(|f| f.name.as_str()).collect();
    format!("uint8_t* animation[] = {{ {} }};", names.join(", "))
}

/// Renders every frame array, separated by blank lines.
pub(crate) fn frame_arrays(animation: &Animation) -> String {
    let arrays: Vec<String> = animation.frames().iter().map(frame_array).collect();
    arrays.join("\n\n")
}

/// Rejects animations whose frame names would collide as C identifiers.
pub(crate) fn check_unique_names(animation: &Animation) -> ExportResult<()> {
    match animation.duplicate_names().first() {
        Some(name) => Err(ExportError::DuplicateName(name.to_string())),
        None => Ok(()),
    }
}

/// Exports the animation as embedded C source.
pub fn export(animation: &Animation) -> ExportResult<String> {
    check_unique_names(animation)?;
    Ok(format!(
        "{}\n\n{}",
        frame_arrays(animation),
        pointer_array(animation)
    ))
}
