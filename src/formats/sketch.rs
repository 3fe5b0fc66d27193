//! Arduino sketch export.
//!
//! Wraps the C frame arrays in a complete `.ino` file that drives an
//! `ArduinoLEDMatrix` and loops over every frame.

use chrono::{Local, NaiveDateTime};

use super::source::{check_unique_names, frame_arrays, pointer_array, ExportResult};
use crate::model::{Animation, CELLS};

/// Delay between frames in the generated sketch, in milliseconds.
pub const SKETCH_FRAME_DELAY_MS: u32 = 100;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Exports the animation as an Arduino sketch stamped with `generated`.
pub fn export(animation: &Animation, generated: NaiveDateTime) -> ExportResult<String> {
    check_unique_names(animation)?;

    let preamble = format!(
        "// LED Matrix Animation\n\
         // Generated by LED Matrix Animator\n\
         // Generated: {}\n\
         \n\
         #include <Arduino.h>\n\
         #include \"Arduino_LED_Matrix.h\"\n\
         \n\
         ArduinoLEDMatrix matrix;",
        generated.format(TIMESTAMP_FORMAT)
    );

    let skeleton = format!(
        "void setup() {{\n\
         \x20 matrix.begin();\n\
         }}\n\
         \n\
         void loop() {{\n\
         \x20 for (int i = 0; i < frameCount; i++) {{\n\
         \x20   matrix.loadPixels(animation[i], {CELLS});\n\
         \x20   delay({SKETCH_FRAME_DELAY_MS});\n\
         \x20 }}\n\
         }}\n"
    );

    Ok(format!(
        "{preamble}\n\n{arrays}\n\n{pointers}\nconst int frameCount = {count};\n\n{skeleton}",
        arrays = frame_arrays(animation),
        pointers = pointer_array(animation),
        count = animation.frame_count(),
    ))
}

/// Exports the animation stamped with the current local time.
pub fn export_now(animation: &Animation) -> ExportResult<String> {
    export(animation, Local::now().naive_local())
}
