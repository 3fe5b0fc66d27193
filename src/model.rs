//! Data model for the LED matrix animator.
//!
//! This module contains all data structures for representing:
//! - Frames (one bitmap of the 8x13 matrix) and animations (ordered frames)
//! - The grid cursor
//! - Application state shared by the event handlers and the renderer
//!
//! Every mutation on [`Animation`] validates its arguments before touching
//! any frame, so a failed operation leaves the model unchanged.

use std::path::PathBuf;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::commands::Command;
use crate::formats::{self, source, FileFormat};
use crate::playback::Playback;
use crate::ui::glyphs::{self, Glyphs};

/// Number of LED rows on the matrix.
pub const ROWS: usize = 8;
/// Number of LED columns on the matrix.
pub const COLS: usize = 13;
/// Total number of cells in a frame.
pub const CELLS: usize = ROWS * COLS;

/// Errors raised by editing operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Frame index {index} out of range (animation has {count} frames)")]
    FrameOutOfRange { index: usize, count: usize },

    #[error("Cell index {0} out of range for an 8x13 matrix")]
    CellOutOfRange(usize),

    #[error("Frame name '{0}' cannot contain spaces")]
    WhitespaceInName(String),
}

/// Result type for editing operations.
pub type EditResult<T> = Result<T, EditError>;

/// Returns true if `name` contains any whitespace character.
pub fn has_whitespace(name: &str) -> bool {
    name.chars().any(char::is_whitespace)
}

/// Default name for the frame at a 0-based position.
pub fn default_frame_name(index: usize) -> String {
    format!("Frame_{}", index + 1)
}

/// One static bitmap of the LED matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Identifier, also used as the C array name on export
    pub name: String,
    /// Cell values in row-major order, each 0 or 1
    pub data: [u8; CELLS],
}

impl Frame {
    /// Creates an all-off frame.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: [0; CELLS],
        }
    }

    /// Creates a frame from existing cell values.
    ///
    /// Any non-zero value is stored as 1.
    pub fn from_cells(name: impl Into<String>, cells: [u8; CELLS]) -> Self {
        let mut data = cells;
        for v in data.iter_mut() {
            *v = u8::from(*v != 0);
        }
        Self {
            name: name.into(),
            data,
        }
    }

    /// Flattened index of a (row, column) position.
    pub fn index_of(row: usize, col: usize) -> Option<usize> {
        (row < ROWS && col < COLS).then(|| row * COLS + col)
    }

    /// Gets the value at a (row, column) position.
    pub fn cell(&self, row: usize, col: usize) -> Option<u8> {
        Self::index_of(row, col).map(|i| self.data[i])
    }

    /// Returns true if the cell at `index` is lit.
    pub fn is_lit(&self, index: usize) -> bool {
        self.data.get(index).is_some_and(|&v| v == 1)
    }

    /// Flips one cell.
    pub fn toggle(&mut self, index: usize) -> EditResult<()> {
        let cell = self
            .data
            .get_mut(index)
            .ok_or(EditError::CellOutOfRange(index))?;
        *cell ^= 1;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.data = [0; CELLS];
    }

    pub fn fill(&mut self) {
        self.data = [1; CELLS];
    }

    pub fn invert(&mut self) {
        for v in self.data.iter_mut() {
            *v ^= 1;
        }
    }

    /// Number of lit cells.
    pub fn lit_count(&self) -> usize {
        self.data.iter().filter(|&&v| v == 1).count()
    }

    /// Iterates over the rows of the frame.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks(COLS)
    }
}

/// An ordered sequence of frames plus the position being edited.
///
/// Always holds at least one frame; `current` is always a valid index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    frames: Vec<Frame>,
    current: usize,
}

impl Default for Animation {
    fn default() -> Self {
        Self::new()
    }
}

impl Animation {
    /// Creates an animation with a single empty frame named `Frame_1`.
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::new(default_frame_name(0))],
            current: 0,
        }
    }

    /// Builds an animation from existing frames, positioned on the first one.
    ///
    /// Returns `None` if `frames` is empty.
    pub fn from_frames(frames: Vec<Frame>) -> Option<Self> {
        if frames.is_empty() {
            return None;
        }
        Some(Self { frames, current: 0 })
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Gets a frame by index.
    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Index of the frame being displayed/edited.
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_frame(&self) -> &Frame {
        &self.frames[self.current]
    }

    /// Makes another frame current.
    pub fn set_current(&mut self, index: usize) -> EditResult<()> {
        self.check_frame(index)?;
        self.current = index;
        Ok(())
    }

    fn check_frame(&self, index: usize) -> EditResult<()> {
        if index < self.frames.len() {
            Ok(())
        } else {
            Err(EditError::FrameOutOfRange {
                index,
                count: self.frames.len(),
            })
        }
    }

    fn frame_mut(&mut self, index: usize) -> EditResult<&mut Frame> {
        self.check_frame(index)?;
        Ok(&mut self.frames[index])
    }

    /// Flips one cell in the addressed frame.
    pub fn toggle_cell(&mut self, frame: usize, cell: usize) -> EditResult<()> {
        self.frame_mut(frame)?.toggle(cell)
    }

    /// Flips the cell at (row, column) in the addressed frame.
    pub fn toggle_cell_at(&mut self, frame: usize, row: usize, col: usize) -> EditResult<()> {
        let cell = Frame::index_of(row, col)
            .ok_or(EditError::CellOutOfRange(row.saturating_mul(COLS).saturating_add(col)))?;
        self.toggle_cell(frame, cell)
    }

    /// Turns every cell of a frame off.
    pub fn clear(&mut self, frame: usize) -> EditResult<()> {
        self.frame_mut(frame)?.clear();
        Ok(())
    }

    /// Turns every cell of a frame on.
    pub fn fill(&mut self, frame: usize) -> EditResult<()> {
        self.frame_mut(frame)?.fill();
        Ok(())
    }

    /// Complements every cell of a frame.
    pub fn invert(&mut self, frame: usize) -> EditResult<()> {
        self.frame_mut(frame)?.invert();
        Ok(())
    }

    /// Appends an empty frame and makes it current.
    pub fn add_frame(&mut self) {
        let name = default_frame_name(self.frames.len());
        self.frames.push(Frame::new(name));
        self.current = self.frames.len() - 1;
    }

    /// Inserts a copy of frame `index` right after it and makes the copy current.
    pub fn duplicate_frame(&mut self, index: usize) -> EditResult<()> {
        self.check_frame(index)?;
        let source = &self.frames[index];
        let copy = Frame {
            name: format!("{}_copy", source.name),
            data: source.data,
        };
        self.frames.insert(index + 1, copy);
        self.current = index + 1;
        Ok(())
    }

    /// Removes frame `index`.
    ///
    /// The last remaining frame is never removed; it is cleared instead.
    pub fn delete_frame(&mut self, index: usize) -> EditResult<()> {
        self.check_frame(index)?;
        if self.frames.len() > 1 {
            self.frames.remove(index);
            self.current = index.saturating_sub(1);
        } else {
            self.frames[index].clear();
        }
        Ok(())
    }

    /// Advances to the next frame, wrapping to the first.
    pub fn next_frame(&mut self) {
        self.current = (self.current + 1) % self.frames.len();
    }

    /// Steps back to the previous frame, wrapping to the last.
    pub fn prev_frame(&mut self) {
        let count = self.frames.len();
        self.current = (self.current + count - 1) % count;
    }

    /// Renames a frame.
    ///
    /// Surrounding whitespace is trimmed; an empty name falls back to
    /// `Frame_{index + 1}`. Names with inner whitespace are rejected.
    pub fn rename_frame(&mut self, index: usize, new_name: &str) -> EditResult<()> {
        let name = new_name.trim();
        if has_whitespace(name) {
            return Err(EditError::WhitespaceInName(name.to_string()));
        }
        let frame = self.frame_mut(index)?;
        frame.name = if name.is_empty() {
            default_frame_name(index)
        } else {
            name.to_string()
        };
        Ok(())
    }

    /// Names used by more than one frame, in order of first appearance.
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut dupes: Vec<&str> = Vec::new();
        for (i, frame) in self.frames.iter().enumerate() {
            let name = frame.name.as_str();
            if dupes.contains(&name) {
                continue;
            }
            if self.frames[i + 1..].iter().any(|f| f.name == name) {
                dupes.push(name);
            }
        }
        dupes
    }
}

/// The cursor position on the LED grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

impl Cursor {
    /// Creates a new cursor at origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cursor at a specific position.
    pub fn at(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Flattened cell index under the cursor.
    pub fn index(&self) -> usize {
        self.row * COLS + self.col
    }
}

/// Application mode for handling different input states.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Grid editing mode
    #[default]
    Normal,
    /// Command input mode (after pressing ':')
    Command(String),
    /// Editing the name of `frame`
    Rename { frame: usize, name: String },
}

/// The complete application state.
#[derive(Debug)]
pub struct AppState {
    /// The animation being edited
    pub animation: Animation,
    /// Current cursor position on the grid
    pub cursor: Cursor,
    /// Current application mode
    pub mode: AppMode,
    /// Periodic frame advance
    pub playback: Playback,
    /// Whether the application should quit
    pub should_quit: bool,
    /// Whether the help overlay is visible
    pub show_help: bool,
    /// Status message to display, cleared by the next key action
    pub status_message: Option<String>,
    /// Project file used by `:w` and `:e` when no path is given
    pub file_path: Option<PathBuf>,
    /// Text waiting to be sent to the system clipboard by the controller
    pub clipboard_request: Option<String>,
    /// Glyph set used by the renderer
    pub glyphs: Glyphs,
}

impl AppState {
    /// Creates a new application state with the given animation.
    pub fn new(animation: Animation) -> Self {
        Self {
            animation,
            cursor: Cursor::new(),
            mode: AppMode::Normal,
            playback: Playback::new(),
            should_quit: false,
            show_help: false,
            status_message: None,
            file_path: None,
            clipboard_request: None,
            glyphs: glyphs::select(true),
        }
    }

    /// Sets the project file used by `:w` / `:e` without arguments.
    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Replaces the glyph set.
    pub fn with_glyphs(mut self, glyphs: Glyphs) -> Self {
        self.glyphs = glyphs;
        self
    }

    /// Applies an editing command; errors become the status message.
    pub fn run_command(&mut self, command: Command) {
        match command.apply(&self.animation) {
            Ok(animation) => {
                debug!(?command, "applied command");
                self.animation = animation;
            }
            Err(e) => {
                warn!(?command, error = %e, "command rejected");
                self.status_message = Some(e.to_string());
            }
        }
    }

    /// Moves the cursor up by one row.
    pub fn move_up(&mut self) {
        self.cursor.row = self.cursor.row.saturating_sub(1);
    }

    /// Moves the cursor down by one row.
    pub fn move_down(&mut self) {
        if self.cursor.row + 1 < ROWS {
            self.cursor.row += 1;
        }
    }

    /// Moves the cursor left by one column.
    pub fn move_left(&mut self) {
        self.cursor.col = self.cursor.col.saturating_sub(1);
    }

    /// Moves the cursor right by one column.
    pub fn move_right(&mut self) {
        if self.cursor.col + 1 < COLS {
            self.cursor.col += 1;
        }
    }

    /// Flips the cell under the cursor in the current frame.
    pub fn toggle_at_cursor(&mut self) {
        self.run_command(Command::ToggleCell {
            frame: self.animation.current(),
            cell: self.cursor.index(),
        });
    }

    /// Starts or stops playback.
    pub fn toggle_playback(&mut self, now: Instant) {
        let playing = self.playback.toggle(now);
        self.status_message = Some(if playing { "Playing" } else { "Paused" }.to_string());
    }

    /// Advances playback if it is due.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.playback.tick(now, &mut self.animation)
    }

    /// Queues the embedded-source text for the clipboard.
    pub fn request_copy(&mut self) {
        match source::export(&self.animation) {
            Ok(code) => self.clipboard_request = Some(code),
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    /// Records the outcome of a clipboard write.
    pub fn clipboard_result(&mut self, ok: bool) {
        self.status_message = Some(if ok {
            "Code copied!".to_string()
        } else {
            "Unable to copy automatically.".to_string()
        });
    }

    /// Shows the help overlay.
    pub fn show_help(&mut self) {
        self.show_help = true;
    }

    /// Hides the help overlay.
    pub fn dismiss_help(&mut self) {
        self.show_help = false;
    }

    /// Enters command mode.
    pub fn enter_command_mode(&mut self) {
        self.mode = AppMode::Command(String::new());
    }

    /// Handles a character input in command mode.
    pub fn command_input(&mut self, c: char) {
        if let AppMode::Command(ref mut cmd) = self.mode {
            cmd.push(c);
        }
    }

    /// Handles backspace in command mode.
    pub fn command_backspace(&mut self) {
        if let AppMode::Command(ref mut cmd) = self.mode {
            cmd.pop();
            if cmd.is_empty() {
                self.mode = AppMode::Normal;
            }
        }
    }

    /// Executes the current command line.
    pub fn execute_command(&mut self) {
        if let AppMode::Command(cmd) = std::mem::take(&mut self.mode) {
            let cmd = cmd.trim();
            let (verb, arg) = match cmd.split_once(char::is_whitespace) {
                Some((verb, arg)) => (verb, Some(arg.trim())),
                None => (cmd, None),
            };
            match verb {
                "q" | "quit" => self.should_quit = true,
                "h" | "help" => self.show_help(),
                "w" | "write" => {
                    self.write_file(arg.map(PathBuf::from));
                }
                "wq" => {
                    // Stay open if the write failed so the error is shown
                    if self.write_file(arg.map(PathBuf::from)) {
                        self.should_quit = true;
                    }
                }
                "e" | "edit" => self.load_file(arg.map(PathBuf::from)),
                "sketch" => {
                    let path = arg
                        .map(PathBuf::from)
                        .unwrap_or_else(|| PathBuf::from(formats::DEFAULT_SKETCH_FILE));
                    self.write_file(Some(path));
                }
                _ => {
                    if let Ok(n) = cmd.parse::<usize>() {
                        self.goto_frame(n);
                    } else {
                        self.status_message = Some(format!("Unknown command: {}", cmd));
                    }
                }
            }
        }
        self.mode = AppMode::Normal;
    }

    /// Cancels command or rename mode and returns to normal mode.
    pub fn cancel_input(&mut self) {
        self.mode = AppMode::Normal;
    }

    /// Jumps to a frame by its 1-based position.
    fn goto_frame(&mut self, n: usize) {
        if n > 0 && n <= self.animation.frame_count() {
            self.run_command(Command::SelectFrame(n - 1));
        } else {
            self.status_message = Some(format!("Invalid frame: {}", n));
        }
    }

    /// Exports to `path` (or the project file); returns true on success.
    fn write_file(&mut self, path: Option<PathBuf>) -> bool {
        let path = path
            .or_else(|| self.file_path.clone())
            .unwrap_or_else(|| PathBuf::from(formats::DEFAULT_JSON_FILE));
        match formats::export_to_file(&self.animation, &path, None) {
            Ok(format) => {
                info!(path = %path.display(), %format, "exported animation");
                if format == FileFormat::Json {
                    self.file_path = Some(path.clone());
                }
                self.status_message = Some(format!(
                    "Wrote {} frames to {} ({})",
                    self.animation.frame_count(),
                    path.display(),
                    format
                ));
                true
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "export failed");
                self.status_message = Some(e.to_string());
                false
            }
        }
    }

    fn load_file(&mut self, path: Option<PathBuf>) {
        let Some(path) = path.or_else(|| self.file_path.clone()) else {
            self.status_message = Some("No file name".to_string());
            return;
        };
        match formats::import_file(&path) {
            Ok(animation) => {
                self.playback.pause();
                self.status_message = Some(format!(
                    "Imported {} frames from {}",
                    animation.frame_count(),
                    path.display()
                ));
                self.animation = animation;
                self.file_path = Some(path);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "import failed");
                self.status_message = Some(e.to_string());
            }
        }
    }

    /// Enters rename mode for the current frame, pre-filled with its name.
    ///
    /// The frame index is captured here so playback moving `current`
    /// does not redirect the rename.
    pub fn enter_rename_mode(&mut self) {
        let frame = self.animation.current();
        self.mode = AppMode::Rename {
            frame,
            name: self.animation.current_frame().name.clone(),
        };
    }

    /// Handles a character input in rename mode.
    pub fn rename_input(&mut self, c: char) {
        if let AppMode::Rename { ref mut name, .. } = self.mode {
            name.push(c);
        }
    }

    /// Handles backspace in rename mode.
    pub fn rename_backspace(&mut self) {
        if let AppMode::Rename { ref mut name, .. } = self.mode {
            name.pop();
        }
    }

    /// Returns false while the pending name would be rejected.
    pub fn rename_is_valid(&self) -> bool {
        match &self.mode {
            AppMode::Rename { name, .. } => !has_whitespace(name.trim()),
            _ => true,
        }
    }

    /// Applies the pending name; an invalid name keeps rename mode open.
    pub fn commit_rename(&mut self) {
        let AppMode::Rename { frame, name } = &self.mode else {
            return;
        };
        let command = Command::RenameFrame {
            frame: *frame,
            name: name.clone(),
        };
        match command.apply(&self.animation) {
            Ok(animation) => {
                self.animation = animation;
                self.mode = AppMode::Normal;
            }
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_binary(animation: &Animation) {
        for frame in animation.frames() {
            assert_eq!(frame.data.len(), CELLS);
            assert!(frame.data.iter().all(|&v| v == 0 || v == 1));
        }
    }

    #[test]
    fn test_new_animation() {
        let anim = Animation::new();
        assert_eq!(anim.frame_count(), 1);
        assert_eq!(anim.current(), 0);
        assert_eq!(anim.current_frame().name, "Frame_1");
        assert_eq!(anim.current_frame().lit_count(), 0);
    }

    #[test]
    fn test_index_of() {
        assert_eq!(Frame::index_of(0, 0), Some(0));
        assert_eq!(Frame::index_of(1, 0), Some(13));
        assert_eq!(Frame::index_of(7, 12), Some(103));
        assert_eq!(Frame::index_of(8, 0), None);
        assert_eq!(Frame::index_of(0, 13), None);
    }

    #[test]
    fn test_from_cells_normalizes() {
        let mut cells = [0; CELLS];
        cells[3] = 7;
        let frame = Frame::from_cells("f", cells);
        assert_eq!(frame.data[3], 1);
    }

    #[test]
    fn test_toggle_cell() {
        let mut anim = Animation::new();
        anim.toggle_cell_at(0, 0, 0).unwrap();
        assert_eq!(anim.current_frame().data[0], 1);
        anim.toggle_cell(0, 0).unwrap();
        assert_eq!(anim.current_frame().data[0], 0);

        anim.toggle_cell_at(0, 2, 5).unwrap();
        assert_eq!(anim.current_frame().cell(2, 5), Some(1));
        assert!(anim.current_frame().is_lit(31));
    }

    #[test]
    fn test_toggle_out_of_range() {
        let mut anim = Animation::new();
        assert_eq!(anim.toggle_cell(0, CELLS), Err(EditError::CellOutOfRange(CELLS)));
        assert_eq!(
            anim.toggle_cell(1, 0),
            Err(EditError::FrameOutOfRange { index: 1, count: 1 })
        );
        assert_eq!(anim, Animation::new());
    }

    #[test]
    fn test_invert_is_involution() {
        let mut anim = Animation::new();
        for cell in [0, 7, 50, 103] {
            anim.toggle_cell(0, cell).unwrap();
        }
        let before = anim.current_frame().clone();
        anim.invert(0).unwrap();
        assert_eq!(anim.current_frame().lit_count(), CELLS - 4);
        anim.invert(0).unwrap();
        assert_eq!(anim.current_frame(), &before);
        assert_binary(&anim);
    }

    #[test]
    fn test_fill_then_clear() {
        let mut anim = Animation::new();
        anim.fill(0).unwrap();
        assert_eq!(anim.current_frame().lit_count(), CELLS);
        anim.clear(0).unwrap();
        assert_eq!(anim.current_frame().lit_count(), 0);
        anim.fill(0).unwrap();
        assert!(anim.current_frame().data.iter().all(|&v| v == 1));
    }

    #[test]
    fn test_add_frame() {
        let mut anim = Animation::new();
        anim.add_frame();
        assert_eq!(anim.frame_count(), 2);
        assert_eq!(anim.current(), 1);
        assert_eq!(anim.current_frame().name, "Frame_2");
    }

    #[test]
    fn test_edit_scenario() {
        let mut anim = Animation::new();
        anim.toggle_cell_at(0, 0, 0).unwrap();
        assert_eq!(anim.frame(0).unwrap().data[0], 1);

        anim.add_frame();
        assert_eq!(anim.frame_count(), 2);
        assert_eq!(anim.current(), 1);
        assert_eq!(anim.frame(1).unwrap().name, "Frame_2");
        assert_eq!(anim.frame(1).unwrap().lit_count(), 0);

        anim.duplicate_frame(0).unwrap();
        let names: Vec<&str> = anim.frames().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Frame_1", "Frame_1_copy", "Frame_2"]);
        assert_eq!(anim.current(), 1);
        assert_eq!(anim.frame(1).unwrap().data, anim.frame(0).unwrap().data);
    }

    #[test]
    fn test_duplicate_is_deep_copy() {
        let mut anim = Animation::new();
        anim.duplicate_frame(0).unwrap();
        anim.toggle_cell(1, 10).unwrap();
        assert_eq!(anim.frame(0).unwrap().lit_count(), 0);
        assert_eq!(anim.frame(1).unwrap().lit_count(), 1);
    }

    #[test]
    fn test_delete_frame() {
        let mut anim = Animation::new();
        anim.add_frame();
        anim.add_frame();
        anim.delete_frame(2).unwrap();
        assert_eq!(anim.frame_count(), 2);
        assert_eq!(anim.current(), 1);

        anim.delete_frame(0).unwrap();
        assert_eq!(anim.frame_count(), 1);
        assert_eq!(anim.current(), 0);
        assert_eq!(anim.current_frame().name, "Frame_2");
    }

    #[test]
    fn test_delete_last_frame_clears() {
        let mut anim = Animation::new();
        anim.fill(0).unwrap();
        anim.delete_frame(0).unwrap();
        assert_eq!(anim.frame_count(), 1);
        assert_eq!(anim.current_frame().lit_count(), 0);
        assert_eq!(anim.current_frame().name, "Frame_1");
    }

    #[test]
    fn test_next_prev_circular() {
        let mut anim = Animation::new();
        anim.add_frame();
        anim.add_frame();
        anim.set_current(1).unwrap();

        for _ in 0..anim.frame_count() {
            anim.next_frame();
        }
        assert_eq!(anim.current(), 1);

        for start in 0..anim.frame_count() {
            anim.set_current(start).unwrap();
            anim.prev_frame();
            anim.next_frame();
            assert_eq!(anim.current(), start);
        }

        anim.set_current(0).unwrap();
        anim.prev_frame();
        assert_eq!(anim.current(), 2);
        anim.next_frame();
        assert_eq!(anim.current(), 0);
    }

    #[test]
    fn test_rename_frame() {
        let mut anim = Animation::new();
        anim.rename_frame(0, "heart").unwrap();
        assert_eq!(anim.current_frame().name, "heart");

        anim.rename_frame(0, "  smile  ").unwrap();
        assert_eq!(anim.current_frame().name, "smile");

        assert_eq!(
            anim.rename_frame(0, "big heart"),
            Err(EditError::WhitespaceInName("big heart".to_string()))
        );
        assert_eq!(anim.current_frame().name, "smile");

        anim.add_frame();
        anim.rename_frame(1, "").unwrap();
        assert_eq!(anim.frame(1).unwrap().name, "Frame_2");
    }

    #[test]
    fn test_duplicate_names() {
        let mut anim = Animation::new();
        assert!(anim.duplicate_names().is_empty());
        anim.duplicate_frame(0).unwrap();
        anim.duplicate_frame(0).unwrap();
        assert_eq!(anim.duplicate_names(), ["Frame_1_copy"]);
    }

    #[test]
    fn test_cursor_movement() {
        let mut state = AppState::new(Animation::new());
        state.move_up();
        state.move_left();
        assert_eq!(state.cursor, Cursor::at(0, 0));

        for _ in 0..20 {
            state.move_down();
            state.move_right();
        }
        assert_eq!(state.cursor, Cursor::at(ROWS - 1, COLS - 1));
        assert_eq!(state.cursor.index(), CELLS - 1);

        state.toggle_at_cursor();
        assert!(state.animation.current_frame().is_lit(CELLS - 1));
    }

    #[test]
    fn test_rename_mode() {
        let mut state = AppState::new(Animation::new());
        state.enter_rename_mode();
        assert_eq!(
            state.mode,
            AppMode::Rename {
                frame: 0,
                name: "Frame_1".to_string()
            }
        );

        for _ in 0.."Frame_1".len() {
            state.rename_backspace();
        }
        for c in "a b".chars() {
            state.rename_input(c);
        }
        assert!(!state.rename_is_valid());
        state.commit_rename();
        assert!(matches!(state.mode, AppMode::Rename { .. }));
        assert_eq!(state.animation.current_frame().name, "Frame_1");
        assert!(state.status_message.is_some());

        state.rename_backspace();
        state.rename_backspace();
        state.rename_input('b');
        assert!(state.rename_is_valid());
        state.commit_rename();
        assert_eq!(state.mode, AppMode::Normal);
        assert_eq!(state.animation.current_frame().name, "ab");
    }

    #[test]
    fn test_command_mode() {
        let mut state = AppState::new(Animation::new());
        state.animation.add_frame();

        state.enter_command_mode();
        state.command_input('1');
        state.execute_command();
        assert_eq!(state.animation.current(), 0);
        assert_eq!(state.mode, AppMode::Normal);

        state.enter_command_mode();
        state.command_input('9');
        state.execute_command();
        assert_eq!(state.status_message.as_deref(), Some("Invalid frame: 9"));

        state.enter_command_mode();
        state.command_input('q');
        state.execute_command();
        assert!(state.should_quit);
    }

    #[test]
    fn test_failed_command_keeps_state() {
        let mut state = AppState::new(Animation::new());
        state.run_command(Command::Fill(3));
        assert_eq!(state.animation, Animation::new());
        assert!(state.status_message.is_some());
    }

    #[test]
    fn test_toggle_at_huge_row_reports_error() {
        let mut anim = Animation::new();
        assert_eq!(
            anim.toggle_cell_at(0, usize::MAX, 3),
            Err(EditError::CellOutOfRange(usize::MAX))
        );
        assert_eq!(anim, Animation::new());
    }

    #[test]
    fn test_rename_targets_frame_it_started_on() {
        let start = Instant::now();
        let interval = crate::playback::PLAYBACK_INTERVAL;
        let mut anim = Animation::new();
        anim.add_frame();
        let mut state = AppState::new(anim);

        state.toggle_playback(start);
        assert!(state.tick(start + interval));
        assert_eq!(state.animation.current(), 0);

        state.enter_rename_mode();
        state.rename_input('x');
        assert!(state.tick(start + interval * 2));
        assert_eq!(state.animation.current(), 1);

        state.commit_rename();
        let names: Vec<&str> = state.animation.frames().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Frame_1x", "Frame_2"]);
        assert_eq!(state.mode, AppMode::Normal);
    }

    #[test]
    fn test_clipboard_result_messages() {
        let mut state = AppState::new(Animation::new());
        state.request_copy();
        assert!(state.clipboard_request.take().is_some());

        state.clipboard_result(false);
        assert_eq!(
            state.status_message.as_deref(),
            Some("Unable to copy automatically.")
        );
        assert_eq!(state.animation, Animation::new());

        state.clipboard_result(true);
        assert_eq!(state.status_message.as_deref(), Some("Code copied!"));
    }

    #[test]
    fn test_copy_with_duplicate_names_reports_error() {
        let mut anim = Animation::new();
        anim.duplicate_frame(0).unwrap();
        anim.duplicate_frame(0).unwrap();
        let mut state = AppState::new(anim);
        state.request_copy();
        assert!(state.clipboard_request.is_none());
        assert!(state.status_message.as_deref().unwrap().contains("Frame_1_copy"));
    }

    #[test]
    fn test_unknown_command() {
        let mut state = AppState::new(Animation::new());
        state.enter_command_mode();
        for c in "frobnicate".chars() {
            state.command_input(c);
        }
        state.execute_command();
        assert_eq!(
            state.status_message.as_deref(),
            Some("Unknown command: frobnicate")
        );
        assert!(!state.should_quit);
    }

    #[test]
    fn test_sketch_command_writes_ino() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blink.ino");
        let mut state = AppState::new(Animation::new());
        state.enter_command_mode();
        for c in format!("sketch {}", path.display()).chars() {
            state.command_input(c);
        }
        state.execute_command();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("// LED Matrix Animation"));
        assert!(text.contains("const int frameCount = 1;"));
        assert!(state.status_message.as_deref().unwrap().contains("Arduino sketch"));
        // Only JSON saves become the project file
        assert_eq!(state.file_path, None);
        assert_eq!(formats::DEFAULT_SKETCH_FILE, "led_animation.ino");
    }
}
