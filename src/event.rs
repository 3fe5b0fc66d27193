//! Keyboard event handling.
//!
//! This module maps key presses to editor actions:
//! - `h/j/k/l` or arrows: move the grid cursor
//! - `Space` / `Enter`: toggle the LED under the cursor
//! - `c` / `f` / `i`: clear / fill / invert the current frame
//! - `a` / `d` / `x`: add / duplicate / delete a frame
//! - `n` or `]`: next frame, `N` or `[`: previous frame
//! - `p`: play / pause
//! - `r`: rename the current frame
//! - `y`: copy the generated C code to the clipboard
//! - `:`: enter command mode
//!   - `:q` or `:quit`: quit the application
//!   - `:w [file]`: export (format from extension)
//!   - `:e [file]`: import a JSON project
//!   - `:sketch [file]`: export an Arduino sketch
//!   - `:<number>`: go to frame
//! - `?`: show help

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::{Duration, Instant};

use crate::commands::Command;
use crate::model::{AppMode, AppState};

/// Actions that can be triggered by keyboard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action (key not recognized)
    None,
    /// Quit the application
    Quit,
    /// Move cursor up
    MoveUp,
    /// Move cursor down
    MoveDown,
    /// Move cursor left
    MoveLeft,
    /// Move cursor right
    MoveRight,
    /// Toggle the LED under the cursor
    ToggleCell,
    /// Turn off every LED of the current frame
    ClearFrame,
    /// Turn on every LED of the current frame
    FillFrame,
    /// Invert the current frame
    InvertFrame,
    /// Append a new frame
    AddFrame,
    /// Duplicate the current frame
    DuplicateFrame,
    /// Delete the current frame
    DeleteFrame,
    /// Go to the next frame
    NextFrame,
    /// Go to the previous frame
    PrevFrame,
    /// Start or stop playback
    TogglePlayback,
    /// Copy the C code to the clipboard
    CopyCode,
    /// Show the help overlay
    ShowHelp,
    /// Dismiss the help overlay
    DismissHelp,
    /// Enter command mode
    EnterCommandMode,
    /// Add character to command buffer
    CommandChar(char),
    /// Execute current command
    ExecuteCommand,
    /// Backspace in command mode
    CommandBackspace,
    /// Enter rename mode
    EnterRenameMode,
    /// Add character to the pending frame name
    RenameChar(char),
    /// Backspace in rename mode
    RenameBackspace,
    /// Apply the pending frame name
    CommitRename,
    /// Leave command or rename mode
    CancelInput,
    /// Resize event (terminal resized)
    Resize(u16, u16),
}

/// Polls for keyboard events with a timeout.
///
/// Returns `None` if no event occurred within the timeout.
pub fn poll_event(timeout: Duration) -> Option<Event> {
    if event::poll(timeout).ok()? {
        event::read().ok()
    } else {
        None
    }
}

/// Converts a crossterm event to an Action based on current app mode.
pub fn handle_event(event: Event, mode: &AppMode, show_help: bool) -> Action {
    match event {
        Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
            handle_key_event(key_event, mode, show_help)
        }
        Event::Resize(width, height) => Action::Resize(width, height),
        _ => Action::None,
    }
}

/// Handles a key event based on the current application mode.
fn handle_key_event(key: KeyEvent, mode: &AppMode, show_help: bool) -> Action {
    // If help is shown, any key dismisses it
    if show_help {
        return Action::DismissHelp;
    }

    match mode {
        AppMode::Normal => handle_normal_mode(key),
        AppMode::Command(_) => handle_command_mode(key),
        AppMode::Rename { .. } => handle_rename_mode(key),
    }
}

/// Handles key events in normal mode.
fn handle_normal_mode(key: KeyEvent) -> Action {
    // Handle Ctrl+C for emergency quit
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match key.code {
        // Vim-style navigation
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Char('l') | KeyCode::Right => Action::MoveRight,
        KeyCode::Char('h') | KeyCode::Left => Action::MoveLeft,

        // Drawing
        KeyCode::Char(' ') | KeyCode::Enter => Action::ToggleCell,
        KeyCode::Char('c') => Action::ClearFrame,
        KeyCode::Char('f') => Action::FillFrame,
        KeyCode::Char('i') => Action::InvertFrame,

        // Frames
        KeyCode::Char('a') => Action::AddFrame,
        KeyCode::Char('d') => Action::DuplicateFrame,
        KeyCode::Char('x') | KeyCode::Delete => Action::DeleteFrame,
        KeyCode::Char('n') | KeyCode::Char(']') | KeyCode::Tab => Action::NextFrame,
        KeyCode::Char('N') | KeyCode::Char('[') | KeyCode::BackTab => Action::PrevFrame,
        KeyCode::Char('r') => Action::EnterRenameMode,

        KeyCode::Char('p') => Action::TogglePlayback,
        KeyCode::Char('y') => Action::CopyCode,
        KeyCode::Char('?') => Action::ShowHelp,
        KeyCode::Char(':') => Action::EnterCommandMode,

        _ => Action::None,
    }
}

/// Handles key events in command mode.
fn handle_command_mode(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::ExecuteCommand,
        KeyCode::Esc => Action::CancelInput,
        KeyCode::Backspace => Action::CommandBackspace,
        KeyCode::Char(c) => Action::CommandChar(c),
        _ => Action::None,
    }
}

/// Handles key events while editing a frame name.
fn handle_rename_mode(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::CommitRename,
        KeyCode::Esc => Action::CancelInput,
        KeyCode::Backspace => Action::RenameBackspace,
        KeyCode::Char(c) => Action::RenameChar(c),
        _ => Action::None,
    }
}

/// Applies an action to the application state.
///
/// Returns `true` if the application should continue, `false` if it should quit.
pub fn apply_action(state: &mut AppState, action: Action, now: Instant) -> bool {
    let current = state.animation.current();
    if !matches!(action, Action::None | Action::Resize(_, _)) {
        state.status_message = None;
    }
    match action {
        Action::None => {}
        Action::Quit => {
            state.should_quit = true;
        }
        Action::MoveUp => state.move_up(),
        Action::MoveDown => state.move_down(),
        Action::MoveLeft => state.move_left(),
        Action::MoveRight => state.move_right(),
        Action::ToggleCell => state.toggle_at_cursor(),
        Action::ClearFrame => state.run_command(Command::Clear(current)),
        Action::FillFrame => state.run_command(Command::Fill(current)),
        Action::InvertFrame => state.run_command(Command::Invert(current)),
        Action::AddFrame => state.run_command(Command::AddFrame),
        Action::DuplicateFrame => state.run_command(Command::DuplicateFrame(current)),
        Action::DeleteFrame => state.run_command(Command::DeleteFrame(current)),
        Action::NextFrame => state.run_command(Command::NextFrame),
        Action::PrevFrame => state.run_command(Command::PrevFrame),
        Action::TogglePlayback => state.toggle_playback(now),
        Action::CopyCode => state.request_copy(),
        Action::ShowHelp => state.show_help(),
        Action::DismissHelp => state.dismiss_help(),
        Action::EnterCommandMode => state.enter_command_mode(),
        Action::CommandChar(c) => state.command_input(c),
        Action::ExecuteCommand => state.execute_command(),
        Action::CommandBackspace => state.command_backspace(),
        Action::EnterRenameMode => state.enter_rename_mode(),
        Action::RenameChar(c) => state.rename_input(c),
        Action::RenameBackspace => state.rename_backspace(),
        Action::CommitRename => state.commit_rename(),
        Action::CancelInput => state.cancel_input(),
        Action::Resize(_, _) => {
            // Layout is recomputed on every draw
        }
    }

    !state.should_quit
}
