//! Application controller.
//!
//! This module orchestrates the main application loop:
//! - Terminal initialization and cleanup
//! - Event polling and handling
//! - Playback ticks
//! - Clipboard writes requested by the state
//! - Rendering

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    clipboard::CopyToClipboard,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use crate::event::{apply_action, handle_event, poll_event};
use crate::model::AppState;
use crate::ui::render;

/// The main application controller.
pub struct App {
    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Application state
    state: AppState,
    /// Event poll timeout
    tick_rate: Duration,
}

impl App {
    /// Creates a new application with the given state.
    pub fn new(state: AppState) -> Result<Self> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            state,
            tick_rate: Duration::from_millis(50),
        })
    }

    /// Runs the main application loop.
    pub fn run(&mut self) -> Result<()> {
        info!(frames = self.state.animation.frame_count(), "editor started");

        loop {
            // Render
            self.terminal.draw(|frame| {
                render(frame, &self.state);
            })?;

            // Wake up in time for the next playback frame
            let now = Instant::now();
            let timeout = self
                .state
                .playback
                .time_until_next(now)
                .map_or(self.tick_rate, |wait| wait.min(self.tick_rate));

            if let Some(event) = poll_event(timeout) {
                let action = handle_event(event, &self.state.mode, self.state.show_help);
                apply_action(&mut self.state, action, Instant::now());

                if self.state.should_quit {
                    break;
                }
            }

            self.state.tick(Instant::now());

            if let Some(text) = self.state.clipboard_request.take() {
                self.copy_to_clipboard(&text);
            }
        }

        info!("editor closed");
        Ok(())
    }

    /// Sends text to the system clipboard through the terminal (OSC 52).
    fn copy_to_clipboard(&mut self, text: &str) {
        let result = execute!(
            self.terminal.backend_mut(),
            CopyToClipboard::to_clipboard_from(text)
        );
        if let Err(e) = &result {
            warn!(error = %e, "clipboard write failed");
        }
        self.state.clipboard_result(result.is_ok());
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // Restore terminal
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Convenience function to run the editor with a prepared state.
pub fn run_app(state: AppState) -> Result<()> {
    let mut app = App::new(state)?;
    app.run()
}
