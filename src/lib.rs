//! # ledanim - LED Matrix Animator
//!
//! A terminal editor for multi-frame animations on an 8x13 binary LED
//! matrix, with export to C arrays, Arduino sketches and JSON projects.
//!
//! ## Architecture
//!
//! The application follows an event-driven architecture with clear separation:
//! - `model`: Frames, animations and application state
//! - `commands`: Editing operations as pure state transitions
//! - `formats`: JSON import/export, C source and Arduino sketch export
//! - `playback`: Periodic frame advance
//! - `event`: Keyboard event handling
//! - `ui`: TUI rendering with ratatui
//! - `controller`: Orchestration of state transitions

pub mod commands;
pub mod controller;
pub mod event;
pub mod formats;
pub mod model;
pub mod playback;
pub mod ui;
