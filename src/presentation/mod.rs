//! Presentation layer handling terminal UI and user input.
//!
//! This module renders the student form with ratatui and maps key presses
//! to form edits and triggers.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;
