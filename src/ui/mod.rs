//! Terminal UI.
//!
//! Draws the main window's visible lines and a one-row status line, and
//! decides where the terminal cursor goes and what shape it takes.

mod render;
mod status;

pub use render::{cursor_position, cursor_style, render};
pub use status::status_text;
