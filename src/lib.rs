// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::BufferError)
    clippy::module_name_repetitions
)]

//! # jot
//!
//! A small modal text editor for the terminal.
//!
//! jot edits one file at a time with vi-style modes:
//! - Normal mode for motions and single-key commands
//! - Insert mode for typing
//! - Command mode for `:w`, `:q` and `:rhai <script>`
//!
//! ## Architecture
//!
//! jot uses The Elm Architecture (TEA) pattern:
//! - **Model**: Session state (mode, windows, keymap, scripts)
//! - **Command**: Semantic editor actions
//! - **Update**: Applies one command to the model
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`editor`]: Line buffers and windows
//! - [`app`]: Modes, key bindings, dispatch and the event loop
//! - [`script`]: Rhai scripting bridge
//! - [`ui`]: Terminal rendering
//! - [`config`]: Saved defaults and key bindings

pub mod app;
pub mod config;
pub mod editor;
pub mod script;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Command, Keymap, Mode, Model};
    pub use crate::editor::{Buffer, Point, Window};
}
