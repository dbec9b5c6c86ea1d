//! Editing session state and main event loop.
//!
//! This module follows The Elm Architecture (TEA):
//! - [`Model`]: The complete session state
//! - [`Command`]: All semantic editor actions
//! - [`update`]: State transitions, one command at a time
//! - [`App::run`]: Input thread, event loop and rendering

mod event_loop;
mod input;
mod mode;
mod model;
mod update;

pub use event_loop::SessionEvent;
pub use input::{
    KEY_BACKSPACE, KEY_ENTER, KEY_ESCAPE, KEY_TAB, KeyBinding, Keymap, decode_key,
    default_bindings, key_name, parse_key_name,
};
pub use mode::{Mode, UnknownMode};
pub use model::{Model, ToastLevel};
pub use update::{Command, DispatchError, ParseError, SCRIPT_PREFIX, parse_command_line, update};

use std::path::PathBuf;

/// Main application struct that owns the startup settings and runs the
/// event loop.
pub struct App {
    file_path: PathBuf,
    keymap: Keymap,
    init_script: Option<PathBuf>,
}

impl App {
    /// Create a new application editing the given file.
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            keymap: Keymap::default(),
            init_script: None,
        }
    }

    /// Use `keymap` instead of the built-in bindings.
    #[must_use]
    pub fn with_keymap(mut self, keymap: Keymap) -> Self {
        self.keymap = keymap;
        self
    }

    /// Run the script at `path` after the file is loaded.
    #[must_use]
    pub fn with_init_script(mut self, path: Option<PathBuf>) -> Self {
        self.init_script = path;
        self
    }
}

#[cfg(test)]
mod tests;
