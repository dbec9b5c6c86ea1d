use std::path::Path;
use std::time::{Duration, Instant};

use crate::app::{Command, Keymap, Mode, update};
use crate::editor::{Buffer, BufferError, Line, Window};
use crate::script::ScriptEngine;

/// How long a status message stays on screen.
const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// The complete editing session.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// Current input mode
    pub mode: Mode,
    /// Window onto the file being edited
    pub window: Window,
    /// One-line window holding the text typed after `:`
    pub command_window: Window,
    /// Set by [`Command::Exit`]
    pub should_quit: bool,
    pub(super) keymap: Keymap,
    pub(super) scripts: ScriptEngine,
    toast: Option<Toast>,
}

impl Model {
    /// Create a session for a terminal of `width` x `height` cells.
    ///
    /// The main window takes every row but the last. The command window sits
    /// on the last row after the `:` prompt.
    pub fn new(keymap: Keymap, (width, height): (u16, u16)) -> Self {
        let width = usize::from(width);
        let height = usize::from(height);
        Self {
            mode: Mode::Normal,
            window: Window::new(Buffer::scratch(), width, height.saturating_sub(1)),
            command_window: Window::new(Buffer::scratch(), width.saturating_sub(1), 1),
            should_quit: false,
            keymap,
            scripts: ScriptEngine::new(),
            toast: None,
        }
    }

    /// Load `path` into the main window.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn open_file(&mut self, path: &Path) -> Result<(), BufferError> {
        tracing::info!(path = %path.display(), "opening file");
        self.window.load_buffer(Buffer::from_path(path))
    }

    /// The window that receives edits and motions in the current mode.
    pub const fn focused_window(&self) -> &Window {
        match self.mode {
            Mode::Command => &self.command_window,
            Mode::Normal | Mode::Insert => &self.window,
        }
    }

    pub const fn focused_window_mut(&mut self) -> &mut Window {
        match self.mode {
            Mode::Command => &mut self.command_window,
            Mode::Normal | Mode::Insert => &mut self.window,
        }
    }

    /// Text typed after `:` so far.
    pub fn command_line(&self) -> &str {
        self.command_window.buffer().line(1).map_or("", Line::content)
    }

    pub(super) fn activate_mode(&mut self, mode: Mode) {
        tracing::debug!(from = %self.mode, to = %mode, "mode change");
        self.mode = mode;
        self.command_window.clear();
    }

    /// Resolve `key` in the current mode and apply the bound command.
    ///
    /// Failures are reported on the status line and in the log; the session
    /// always continues.
    pub fn handle_key(&mut self, key: char) {
        let command = self.keymap.resolve(self.mode, key);
        tracing::debug!(key = ?key, mode = %self.mode, command = command.name(), "key");
        if let Err(err) = update(self, command) {
            self.report(&err);
        }
    }

    /// Apply a command, reporting any failure like [`handle_key`](Self::handle_key).
    pub fn dispatch(&mut self, command: Command) {
        if let Err(err) = update(self, command) {
            self.report(&err);
        }
    }

    /// Run a script file at startup.
    pub fn run_init_script(&mut self, path: &Path) {
        match std::fs::read_to_string(path) {
            Ok(script) => self.dispatch(Command::EvalScript { script }),
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "failed to read init script");
                self.show_toast(ToastLevel::Error, format!("Init script failed: {err}"));
            }
        }
    }

    pub(super) fn report(&mut self, err: &dyn std::error::Error) {
        tracing::error!(error = %err, mode = %self.mode, "command failed");
        self.show_toast(ToastLevel::Error, err.to_string());
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    /// Release the main buffer's file handle.
    ///
    /// # Errors
    ///
    /// Returns an error if pending writes cannot be synced.
    pub fn close(&mut self) -> Result<(), BufferError> {
        self.window.buffer_mut().close()
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("mode", &self.mode)
            .field("window", &self.window)
            .field("command_line", &self.command_line())
            .field("should_quit", &self.should_quit)
            .finish_non_exhaustive()
    }
}
