use thiserror::Error;

use crate::app::{Mode, Model, ToastLevel};
use crate::editor::BufferError;
use crate::script::ScriptError;

/// A semantic editor action, produced by key bindings, the command line or
/// scripts, and applied by [`update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Do nothing
    Noop,
    /// Switch input mode (clears the command line)
    ActivateMode { mode: Mode },
    /// Type text at the cursor of the focused window
    InsertText { text: String },
    /// Delete characters at the cursor; negative lengths delete backward
    DeleteText { length: isize },
    /// Move the cursor of the focused window
    MoveCursorRelative {
        delta_rows: isize,
        delta_columns: isize,
    },
    /// End the session
    Exit,
    /// Parse and run the command line
    EvalCommandBuffer,
    /// Write the main buffer to its file
    Save,
    /// Run a script and apply the operations it requested
    EvalScript { script: String },
}

impl Command {
    /// Variant name, for logs and errors.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Noop => "Noop",
            Self::ActivateMode { .. } => "ActivateMode",
            Self::InsertText { .. } => "InsertText",
            Self::DeleteText { .. } => "DeleteText",
            Self::MoveCursorRelative { .. } => "MoveCursorRelative",
            Self::Exit => "Exit",
            Self::EvalCommandBuffer => "EvalCommandBuffer",
            Self::Save => "Save",
            Self::EvalScript { .. } => "EvalScript",
        }
    }
}

/// Errors returned by [`update`]. None of them end the session.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Buffer(#[from] BufferError),
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("{command} is not available in {mode} mode")]
    Unsupported { command: &'static str, mode: Mode },
}

/// Command line text that does not name a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not an editor command: {0}")]
pub struct ParseError(pub String);

/// Prefix that marks the rest of a command line as a Rhai script.
pub const SCRIPT_PREFIX: &str = "rhai ";

/// Parse the text typed after `:`.
///
/// # Errors
///
/// Returns [`ParseError`] for anything other than `w`, `q`, a blank line or
/// `rhai <script>`.
pub fn parse_command_line(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    if let Some(script) = line.strip_prefix(SCRIPT_PREFIX) {
        return Ok(Command::EvalScript {
            script: script.to_string(),
        });
    }
    match line {
        "" => Ok(Command::Noop),
        "w" => Ok(Command::Save),
        "q" => Ok(Command::Exit),
        other => Err(ParseError(other.to_string())),
    }
}

/// Apply `command` to the session.
///
/// # Errors
///
/// Returns an error when an edit is out of bounds, a save fails, a script
/// fails, or the command is not valid in the current mode. The model stays
/// usable in every case.
pub fn update(model: &mut Model, command: Command) -> Result<(), DispatchError> {
    tracing::debug!(command = command.name(), mode = %model.mode, "dispatch");
    match command {
        Command::Noop => {}
        Command::ActivateMode { mode } => model.activate_mode(mode),
        Command::InsertText { text } => {
            let window = model.focused_window_mut();
            window.insert_text(window.current_position(), &text)?;
        }
        Command::DeleteText { length } => {
            let window = model.focused_window_mut();
            window.delete_text(window.current_position(), length)?;
        }
        Command::MoveCursorRelative {
            delta_rows,
            delta_columns,
        } => model
            .focused_window_mut()
            .move_cursor_relative(delta_rows, delta_columns),
        Command::Exit => model.should_quit = true,
        Command::Save => {
            let written = model.window.buffer_mut().save()?;
            tracing::info!(written, "save complete");
            model.show_toast(ToastLevel::Info, format!("Wrote {written} bytes"));
        }
        Command::EvalCommandBuffer => eval_command_buffer(model)?,
        Command::EvalScript { script } => eval_script(model, &script)?,
    }
    Ok(())
}

fn eval_command_buffer(model: &mut Model) -> Result<(), DispatchError> {
    if model.mode != Mode::Command {
        return Err(DispatchError::Unsupported {
            command: Command::EvalCommandBuffer.name(),
            mode: model.mode,
        });
    }
    let line = model.command_line().trim().to_string();
    model.activate_mode(Mode::Normal);

    match parse_command_line(&line) {
        Ok(command) => update(model, command),
        Err(err) => {
            model.report(&err);
            Ok(())
        }
    }
}

fn eval_script(model: &mut Model, script: &str) -> Result<(), DispatchError> {
    let commands = model.scripts.eval(script)?;
    tracing::debug!(count = commands.len(), "applying script commands");
    for command in commands {
        let name = command.name();
        if let Err(err) = update(model, command) {
            tracing::error!(command = name, error = %err, "script command failed");
        }
    }
    Ok(())
}
