use std::cell::RefCell;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use rhai::{Engine, Module};
use thiserror::Error;

use super::api::{self, CommandQueue};
use crate::app::Command;

/// Upper bound on operations per evaluation so a runaway script cannot hang
/// the editor.
const MAX_OPERATIONS: u64 = 1_000_000;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("script error: {0}")]
    Eval(String),
    #[error("script panicked: {0}")]
    Panicked(String),
}

/// A Rhai engine with the `jot` module registered.
pub struct ScriptEngine {
    engine: Engine,
    queue: CommandQueue,
}

impl ScriptEngine {
    pub fn new() -> Self {
        let queue: CommandQueue = Rc::new(RefCell::new(Vec::new()));

        let mut engine = Engine::new();
        engine.set_max_operations(MAX_OPERATIONS);
        engine.on_print(|text| tracing::info!(target: "jot::script", "{text}"));
        engine.on_debug(|text, source, pos| {
            tracing::debug!(target: "jot::script", source, %pos, "{text}");
        });

        let mut jot = Module::new();
        jot.set_sub_module("api", api::module(&queue));
        engine.register_static_module("jot", jot.into());

        Self { engine, queue }
    }

    /// Run `script` and return the commands it requested.
    ///
    /// Nothing is returned from a failed script, even if it queued commands
    /// before failing.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Eval`] for syntax and runtime errors and
    /// [`ScriptError::Panicked`] if evaluation panics.
    pub fn eval(&self, script: &str) -> Result<Vec<Command>, ScriptError> {
        self.queue.borrow_mut().clear();
        tracing::debug!(target: "jot::script", script, "evaluating");

        let outcome = catch_unwind(AssertUnwindSafe(|| self.engine.run(script)));
        let commands = self.queue.take();
        match outcome {
            Ok(Ok(())) => Ok(commands),
            Ok(Err(err)) => Err(ScriptError::Eval(err.to_string())),
            Err(payload) => Err(ScriptError::Panicked(panic_message(payload.as_ref()))),
        }
    }
}

impl Default for ScriptEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ScriptEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptEngine").finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
