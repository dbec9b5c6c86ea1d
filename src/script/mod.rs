//! Scripting module - Rhai runtime for editor automation
//!
//! Editor operations are exposed under the `jot` namespace:
//! - `jot::api::delete()` / `jot::api::delete(n)` - delete at the cursor
//! - `jot::api::insert(text)` - type text at the cursor
//! - `jot::api::move_cursor(rows, columns)` - move the cursor
//!
//! Scripts never touch editor state directly. Each call queues a
//! [`Command`](crate::app::Command) that the dispatcher applies after the
//! script finishes.

mod api;
mod engine;

pub use engine::{ScriptEngine, ScriptError};
