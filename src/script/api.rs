use std::cell::RefCell;
use std::rc::Rc;

use rhai::{EvalAltResult, INT, ImmutableString, Module};

use crate::app::Command;

/// Commands requested by the running script, in call order.
pub(super) type CommandQueue = Rc<RefCell<Vec<Command>>>;

type ApiResult = Result<(), Box<EvalAltResult>>;

/// Build the `api` sub-module. Every function pushes onto `queue`.
pub(super) fn module(queue: &CommandQueue) -> Module {
    let mut api = Module::new();

    let q = Rc::clone(queue);
    api.set_native_fn("delete", move || -> ApiResult {
        push(&q, "delete", Command::DeleteText { length: 1 });
        Ok(())
    });

    let q = Rc::clone(queue);
    api.set_native_fn("delete", move |length: INT| -> ApiResult {
        let length = to_isize("delete", length)?;
        push(&q, "delete", Command::DeleteText { length });
        Ok(())
    });

    let q = Rc::clone(queue);
    api.set_native_fn("insert", move |text: ImmutableString| -> ApiResult {
        push(
            &q,
            "insert",
            Command::InsertText {
                text: text.to_string(),
            },
        );
        Ok(())
    });

    let q = Rc::clone(queue);
    api.set_native_fn("move_cursor", move |rows: INT, columns: INT| -> ApiResult {
        let command = Command::MoveCursorRelative {
            delta_rows: to_isize("move_cursor", rows)?,
            delta_columns: to_isize("move_cursor", columns)?,
        };
        push(&q, "move_cursor", command);
        Ok(())
    });

    api
}

fn push(queue: &CommandQueue, method: &str, command: Command) {
    tracing::debug!(target: "jot::script", method, ?command, "api call");
    queue.borrow_mut().push(command);
}

fn to_isize(method: &str, value: INT) -> Result<isize, Box<EvalAltResult>> {
    isize::try_from(value).map_err(|_| format!("{method}: {value} is out of range").into())
}
