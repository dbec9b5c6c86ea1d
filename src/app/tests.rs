use std::path::Path;
use std::time::{Duration, Instant};

use tempfile::tempdir;

use super::{
    Command, DispatchError, KEY_BACKSPACE, KEY_ENTER, KEY_ESCAPE, KeyBinding, Keymap, Mode, Model,
    ToastLevel, update,
};
use crate::editor::{Buffer, Point, Window};

fn create_test_model() -> Model {
    Model::new(Keymap::default(), (80, 24))
}

fn model_with_text(text: &str) -> Model {
    let mut model = create_test_model();
    model.window = Window::new(Buffer::from_text(text), 80, 23);
    model
}

fn type_keys(model: &mut Model, keys: &str) {
    for key in keys.chars() {
        model.handle_key(key);
    }
}

fn main_text(model: &Model) -> String {
    model.window.buffer().to_string()
}

fn open(model: &mut Model, path: &Path) {
    model.open_file(path).unwrap();
}

// --- Layout ---

#[test]
fn test_new_model_layout() {
    let model = create_test_model();
    assert_eq!(model.mode, Mode::Normal);
    assert_eq!(model.window.height(), 23);
    assert_eq!(model.window.width(), 80);
    assert_eq!(model.command_window.height(), 1);
    assert_eq!(model.command_window.width(), 79);
    assert!(!model.should_quit);
}

#[test]
fn test_focused_window_follows_mode() {
    let mut model = create_test_model();
    assert!(std::ptr::eq(model.focused_window(), &model.window));
    model.mode = Mode::Insert;
    assert!(std::ptr::eq(model.focused_window(), &model.window));
    model.mode = Mode::Command;
    assert!(std::ptr::eq(model.focused_window(), &model.command_window));
}

// --- Mode transitions ---

#[test]
fn test_activate_mode_clears_command_line() {
    let mut model = create_test_model();
    type_keys(&mut model, ":abc");
    assert_eq!(model.command_line(), "abc");

    update(&mut model, Command::ActivateMode { mode: Mode::Normal }).unwrap();
    assert_eq!(model.mode, Mode::Normal);
    assert_eq!(model.command_line(), "");
}

#[test]
fn test_escape_returns_to_normal() {
    let mut model = create_test_model();
    type_keys(&mut model, "i");
    assert_eq!(model.mode, Mode::Insert);
    model.handle_key(KEY_ESCAPE);
    assert_eq!(model.mode, Mode::Normal);
}

#[test]
fn test_command_line_escape_discards_text() {
    let mut model = model_with_text("keep");
    type_keys(&mut model, ":q");
    model.handle_key(KEY_ESCAPE);
    assert_eq!(model.mode, Mode::Normal);
    assert_eq!(model.command_line(), "");
    assert!(!model.should_quit);
}

#[test]
fn test_normal_q_exits() {
    let mut model = create_test_model();
    model.handle_key('q');
    assert!(model.should_quit);
}

// --- Editing through keys ---

#[test]
fn test_insert_mode_types_text() {
    let mut model = create_test_model();
    type_keys(&mut model, "ihello");
    assert_eq!(main_text(&model), "hello\n");
    assert_eq!(model.window.cursor(), Point::new(1, 6));
}

#[test]
fn test_insert_mode_enter_splits_line() {
    let mut model = create_test_model();
    type_keys(&mut model, "iab");
    model.handle_key(KEY_ENTER);
    type_keys(&mut model, "cd");
    assert_eq!(main_text(&model), "ab\ncd\n");
    assert_eq!(model.window.cursor(), Point::new(2, 3));
}

#[test]
fn test_insert_mode_backspace() {
    let mut model = create_test_model();
    type_keys(&mut model, "iabc");
    model.handle_key(KEY_BACKSPACE);
    assert_eq!(main_text(&model), "ab\n");
    assert_eq!(model.window.cursor(), Point::new(1, 3));
}

#[test]
fn test_normal_x_deletes_under_cursor() {
    let mut model = model_with_text("hello");
    model.handle_key('x');
    assert_eq!(main_text(&model), "ello\n");
    assert_eq!(model.window.cursor(), Point::new(1, 1));
    assert_eq!(model.mode, Mode::Normal);
}

#[test]
fn test_normal_motions() {
    let mut model = model_with_text("abc\ndef\nghi");
    type_keys(&mut model, "jjl");
    assert_eq!(model.window.current_position(), Point::new(3, 2));
    type_keys(&mut model, "kh");
    assert_eq!(model.window.current_position(), Point::new(2, 1));
    model.handle_key(KEY_BACKSPACE);
    assert_eq!(model.window.current_position(), Point::new(2, 1));
}

#[test]
fn test_normal_unbound_key_is_ignored() {
    let mut model = model_with_text("abc");
    type_keys(&mut model, "zZ!");
    assert_eq!(main_text(&model), "abc\n");
    assert_eq!(model.mode, Mode::Normal);
}

#[test]
fn test_command_mode_edits_command_window_only() {
    let mut model = model_with_text("main");
    type_keys(&mut model, ":wq");
    model.handle_key(KEY_BACKSPACE);
    assert_eq!(model.command_line(), "w");
    assert_eq!(main_text(&model), "main\n");
}

// --- Command line ---

#[test]
fn test_write_and_quit_scenario() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    std::fs::write(&path, "").unwrap();

    let mut model = create_test_model();
    open(&mut model, &path);
    type_keys(&mut model, "ihi");
    model.handle_key(KEY_ESCAPE);
    type_keys(&mut model, ":w");
    model.handle_key(KEY_ENTER);

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "hi\n");
    assert_eq!(model.mode, Mode::Normal);
    assert!(!model.window.buffer().is_dirty());
    assert!(
        model
            .active_toast()
            .is_some_and(|(msg, level)| level == ToastLevel::Info && msg.contains("3 bytes"))
    );
}

#[test]
fn test_save_creates_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("new.txt");

    let mut model = create_test_model();
    open(&mut model, &path);
    type_keys(&mut model, "inew");
    model.handle_key(KEY_ESCAPE);
    type_keys(&mut model, ":w");
    model.handle_key(KEY_ENTER);

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "new\n");
}

#[test]
fn test_command_q_exits() {
    let mut model = create_test_model();
    type_keys(&mut model, ":q");
    model.handle_key(KEY_ENTER);
    assert!(model.should_quit);
    assert_eq!(model.mode, Mode::Normal);
}

#[test]
fn test_unknown_command_reports_parse_error() {
    let mut model = model_with_text("abc");
    type_keys(&mut model, ":bogus");
    model.handle_key(KEY_ENTER);

    assert_eq!(model.mode, Mode::Normal);
    assert_eq!(model.command_line(), "");
    assert!(!model.should_quit);
    let (message, level) = model.active_toast().unwrap();
    assert_eq!(level, ToastLevel::Error);
    assert!(message.contains("bogus"));
    assert_eq!(main_text(&model), "abc\n");
}

#[test]
fn test_empty_command_line_is_noop() {
    let mut model = model_with_text("abc");
    model.handle_key(':');
    model.handle_key(KEY_ENTER);
    assert_eq!(model.mode, Mode::Normal);
    assert!(model.active_toast().is_none());
}

#[test]
fn test_save_scratch_buffer_reports_error() {
    let mut model = model_with_text("abc");
    type_keys(&mut model, ":w");
    model.handle_key(KEY_ENTER);
    let (message, level) = model.active_toast().unwrap();
    assert_eq!(level, ToastLevel::Error);
    assert!(message.contains("no backing file"));
}

#[test]
fn test_eval_command_buffer_outside_command_mode_is_unsupported() {
    let mut model = create_test_model();
    let err = update(&mut model, Command::EvalCommandBuffer).unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Unsupported {
            mode: Mode::Normal,
            ..
        }
    ));
}

#[test]
fn test_out_of_bounds_edit_is_reported_not_fatal() {
    let mut model = model_with_text("abc");
    model.window.move_cursor_relative(0, 3);
    // Shorten the line behind the cursor's back.
    model.window.buffer_mut().delete_text(Point::new(1, 1), 3).unwrap();

    model.handle_key('i');
    model.handle_key('x');
    let (_, level) = model.active_toast().unwrap();
    assert_eq!(level, ToastLevel::Error);
    assert_eq!(model.mode, Mode::Insert);
}

// --- Scripts ---

#[test]
fn test_script_from_command_line_edits_main_window() {
    let mut model = model_with_text("hello");
    type_keys(&mut model, ":rhai jot::api::delete(2)");
    model.handle_key(KEY_ENTER);
    assert_eq!(main_text(&model), "llo\n");
    assert_eq!(model.mode, Mode::Normal);
}

#[test]
fn test_script_insert_and_move() {
    let mut model = model_with_text("ac");
    let script = r#"jot::api::move_cursor(0, 1); jot::api::insert("b");"#;
    update(
        &mut model,
        Command::EvalScript {
            script: script.to_string(),
        },
    )
    .unwrap();
    assert_eq!(main_text(&model), "abc\n");
    assert_eq!(model.window.cursor(), Point::new(1, 3));
}

#[test]
fn test_script_error_is_returned() {
    let mut model = model_with_text("abc");
    let err = update(
        &mut model,
        Command::EvalScript {
            script: "jot::api::delete(".to_string(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, DispatchError::Script(_)));
    assert_eq!(main_text(&model), "abc\n");
}

#[test]
fn test_failing_script_command_is_skipped() {
    let mut model = model_with_text("abc");
    model.window.move_cursor_relative(0, 3);
    model.window.buffer_mut().delete_text(Point::new(1, 1), 3).unwrap();

    let script = r#"jot::api::insert("x"); jot::api::move_cursor(0, -10); jot::api::insert("y");"#;
    update(
        &mut model,
        Command::EvalScript {
            script: script.to_string(),
        },
    )
    .unwrap();
    assert_eq!(main_text(&model), "y\n");
}

#[test]
fn test_huge_script_motion_is_clamped() {
    let mut model = model_with_text("abc\ndef");
    type_keys(&mut model, ":rhai jot::api::move_cursor(9223372036854775807, 0)");
    model.handle_key(KEY_ENTER);
    assert_eq!(model.window.current_position(), Point::new(2, 1));
    assert!(model.active_toast().is_none());
}

#[test]
fn test_huge_motion_command_is_clamped() {
    let mut model = model_with_text("abc\ndef");
    update(
        &mut model,
        Command::MoveCursorRelative {
            delta_rows: isize::MAX,
            delta_columns: isize::MAX,
        },
    )
    .unwrap();
    assert_eq!(model.window.current_position(), Point::new(2, 4));

    update(
        &mut model,
        Command::MoveCursorRelative {
            delta_rows: isize::MIN,
            delta_columns: 0,
        },
    )
    .unwrap();
    assert_eq!(model.window.current_position(), Point::new(1, 4));
}

#[test]
fn test_user_binding_runs_script() {
    let keymap = Keymap::with_user_bindings(vec![KeyBinding::new(
        Mode::Normal,
        'D',
        Command::EvalScript {
            script: "jot::api::delete(100)".to_string(),
        },
    )]);
    let mut model = Model::new(keymap, (80, 24));
    model.window = Window::new(Buffer::from_text("erase me\nkeep"), 80, 23);
    model.handle_key('D');
    assert_eq!(main_text(&model), "\nkeep\n");
}

#[test]
fn test_init_script_runs_against_main_window() {
    let dir = tempdir().unwrap();
    let script = dir.path().join("init.rhai");
    std::fs::write(&script, r##"jot::api::insert("# notes");"##).unwrap();

    let mut model = create_test_model();
    model.run_init_script(&script);
    assert_eq!(main_text(&model), "# notes\n");
}

#[test]
fn test_missing_init_script_is_reported() {
    let dir = tempdir().unwrap();
    let mut model = create_test_model();
    model.run_init_script(&dir.path().join("absent.rhai"));
    assert_eq!(model.active_toast().map(|(_, level)| level), Some(ToastLevel::Error));
}

// --- Toasts ---

#[test]
fn test_toast_expires() {
    let mut model = create_test_model();
    model.show_toast(ToastLevel::Warning, "careful");
    assert!(!model.expire_toast(Instant::now()));
    assert!(model.active_toast().is_some());

    assert!(model.expire_toast(Instant::now() + Duration::from_secs(5)));
    assert!(model.active_toast().is_none());
}

// --- Lifecycle ---

#[test]
fn test_close_after_open_is_idempotent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.txt");
    std::fs::write(&path, "x\n").unwrap();

    let mut model = create_test_model();
    open(&mut model, &path);
    model.close().unwrap();
    model.close().unwrap();
}

#[test]
fn test_open_rejects_invalid_utf8() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bin");
    std::fs::write(&path, b"\xff\n").unwrap();

    let mut model = create_test_model();
    assert!(model.open_file(&path).is_err());
}
