use std::path::PathBuf;

use jot::app::{Command, KEY_ESCAPE, Keymap, Mode};
use jot::config::{ConfigFlags, LogLevel, load_config_flags, parse_flag_tokens};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".jotrc");
    let content = r#"
# comment
--log-level debug

--init-script=setup.rhai
   
bind normal D jot::api::delete(1000)
"#;
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert_eq!(flags.log_level, Some(LogLevel::Debug));
    assert_eq!(flags.init_script, Some(PathBuf::from("setup.rhai")));
    assert_eq!(flags.bindings.len(), 1);
    assert_eq!(flags.bindings[0].mode, Mode::Normal);
    assert_eq!(flags.bindings[0].keys, "D");
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".jotrc");
    let content = "--log-level warn\n--log-file file.log\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "jot".to_string(),
        "--log-level".to_string(),
        "trace".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert_eq!(effective.log_level, Some(LogLevel::Trace), "cli should override level");
    assert_eq!(
        effective.log_file,
        Some(PathBuf::from("file.log")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_local_bindings_shadow_global_bindings() {
    let dir = tempfile::tempdir().unwrap();
    let global_path = dir.path().join("config");
    let local_path = dir.path().join(".jotrc");
    std::fs::write(&global_path, "bind insert <esc> jot::api::delete()\n").unwrap();
    std::fs::write(&local_path, "bind insert <esc> jot::api::move_cursor(0, -1)\n").unwrap();

    let merged = load_config_flags(&global_path)
        .unwrap()
        .union(&load_config_flags(&local_path).unwrap());
    let keymap = Keymap::with_user_bindings(merged.bindings);

    assert_eq!(
        keymap.resolve(Mode::Insert, KEY_ESCAPE),
        Command::EvalScript {
            script: "jot::api::move_cursor(0, -1)".to_string()
        }
    );
    // Defaults still apply where nothing overrides them.
    assert_eq!(
        keymap.resolve(Mode::Command, KEY_ESCAPE),
        Command::ActivateMode { mode: Mode::Normal }
    );
}

#[test]
fn test_config_union_defaults_are_identity() {
    let flags = ConfigFlags {
        log_level: Some(LogLevel::Error),
        ..ConfigFlags::default()
    };
    assert_eq!(flags.union(&ConfigFlags::default()), flags);
    assert_eq!(ConfigFlags::default().union(&flags), flags);
}
