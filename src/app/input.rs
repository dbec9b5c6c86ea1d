//! Key decoding and key-to-command resolution.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{Command, Mode};

pub const KEY_ENTER: char = '\r';
pub const KEY_ESCAPE: char = '\x1b';
pub const KEY_BACKSPACE: char = '\x7f';
pub const KEY_TAB: char = '\t';

/// One entry of the keymap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub mode: Mode,
    pub keys: String,
    pub command: Command,
}

impl KeyBinding {
    pub fn new(mode: Mode, key: char, command: Command) -> Self {
        Self {
            mode,
            keys: key.to_string(),
            command,
        }
    }

    fn matches(&self, mode: Mode, key: char) -> bool {
        let mut chars = self.keys.chars();
        self.mode == mode && chars.next() == Some(key) && chars.next().is_none()
    }
}

/// Ordered list of bindings. The first match wins.
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: Vec<KeyBinding>,
}

impl Keymap {
    pub const fn new(bindings: Vec<KeyBinding>) -> Self {
        Self { bindings }
    }

    /// User bindings placed ahead of the built-in defaults.
    pub fn with_user_bindings(user: Vec<KeyBinding>) -> Self {
        let mut bindings = user;
        bindings.extend(default_bindings());
        Self { bindings }
    }

    pub fn bindings(&self) -> &[KeyBinding] {
        &self.bindings
    }

    /// The command bound to `key` in `mode`.
    ///
    /// Unbound keys are typed as text in Insert and Command mode and ignored
    /// in Normal mode.
    pub fn resolve(&self, mode: Mode, key: char) -> Command {
        if let Some(binding) = self.bindings.iter().find(|b| b.matches(mode, key)) {
            return binding.command.clone();
        }
        if mode.inserts_unbound_keys() {
            Command::InsertText {
                text: key.to_string(),
            }
        } else {
            Command::Noop
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new(default_bindings())
    }
}

/// The built-in bindings.
pub fn default_bindings() -> Vec<KeyBinding> {
    let move_by = |delta_rows, delta_columns| Command::MoveCursorRelative {
        delta_rows,
        delta_columns,
    };
    let activate = |mode| Command::ActivateMode { mode };

    let mut bindings = vec![
        KeyBinding::new(Mode::Normal, 'i', activate(Mode::Insert)),
        KeyBinding::new(Mode::Normal, ':', activate(Mode::Command)),
        KeyBinding::new(Mode::Normal, 'q', Command::Exit),
        KeyBinding::new(Mode::Normal, 'j', move_by(1, 0)),
        KeyBinding::new(Mode::Normal, 'k', move_by(-1, 0)),
        KeyBinding::new(Mode::Normal, 'h', move_by(0, -1)),
        KeyBinding::new(Mode::Normal, KEY_BACKSPACE, move_by(0, -1)),
        KeyBinding::new(Mode::Normal, 'l', move_by(0, 1)),
        KeyBinding::new(Mode::Normal, 'x', Command::DeleteText { length: 1 }),
    ];
    for mode in [Mode::Insert, Mode::Command] {
        bindings.push(KeyBinding::new(mode, KEY_ESCAPE, activate(Mode::Normal)));
        bindings.push(KeyBinding::new(
            mode,
            KEY_BACKSPACE,
            Command::DeleteText { length: -1 },
        ));
    }
    bindings.push(KeyBinding::new(
        Mode::Command,
        KEY_ENTER,
        Command::EvalCommandBuffer,
    ));
    bindings
}

/// Translate a terminal key event into the character the keymap sees.
///
/// Only presses are decoded. Keys chorded with Control or Alt and keys with
/// no character form yield `None`.
pub fn decode_key(key: KeyEvent) -> Option<char> {
    if key.kind != KeyEventKind::Press
        || key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    match key.code {
        KeyCode::Char(c) => Some(c),
        KeyCode::Enter => Some(KEY_ENTER),
        KeyCode::Esc => Some(KEY_ESCAPE),
        KeyCode::Backspace => Some(KEY_BACKSPACE),
        KeyCode::Tab => Some(KEY_TAB),
        _ => None,
    }
}

/// Parse a key written in configuration: a single character or one of
/// `<esc>`, `<cr>`, `<bs>`, `<tab>`, `<space>`.
pub fn parse_key_name(name: &str) -> Option<char> {
    match name.to_ascii_lowercase().as_str() {
        "<esc>" => return Some(KEY_ESCAPE),
        "<cr>" | "<enter>" => return Some(KEY_ENTER),
        "<bs>" => return Some(KEY_BACKSPACE),
        "<tab>" => return Some(KEY_TAB),
        "<space>" => return Some(' '),
        _ => {}
    }
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Inverse of [`parse_key_name`].
pub fn key_name(key: char) -> String {
    match key {
        KEY_ESCAPE => "<esc>".to_string(),
        KEY_ENTER => "<cr>".to_string(),
        KEY_BACKSPACE => "<bs>".to_string(),
        KEY_TAB => "<tab>".to_string(),
        ' ' => "<space>".to_string(),
        other => other.to_string(),
    }
}
