//! Saved defaults and key bindings.
//!
//! A config file holds command-line flags (one or more per line) plus
//! `bind <mode> <key> <script>` lines. `#` starts a comment line.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::app::{Command, KeyBinding, Mode, key_name, parse_key_name};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    pub const fn as_level(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub log_file: Option<PathBuf>,
    pub log_level: Option<LogLevel>,
    pub init_script: Option<PathBuf>,
    /// Script bindings, highest precedence first.
    pub bindings: Vec<KeyBinding>,
}

impl ConfigFlags {
    /// Merge `other` on top of `self`: its options win and its bindings are
    /// consulted first.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
            log_level: other.log_level.or(self.log_level),
            init_script: other
                .init_script
                .clone()
                .or_else(|| self.init_script.clone()),
            bindings: other
                .bindings
                .iter()
                .chain(&self.bindings)
                .cloned()
                .collect(),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("jot").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("jot")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("jot").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("jot").join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".jotrc")
}

/// Default log destination. The terminal belongs to the editor, so logs
/// never go to stderr.
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("jot.log")
}

/// Read flags and bindings from `path`. A missing file yields the defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a `bind` line is malformed.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;

    let mut tokens = Vec::new();
    let mut bindings = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(rest) = strip_keyword(line, "bind") {
            let binding = parse_binding(rest)
                .with_context(|| format!("{}:{}: invalid binding", path.display(), idx + 1))?;
            bindings.push(binding);
        } else {
            tokens.extend(line.split_whitespace().map(ToOwned::to_owned));
        }
    }

    let mut flags = parse_flag_tokens(&tokens);
    flags.bindings = bindings;
    Ok(flags)
}

fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    rest.starts_with(char::is_whitespace).then(|| rest.trim_start())
}

/// Parse the part of a `bind` line after the keyword: `<mode> <key> <script>`.
///
/// # Errors
///
/// Returns an error for an unknown mode, an unrecognized key or a missing
/// script.
pub fn parse_binding(text: &str) -> Result<KeyBinding> {
    let mut parts = text.trim().splitn(3, char::is_whitespace);
    let mode: Mode = parts.next().unwrap_or_default().parse()?;
    let key_text = parts.next().unwrap_or_default();
    let key = parse_key_name(key_text)
        .with_context(|| format!("unrecognized key '{key_text}'"))?;
    let script = parts.next().map(str::trim).unwrap_or_default();
    if script.is_empty() {
        anyhow::bail!("missing script for key '{key_text}'");
    }
    Ok(KeyBinding::new(
        mode,
        key,
        Command::EvalScript {
            script: script.to_string(),
        },
    ))
}

/// Write `flags` to `path` in the format [`load_config_flags`] reads.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# jot defaults (saved with --save)".to_string());
    if let Some(log_file) = &flags.log_file {
        lines.push(format!("--log-file {}", log_file.display()));
    }
    if let Some(level) = flags.log_level {
        lines.push(format!("--log-level {}", level.as_str()));
    }
    if let Some(script) = &flags.init_script {
        lines.push(format!("--init-script {}", script.display()));
    }
    for binding in &flags.bindings {
        let (Command::EvalScript { script }, Some(key)) =
            (&binding.command, binding.keys.chars().next())
        else {
            continue;
        };
        lines.push(format!(
            "bind {} {} {script}",
            binding.mode.to_string().to_lowercase(),
            key_name(key)
        ));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Remove saved defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the known flags out of a token list. Unknown tokens are ignored.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--log-file" {
            if let Some(next) = tokens.get(i + 1) {
                flags.log_file = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--log-file=") {
            flags.log_file = Some(PathBuf::from(value));
        } else if token == "--log-level" {
            if let Some(next) = tokens.get(i + 1) {
                flags.log_level = parse_log_level(next);
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--log-level=") {
            flags.log_level = parse_log_level(value);
        } else if token == "--init-script" {
            if let Some(next) = tokens.get(i + 1) {
                flags.init_script = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--init-script=") {
            flags.init_script = Some(PathBuf::from(value));
        }
        i += 1;
    }
    flags
}

fn parse_log_level(s: &str) -> Option<LogLevel> {
    <LogLevel as clap::ValueEnum>::from_str(s, true).ok()
}
