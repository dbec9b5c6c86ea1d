//! jot - a small modal text editor for the terminal.
//!
//! # Usage
//!
//! ```bash
//! jot notes.txt
//! jot --log-level debug notes.txt
//! jot --init-script setup.rhai notes.txt
//! ```

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use jot::app::{App, Keymap};
use jot::config::{
    ConfigFlags, LogLevel, clear_config_flags, default_log_path, global_config_path,
    load_config_flags, local_override_path, save_config_flags,
};

/// A small modal text editor with Rhai scripting
#[derive(Parser, Debug)]
#[command(name = "jot", version, about, long_about = None)]
struct Cli {
    /// File to edit (created on first save if missing)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Write logs to this file instead of the temp directory
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Minimum level of log events to record
    #[arg(long, value_enum, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    /// Rhai script to run after the file is loaded
    #[arg(long, value_name = "PATH")]
    init_script: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn init_logging(flags: &ConfigFlags) -> Result<()> {
    let path = flags.log_file.clone().unwrap_or_else(default_log_path);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    let level = flags.log_level.unwrap_or(LogLevel::Info).as_level();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = ConfigFlags {
        log_file: cli.log_file.clone(),
        log_level: cli.log_level,
        init_script: cli.init_script.clone(),
        bindings: Vec::new(),
    };

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    let global_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        load_config_flags(&global_path)?
    };
    if cli.save {
        // Keep saved flags and bindings not given on this command line.
        save_config_flags(&global_path, &global_flags.union(&cli_flags))?;
    }

    let file_flags = if cli.clear {
        global_flags
    } else {
        global_flags.union(&load_config_flags(&local_path)?)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(&effective)?;
    tracing::info!(
        file = %cli.file.display(),
        bindings = effective.bindings.len(),
        "starting jot"
    );

    if cli.file.is_dir() {
        anyhow::bail!("Not a file: {}", cli.file.display());
    }

    let mut app = App::new(cli.file)
        .with_keymap(Keymap::with_user_bindings(effective.bindings))
        .with_init_script(effective.init_script);

    app.run().context("Application error")
}
