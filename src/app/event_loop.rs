use std::io::{self, stdout};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::cursor::SetCursorStyle;
use crossterm::event::{self, Event};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::input::decode_key;
use crate::app::{App, Model};

/// Wake-up interval used to expire status messages while idle.
const TICK: Duration = Duration::from_millis(250);

/// Events delivered from the input thread to the main loop.
#[derive(Debug)]
pub enum SessionEvent {
    Key(char),
    /// Reading the terminal failed; no further events follow.
    InputFailed(io::Error),
}

impl App {
    /// Run the editor until the user exits.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized, the file cannot
    /// be loaded, drawing fails, or the input thread stops.
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal: jot requires an interactive terminal")?;
        let result = self.run_in(&mut terminal);

        let _ = execute!(stdout(), SetCursorStyle::DefaultUserShape);
        ratatui::restore();

        result
    }

    fn run_in(&self, terminal: &mut DefaultTerminal) -> Result<()> {
        let size = terminal.size()?;
        let mut model = Model::new(self.keymap.clone(), (size.width, size.height));
        model
            .open_file(&self.file_path)
            .with_context(|| format!("Failed to open {}", self.file_path.display()))?;
        if let Some(script) = &self.init_script {
            model.run_init_script(script);
        }

        let events = spawn_input_reader()?;
        let result = Self::event_loop(terminal, &mut model, &events);

        if let Err(err) = model.close() {
            tracing::warn!(error = %err, "failed to close buffer");
        }
        result
    }

    fn event_loop(
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        events: &Receiver<SessionEvent>,
    ) -> Result<()> {
        let mut needs_render = true;
        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }
            if needs_render {
                draw(terminal, model)?;
                needs_render = false;
            }

            match events.recv_timeout(TICK) {
                Ok(SessionEvent::Key(key)) => {
                    model.handle_key(key);
                    needs_render = true;
                }
                Ok(SessionEvent::InputFailed(err)) => {
                    return Err(err).context("Failed to read terminal input");
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    anyhow::bail!("Input reader stopped unexpectedly");
                }
            }

            if model.should_quit {
                tracing::info!("exit requested");
                return Ok(());
            }
        }
    }
}

fn draw(terminal: &mut DefaultTerminal, model: &Model) -> Result<()> {
    terminal.draw(|frame| crate::ui::render(model, frame))?;
    execute!(stdout(), crate::ui::cursor_style(model.mode))?;
    Ok(())
}

/// Start the thread that turns terminal events into [`SessionEvent`]s.
///
/// The thread stops after the first read error or when the receiver is
/// dropped.
fn spawn_input_reader() -> Result<Receiver<SessionEvent>> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("jot-input".to_string())
        .spawn(move || read_input(&tx))
        .context("Failed to start input thread")?;
    Ok(rx)
}

fn read_input(tx: &Sender<SessionEvent>) {
    loop {
        let event = match event::read() {
            Ok(Event::Key(key)) => match decode_key(key) {
                Some(key) => SessionEvent::Key(key),
                None => continue,
            },
            Ok(_) => continue,
            Err(err) => {
                tracing::error!(error = %err, "terminal read failed");
                let _ = tx.send(SessionEvent::InputFailed(err));
                return;
            }
        };
        if tx.send(event).is_err() {
            return;
        }
    }
}
