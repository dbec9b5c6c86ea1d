use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Mode, Model, ToastLevel};

/// Plain text of the status line.
pub fn status_text(model: &Model) -> String {
    if model.mode == Mode::Command {
        return format!(":{}", model.command_line());
    }
    if let Some((message, _)) = model.active_toast() {
        return format!(" {message}");
    }

    let buffer = model.window.buffer();
    let filename = buffer
        .path()
        .and_then(|path| path.file_name())
        .map_or_else(|| "[scratch]".to_string(), |s| s.to_string_lossy().to_string());
    let dirty = if buffer.is_dirty() { " [modified]" } else { "" };
    let position = model.window.current_position();
    format!(
        " [{}]  {filename}{dirty}  Ln {}, Col {}",
        model.mode.label(),
        position.row,
        position.column
    )
}

pub(super) fn render_status_line(model: &Model, frame: &mut Frame, area: Rect) {
    let style = match (model.mode, model.active_toast()) {
        (Mode::Command, _) => Style::default(),
        (_, Some((_, ToastLevel::Info))) => Style::default().bg(Color::DarkGray).fg(Color::White),
        (_, Some((_, ToastLevel::Warning))) => Style::default().bg(Color::Yellow).fg(Color::Black),
        (_, Some((_, ToastLevel::Error))) => Style::default().bg(Color::Red).fg(Color::White),
        (Mode::Insert, None) => Style::default().bg(Color::Blue).fg(Color::White),
        (Mode::Normal, None) => Style::default().bg(Color::DarkGray).fg(Color::White),
    };
    frame.render_widget(Paragraph::new(status_text(model)).style(style), area);
}
