use crossterm::cursor::SetCursorStyle;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthChar;

use crate::app::{Mode, Model};
use crate::editor::Window;

use super::status;

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let [text_area, status_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

    render_window(&model.window, frame, text_area);
    status::render_status_line(model, frame, status_area);

    let (x, y) = cursor_position(model, frame.area());
    frame.set_cursor_position((x, y));
}

fn render_window(window: &Window, frame: &mut Frame, area: Rect) {
    let lines: Vec<Line> = window
        .visible()
        .iter()
        .map(|line| Line::raw(line.content()))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

/// Screen cell of the cursor for a terminal covering `area`.
///
/// In Command mode the cursor sits on the status row after the `:` prompt,
/// otherwise it tracks the main window's cursor.
pub fn cursor_position(model: &Model, area: Rect) -> (u16, u16) {
    let last_row = area.bottom().saturating_sub(1);
    if model.mode == Mode::Command {
        let x = 1 + cells_before_cursor(&model.command_window);
        return (area.x.saturating_add(x), last_row);
    }
    let window = &model.window;
    let row = to_u16(window.cursor().row - 1);
    (
        area.x.saturating_add(cells_before_cursor(window)),
        area.y.saturating_add(row).min(last_row),
    )
}

/// Display width of the text left of the cursor on its line.
fn cells_before_cursor(window: &Window) -> u16 {
    let position = window.current_position();
    let width: usize = window
        .buffer()
        .line(position.row)
        .map(|line| {
            line.content()
                .chars()
                .take(position.column_index())
                .map(|c| c.width().unwrap_or(0))
                .sum()
        })
        .unwrap_or(0);
    to_u16(width)
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Cursor shape for `mode`: a steady block while navigating, a blinking bar
/// while typing.
pub const fn cursor_style(mode: Mode) -> SetCursorStyle {
    match mode {
        Mode::Normal => SetCursorStyle::SteadyBlock,
        Mode::Insert | Mode::Command => SetCursorStyle::BlinkingBar,
    }
}
