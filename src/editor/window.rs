//! A fixed-size viewport onto a [`Buffer`] with a viewport-relative cursor.

use super::{Buffer, BufferError, Line, LineRange, Point};

pub struct Window {
    buffer: Buffer,
    visible_lines: LineRange,
    cursor: Point,
    width: usize,
    height: usize,
}

impl Window {
    /// Create a window of `width` x `height` cells showing `buffer` from its
    /// first line. Zero sizes are raised to 1.
    pub fn new(buffer: Buffer, width: usize, height: usize) -> Self {
        let height = height.max(1);
        Self {
            buffer,
            visible_lines: LineRange::new(1, height),
            cursor: Point::default(),
            width: width.max(1),
            height,
        }
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    /// Cursor position relative to the viewport.
    pub const fn cursor(&self) -> Point {
        self.cursor
    }

    pub const fn visible_lines(&self) -> LineRange {
        self.visible_lines
    }

    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub const fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    /// The cursor in buffer coordinates.
    pub const fn current_position(&self) -> Point {
        Point::new(
            self.visible_lines.start + self.cursor.row - 1,
            self.cursor.column,
        )
    }

    /// Move the cursor by a signed offset.
    ///
    /// When the row leaves the viewport, the viewport scrolls by the same
    /// delta and the cursor sticks to the edge it crossed. The viewport never
    /// starts above line 1 and the cursor never lands below the buffer's last
    /// line. The column is kept within the window and at most one past the end
    /// of the current line.
    pub fn move_cursor_relative(&mut self, delta_rows: isize, delta_columns: isize) {
        let row = self.cursor.row.cast_signed().saturating_add(delta_rows);
        let height = self.height.cast_signed();
        if row < 1 {
            self.shift_visible_lines(delta_rows);
            self.cursor.row = 1;
        } else if row > height {
            self.shift_visible_lines(delta_rows);
            self.cursor.row = self.height;
        } else {
            self.cursor.row = row.unsigned_abs();
        }
        self.clamp_to_buffer_end();

        let column = self
            .cursor
            .column
            .saturating_add_signed(delta_columns)
            .max(1);
        self.set_column(column);
    }

    fn shift_visible_lines(&mut self, delta: isize) {
        let floor = 1 - self.visible_lines.start.cast_signed();
        self.visible_lines = self.visible_lines.shift_by(delta.max(floor));
    }

    fn clamp_to_buffer_end(&mut self) {
        let last = self.buffer.line_count();
        if self.visible_lines.start > last {
            self.visible_lines = LineRange::new(last, last + self.height - 1);
        }
        let row_limit = last - self.visible_lines.start + 1;
        self.cursor.row = self.cursor.row.min(row_limit).max(1);
    }

    fn set_column(&mut self, column: usize) {
        let line_len = self.buffer.line_len(self.current_position().row);
        let limit = self.width.min(line_len + 1);
        self.cursor.column = column.clamp(1, limit);
    }

    /// Insert `text` at `point` (buffer coordinates) and advance the cursor
    /// past it.
    ///
    /// # Errors
    ///
    /// Propagates [`BufferError::OutOfBounds`] from the buffer.
    pub fn insert_text(&mut self, point: Point, text: &str) -> Result<(), BufferError> {
        self.buffer.insert_text(point, text)?;

        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        match normalized.rsplit_once('\n') {
            None => {
                let advance = text.chars().count().cast_signed();
                self.move_cursor_relative(0, advance);
            }
            Some((head, last)) => {
                let breaks = head.matches('\n').count() + 1;
                self.move_cursor_relative(breaks.cast_signed(), 0);
                self.set_column(last.chars().count() + 1);
            }
        }
        Ok(())
    }

    /// Delete `length` characters at `point` (buffer coordinates). Backward
    /// deletes move the cursor back with the text.
    ///
    /// # Errors
    ///
    /// Propagates [`BufferError::OutOfBounds`] from the buffer.
    pub fn delete_text(&mut self, point: Point, length: isize) -> Result<(), BufferError> {
        self.buffer.delete_text(point, length)?;
        if length < 0 {
            self.move_cursor_relative(0, length);
        }
        Ok(())
    }

    /// Attach `buffer`, reset the view to its top and load it from disk.
    ///
    /// # Errors
    ///
    /// Returns the buffer's load error. The buffer stays attached.
    pub fn load_buffer(&mut self, buffer: Buffer) -> Result<(), BufferError> {
        self.buffer = buffer;
        self.reset_view();
        self.buffer.load()
    }

    /// Empty the buffer and reset the view.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.reset_view();
    }

    fn reset_view(&mut self) {
        self.cursor = Point::default();
        self.visible_lines = LineRange::new(1, self.height);
    }

    /// The visible lines that exist in the buffer.
    pub fn visible(&self) -> &[Line] {
        let count = self.buffer.line_count();
        if self.visible_lines.start > count {
            return &[];
        }
        let end = self.visible_lines.end.min(count);
        self.buffer
            .lines_in_range(LineRange::new(self.visible_lines.start, end))
    }

    /// Visible text with each line terminated by `\r\n`, the plain text
    /// form of the view. The terminal UI draws [`Window::visible`] instead.
    pub fn render(&self) -> String {
        self.visible()
            .iter()
            .flat_map(|line| [line.content(), "\r\n"])
            .collect()
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("visible_lines", &self.visible_lines)
            .field("cursor", &self.cursor)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
