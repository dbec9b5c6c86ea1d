use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::{LineRange, Point};

/// Longest line accepted by [`Buffer::load`], in bytes.
pub const MAX_LINE_LENGTH: usize = 10 * 1024 * 1024;

/// Errors raised by buffer IO and positional edits.
#[derive(Debug, Error)]
pub enum BufferError {
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("line {line} exceeds the maximum length of {max} bytes")]
    LineTooLong { line: usize, max: usize },
    #[error("line {line} is not valid UTF-8")]
    Encoding { line: usize },
    #[error("position {row}:{column} is outside the buffer")]
    OutOfBounds { row: usize, column: usize },
    #[error("buffer has no backing file")]
    NoBackingFile,
}

impl BufferError {
    fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// One line of buffer text, without its terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    number: usize,
    content: String,
}

impl Line {
    pub fn new(number: usize, content: impl Into<String>) -> Self {
        Self {
            number,
            content: content.into(),
        }
    }

    /// Display line number (1-based).
    pub const fn number(&self) -> usize {
        self.number
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// The editable text of one file, stored as a sequence of lines.
///
/// A buffer is never empty: it always holds at least one (possibly empty)
/// line. File-backed buffers keep the file handle open between
/// [`load`](Self::load) and [`close`](Self::close) so that
/// [`save`](Self::save) rewrites the same file in place.
pub struct Buffer {
    lines: Vec<Line>,
    path: Option<PathBuf>,
    file: Option<File>,
    max_line_length: usize,
    dirty: bool,
}

impl Buffer {
    /// Create a memory-only buffer.
    pub fn scratch() -> Self {
        Self {
            lines: vec![Line::new(1, "")],
            path: None,
            file: None,
            max_line_length: MAX_LINE_LENGTH,
            dirty: false,
        }
    }

    /// Create a buffer backed by `path`. Nothing is read until [`load`](Self::load).
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::scratch()
        }
    }

    /// Create a memory-only buffer holding `text`.
    pub fn from_text(text: &str) -> Self {
        let mut buf = Self::scratch();
        buf.lines = text
            .split('\n')
            .enumerate()
            .map(|(i, line)| Line::new(i + 1, line))
            .collect();
        buf
    }

    /// Override the per-line size limit enforced on load.
    #[must_use]
    pub const fn with_max_line_length(mut self, max: usize) -> Self {
        self.max_line_length = max;
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether the buffer has been modified since it was loaded or saved.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub const fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The line at 1-based `row`.
    pub fn line(&self, row: usize) -> Option<&Line> {
        self.lines.get(row.checked_sub(1)?)
    }

    /// Length in characters of the line at `row`, or 0 when it does not exist.
    pub fn line_len(&self, row: usize) -> usize {
        self.line(row).map_or(0, Line::len)
    }

    /// Read the backing file, replacing the current lines.
    ///
    /// A missing file leaves the buffer as it is so new files can be created
    /// on save.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read, a line is longer
    /// than the configured maximum, or the content is not UTF-8.
    pub fn load(&mut self) -> Result<(), BufferError> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };
        let file = match OpenOptions::new().read(true).write(true).open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "file does not exist yet");
                return Ok(());
            }
            Err(err) => return Err(BufferError::io("open", &path, err)),
        };

        let lines = self.read_lines(&file, &path)?;
        tracing::debug!(path = %path.display(), lines = lines.len(), "loaded buffer");
        self.lines = lines;
        self.file = Some(file);
        self.dirty = false;
        Ok(())
    }

    fn read_lines(&self, file: &File, path: &Path) -> Result<Vec<Line>, BufferError> {
        let mut reader = BufReader::new(file);
        let mut lines = Vec::new();
        let mut raw = Vec::new();
        // Room for the line plus a "\r\n" terminator.
        let limit = self.max_line_length as u64 + 2;
        loop {
            raw.clear();
            let read = (&mut reader)
                .take(limit)
                .read_until(b'\n', &mut raw)
                .map_err(|err| BufferError::io("read", path, err))?;
            if read == 0 {
                break;
            }
            let number = lines.len() + 1;
            if raw.last() == Some(&b'\n') {
                raw.pop();
                if raw.last() == Some(&b'\r') {
                    raw.pop();
                }
            }
            if raw.len() > self.max_line_length {
                return Err(BufferError::LineTooLong {
                    line: number,
                    max: self.max_line_length,
                });
            }
            let content = String::from_utf8(std::mem::take(&mut raw))
                .map_err(|_| BufferError::Encoding { line: number })?;
            lines.push(Line::new(number, content));
        }
        if lines.is_empty() {
            lines.push(Line::new(1, ""));
        }
        Ok(lines)
    }

    /// Truncate the backing file and write every line, each followed by `\n`.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer has no path or the file cannot be
    /// created, truncated or written.
    pub fn save(&mut self) -> Result<usize, BufferError> {
        let path = self.path.clone().ok_or(BufferError::NoBackingFile)?;
        if self.file.is_none() {
            let created = File::create(&path).map_err(|err| BufferError::io("create", &path, err))?;
            self.file = Some(created);
        }
        let Some(mut file) = self.file.as_ref() else {
            return Err(BufferError::NoBackingFile);
        };

        // TODO: write to a temporary file and rename it over the original.
        file.set_len(0)
            .map_err(|err| BufferError::io("truncate", &path, err))?;
        file.seek(SeekFrom::Start(0))
            .map_err(|err| BufferError::io("seek", &path, err))?;

        let mut writer = BufWriter::new(file);
        let mut written = 0;
        for line in &self.lines {
            writer
                .write_all(line.content.as_bytes())
                .and_then(|()| writer.write_all(b"\n"))
                .map_err(|err| BufferError::io("write", &path, err))?;
            written += line.content.len() + 1;
        }
        writer
            .flush()
            .map_err(|err| BufferError::io("write", &path, err))?;
        drop(writer);

        self.dirty = false;
        tracing::info!(path = %path.display(), written, "saved buffer");
        Ok(written)
    }

    /// Release the backing file handle. Calling this twice is harmless.
    ///
    /// # Errors
    ///
    /// Returns an error if pending writes cannot be synced to disk.
    pub fn close(&mut self) -> Result<(), BufferError> {
        let Some(file) = self.file.take() else {
            return Ok(());
        };
        file.sync_all().map_err(|err| {
            BufferError::io("sync", self.path.as_deref().unwrap_or(Path::new("")), err)
        })
    }

    /// The lines covered by `range`.
    ///
    /// # Panics
    ///
    /// Panics if `range` starts at 0, ends past the last line or ends more
    /// than one line before it starts. Windows clamp their visible range
    /// before calling this.
    pub fn lines_in_range(&self, range: LineRange) -> &[Line] {
        assert!(
            range.start >= 1 && range.end <= self.lines.len() && range.start <= range.end + 1,
            "line range {}..={} is outside a buffer of {} lines",
            range.start,
            range.end,
            self.lines.len()
        );
        self.lines.get(range.indices()).unwrap_or_default()
    }

    /// Insert `text` before the character at `point`.
    ///
    /// Line breaks in `text` (`\n`, `\r\n` or `\r`) split the line.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfBounds`] if the row does not exist or the
    /// column is past the end of the line.
    pub fn insert_text(&mut self, point: Point, text: &str) -> Result<(), BufferError> {
        let offset = self.byte_offset(point)?;
        if text.is_empty() {
            return Ok(());
        }
        let idx = point.row_index();
        self.dirty = true;

        if !text.contains(['\n', '\r']) {
            self.lines[idx].content.insert_str(offset, text);
            return Ok(());
        }

        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        let mut segments = normalized.split('\n');
        let line = &mut self.lines[idx];
        let tail = line.content.split_off(offset);
        line.content.push_str(segments.next().unwrap_or_default());

        let mut new_lines: Vec<Line> = segments.map(|s| Line::new(0, s)).collect();
        if let Some(last) = new_lines.last_mut() {
            last.content.push_str(&tail);
        }
        self.lines.splice(idx + 1..idx + 1, new_lines);
        self.renumber();
        Ok(())
    }

    /// Delete `length` characters at `point`.
    ///
    /// Positive lengths delete forward from the column, negative lengths
    /// delete backward ending just before it. Deletion never crosses a line
    /// boundary; counts running past either end of the line are clamped.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfBounds`] if the row does not exist or the
    /// column is past the end of the line.
    pub fn delete_text(&mut self, point: Point, length: isize) -> Result<(), BufferError> {
        self.byte_offset(point)?;
        if length == 0 {
            return Ok(());
        }
        let line = &mut self.lines[point.row_index()];
        let col = point.column_index();
        let count = length.unsigned_abs();
        let (from, to) = if length > 0 {
            (col, col.saturating_add(count).min(line.len()))
        } else {
            (col.saturating_sub(count), col)
        };
        if from >= to {
            return Ok(());
        }
        let start = char_to_byte(&line.content, from);
        let end = char_to_byte(&line.content, to);
        line.content.replace_range(start..end, "");
        self.dirty = true;
        Ok(())
    }

    /// Reset to a single empty line.
    pub fn clear(&mut self) {
        self.lines = vec![Line::new(1, "")];
        self.dirty = false;
    }

    fn byte_offset(&self, point: Point) -> Result<usize, BufferError> {
        let out_of_bounds = BufferError::OutOfBounds {
            row: point.row,
            column: point.column,
        };
        let Some(line) = self.line(point.row) else {
            return Err(out_of_bounds);
        };
        if point.column == 0 || point.column_index() > line.len() {
            return Err(out_of_bounds);
        }
        Ok(char_to_byte(&line.content, point.column_index()))
    }

    fn renumber(&mut self) {
        for (i, line) in self.lines.iter_mut().enumerate() {
            line.number = i + 1;
        }
    }
}

/// Byte offset of the character at `char_idx`, or the string length past the end.
fn char_to_byte(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line.content)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("lines", &format_args!("{} lines", self.lines.len()))
            .field("path", &self.path)
            .field("open", &self.file.is_some())
            .field("dirty", &self.dirty)
            .finish()
    }
}
