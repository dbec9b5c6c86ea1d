//! Coordinate types shared by buffers and windows.
//!
//! Rows and columns are 1-based everywhere. Whether a [`Point`] is relative to
//! a window's viewport or absolute within a buffer depends on who produced it;
//! [`Window`](super::Window) converts between the two.

/// A position in text, 1-based on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Zero-based row index.
    pub const fn row_index(self) -> usize {
        self.row.saturating_sub(1)
    }

    /// Zero-based column (character) index.
    pub const fn column_index(self) -> usize {
        self.column.saturating_sub(1)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// An inclusive span of line numbers.
///
/// `LineRange::new(3, 5)` covers lines 3, 4 and 5, which is the zero-based
/// slice `2..5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Offset both bounds by `n`.
    ///
    /// Bounds saturate at zero; callers that need `start >= 1` limit `n`
    /// before shifting.
    #[must_use]
    pub const fn shift_by(self, n: isize) -> Self {
        Self {
            start: self.start.saturating_add_signed(n),
            end: self.end.saturating_add_signed(n),
        }
    }

    /// Number of lines covered.
    pub const fn len(self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }

    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// The zero-based, end-exclusive index range.
    pub const fn indices(self) -> std::ops::Range<usize> {
        self.start.saturating_sub(1)..self.end
    }
}
