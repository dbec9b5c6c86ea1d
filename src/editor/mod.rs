//! Text storage and viewport primitives.
//!
//! A [`Buffer`] holds the lines of one file, a [`Window`] shows a fixed-size
//! slice of a buffer with a cursor. Both use 1-based [`Point`] coordinates.

mod buffer;
mod position;
mod window;

pub use buffer::{Buffer, BufferError, Line, MAX_LINE_LENGTH};
pub use position::{LineRange, Point};
pub use window::Window;
