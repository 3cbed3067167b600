//! Cursor — a screen cell, moved one step at a time.
//!
//! The cursor lives in screen coordinates, not buffer coordinates: `x` is a
//! column in `0..cols` and `y` is a row in `0..rows`. It is not tied to the
//! row store at all, so it can sit on a placeholder line below the end of
//! the file.
//!
//! Movement clamps. Stepping past an edge leaves the cursor where it was;
//! nothing wraps.

use ae_term::terminal::Size;

/// One of the four arrow directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// The cursor's screen cell, 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorState {
    pub x: u16,
    pub y: u16,
}

impl CursorState {
    /// The top-left cell.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Create a cursor at `(x, y)`.
    #[inline]
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Move one cell in `dir`, staying inside `size`.
    ///
    /// Left and up stop at 0; right stops at `cols - 1`; down stops at
    /// `rows - 1`.
    pub const fn step(&mut self, dir: Direction, size: Size) {
        match dir {
            Direction::Left => {
                if self.x > 0 {
                    self.x -= 1;
                }
            }
            Direction::Right => {
                if self.x < size.cols.saturating_sub(1) {
                    self.x += 1;
                }
            }
            Direction::Up => {
                if self.y > 0 {
                    self.y -= 1;
                }
            }
            Direction::Down => {
                if self.y < size.rows.saturating_sub(1) {
                    self.y += 1;
                }
            }
        }
    }

    /// Whether the cursor is inside `size`.
    #[inline]
    #[must_use]
    pub const fn is_within(self, size: Size) -> bool {
        self.x < size.cols && self.y < size.rows
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
