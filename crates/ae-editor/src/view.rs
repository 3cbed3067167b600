//! View — the bridge from row store to terminal.
//!
//! [`compose`] turns the current state into one complete frame of bytes:
//!
//! ```text
//! ESC[?25l ESC[2J ESC[H            hide cursor, clear, home
//! row 0            ESC[K \r\n       file rows, truncated to the width
//! row 1            ESC[K \r\n
//! ~                ESC[K \r\n       past end of file: placeholder
//! ~   Andrew's Editor -- version …  empty file: banner a third of the way down
//! ~                ESC[K            no \r\n after the last row
//! ESC[y;xH ESC[?25h                 place and show the cursor
//! ```
//!
//! The whole frame is built in an [`OutputBuffer`] and handed to the
//! terminal in one write by [`render`]. Nothing is written while the frame
//! is being built, so the terminal never shows half of one.

use std::io::{self, Write};

use ae_term::ansi;
use ae_term::output::OutputBuffer;
use ae_term::terminal::Size;

use crate::cursor::CursorState;
use crate::options::Options;
use crate::rows::RowStore;

/// Append a full frame to `out`.
pub fn compose(
    out: &mut OutputBuffer,
    size: Size,
    rows: &RowStore,
    cursor: CursorState,
    options: &Options,
) {
    out.push_bytes(ansi::CURSOR_HIDE);
    out.push_bytes(ansi::CLEAR_SCREEN);
    out.push_bytes(ansi::CURSOR_HOME);

    draw_rows(out, size, rows, options);

    // Writing into a Vec can't fail.
    ansi::cursor_to(out, cursor.x, cursor.y).ok();
    out.push_bytes(ansi::CURSOR_SHOW);
}

/// Compose a frame and write it to `w` in a single write.
///
/// # Errors
///
/// Returns an error if writing to `w` fails.
pub fn render(
    w: &mut impl Write,
    size: Size,
    rows: &RowStore,
    cursor: CursorState,
    options: &Options,
) -> io::Result<()> {
    let mut out = OutputBuffer::new();
    compose(&mut out, size, rows, cursor, options);
    out.flush_to(w)
}

fn draw_rows(out: &mut OutputBuffer, size: Size, rows: &RowStore, options: &Options) {
    let cols = usize::from(size.cols);
    let banner_row = size.rows / 3;

    for y in 0..size.rows {
        if let Some(row) = rows.get(usize::from(y)) {
            out.push_bytes(row.truncated(cols));
        } else if rows.is_empty() && y == banner_row {
            draw_welcome(out, cols, options);
        } else {
            out.push(options.empty_line);
        }

        out.push_bytes(ansi::CLEAR_LINE);
        if y + 1 < size.rows {
            out.push_bytes(b"\r\n");
        }
    }
}

/// The welcome banner, centred, with the placeholder glyph in column 0
/// whenever there is room for padding.
fn draw_welcome(out: &mut OutputBuffer, cols: usize, options: &Options) {
    let welcome = options.welcome();
    let text = &welcome.as_bytes()[..welcome.len().min(cols)];

    let mut padding = cols.saturating_sub(text.len()) / 2;
    if padding > 0 {
        out.push(options.empty_line);
        padding -= 1;
    }
    out.push_repeated(b' ', padding);
    out.push_bytes(text);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
