// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write VT100 sequences to any `impl Write`. No state,
// no decisions about when to emit. The frame composer and the geometry
// resolver decide; this module only knows the bytes.
//
// Cursor positions are 0-indexed in our API and converted to 1-indexed
// for the terminal (CUP is 1-based).
//
// All functions return `io::Result` propagated from the underlying writer.
// They never fail when writing to `OutputBuffer` (backed by a Vec).

use std::io::{self, Write};

// ─── Raw sequences ──────────────────────────────────────────────────────────

/// Erase the whole display (ED 2).
pub const CLEAR_SCREEN: &[u8] = b"\x1b[2J";
/// Move the cursor to the top-left cell (CUP with no parameters).
pub const CURSOR_HOME: &[u8] = b"\x1b[H";
/// Hide the cursor (DECTCEM reset).
pub const CURSOR_HIDE: &[u8] = b"\x1b[?25l";
/// Show the cursor (DECTCEM set).
pub const CURSOR_SHOW: &[u8] = b"\x1b[?25h";
/// Erase from the cursor to the end of the line (EL 0).
pub const CLEAR_LINE: &[u8] = b"\x1b[K";
/// Push the cursor as far right and down as the terminal allows.
///
/// CUF/CUD stop at the screen edge, so 999 of each pins the cursor to the
/// bottom-right cell without knowing the size.
pub const CURSOR_FAR_CORNER: &[u8] = b"\x1b[999C\x1b[999B";
/// Device Status Report: ask for the cursor position (`ESC [ r ; c R`).
pub const REQUEST_CURSOR_POSITION: &[u8] = b"\x1b[6n";

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` using the CUP (Cursor Position) sequence.
///
/// Our coordinates are 0-indexed; ANSI CUP is 1-indexed.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// Move the cursor to the home position.
#[inline]
pub fn cursor_home(w: &mut impl Write) -> io::Result<()> {
    w.write_all(CURSOR_HOME)
}

/// Hide the cursor.
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(CURSOR_HIDE)
}

/// Show the cursor.
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(CURSOR_SHOW)
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen.
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(CLEAR_SCREEN)
}

/// Clear the rest of the current line.
#[inline]
pub fn clear_line(w: &mut impl Write) -> io::Result<()> {
    w.write_all(CLEAR_LINE)
}

/// Clear the screen and home the cursor.
///
/// This is the reset emitted on quit and before a fatal diagnostic.
#[inline]
pub fn reset_screen(w: &mut impl Write) -> io::Result<()> {
    clear_screen(w)?;
    cursor_home(w)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
