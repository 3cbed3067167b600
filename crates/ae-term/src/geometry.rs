// SPDX-License-Identifier: MIT
//
// Window geometry — how many rows and columns the terminal has.
//
// Two tiers. The kernel usually knows (TIOCGWINSZ). When it doesn't, or
// reports zero columns, we ask the terminal itself: shove the cursor into
// the bottom-right corner with `ESC [ 999 C ESC [ 999 B`, send a Device
// Status Report (`ESC [ 6 n`), and read back `ESC [ rows ; cols R`. The
// corner's coordinates are the screen size.

use std::io::Write;

use crate::ansi;
use crate::error::{Error, Result};
use crate::input::ByteSource;
use crate::terminal::{self, Size};

/// Capacity of the cursor position report buffer, terminator included.
pub const REPORT_CAPACITY: usize = 32;

/// Resolve the terminal size, falling back to the cursor report protocol.
///
/// # Errors
///
/// Any failure of the fallback path: a failed or short write, a read
/// error, or a report that doesn't parse.
pub fn resolve(input: &mut impl ByteSource, output: &mut impl Write) -> Result<Size> {
    if let Some(size) = terminal::get_size() {
        log::debug!("window size from ioctl: {}x{}", size.cols, size.rows);
        return Ok(size);
    }

    log::debug!("ioctl gave no usable size, querying cursor position");
    size_from_far_corner(input, output)
}

/// Pin the cursor to the bottom-right corner and read its position back.
///
/// # Errors
///
/// See [`resolve`].
pub fn size_from_far_corner(
    input: &mut impl ByteSource,
    output: &mut impl Write,
) -> Result<Size> {
    write_exact(output, ansi::CURSOR_FAR_CORNER)?;
    query_cursor_position(input, output)
}

/// Ask the terminal where the cursor is.
///
/// Reads the reply byte by byte until the `R` terminator, a read timeout,
/// or [`REPORT_CAPACITY`]` - 1` bytes, whichever comes first.
///
/// # Errors
///
/// [`Error::Write`] / [`Error::ShortWrite`] if the request can't be sent,
/// [`Error::Read`] on a read failure, [`Error::CursorReport`] if the reply
/// is malformed.
pub fn query_cursor_position(
    input: &mut impl ByteSource,
    output: &mut impl Write,
) -> Result<Size> {
    write_exact(output, ansi::REQUEST_CURSOR_POSITION)?;

    let mut buf = [0u8; REPORT_CAPACITY];
    let mut len = 0;
    while len < REPORT_CAPACITY - 1 {
        match input.read_byte().map_err(Error::Read)? {
            Some(b'R') | None => break,
            Some(byte) => {
                buf[len] = byte;
                len += 1;
            }
        }
    }

    parse_cursor_report(&buf[..len])
}

/// Parse a cursor position report into a [`Size`].
///
/// Accepts `ESC [ rows ; cols`, with or without the trailing `R`.
///
/// # Errors
///
/// [`Error::CursorReport`] if the `ESC [` prefix is missing, the `;` is
/// missing, either number is empty, non-numeric, too large, or zero.
pub fn parse_cursor_report(report: &[u8]) -> Result<Size> {
    let body = report
        .strip_prefix(b"\x1b[")
        .ok_or_else(|| Error::CursorReport("response does not start with ESC [".into()))?;
    let body = body.strip_suffix(b"R").unwrap_or(body);

    let sep = body
        .iter()
        .position(|&b| b == b';')
        .ok_or_else(|| Error::CursorReport("response has no ';' separator".into()))?;

    let rows = parse_dimension(&body[..sep], "rows")?;
    let cols = parse_dimension(&body[sep + 1..], "cols")?;
    Ok(Size::new(cols, rows))
}

fn parse_dimension(digits: &[u8], what: &str) -> Result<u16> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(Error::CursorReport(format!(
            "{what} is not a number: {:?}",
            String::from_utf8_lossy(digits)
        )));
    }

    let value = digits.iter().try_fold(0u16, |acc, &d| {
        acc.checked_mul(10)?.checked_add(u16::from(d - b'0'))
    });

    match value {
        Some(0) => Err(Error::CursorReport(format!("{what} is zero"))),
        Some(v) => Ok(v),
        None => Err(Error::CursorReport(format!("{what} out of range"))),
    }
}

/// Send `bytes` in one `write` call; anything less is a failure.
fn write_exact(output: &mut impl Write, bytes: &[u8]) -> Result<()> {
    let written = output.write(bytes).map_err(Error::Write)?;
    if written != bytes.len() {
        return Err(Error::ShortWrite {
            written,
            expected: bytes.len(),
        });
    }
    output.flush().map_err(Error::Write)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
