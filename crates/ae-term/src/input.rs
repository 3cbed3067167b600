// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Terminal input — byte sources and the key decoder.
//
// Raw mode is configured with VMIN=0 / VTIME=1, so a read either returns
// one byte or returns nothing after ~100 ms. `ByteSource` models exactly
// that: `Ok(Some(b))` for a byte, `Ok(None)` for a timeout, `Err` for a
// real failure.
//
// # Escape vs arrow key
//
// An arrow key arrives as three bytes (`ESC [ A`); the Escape key is a lone
// `ESC`. They are indistinguishable until the next bytes show up, so after
// an ESC the decoder reads two more bytes. If either read times out, the
// user pressed Escape. If they form `[` + `A..D`, it was an arrow. Any other
// pair collapses to Escape as well.

use std::collections::VecDeque;
use std::io;

use bitflags::bitflags;

use crate::error::{Error, Result};

// ─── Event Types ────────────────────────────────────────────────────────────

/// A decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys.
    pub modifiers: Modifiers,
}

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A single input byte. For Ctrl+letter this is the lowercase letter
    /// and [`Modifiers::CTRL`] is set.
    Char(u8),
    /// A lone ESC, or an escape sequence we don't recognise.
    Escape,
    Up,
    Down,
    Left,
    Right,
}

bitflags! {
    /// Keyboard modifier flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const CTRL = 0b0000_0100;
    }
}

/// The ESC byte.
pub const ESC: u8 = 0x1B;

impl KeyEvent {
    /// A key with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// Ctrl + `letter` (lowercase ASCII).
    #[must_use]
    pub const fn ctrl(letter: u8) -> Self {
        Self {
            code: KeyCode::Char(letter),
            modifiers: Modifiers::CTRL,
        }
    }

    /// Decode a single non-escape byte.
    ///
    /// `0x01..=0x1A` are Ctrl+A through Ctrl+Z; everything else is passed
    /// through untouched.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            ESC => Self::plain(KeyCode::Escape),
            0x01..=0x1A => Self::ctrl(byte + b'a' - 1),
            _ => Self::plain(KeyCode::Char(byte)),
        }
    }

    /// The byte the terminal sent for this key, if it was a single byte.
    ///
    /// Inverse of [`from_byte`](Self::from_byte). Arrows have no single-byte
    /// form and return `None`.
    #[must_use]
    pub const fn as_byte(self) -> Option<u8> {
        match self.code {
            KeyCode::Char(b) if self.modifiers.contains(Modifiers::CTRL) => Some(b & 0x1F),
            KeyCode::Char(b) => Some(b),
            KeyCode::Escape => Some(ESC),
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => None,
        }
    }
}

// ─── Byte Sources ───────────────────────────────────────────────────────────

/// Somewhere bytes come from, one at a time, with a timeout.
pub trait ByteSource {
    /// Read one byte.
    ///
    /// `Ok(None)` means the read timed out with nothing available.
    ///
    /// # Errors
    ///
    /// Any I/O failure other than a timeout.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }
}

/// Stdin read one byte per `read(2)`.
///
/// Relies on the raw-mode read policy for the timeout: with `VMIN=0`,
/// `read()` returning 0 means the `VTIME` window passed in silence.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinSource;

impl StdinSource {
    /// Create a source over fd 0.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ByteSource for StdinSource {
    #[cfg(unix)]
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        let n = unsafe { libc::read(libc::STDIN_FILENO, (&raw mut byte).cast(), 1) };
        match n {
            1 => Ok(Some(byte)),
            0 => Ok(None),
            _ => {
                let err = io::Error::last_os_error();
                match err.kind() {
                    // Cygwin reports the timeout as EAGAIN; a signal can
                    // interrupt the wait. Both just mean "no byte yet".
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => Ok(None),
                    _ => Err(err),
                }
            }
        }
    }

    #[cfg(not(unix))]
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        use std::io::Read;
        let mut byte = [0u8; 1];
        match io::stdin().lock().read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }
}

/// A pre-recorded input stream.
///
/// Each entry is either a byte or a timeout (`None`). Once the script runs
/// out, reads fail with `UnexpectedEof`, which the decoder surfaces as a
/// read error. Used to drive the decoder and the geometry protocol without
/// a terminal.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    script: VecDeque<Option<u8>>,
}

impl ScriptedInput {
    /// A script of bytes with no timeouts.
    #[must_use]
    pub fn bytes(bytes: &[u8]) -> Self {
        Self {
            script: bytes.iter().copied().map(Some).collect(),
        }
    }

    /// Append bytes to the script.
    #[must_use]
    pub fn then_bytes(mut self, bytes: &[u8]) -> Self {
        self.script.extend(bytes.iter().copied().map(Some));
        self
    }

    /// Append one read timeout.
    #[must_use]
    pub fn then_timeout(mut self) -> Self {
        self.script.push_back(None);
        self
    }

    /// Entries not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl ByteSource for ScriptedInput {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        self.script
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "input script exhausted"))
    }
}

// ─── Decoder ────────────────────────────────────────────────────────────────

/// Block until a byte arrives, retrying through timeouts.
///
/// # Errors
///
/// [`Error::Read`] on any read failure that isn't a timeout.
pub fn read_byte_blocking(src: &mut (impl ByteSource + ?Sized)) -> Result<u8> {
    loop {
        if let Some(byte) = src.read_byte().map_err(Error::Read)? {
            return Ok(byte);
        }
    }
}

/// Read and decode one key.
///
/// Waits (through any number of timeouts) for the first byte. A following
/// escape sequence must arrive without a timeout between its bytes.
///
/// # Errors
///
/// [`Error::Read`] if the source fails with anything other than a timeout.
pub fn read_key(src: &mut (impl ByteSource + ?Sized)) -> Result<KeyEvent> {
    let byte = read_byte_blocking(src)?;
    if byte != ESC {
        return Ok(KeyEvent::from_byte(byte));
    }

    let escape = KeyEvent::plain(KeyCode::Escape);
    let Some(first) = src.read_byte().map_err(Error::Read)? else {
        return Ok(escape);
    };
    let Some(second) = src.read_byte().map_err(Error::Read)? else {
        return Ok(escape);
    };

    Ok(decode_escape(first, second).unwrap_or(escape))
}

/// Map the two bytes after ESC to an arrow key.
const fn decode_escape(first: u8, second: u8) -> Option<KeyEvent> {
    if first != b'[' {
        return None;
    }
    let code = match second {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        _ => return None,
    };
    Some(KeyEvent::plain(code))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn key(script: ScriptedInput) -> KeyEvent {
        let mut src = script;
        read_key(&mut src).unwrap()
    }

    fn escape() -> KeyEvent {
        KeyEvent::plain(KeyCode::Escape)
    }

    // ── Single bytes ─────────────────────────────────────────────────

    #[test]
    fn printable_byte_is_char() {
        assert_eq!(
            key(ScriptedInput::bytes(b"a")),
            KeyEvent::plain(KeyCode::Char(b'a'))
        );
    }

    #[test]
    fn ctrl_q_decodes_as_ctrl_letter() {
        let ev = key(ScriptedInput::bytes(&[0x11]));
        assert_eq!(ev, KeyEvent::ctrl(b'q'));
        assert_eq!(ev.as_byte(), Some(0x11));
    }

    #[test]
    fn ctrl_c_is_byte_three() {
        let ev = key(ScriptedInput::bytes(&[0x03]));
        assert_eq!(ev, KeyEvent::ctrl(b'c'));
        assert_eq!(ev.as_byte(), Some(3));
    }

    #[test]
    fn high_and_nul_bytes_pass_through() {
        for b in [0x00, 0x1C, 0x7F, 0x80, 0xFF] {
            assert_eq!(KeyEvent::from_byte(b), KeyEvent::plain(KeyCode::Char(b)));
            assert_eq!(KeyEvent::from_byte(b).as_byte(), Some(b));
        }
    }

    #[test]
    fn as_byte_round_trips_all_non_escape_bytes() {
        for b in 0..=u8::MAX {
            assert_eq!(KeyEvent::from_byte(b).as_byte(), Some(b));
        }
    }

    #[test]
    fn arrows_have_no_byte() {
        assert_eq!(KeyEvent::plain(KeyCode::Up).as_byte(), None);
    }

    // ── Timeouts ──────────────────────────────────────────────────────

    #[test]
    fn leading_timeouts_are_retried() {
        let src = ScriptedInput::default()
            .then_timeout()
            .then_timeout()
            .then_bytes(b"x");
        assert_eq!(key(src), KeyEvent::plain(KeyCode::Char(b'x')));
    }

    #[test]
    fn read_error_is_fatal() {
        let mut src = ScriptedInput::default();
        assert!(matches!(read_key(&mut src), Err(Error::Read(_))));
    }

    // ── Escape sequences ──────────────────────────────────────────────

    #[test]
    fn arrow_sequences() {
        assert_eq!(key(ScriptedInput::bytes(b"\x1b[A")).code, KeyCode::Up);
        assert_eq!(key(ScriptedInput::bytes(b"\x1b[B")).code, KeyCode::Down);
        assert_eq!(key(ScriptedInput::bytes(b"\x1b[C")).code, KeyCode::Right);
        assert_eq!(key(ScriptedInput::bytes(b"\x1b[D")).code, KeyCode::Left);
    }

    #[test]
    fn unknown_csi_final_is_escape() {
        let mut src = ScriptedInput::bytes(b"\x1b[Z");
        assert_eq!(read_key(&mut src).unwrap(), escape());
        assert_eq!(src.remaining(), 0);
    }

    #[test]
    fn lone_escape_then_timeout() {
        let mut src = ScriptedInput::bytes(&[ESC]).then_timeout();
        assert_eq!(read_key(&mut src).unwrap(), escape());
        assert_eq!(src.remaining(), 0);
    }

    #[test]
    fn escape_bracket_then_timeout() {
        let src = ScriptedInput::bytes(b"\x1b[").then_timeout();
        assert_eq!(key(src), escape());
    }

    #[test]
    fn escape_non_bracket_is_escape() {
        // SS3 arrows are not part of the protocol we decode.
        let src = ScriptedInput::bytes(b"\x1bOA");
        assert_eq!(key(src), escape());
    }

    #[test]
    fn error_inside_sequence_is_propagated() {
        let mut src = ScriptedInput::bytes(b"\x1b[");
        assert!(matches!(read_key(&mut src), Err(Error::Read(_))));
    }

    #[test]
    fn keys_decode_in_sequence() {
        let mut src = ScriptedInput::bytes(b"\x1b[Bj\x1b[D");
        assert_eq!(read_key(&mut src).unwrap().code, KeyCode::Down);
        assert_eq!(read_key(&mut src).unwrap().code, KeyCode::Char(b'j'));
        assert_eq!(read_key(&mut src).unwrap().code, KeyCode::Left);
    }

    #[test]
    fn byte_source_through_mut_ref() {
        let mut inner = ScriptedInput::bytes(b"z");
        let mut by_ref = &mut inner;
        assert_eq!(ByteSource::read_byte(&mut by_ref).unwrap(), Some(b'z'));
    }
}
