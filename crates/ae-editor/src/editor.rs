//! Editor — owns the viewer's state and runs the read/render loop.
//!
//! One [`Editor`] value holds everything that changes while the viewer runs:
//! the screen size (fixed after start-up), the cursor, the rows of the open
//! file, and the options. Terminal I/O is passed in, never owned, so the
//! same loop runs against a real terminal or against scripted bytes.
//!
//! Each iteration redraws the whole screen, then blocks for one key:
//!
//! | Key           | Effect                                         |
//! |---------------|------------------------------------------------|
//! | quit key      | clear the screen, return [`Action::Quit`]      |
//! | interrupt key | print the quit hint                            |
//! | arrows        | move the cursor one cell, clamped to the screen|
//! | anything else | nothing                                        |

use std::io::Write;
use std::path::Path;

use ae_term::ansi;
use ae_term::geometry;
use ae_term::input::{self, ByteSource, KeyCode, KeyEvent};
use ae_term::terminal::Size;

use crate::cursor::{CursorState, Direction};
use crate::error::Result;
use crate::options::Options;
use crate::rows::RowStore;
use crate::view;

/// What the loop should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep going.
    Continue,
    /// Leave the loop.
    Quit,
}

/// The viewer's state.
#[derive(Debug, Clone)]
pub struct Editor {
    size: Size,
    cursor: CursorState,
    rows: RowStore,
    options: Options,
}

impl Editor {
    /// Resolve the terminal size and start with an empty store.
    ///
    /// # Errors
    ///
    /// Any geometry failure (see [`geometry::resolve`]).
    pub fn init(
        input: &mut impl ByteSource,
        output: &mut impl Write,
        options: Options,
    ) -> Result<Self> {
        let size = geometry::resolve(input, output)?;
        Ok(Self::with_size(size, options))
    }

    /// Start with a known size and an empty store.
    #[must_use]
    pub const fn with_size(size: Size, options: Options) -> Self {
        Self {
            size,
            cursor: CursorState::ORIGIN,
            rows: RowStore::new(),
            options,
        }
    }

    /// Load the file at `path` into the row store.
    ///
    /// # Errors
    ///
    /// See [`RowStore::load`].
    pub fn open(&mut self, path: &Path) -> Result<()> {
        self.rows.load(path)
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> CursorState {
        self.cursor
    }

    #[inline]
    #[must_use]
    pub const fn rows(&self) -> &RowStore {
        &self.rows
    }

    #[inline]
    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    // -- Loop ---------------------------------------------------------------

    /// Draw the current state as one frame.
    ///
    /// # Errors
    ///
    /// Fails if the frame can't be written.
    pub fn refresh(&self, output: &mut impl Write) -> Result<()> {
        view::render(output, self.size, &self.rows, self.cursor, &self.options)
            .map_err(ae_term::Error::Write)?;
        Ok(())
    }

    /// Read one key and act on it.
    ///
    /// # Errors
    ///
    /// Fails on a read error or if the quit sequence / hint can't be
    /// written.
    pub fn process_input(
        &mut self,
        input: &mut impl ByteSource,
        output: &mut impl Write,
    ) -> Result<Action> {
        let key = input::read_key(input)?;
        self.handle_key(key, output)
    }

    /// Act on an already decoded key.
    ///
    /// # Errors
    ///
    /// Fails if the quit sequence or hint can't be written.
    pub fn handle_key(&mut self, key: KeyEvent, output: &mut impl Write) -> Result<Action> {
        let direction = match key.code {
            KeyCode::Up => Some(Direction::Up),
            KeyCode::Down => Some(Direction::Down),
            KeyCode::Left => Some(Direction::Left),
            KeyCode::Right => Some(Direction::Right),
            KeyCode::Char(_) | KeyCode::Escape => None,
        };
        if let Some(dir) = direction {
            self.cursor.step(dir, self.size);
            return Ok(Action::Continue);
        }

        match key.as_byte() {
            Some(b) if b == self.options.quit_key => {
                log::debug!("quit key pressed");
                ansi::reset_screen(output).map_err(ae_term::Error::Write)?;
                output.flush().map_err(ae_term::Error::Write)?;
                Ok(Action::Quit)
            }
            Some(b) if b == self.options.interrupt_key => {
                write!(output, "{}\r\n", self.options.quit_hint)
                    .and_then(|()| output.flush())
                    .map_err(ae_term::Error::Write)?;
                Ok(Action::Continue)
            }
            _ => Ok(Action::Continue),
        }
    }

    /// Refresh and read keys until the quit key.
    ///
    /// # Errors
    ///
    /// Stops at the first read or write failure.
    pub fn run(&mut self, input: &mut impl ByteSource, output: &mut impl Write) -> Result<()> {
        loop {
            self.refresh(output)?;
            if self.process_input(input, output)? == Action::Quit {
                return Ok(());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use ae_term::input::ScriptedInput;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::Error;

    const UP: &[u8] = b"\x1b[A";
    const DOWN: &[u8] = b"\x1b[B";
    const LEFT: &[u8] = b"\x1b[D";
    const RIGHT: &[u8] = b"\x1b[C";
    const QUIT: &[u8] = &[0x11];

    fn editor(cols: u16, rows: u16) -> Editor {
        Editor::with_size(Size::new(cols, rows), Options::default())
    }

    fn press_all(e: &mut Editor, keys: &[&[u8]]) -> Vec<u8> {
        let mut input = ScriptedInput::default();
        for k in keys {
            input = input.then_bytes(k);
        }
        let mut output = Vec::new();
        for _ in keys {
            e.process_input(&mut input, &mut output).unwrap();
        }
        output
    }

    fn three_line_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"alpha\nbeta\r\ngamma\n").unwrap();
        file
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn with_size_starts_at_origin_and_empty() {
        let e = editor(80, 24);
        assert_eq!(e.cursor(), CursorState::ORIGIN);
        assert!(e.rows().is_empty());
        assert_eq!(e.size(), Size::new(80, 24));
    }

    #[test]
    fn open_loads_rows() {
        let file = three_line_file();
        let mut e = editor(80, 24);
        e.open(file.path()).unwrap();

        let rows: Vec<&[u8]> = e.rows().iter().map(|r| r.as_bytes()).collect();
        assert_eq!(rows, vec![&b"alpha"[..], b"beta", b"gamma"]);
    }

    #[test]
    fn open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut e = editor(80, 24);
        let err = e.open(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, Error::Open { .. }));
    }

    // -- Cursor keys --------------------------------------------------------

    #[test]
    fn arrows_move_cursor() {
        let mut e = editor(80, 24);
        press_all(&mut e, &[RIGHT, RIGHT, DOWN]);
        assert_eq!(e.cursor(), CursorState::new(2, 1));
        press_all(&mut e, &[LEFT, UP]);
        assert_eq!(e.cursor(), CursorState::new(1, 0));
    }

    #[test]
    fn arrows_clamp_at_edges() {
        let mut e = editor(3, 2);
        press_all(&mut e, &[LEFT, UP]);
        assert_eq!(e.cursor(), CursorState::ORIGIN);
        press_all(&mut e, &[RIGHT, RIGHT, RIGHT, RIGHT, DOWN, DOWN, DOWN]);
        assert_eq!(e.cursor(), CursorState::new(2, 1));
    }

    #[test]
    fn cursor_moves_past_end_of_file() {
        let file = three_line_file();
        let mut e = editor(80, 10);
        e.open(file.path()).unwrap();

        press_all(&mut e, &[DOWN, DOWN, DOWN]);
        assert_eq!(e.cursor().y, 3);
    }

    #[test]
    fn down_clamps_at_last_screen_row() {
        let file = three_line_file();
        let mut e = editor(80, 4);
        e.open(file.path()).unwrap();

        press_all(&mut e, &[DOWN, DOWN, DOWN]);
        assert_eq!(e.cursor().y, 3);
        press_all(&mut e, &[DOWN]);
        assert_eq!(e.cursor().y, 3);
    }

    #[test]
    fn other_keys_do_nothing() {
        let mut e = editor(80, 24);
        let before = e.cursor();
        let out = press_all(&mut e, &[b"x", b"\x1b[Z", &[0x1A], b"\r"]);
        assert_eq!(e.cursor(), before);
        assert!(out.is_empty());
    }

    #[test]
    fn bare_escape_does_nothing() {
        let mut e = editor(80, 24);
        let mut input = ScriptedInput::bytes(b"\x1b").then_timeout();
        let mut out = Vec::new();
        let action = e.process_input(&mut input, &mut out).unwrap();
        assert_eq!(action, Action::Continue);
        assert_eq!(e.cursor(), CursorState::ORIGIN);
    }

    // -- Quit / interrupt ---------------------------------------------------

    #[test]
    fn quit_key_clears_and_quits() {
        let mut e = editor(80, 24);
        let mut input = ScriptedInput::bytes(QUIT);
        let mut out = Vec::new();

        let action = e.process_input(&mut input, &mut out).unwrap();

        assert_eq!(action, Action::Quit);
        assert_eq!(out, b"\x1b[2J\x1b[H");
    }

    #[test]
    fn interrupt_key_prints_hint_only() {
        let mut e = editor(80, 24);
        press_all(&mut e, &[RIGHT]);
        let mut input = ScriptedInput::bytes(&[0x03]);
        let mut out = Vec::new();

        let action = e.process_input(&mut input, &mut out).unwrap();

        assert_eq!(action, Action::Continue);
        assert_eq!(String::from_utf8(out).unwrap(), "Ctrl-Q to quit\r\n");
        assert_eq!(e.cursor(), CursorState::new(1, 0));
    }

    #[test]
    fn custom_quit_key() {
        let options = Options {
            quit_key: b'q',
            ..Options::default()
        };
        let mut e = Editor::with_size(Size::new(80, 24), options);
        let mut out = Vec::new();
        let action = e
            .handle_key(KeyEvent::from_byte(b'q'), &mut out)
            .unwrap();
        assert_eq!(action, Action::Quit);
    }

    #[test]
    fn read_failure_propagates() {
        let mut e = editor(80, 24);
        let mut input = ScriptedInput::default();
        let mut out = Vec::new();
        let err = e.process_input(&mut input, &mut out).unwrap_err();
        assert!(matches!(err, Error::Term(ae_term::Error::Read(_))));
    }

    // -- Refresh / run ------------------------------------------------------

    #[test]
    fn refresh_draws_rows_and_cursor() {
        let file = three_line_file();
        let mut e = editor(20, 4);
        e.open(file.path()).unwrap();
        press_all(&mut e, &[DOWN, RIGHT]);

        let mut out = Vec::new();
        e.refresh(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\x1b[?25l\x1b[2J\x1b[H"));
        assert!(text.contains("alpha\x1b[K\r\nbeta\x1b[K\r\ngamma\x1b[K\r\n~\x1b[K"));
        assert!(text.ends_with("\x1b[2;2H\x1b[?25h"));
    }

    #[test]
    fn run_redraws_every_key_until_quit() {
        let mut e = editor(40, 6);
        let mut input = ScriptedInput::bytes(DOWN)
            .then_timeout()
            .then_bytes(b"z")
            .then_bytes(QUIT)
            .then_bytes(b"never read");
        let mut out = Vec::new();

        e.run(&mut input, &mut out).unwrap();

        let frames = out.windows(6).filter(|w| *w == b"\x1b[?25l").count();
        assert_eq!(frames, 3);
        assert!(out.ends_with(b"\x1b[2J\x1b[H"));
        assert_eq!(e.cursor(), CursorState::new(0, 1));
        assert_eq!(input.remaining(), b"never read".len());
    }

    #[test]
    fn init_from_cursor_report() {
        // Only exercise the fallback when the test isn't attached to a
        // terminal; otherwise the ioctl answers first.
        if ae_term::terminal::get_size().is_some() {
            return;
        }
        let mut input = ScriptedInput::bytes(b"\x1b[24;80R");
        let mut out = Vec::new();

        let e = Editor::init(&mut input, &mut out, Options::default()).unwrap();

        assert_eq!(e.size(), Size::new(80, 24));
        assert_eq!(e.cursor(), CursorState::ORIGIN);
        assert_eq!(out, b"\x1b[999C\x1b[999B\x1b[6n");
    }
}
