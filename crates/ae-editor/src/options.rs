//! Editor options.
//!
//! The handful of knobs the viewer has, gathered in one plain struct with
//! sensible defaults. The binary builds `Options::default()` and hands it
//! to the [`Editor`](crate::editor::Editor); tests build their own.
//!
//! | Field            | Default                      |
//! |------------------|------------------------------|
//! | `quit_key`       | Ctrl-Q (`0x11`)              |
//! | `interrupt_key`  | Ctrl-C (`0x03`)              |
//! | `empty_line`     | `~`                          |
//! | `title`          | `Andrew's Editor`            |
//! | `version`        | crate version                |
//! | `quit_hint`      | `Ctrl-Q to quit`             |

/// Viewer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Byte that exits the editor.
    pub quit_key: u8,
    /// Byte that shows [`quit_hint`](Self::quit_hint) instead of quitting.
    pub interrupt_key: u8,
    /// Glyph drawn on screen rows past the end of the file.
    pub empty_line: u8,
    /// Product name shown in the welcome banner.
    pub title: String,
    /// Version shown in the welcome banner.
    pub version: String,
    /// Message written when the interrupt key is pressed.
    pub quit_hint: String,
}

impl Options {
    /// The welcome banner text, before truncation.
    #[must_use]
    pub fn welcome(&self) -> String {
        format!("{} -- version {}", self.title, self.version)
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            quit_key: ctrl(b'q'),
            interrupt_key: ctrl(b'c'),
            empty_line: b'~',
            title: "Andrew's Editor".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            quit_hint: "Ctrl-Q to quit".into(),
        }
    }
}

/// The byte a terminal sends for Ctrl + `letter`.
#[must_use]
pub const fn ctrl(letter: u8) -> u8 {
    letter & 0x1F
}
