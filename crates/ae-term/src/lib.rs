// SPDX-License-Identifier: MIT
//
// ae-term — Terminal layer for ae.
//
// Everything that touches the terminal device lives here: raw mode via
// termios, window size discovery, key decoding from raw stdin bytes, and
// the ANSI sequences plus single-write output buffer the renderer uses.
//
// No TUI framework (ratatui, crossterm) sits in between. The editor core
// talks to traits (`ByteSource`, `std::io::Write`) so it can be driven by
// scripted input in tests.

pub mod ansi;
pub mod error;
pub mod geometry;
pub mod input;
pub mod output;
pub mod terminal;

pub use error::{Error, Result};
