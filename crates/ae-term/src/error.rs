// SPDX-License-Identifier: MIT
//
// Error type for terminal operations.
//
// Every failure in this crate is an environment failure: the terminal
// refused an attribute change, a read returned something other than a
// timeout, or the cursor position report came back garbled. None of them
// are recoverable at this layer, so they travel up as values and the
// binary decides how to die.

use std::io;

use thiserror::Error;

/// Terminal error type.
#[derive(Debug, Error)]
pub enum Error {
    /// `tcgetattr` failed (usually: stdin is not a terminal).
    #[error("tcgetattr: {0}")]
    GetAttributes(#[source] io::Error),

    /// `tcsetattr` failed while entering or leaving raw mode.
    #[error("tcsetattr: {0}")]
    SetAttributes(#[source] io::Error),

    /// A read from stdin failed for a reason other than a timeout.
    #[error("read: {0}")]
    Read(#[source] io::Error),

    /// A write to stdout failed.
    #[error("write: {0}")]
    Write(#[source] io::Error),

    /// A write accepted fewer bytes than the sequence it was given.
    #[error("write: sent {written} of {expected} bytes")]
    ShortWrite {
        /// Bytes the writer accepted.
        written: usize,
        /// Bytes we tried to send.
        expected: usize,
    },

    /// The cursor position report could not be parsed.
    #[error("window size: {0}")]
    CursorReport(String),
}

/// Result alias for terminal operations.
pub type Result<T> = std::result::Result<T, Error>;
