//! Error type for the editor core.
//!
//! Terminal failures bubble up from `ae-term` unchanged; the only failures
//! this crate adds are about the file being viewed.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Editor error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A terminal operation failed.
    #[error(transparent)]
    Term(#[from] ae_term::Error),

    /// The file could not be opened.
    #[error("{}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file opened but reading a line failed.
    #[error("{}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result alias for editor operations.
pub type Result<T> = std::result::Result<T, Error>;
