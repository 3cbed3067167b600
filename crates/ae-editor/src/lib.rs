//! # ae-editor — Editor core for ae
//!
//! The pieces that sit above the terminal layer:
//!
//! - **[`rows`]** — `RowStore`, the open file as a list of byte rows
//! - **[`cursor`]** — `CursorState`, a screen cell with clamped movement
//! - **[`view`]** — composes a full frame for a single write
//! - **[`options`]** — keys, placeholder glyph, banner text
//! - **[`editor`]** — `Editor`, which owns the state and runs the loop

pub mod cursor;
pub mod editor;
pub mod error;
pub mod options;
pub mod rows;
pub mod view;

pub use error::{Error, Result};
