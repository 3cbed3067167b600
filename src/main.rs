// SPDX-License-Identifier: MIT
//
// ae — Andrew's Editor, a minimal full-screen terminal file viewer.
//
// This is the main binary that wires the two crates together:
//
//   ae-term   → raw mode, window size, key decoding, single-write output
//   ae-editor → row store, cursor, frame composition, the loop itself
//
// Each keypress flows through:
//
//   stdin → read_key → Editor::handle_key → cursor moves
//   Editor::refresh → view::compose → one write(2) → terminal
//
// Failure handling lives here and only here. Lower layers return errors;
// `run` owns the raw-mode guard, so by the time an error reaches `main`
// the terminal is already back in cooked mode. `main` then clears the
// screen, prints the diagnostic, and exits 1.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process;

use ae_editor::editor::Editor;
use ae_editor::options::Options;
use ae_term::ansi;
use ae_term::input::StdinSource;
use ae_term::output::StdoutFd;
use ae_term::terminal::{RawConfig, RawMode};

/// The file to open: the first argument after the program name, if any.
fn file_arg(args: impl IntoIterator<Item = OsString>) -> Option<PathBuf> {
    args.into_iter().nth(1).map(PathBuf::from)
}

/// Enter raw mode, load the file, and run until the quit key.
fn run(path: Option<PathBuf>) -> ae_editor::Result<()> {
    let raw = RawMode::enable(RawConfig::default())?;

    let mut input = StdinSource::new();
    let mut output = StdoutFd::new();

    let mut editor = Editor::init(&mut input, &mut output, Options::default())?;
    if let Some(path) = path {
        editor.open(&path)?;
    }

    editor.run(&mut input, &mut output)?;

    raw.disable()?;
    Ok(())
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let path = file_arg(env::args_os());
    log::debug!("starting ae with {path:?}");

    if let Err(e) = run(path) {
        let _ = ansi::reset_screen(&mut StdoutFd::new());
        log::error!("{e}");
        eprintln!("ae: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
