// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode with RAII restore, and size queries.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, and raw fd writes. These are
// the standard POSIX interfaces for terminal control — there is no safe
// alternative. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// Raw mode is a guard. `RawMode::enable` captures the original termios,
// applies the raw settings, and hands back a value whose drop puts the
// original settings back. Every way out of the program (normal return,
// early `?` return, unwind) drops the guard, so the user's shell is never
// left without echo or line editing.
//
// A panic hook covers the one gap the guard cannot: the default hook
// prints the panic message *before* unwinding reaches our drop, so the
// message would land on a raw terminal. The hook restores from a global
// backup first, then delegates to the original hook.

use std::io;
use std::sync::{Mutex, Once};

use crate::error::{Error, Result};

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

impl Size {
    /// Create a size from `cols × rows`.
    #[inline]
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// Whether both dimensions are non-zero.
    #[inline]
    #[must_use]
    pub const fn is_usable(self) -> bool {
        self.cols > 0 && self.rows > 0
    }
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)` on stdout.
///
/// Returns `None` if stdout is not a terminal, the query fails, or the
/// terminal reports a zero dimension.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };

    let size = Size::new(ws.ws_col, ws.ws_row);
    (result == 0 && size.is_usable()).then_some(size)
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Raw Mode Config ────────────────────────────────────────────────────────

/// Read policy applied while in raw mode.
///
/// The defaults give "return whatever is there, but wait up to 100 ms for
/// the first byte": `read()` returns 0 after a tenth of a second of silence,
/// which is what lets a lone ESC be told apart from an arrow sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawConfig {
    /// `VMIN`: minimum bytes before `read()` returns.
    pub min_bytes: u8,
    /// `VTIME`: read timeout in tenths of a second.
    pub timeout_deciseconds: u8,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            min_bytes: 0,
            timeout_deciseconds: 1,
        }
    }
}

/// Apply the raw-mode edits to a copy of the original attributes.
///
/// Input: no break-to-SIGINT, no CR→NL, no parity check, no 8th-bit strip,
/// no XON/XOFF. Output: no post-processing (so `\n` is not turned into
/// `\r\n`; the renderer writes `\r\n` itself). Control: 8-bit chars.
/// Local: no echo, no canonical line buffering, no Ctrl-V, no signals.
#[cfg(unix)]
pub(crate) fn make_raw(termios: &mut libc::termios, config: RawConfig) {
    termios.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
    termios.c_oflag &= !libc::OPOST;
    termios.c_cflag |= libc::CS8;
    termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);

    termios.c_cc[libc::VMIN] = config.min_bytes;
    termios.c_cc[libc::VTIME] = config.timeout_deciseconds;
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of the original termios for the panic hook.
///
/// [`RawMode`] owns its own copy, but the panic hook can't reach it. The
/// backup sits behind a [`Mutex`], not `static mut`.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

#[cfg(unix)]
fn set_backup(termios: Option<libc::termios>) {
    if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
        *guard = termios;
    }
}

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original);
            }
        }
    }
}

/// Clear, home, and show the cursor — so a panic message is readable.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[2J\x1b[H\x1b[?25h";

/// Panic hook guard — ensures the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Write [`EMERGENCY_RESTORE`] straight to fd 1.
///
/// Bypasses Rust's `io::stdout()` lock so a panic raised while the lock is
/// held cannot deadlock the hook.
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        use std::io::Write;
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── RawMode ────────────────────────────────────────────────────────────────

/// Raw-mode guard.
///
/// Holds the terminal attributes captured before raw mode was applied.
/// Dropping the guard restores them; [`disable`](Self::disable) does the
/// same but reports failure.
///
/// # Example
///
/// ```no_run
/// use ae_term::terminal::{RawConfig, RawMode};
///
/// let raw = RawMode::enable(RawConfig::default())?;
/// // ... read keys, draw frames ...
/// raw.disable()?;
/// # Ok::<(), ae_term::Error>(())
/// ```
pub struct RawMode {
    /// Original termios saved before entering raw mode.
    #[cfg(unix)]
    original: libc::termios,

    /// Cleared once the original attributes have been put back.
    active: bool,
}

impl RawMode {
    /// Capture the current attributes and switch stdin to raw mode.
    ///
    /// # Errors
    ///
    /// [`Error::GetAttributes`] if the current attributes cannot be read
    /// (stdin is not a terminal), [`Error::SetAttributes`] if the raw
    /// settings are rejected.
    #[cfg(unix)]
    pub fn enable(config: RawConfig) -> Result<Self> {
        let mut original: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut original) } != 0 {
            return Err(Error::GetAttributes(io::Error::last_os_error()));
        }

        set_backup(Some(original));
        install_panic_hook();

        // From here on the guard exists, so a failed tcsetattr below still
        // runs the restore in drop.
        let guard = Self {
            original,
            active: true,
        };

        let mut raw = original;
        make_raw(&mut raw, config);
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const raw) } != 0 {
            return Err(Error::SetAttributes(io::Error::last_os_error()));
        }

        log::debug!(
            "raw mode on (VMIN={}, VTIME={})",
            config.min_bytes,
            config.timeout_deciseconds
        );
        Ok(guard)
    }

    #[cfg(not(unix))]
    pub fn enable(_config: RawConfig) -> Result<Self> {
        install_panic_hook();
        Ok(Self { active: true })
    }

    /// Whether the original attributes still need restoring.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Restore the original attributes now.
    ///
    /// # Errors
    ///
    /// [`Error::SetAttributes`] if `tcsetattr` fails. The guard is consumed
    /// either way and will not retry in drop.
    pub fn disable(mut self) -> Result<()> {
        let result = self.restore();
        self.active = false;
        result
    }

    #[cfg(unix)]
    fn restore(&self) -> Result<()> {
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const self.original) }
            != 0
        {
            return Err(Error::SetAttributes(io::Error::last_os_error()));
        }
        set_backup(None);
        log::debug!("raw mode off");
        Ok(())
    }

    #[cfg(not(unix))]
    #[allow(clippy::unnecessary_wraps, clippy::unused_self)]
    fn restore(&self) -> Result<()> {
        Ok(())
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if self.active {
            if let Err(e) = self.restore() {
                log::warn!("failed to restore terminal attributes: {e}");
            }
            self.active = false;
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
