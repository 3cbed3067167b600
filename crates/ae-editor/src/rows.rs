//! Row store — the file's lines, as bytes.
//!
//! A [`RowStore`] is an append-only list of [`Row`]s in file order. Rows
//! own their bytes and are never edited after they're created. Nothing
//! here assumes UTF-8: a row is whatever bytes sat between two newlines,
//! minus the line ending.
//!
//! Line endings are stripped once, at load time. `append` takes its input
//! verbatim, so callers that build rows by hand decide for themselves.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One line of the file, without its line ending.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    chars: Vec<u8>,
}

impl Row {
    /// Create a row by copying `bytes`.
    #[must_use]
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            chars: bytes.to_vec(),
        }
    }

    /// The row's bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.chars
    }

    /// Length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the row has no bytes (a blank line).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The first `max` bytes, or the whole row if it's shorter.
    #[must_use]
    pub fn truncated(&self, max: usize) -> &[u8] {
        &self.chars[..self.chars.len().min(max)]
    }
}

// ---------------------------------------------------------------------------
// RowStore
// ---------------------------------------------------------------------------

/// Ordered, growable sequence of rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowStore {
    rows: Vec<Row>,
}

impl RowStore {
    /// An empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Read every line of the file at `path` into a new store.
    ///
    /// # Errors
    ///
    /// [`Error::Open`] if the file can't be opened, [`Error::Read`] if a
    /// read fails partway through.
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut store = Self::new();
        store.load(path)?;
        Ok(store)
    }

    // -- Mutation -----------------------------------------------------------

    /// Append a copy of `bytes` as a new row. Nothing is stripped.
    pub fn append(&mut self, bytes: &[u8]) {
        self.rows.push(Row::new(bytes));
    }

    /// Append every line of the file at `path`, line endings stripped.
    ///
    /// # Errors
    ///
    /// [`Error::Open`] if the file can't be opened, [`Error::Read`] if a
    /// read fails partway through. Rows read before a mid-file failure stay
    /// in the store.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let before = self.rows.len();
        self.load_lines(BufReader::new(file))
            .map_err(|source| Error::Read {
                path: path.to_path_buf(),
                source,
            })?;

        log::debug!(
            "loaded {} rows from {}",
            self.rows.len() - before,
            path.display()
        );
        Ok(())
    }

    /// Append every line from `reader`, line endings stripped.
    ///
    /// # Errors
    ///
    /// Propagates read failures from `reader`.
    pub fn load_lines(&mut self, mut reader: impl BufRead) -> std::io::Result<()> {
        let mut line = Vec::new();
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                return Ok(());
            }
            self.append(trim_line_ending(&line));
        }
    }

    // -- Access -------------------------------------------------------------

    /// The row at `index`, if there is one.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the store has no rows.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate rows in file order.
    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a RowStore {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Strip every trailing `\n` and `\r` byte.
///
/// Runs of mixed endings (`\r\r\n`) are removed whole; bytes before them are
/// left alone.
#[must_use]
pub fn trim_line_ending(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|&b| b != b'\n' && b != b'\r')
        .map_or(0, |i| i + 1);
    &line[..end]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use pretty_assertions::assert_eq;

    use super::*;

    fn store_from(text: &[u8]) -> RowStore {
        let mut store = RowStore::new();
        store.load_lines(Cursor::new(text)).unwrap();
        store
    }

    fn bytes(store: &RowStore) -> Vec<&[u8]> {
        store.iter().map(Row::as_bytes).collect()
    }

    // -- trim_line_ending ---------------------------------------------------

    #[test]
    fn trim_lf() {
        assert_eq!(trim_line_ending(b"hello\n"), b"hello");
    }

    #[test]
    fn trim_crlf() {
        assert_eq!(trim_line_ending(b"hello\r\n"), b"hello");
    }

    #[test]
    fn trim_runs_of_endings() {
        assert_eq!(trim_line_ending(b"hello\r\r\n\n"), b"hello");
    }

    #[test]
    fn trim_keeps_inner_cr() {
        assert_eq!(trim_line_ending(b"a\rb\n"), b"a\rb");
    }

    #[test]
    fn trim_only_endings_is_empty() {
        assert_eq!(trim_line_ending(b"\r\n"), b"");
        assert_eq!(trim_line_ending(b""), b"");
    }

    #[test]
    fn trim_no_ending_is_identity() {
        assert_eq!(trim_line_ending(b"  x  "), b"  x  ");
    }

    // -- append -------------------------------------------------------------

    #[test]
    fn append_keeps_bytes_verbatim() {
        let mut store = RowStore::new();
        store.append(b"with newline\n");
        assert_eq!(store.get(0).unwrap().as_bytes(), b"with newline\n");
        assert_eq!(store.get(0).unwrap().len(), 13);
    }

    #[test]
    fn append_preserves_order() {
        let mut store = RowStore::new();
        store.append(b"one");
        store.append(b"two");
        store.append(b"three");
        assert_eq!(bytes(&store), vec![&b"one"[..], b"two", b"three"]);
    }

    #[test]
    fn get_out_of_range_is_none() {
        let mut store = RowStore::new();
        store.append(b"only");
        assert!(store.get(1).is_none());
    }

    #[test]
    fn new_store_is_empty() {
        let store = RowStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    // -- Row ----------------------------------------------------------------

    #[test]
    fn truncated_cuts_long_rows() {
        let row = Row::new(b"abcdefgh");
        assert_eq!(row.truncated(3), b"abc");
        assert_eq!(row.truncated(8), b"abcdefgh");
        assert_eq!(row.truncated(100), b"abcdefgh");
    }

    #[test]
    fn blank_row_is_empty() {
        assert!(Row::new(b"").is_empty());
    }

    // -- load_lines ---------------------------------------------------------

    #[test]
    fn load_lines_counts_lines() {
        let store = store_from(b"a\nb\nc\n");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn load_lines_without_final_newline() {
        let store = store_from(b"a\nb");
        assert_eq!(bytes(&store), vec![&b"a"[..], b"b"]);
    }

    #[test]
    fn load_lines_keeps_blank_lines() {
        let store = store_from(b"a\n\n\nb\n");
        assert_eq!(bytes(&store), vec![&b"a"[..], b"", b"", b"b"]);
    }

    #[test]
    fn load_lines_strips_crlf() {
        let store = store_from(b"dos\r\nline\r\n");
        assert_eq!(bytes(&store), vec![&b"dos"[..], b"line"]);
    }

    #[test]
    fn load_lines_accepts_non_utf8() {
        let store = store_from(b"\xff\xfe\x00tab\there\n");
        assert_eq!(store.get(0).unwrap().as_bytes(), b"\xff\xfe\x00tab\there");
    }

    #[test]
    fn load_lines_empty_input() {
        assert!(store_from(b"").is_empty());
    }

    // -- load (file) --------------------------------------------------------

    #[test]
    fn load_file_strips_endings_only() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"first line\n  indented\r\n\nlast").unwrap();

        let store = RowStore::from_file(file.path()).unwrap();

        assert_eq!(
            bytes(&store),
            vec![&b"first line"[..], b"  indented", b"", b"last"]
        );
    }

    #[test]
    fn load_appends_after_existing_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"from file\n").unwrap();

        let mut store = RowStore::new();
        store.append(b"manual");
        store.load(file.path()).unwrap();

        assert_eq!(bytes(&store), vec![&b"manual"[..], b"from file"]);
    }

    #[test]
    fn load_missing_file_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.txt");

        let err = RowStore::from_file(&path).unwrap_err();

        assert!(matches!(err, Error::Open { .. }));
        assert!(err.to_string().contains("does-not-exist.txt"));
    }
}
