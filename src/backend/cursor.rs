//! Backend cursors
//!
//! Scans, queries and history lookups hand back a cursor: a lazy sequence
//! of rows that holds a backend-side resource until closed. `CursorGuard`
//! ties that release to scope so every exit path closes the cursor,
//! including early returns on error.

use super::errors::BackendResult;
use super::version::{KvPair, VersionEntry};

/// A lazy row sequence with an explicit release.
///
/// After `close`, `next` must return `None`. Closing twice is harmless.
pub trait Cursor<T>: Iterator<Item = BackendResult<T>> {
    fn close(&mut self);
}

/// Cursor over current key/value pairs.
pub type KvCursor = Box<dyn Cursor<KvPair>>;

/// Cursor over the version entries of one key.
pub type HistoryCursor = Box<dyn Cursor<VersionEntry>>;

/// Owns a cursor and closes it when dropped.
pub struct CursorGuard<T> {
    cursor: Option<Box<dyn Cursor<T>>>,
}

impl<T> CursorGuard<T> {
    pub fn new(cursor: Box<dyn Cursor<T>>) -> Self {
        Self {
            cursor: Some(cursor),
        }
    }

}

impl<T> Iterator for CursorGuard<T> {
    type Item = BackendResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.as_mut().and_then(|c| c.next())
    }
}

impl<T> Drop for CursorGuard<T> {
    fn drop(&mut self) {
        if let Some(mut cursor) = self.cursor.take() {
            cursor.close();
        }
    }
}

/// Cursor over rows materialized by an in-process backend.
pub struct VecCursor<T> {
    rows: std::vec::IntoIter<T>,
    closed: bool,
}

impl<T> VecCursor<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Self {
            rows: rows.into_iter(),
            closed: false,
        }
    }
}

impl<T> Iterator for VecCursor<T> {
    type Item = BackendResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return None;
        }
        self.rows.next().map(Ok)
    }
}

impl<T> Cursor<T> for VecCursor<T> {
    fn close(&mut self) {
        self.closed = true;
        self.rows = Vec::new().into_iter();
    }
}
