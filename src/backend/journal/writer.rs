//! Append-only journal writer with fsync after every frame
//!
//! A failed append is rolled back by truncating the file to the last
//! synced offset. If the rollback itself fails the writer is poisoned and
//! refuses every further append: the tail of the file can no longer be
//! trusted.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::frame::JournalFrame;
use crate::backend::errors::{BackendError, BackendResult};
use crate::backend::version::VersionEntry;

/// Appends frames to the journal file.
pub struct JournalWriter {
    path: PathBuf,
    file: File,
    offset: u64,
    poisoned: bool,

    #[cfg(test)]
    fault: Option<WriteFault>,
}

/// Injected append failure.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub(crate) struct WriteFault {
    /// Bytes of the frame that reach the file before the error
    pub written: usize,
    /// Whether the truncate that follows also fails
    pub rollback_fails: bool,
}

impl JournalWriter {
    /// Opens `path` for append, creating it if missing.
    pub fn open(path: &Path) -> BackendResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                BackendError::unavailable(format!(
                    "failed to open journal {}: {}",
                    path.display(),
                    e
                ))
            })?;

        let offset = file
            .metadata()
            .map_err(|e| BackendError::unavailable(format!("failed to stat journal: {}", e)))?
            .len();

        Ok(Self {
            path: path.to_path_buf(),
            file,
            offset,
            poisoned: false,
            #[cfg(test)]
            fault: None,
        })
    }

    /// Path of the journal file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current end-of-journal offset.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Appends one entry and syncs it to disk.
    ///
    /// Returns the offset the frame was written at. On error the file is
    /// truncated back to its previous end.
    pub fn append(&mut self, entry: &VersionEntry) -> BackendResult<u64> {
        if self.poisoned {
            return Err(BackendError::unavailable(format!(
                "journal {} is poisoned by an earlier failed append",
                self.path.display()
            )));
        }

        let frame = JournalFrame::encode(entry);
        let at = self.offset;

        if let Err(e) = self.write_frame(&frame) {
            let rollback = match self.truncate_to(at) {
                Ok(()) => "rolled back".to_string(),
                Err(te) => {
                    self.poisoned = true;
                    format!("rollback failed, journal poisoned: {}", te)
                }
            };
            return Err(BackendError::unavailable(format!(
                "failed to append to journal {} at byte_offset {}: {} ({})",
                self.path.display(),
                at,
                e,
                rollback
            )));
        }

        self.offset += frame.len() as u64;
        Ok(at)
    }

    fn write_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        if let Some(written) = self.injected_short_write() {
            self.file.write_all(&frame[..written.min(frame.len())])?;
            return Err(io::Error::new(io::ErrorKind::WriteZero, "injected short write"));
        }

        self.file.write_all(frame)?;
        self.file.sync_all()
    }

    fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        if self.injected_rollback_failure() {
            return Err(io::Error::other("injected truncate failure"));
        }

        self.file.set_len(len)?;
        self.file.sync_all()
    }

    #[cfg(not(test))]
    fn injected_short_write(&self) -> Option<usize> {
        None
    }

    #[cfg(not(test))]
    fn injected_rollback_failure(&mut self) -> bool {
        false
    }

    #[cfg(test)]
    fn injected_short_write(&self) -> Option<usize> {
        self.fault.map(|f| f.written)
    }

    #[cfg(test)]
    fn injected_rollback_failure(&mut self) -> bool {
        self.fault.take().map_or(false, |f| f.rollback_fails)
    }

    /// Makes the next append fail after `fault.written` bytes.
    #[cfg(test)]
    pub(crate) fn inject_fault(&mut self, fault: WriteFault) {
        self.fault = Some(fault);
    }
}
