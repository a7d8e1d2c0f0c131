//! Sequential journal reader
//!
//! Every frame is checksum-verified. A corrupt or truncated frame stops the
//! replay with an error; the journal is never partially trusted.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::frame::{JournalFrame, MIN_FRAME_SIZE};
use crate::backend::errors::{BackendError, BackendResult};
use crate::backend::version::VersionEntry;

/// Reads journal frames front to back.
pub struct JournalReader {
    path: PathBuf,
    reader: BufReader<File>,
    offset: u64,
    file_len: u64,
}

impl JournalReader {
    /// Opens the journal at `path`.
    pub fn open(path: &Path) -> BackendResult<Self> {
        let file = File::open(path).map_err(|e| {
            BackendError::unavailable(format!(
                "failed to open journal {}: {}",
                path.display(),
                e
            ))
        })?;
        let file_len = file
            .metadata()
            .map_err(|e| BackendError::unavailable(format!("failed to stat journal: {}", e)))?
            .len();

        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            offset: 0,
            file_len,
        })
    }

    /// Byte offset of the next frame.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Reads the next entry, or None at a clean end of file.
    pub fn read_next(&mut self) -> BackendResult<Option<VersionEntry>> {
        let mut len_buf = [0u8; 4];
        match self.read_exact_or_eof(&mut len_buf)? {
            0 => return Ok(None),
            4 => {}
            _ => return Err(self.corruption("truncated frame length")),
        }

        let frame_length = u32::from_le_bytes(len_buf) as usize;
        if frame_length < MIN_FRAME_SIZE {
            return Err(self.corruption(format!("frame length {} below minimum", frame_length)));
        }
        // The length field is unverified until the checksum runs.
        let remaining = self.file_len.saturating_sub(self.offset);
        if frame_length as u64 > remaining {
            return Err(self.corruption(format!(
                "frame length {} exceeds remaining {} bytes",
                frame_length, remaining
            )));
        }

        let mut frame = vec![0u8; frame_length];
        frame[..4].copy_from_slice(&len_buf);
        if self.read_exact_or_eof(&mut frame[4..])? != frame_length - 4 {
            return Err(self.corruption("truncated frame"));
        }

        let (entry, consumed) =
            JournalFrame::decode(&frame).map_err(|e| self.corruption(e.to_string()))?;
        self.offset += consumed as u64;
        Ok(Some(entry))
    }

    /// Reads all remaining entries.
    pub fn read_all(&mut self) -> BackendResult<Vec<VersionEntry>> {
        let mut entries = Vec::new();
        while let Some(entry) = self.read_next()? {
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Fills `buf` as far as the file allows and returns the bytes read.
    fn read_exact_or_eof(&mut self, buf: &mut [u8]) -> BackendResult<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(BackendError::unavailable(format!(
                        "failed to read journal {}: {}",
                        self.path.display(),
                        e
                    )))
                }
            }
        }
        Ok(filled)
    }

    fn corruption(&self, reason: impl Into<String>) -> BackendError {
        BackendError::unavailable(format!(
            "journal corruption in {} at byte_offset {}: {}",
            self.path.display(),
            self.offset,
            reason.into()
        ))
    }
}
