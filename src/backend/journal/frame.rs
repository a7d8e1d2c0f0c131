//! Journal frame encoding
//!
//! One frame per version entry:
//!
//! ```text
//! +------------------+
//! | Frame Length     | (u32 LE, includes itself and checksum)
//! +------------------+
//! | Key              | (length-prefixed string)
//! +------------------+
//! | Tx Id            | (length-prefixed string)
//! +------------------+
//! | Timestamp Secs   | (i64 LE)
//! +------------------+
//! | Timestamp Nanos  | (u32 LE)
//! +------------------+
//! | Tombstone Flag   | (u8: 0 = value, 1 = deleted)
//! +------------------+
//! | Value            | (length-prefixed bytes, empty for tombstones)
//! +------------------+
//! | Checksum         | (u32 LE, CRC32 over everything before it)
//! +------------------+
//! ```

use std::io;

use chrono::{DateTime, Utc};
use crc32fast::Hasher;

use crate::backend::version::{VersionEntry, VersionPayload};

/// Smallest possible frame: length + two empty strings + timestamp + flag +
/// empty value + checksum.
pub const MIN_FRAME_SIZE: usize = 4 + 4 + 4 + 8 + 4 + 1 + 4 + 4;

/// Computes the CRC32 checksum of a frame prefix.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Encoder/decoder for one journal frame.
pub struct JournalFrame;

impl JournalFrame {
    /// Serializes an entry into a complete frame.
    pub fn encode(entry: &VersionEntry) -> Vec<u8> {
        let mut body = Vec::new();
        put_bytes(&mut body, entry.key().as_bytes());
        put_bytes(&mut body, entry.tx_id().as_bytes());

        let ts = entry.timestamp();
        body.extend_from_slice(&ts.timestamp().to_le_bytes());
        body.extend_from_slice(&ts.timestamp_subsec_nanos().to_le_bytes());

        match entry.payload() {
            VersionPayload::Value(value) => {
                body.push(0);
                put_bytes(&mut body, value);
            }
            VersionPayload::Tombstone => {
                body.push(1);
                put_bytes(&mut body, &[]);
            }
        }

        let frame_length = (4 + body.len() + 4) as u32;

        let mut frame = Vec::with_capacity(frame_length as usize);
        frame.extend_from_slice(&frame_length.to_le_bytes());
        frame.extend_from_slice(&body);
        let checksum = compute_checksum(&frame);
        frame.extend_from_slice(&checksum.to_le_bytes());
        frame
    }

    /// Decodes one frame from the start of `data`, verifying its checksum.
    ///
    /// Returns the entry and the number of bytes consumed.
    pub fn decode(data: &[u8]) -> io::Result<(VersionEntry, usize)> {
        if data.len() < 4 {
            return Err(corrupt("frame length truncated"));
        }
        let frame_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

        if frame_length < MIN_FRAME_SIZE {
            return Err(corrupt(format!("frame length {} below minimum", frame_length)));
        }
        if data.len() < frame_length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "frame truncated",
            ));
        }

        let checked = &data[..frame_length - 4];
        let stored = u32::from_le_bytes([
            data[frame_length - 4],
            data[frame_length - 3],
            data[frame_length - 2],
            data[frame_length - 1],
        ]);
        if compute_checksum(checked) != stored {
            return Err(corrupt("checksum mismatch"));
        }

        let mut cursor = FieldCursor::new(&checked[4..]);
        let key = cursor.string()?;
        let tx_id = cursor.string()?;
        let secs = i64::from_le_bytes(cursor.array::<8>()?);
        let nanos = u32::from_le_bytes(cursor.array::<4>()?);
        let tombstone = cursor.array::<1>()?[0];
        let value = cursor.bytes()?;

        if !cursor.is_exhausted() {
            return Err(corrupt("trailing bytes in frame"));
        }

        let timestamp: DateTime<Utc> = DateTime::from_timestamp(secs, nanos)
            .ok_or_else(|| corrupt("timestamp out of range"))?;

        let payload = match tombstone {
            0 => VersionPayload::Value(value),
            1 => VersionPayload::Tombstone,
            other => return Err(corrupt(format!("invalid tombstone flag {}", other))),
        };

        Ok((
            VersionEntry::new(key, payload, tx_id, timestamp),
            frame_length,
        ))
    }
}

fn put_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    buf.extend_from_slice(bytes);
}

fn corrupt(message: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.into())
}

struct FieldCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> FieldCursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> io::Result<&'a [u8]> {
        if self.data.len() - self.pos < n {
            return Err(corrupt("field overruns frame"));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> io::Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn bytes(&mut self) -> io::Result<Vec<u8>> {
        let len = u32::from_le_bytes(self.array::<4>()?) as usize;
        Ok(self.take(len)?.to_vec())
    }

    fn string(&mut self) -> io::Result<String> {
        String::from_utf8(self.bytes()?).map_err(|_| corrupt("invalid UTF-8 in frame"))
    }

    fn is_exhausted(&self) -> bool {
        self.pos == self.data.len()
    }
}
