//! Frame reading
//!
//! A frame is everything up to and including the first `\n`.

use std::io::{BufRead, ErrorKind, Read};

use bytes::Bytes;

use crate::error::{ChateauError, Result};

/// Byte terminating every request frame
pub const FRAME_DELIMITER: u8 = b'\n';

/// A single delimiter-terminated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    data: Bytes,
}

impl Frame {
    /// Wrap raw frame bytes (expected to end with the delimiter)
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// Full frame, delimiter included
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Length including the delimiter
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Position of the trailing delimiter, or the length if there is none
    pub fn payload_end(&self) -> usize {
        match self.data.last() {
            Some(&FRAME_DELIMITER) => self.data.len() - 1,
            _ => self.data.len(),
        }
    }

    /// Bytes from `offset` up to, but excluding, the trailing delimiter
    pub fn payload(&self, offset: usize) -> &[u8] {
        let end = self.payload_end();
        &self.data[offset.min(end)..end]
    }
}

/// Read one frame from a stream
///
/// Blocks until the delimiter arrives. Fails with `UnexpectedEof` if the
/// stream ends first, or with `FrameTooLarge` once `max_frame_size` bytes
/// have been read without a delimiter.
pub fn read_frame<R: BufRead>(reader: &mut R, max_frame_size: usize) -> Result<Frame> {
    let limit = max_frame_size as u64;
    let mut buf = Vec::new();

    let read = reader.by_ref().take(limit).read_until(FRAME_DELIMITER, &mut buf)?;

    if buf.last() == Some(&FRAME_DELIMITER) {
        tracing::trace!("Read frame of {} bytes", buf.len());
        return Ok(Frame::new(buf));
    }

    if read as u64 >= limit {
        return Err(ChateauError::FrameTooLarge { limit: max_frame_size });
    }

    Err(ChateauError::Io(std::io::Error::new(
        ErrorKind::UnexpectedEof,
        format!("stream closed after {} bytes without a frame delimiter", read),
    )))
}
