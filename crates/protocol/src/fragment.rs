//! Report descriptor fragmentation
//!
//! A descriptor longer than the endpoint 0 max packet size is uploaded as a
//! sequence of ACCESSORY_SET_HID_REPORT_DESC requests. The device concatenates
//! them by offset, so chunks are emitted in increasing offset order and cover
//! the descriptor exactly once.

use crate::error::{ProtocolError, Result};

/// One descriptor fragment: `len` bytes starting at `offset`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub offset: u16,
    pub len: u16,
}

impl Chunk {
    /// Byte range of this chunk within the full descriptor
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = self.offset as usize;
        start..start + self.len as usize
    }
}

/// Iterator over the chunks of a descriptor upload
#[derive(Debug, Clone)]
pub struct ChunkPlan {
    total_len: u16,
    max_chunk_size: u16,
    offset: u16,
}

/// Plan the upload of `total_len` bytes in chunks of at most `max_chunk_size`
pub fn chunk_plan(total_len: u16, max_chunk_size: u8) -> Result<ChunkPlan> {
    if max_chunk_size == 0 {
        return Err(ProtocolError::ZeroChunkSize);
    }

    Ok(ChunkPlan {
        total_len,
        max_chunk_size: max_chunk_size as u16,
        offset: 0,
    })
}

impl Iterator for ChunkPlan {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.offset >= self.total_len {
            return None;
        }

        let len = (self.total_len - self.offset).min(self.max_chunk_size);
        let chunk = Chunk {
            offset: self.offset,
            len,
        };
        // offset + len <= total_len, so this never wraps
        self.offset += len;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.total_len - self.offset) as usize;
        let n = remaining.div_ceil(self.max_chunk_size as usize);
        (n, Some(n))
    }
}

impl ExactSizeIterator for ChunkPlan {}
