//! Block directory decoding.

use std::collections::BTreeMap;

use bitstream::ByteReader;

use crate::error::{ContainerResult, DecodeError, LimitKind};
use crate::limits::Limits;

/// Size of the leading block count.
pub const DIRECTORY_COUNT_SIZE: usize = 2;

/// Size of one directory offset entry.
pub const DIRECTORY_ENTRY_SIZE: usize = 4;

/// A present block: a contiguous byte range of the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    /// Position of the block in the directory.
    pub index: u16,
    /// Byte offset of the block within the container.
    pub offset: u32,
    /// The block contents, up to the next block's offset.
    pub bytes: &'a [u8],
}

impl Block<'_> {
    /// Returns the block size in bytes.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// A decoded block directory borrowing the container buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container<'a> {
    declared: u16,
    len: usize,
    /// Present blocks in ascending offset order.
    blocks: Vec<Block<'a>>,
    by_index: BTreeMap<u16, usize>,
}

impl<'a> Container<'a> {
    /// Returns the block count declared in the header, absent blocks included.
    #[must_use]
    pub const fn declared_block_count(&self) -> u16 {
        self.declared
    }

    /// Returns the number of present (non-zero offset) blocks.
    #[must_use]
    pub fn present_block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Returns the total container length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the container has no present blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns the block at a directory index, if present.
    #[must_use]
    pub fn block(&self, index: u16) -> Option<&Block<'a>> {
        self.by_index.get(&index).map(|&pos| &self.blocks[pos])
    }

    /// Returns `true` if the directory index has a non-zero offset.
    #[must_use]
    pub fn is_present(&self, index: u16) -> bool {
        self.by_index.contains_key(&index)
    }

    /// Iterates present blocks in ascending offset order.
    pub fn iter(&self) -> impl Iterator<Item = &Block<'a>> {
        self.blocks.iter()
    }
}

/// Decodes the block directory of a container.
///
/// Present blocks are sized by the distance to the next block's offset; the
/// last block runs to the end of the buffer.
pub fn decode_container<'a>(buf: &'a [u8], limits: &Limits) -> ContainerResult<Container<'a>> {
    if buf.len() > limits.max_container_bytes {
        return Err(DecodeError::LimitsExceeded {
            kind: LimitKind::ContainerBytes,
            limit: limits.max_container_bytes,
            actual: buf.len(),
        });
    }
    if buf.len() < DIRECTORY_COUNT_SIZE {
        return Err(DecodeError::HeaderTooSmall {
            actual: buf.len(),
            required: DIRECTORY_COUNT_SIZE,
        });
    }

    let mut reader = ByteReader::new(buf);
    let declared = reader.read_u16()?;
    if usize::from(declared) > limits.max_blocks {
        return Err(DecodeError::LimitsExceeded {
            kind: LimitKind::BlockCount,
            limit: limits.max_blocks,
            actual: usize::from(declared),
        });
    }

    let directory_len = DIRECTORY_COUNT_SIZE + usize::from(declared) * DIRECTORY_ENTRY_SIZE;
    if directory_len > buf.len() {
        return Err(DecodeError::OffsetTableTruncated {
            declared,
            required: directory_len,
            actual: buf.len(),
        });
    }

    let mut entries: Vec<(u32, u16)> = Vec::with_capacity(usize::from(declared));
    for index in 0..declared {
        let offset = reader.read_u32()?;
        if offset == 0 {
            continue;
        }
        let start = usize::try_from(offset).unwrap_or(usize::MAX);
        if start > buf.len() {
            return Err(DecodeError::OffsetOutOfBounds {
                index,
                offset,
                len: buf.len(),
            });
        }
        if start < directory_len {
            return Err(DecodeError::OffsetInsideDirectory {
                index,
                offset,
                directory_len,
            });
        }
        entries.push((offset, index));
    }

    entries.sort_unstable();
    for pair in entries.windows(2) {
        let (prev_offset, prev_index) = pair[0];
        let (offset, index) = pair[1];
        if prev_offset == offset {
            return Err(DecodeError::DuplicateOffset {
                index,
                other: prev_index,
                offset,
            });
        }
    }

    let mut blocks = Vec::with_capacity(entries.len());
    let mut by_index = BTreeMap::new();
    for (pos, &(offset, index)) in entries.iter().enumerate() {
        let start = offset as usize;
        let end = entries
            .get(pos + 1)
            .map_or(buf.len(), |&(next, _)| next as usize);
        by_index.insert(index, blocks.len());
        blocks.push(Block {
            index,
            offset,
            bytes: &buf[start..end],
        });
    }

    Ok(Container {
        declared,
        len: buf.len(),
        blocks,
        by_index,
    })
}
