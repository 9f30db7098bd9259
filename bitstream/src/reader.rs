//! Bounded little-endian byte reader.

use crate::error::{BitError, BitResult};

/// A byte reader for decoding little-endian binary layouts.
///
/// Supports both sequential reads (advancing an internal cursor) and absolute
/// reads at a byte offset. All reads are bounds-checked and return errors on
/// failure; the reader never panics on short input.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a new `ByteReader` over a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the full underlying buffer length.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns the number of bytes remaining after the cursor.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns `true` if there are no more bytes to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the current cursor position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Reads a `u8` and advances the cursor.
    pub fn read_u8(&mut self) -> BitResult<u8> {
        let value = self.u8_at(self.pos)?;
        self.pos += 1;
        Ok(value)
    }

    /// Reads a little-endian `u16` and advances the cursor.
    pub fn read_u16(&mut self) -> BitResult<u16> {
        let value = self.u16_at(self.pos)?;
        self.pos += 2;
        Ok(value)
    }

    /// Reads a little-endian `u32` and advances the cursor.
    pub fn read_u32(&mut self) -> BitResult<u32> {
        let value = self.u32_at(self.pos)?;
        self.pos += 4;
        Ok(value)
    }

    /// Reads a `u8` at an absolute offset without moving the cursor.
    pub fn u8_at(&self, offset: usize) -> BitResult<u8> {
        let [byte] = self.array_at::<1>(offset)?;
        Ok(byte)
    }

    /// Reads a little-endian `u16` at an absolute offset without moving the cursor.
    pub fn u16_at(&self, offset: usize) -> BitResult<u16> {
        Ok(u16::from_le_bytes(self.array_at::<2>(offset)?))
    }

    /// Reads a little-endian `u32` at an absolute offset without moving the cursor.
    pub fn u32_at(&self, offset: usize) -> BitResult<u32> {
        Ok(u32::from_le_bytes(self.array_at::<4>(offset)?))
    }

    /// Borrows `len` bytes starting at an absolute offset.
    pub fn slice_at(&self, offset: usize, len: usize) -> BitResult<&'a [u8]> {
        self.ensure_bytes(offset, len)?;
        Ok(&self.data[offset..offset + len])
    }

    fn ensure_bytes(&self, offset: usize, len: usize) -> BitResult<()> {
        let available = self.data.len().saturating_sub(offset);
        if len > available {
            return Err(BitError::UnexpectedEof {
                offset,
                requested: len,
                available,
            });
        }
        Ok(())
    }

    fn array_at<const N: usize>(&self, offset: usize) -> BitResult<[u8; N]> {
        self.ensure_bytes(offset, N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[offset..offset + N]);
        Ok(out)
    }
}
