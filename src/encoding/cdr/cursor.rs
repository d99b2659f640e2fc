// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Byte cursors for reading and writing CDR data with proper alignment.
//!
//! Alignment is always measured from buffer offset 0: a value of size `n`
//! starts at the next multiple of `n`. Decoding skips the padding, encoding
//! writes zeros.

use crate::core::{CodecError, Result};

use super::primitive::Primitive;

/// Wire size of a count prefix.
pub const COUNT_SIZE: usize = 4;

/// Alignment of the final encoded buffer.
pub const FINAL_ALIGNMENT: usize = 4;

#[inline]
fn padding(offset: usize, alignment: usize) -> usize {
    match offset % alignment {
        0 => 0,
        rem => alignment - rem,
    }
}

/// Read cursor over a borrowed CDR buffer.
///
/// Every read aligns first, then checks that the span fits, then advances.
/// No read ever goes past the end of the buffer.
///
/// # Example
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use cdrcodec::encoding::cdr::cursor::CdrCursor;
///
/// let data = [0x01, 0x00, 0x00, 0x00, 0x2A, 0x00, 0x00, 0x00];
/// let mut cursor = CdrCursor::new(&data);
/// assert_eq!(cursor.read_u8()?, 1);
/// assert_eq!(cursor.read_primitive::<u32>()?, 42);
/// assert!(cursor.is_at_end());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CdrCursor<'de> {
    data: &'de [u8],
    offset: usize,
}

impl<'de> CdrCursor<'de> {
    /// Create a cursor positioned at the start of `data`.
    pub fn new(data: &'de [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Get the current read position.
    #[inline]
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Get the remaining bytes available to read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Check if at end of buffer.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Fail unless `len` more bytes are available.
    #[inline]
    pub fn check_bounds(&self, len: usize) -> Result<()> {
        if len > self.remaining() {
            return Err(CodecError::unexpected_end(
                len,
                self.remaining(),
                self.offset,
            ));
        }
        Ok(())
    }

    /// Skip padding up to the next multiple of `alignment`.
    pub fn align(&mut self, alignment: usize) -> Result<()> {
        let pad = padding(self.offset, alignment);
        self.check_bounds(pad)?;
        self.offset += pad;
        Ok(())
    }

    /// Read a byte slice without alignment.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'de [u8]> {
        self.check_bounds(len)?;
        let start = self.offset;
        self.offset += len;
        Ok(&self.data[start..self.offset])
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        self.check_bounds(1)?;
        let value = self.data[self.offset];
        self.offset += 1;
        Ok(value)
    }

    /// Read a self-aligned little-endian primitive.
    pub fn read_primitive<P: Primitive>(&mut self) -> Result<P> {
        self.align(P::SIZE)?;
        let bytes = self.read_bytes(P::SIZE)?;
        Ok(P::read_le(bytes))
    }

    /// Read a 4-byte count.
    pub fn read_count(&mut self) -> Result<usize> {
        Ok(self.read_primitive::<u32>()? as usize)
    }

    /// Read a count and verify that `count * element_size` bytes remain.
    ///
    /// Guards every variable-length read so that a corrupt count cannot
    /// trigger an oversized allocation.
    pub fn read_counted_block(&mut self, element_size: usize) -> Result<usize> {
        let count = self.read_count()?;
        let total = count
            .checked_mul(element_size)
            .ok_or_else(|| CodecError::unexpected_end(usize::MAX, self.remaining(), self.offset))?;
        self.check_bounds(total)?;
        Ok(count)
    }

    /// Read `count` primitives as one aligned block.
    ///
    /// The element alignment is skipped even for an empty block.
    pub fn read_primitive_slice<P: Primitive>(&mut self, count: usize) -> Result<Vec<P>> {
        self.align(P::SIZE)?;
        let len = count
            .checked_mul(P::SIZE)
            .ok_or_else(|| CodecError::unexpected_end(usize::MAX, self.remaining(), self.offset))?;
        let bytes = self.read_bytes(len)?;
        let mut values = vec![P::default(); count];
        P::read_slice_le(bytes, &mut values);
        Ok(values)
    }
}

/// Growable write buffer for CDR data.
///
/// Writes never run out of space; the only write-side failure is a count
/// that does not fit its 4-byte field.
#[derive(Debug, Clone, Default)]
pub struct CdrWriter {
    buffer: Vec<u8>,
}

impl CdrWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with a reserved capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Get the current write position.
    #[inline]
    pub fn position(&self) -> usize {
        self.buffer.len()
    }

    /// Bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Append zero padding up to the next multiple of `alignment`.
    pub fn align(&mut self, alignment: usize) {
        let pad = padding(self.buffer.len(), alignment);
        self.buffer.resize(self.buffer.len() + pad, 0);
    }

    /// Append a single byte.
    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    /// Append raw bytes without alignment.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Append a self-aligned little-endian primitive.
    pub fn write_primitive<P: Primitive>(&mut self, value: P) {
        self.align(P::SIZE);
        let start = self.buffer.len();
        self.buffer.resize(start + P::SIZE, 0);
        value.write_le(&mut self.buffer[start..]);
    }

    /// Append a 4-byte count.
    pub fn write_count(&mut self, count: usize) -> Result<()> {
        let count = u32::try_from(count).map_err(|_| CodecError::count_overflow(count))?;
        self.write_primitive(count);
        Ok(())
    }

    /// Append primitives as one aligned block.
    ///
    /// The element alignment is written even for an empty block.
    pub fn write_primitive_slice<P: Primitive>(&mut self, values: &[P]) {
        self.align(P::SIZE);
        let start = self.buffer.len();
        self.buffer.resize(start + values.len() * P::SIZE, 0);
        P::write_slice_le(values, &mut self.buffer[start..]);
    }

    /// Overwrite a previously written 4-byte value.
    pub fn patch_u32(&mut self, position: usize, value: u32) -> Result<()> {
        let end = position.checked_add(COUNT_SIZE);
        let slot = end
            .and_then(|end| self.buffer.get_mut(position..end))
            .ok_or_else(|| {
                CodecError::invalid_value(format!("Cannot patch count at position {position}"))
            })?;
        value.write_le(slot);
        Ok(())
    }

    /// Pad to the final alignment and return the buffer.
    pub fn finish(mut self) -> Vec<u8> {
        self.align(FINAL_ALIGNMENT);
        self.buffer
    }
}
