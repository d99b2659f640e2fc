// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Sequence codec: strings, blobs, dynamic and fixed arrays.
//!
//! Layouts:
//! - string: `u32` byte length + 1, UTF-8 bytes, NUL
//! - blob: `u32` byte length, raw bytes
//! - dynamic array: `u32` element count, payload aligned to the element
//! - fixed array: payload only, element count known out of band

use tracing::warn;

use crate::core::{CodecError, Result};

use super::cursor::{CdrCursor, CdrWriter};
use super::primitive::Primitive;

/// Write a NUL-terminated string with its count.
pub fn write_string(writer: &mut CdrWriter, value: &str) -> Result<()> {
    let len = value.len();
    writer.write_count(len.saturating_add(1))?;
    writer.write_bytes(value.as_bytes());
    writer.write_u8(0);
    Ok(())
}

/// Read a NUL-terminated string, borrowing from the buffer.
pub fn read_str<'de>(cursor: &mut CdrCursor<'de>) -> Result<&'de str> {
    let count = cursor.read_counted_block(1)?;
    if count == 0 {
        return Err(CodecError::data_corrupted(
            "String count must include the NUL terminator",
        ));
    }
    let position = cursor.position();
    let bytes = cursor.read_bytes(count)?;
    let (payload, terminator) = bytes.split_at(count - 1);
    if terminator[0] != 0 {
        warn!(
            position = position + count - 1,
            byte = terminator[0],
            "String terminator is not NUL"
        );
    }
    std::str::from_utf8(payload)
        .map_err(|e| CodecError::data_corrupted(format!("Invalid UTF-8 in string: {e}")))
}

/// Read a NUL-terminated string.
pub fn read_string(cursor: &mut CdrCursor<'_>) -> Result<String> {
    read_str(cursor).map(str::to_owned)
}

/// Write a byte blob with its count.
pub fn write_blob(writer: &mut CdrWriter, value: &[u8]) -> Result<()> {
    writer.write_count(value.len())?;
    writer.write_bytes(value);
    Ok(())
}

/// Read a byte blob, borrowing from the buffer.
pub fn read_blob<'de>(cursor: &mut CdrCursor<'de>) -> Result<&'de [u8]> {
    let count = cursor.read_counted_block(1)?;
    cursor.read_bytes(count)
}

/// Write a dynamic numeric array: count, then one bulk copy.
pub fn write_dynamic_array<P: Primitive>(writer: &mut CdrWriter, values: &[P]) -> Result<()> {
    writer.write_count(values.len())?;
    writer.write_primitive_slice(values);
    Ok(())
}

/// Read a dynamic numeric array.
pub fn read_dynamic_array<P: Primitive>(cursor: &mut CdrCursor<'_>) -> Result<Vec<P>> {
    let count = cursor.read_counted_block(P::SIZE)?;
    cursor.read_primitive_slice(count)
}

fn check_fixed_len(len: usize, count: usize) -> Result<()> {
    if len != count {
        return Err(CodecError::invalid_value(format!(
            "Fixed array has {len} elements, expected {count}"
        )));
    }
    Ok(())
}

/// Write a fixed numeric array: no count, exactly `count` elements.
pub fn write_fixed_array<P: Primitive>(
    writer: &mut CdrWriter,
    values: &[P],
    count: usize,
) -> Result<()> {
    check_fixed_len(values.len(), count)?;
    writer.write_primitive_slice(values);
    Ok(())
}

/// Read a fixed numeric array of `count` elements.
pub fn read_fixed_array<P: Primitive>(cursor: &mut CdrCursor<'_>, count: usize) -> Result<Vec<P>> {
    cursor.read_primitive_slice(count)
}

/// Write a fixed string array: no count, each string with its own count.
pub fn write_fixed_strings<S: AsRef<str>>(
    writer: &mut CdrWriter,
    values: &[S],
    count: usize,
) -> Result<()> {
    check_fixed_len(values.len(), count)?;
    for value in values {
        write_string(writer, value.as_ref())?;
    }
    Ok(())
}

/// Read a fixed string array of `count` elements.
pub fn read_fixed_strings(cursor: &mut CdrCursor<'_>, count: usize) -> Result<Vec<String>> {
    // Each string needs at least its count and terminator.
    let mut values = Vec::with_capacity(count.min(cursor.remaining() / 5));
    for _ in 0..count {
        values.push(read_string(cursor)?);
    }
    Ok(values)
}
