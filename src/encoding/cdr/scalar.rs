// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Scalar codec: booleans, integers and floats.

use std::fmt::Display;

use crate::core::{CodecError, Result};

use super::cursor::{CdrCursor, CdrWriter};
use super::primitive::Primitive;

/// Write a boolean as one byte, 0 or 1.
#[inline]
pub fn write_bool(writer: &mut CdrWriter, value: bool) {
    writer.write_u8(u8::from(value));
}

/// Read a boolean. Any nonzero byte is `true`.
#[inline]
pub fn read_bool(cursor: &mut CdrCursor<'_>) -> Result<bool> {
    Ok(cursor.read_u8()? != 0)
}

/// Write a self-aligned integer or float.
#[inline]
pub fn write_scalar<P: Primitive>(writer: &mut CdrWriter, value: P) {
    writer.write_primitive(value);
}

/// Read a self-aligned integer or float.
#[inline]
pub fn read_scalar<P: Primitive>(cursor: &mut CdrCursor<'_>) -> Result<P> {
    cursor.read_primitive()
}

/// Convert an integer into a narrower target, failing with `TypeMismatch`
/// if the value is not represented exactly.
pub fn narrow<T, W>(wide: W) -> Result<T>
where
    T: TryFrom<W>,
    W: Copy + Display,
{
    T::try_from(wide).map_err(|_| {
        CodecError::type_mismatch(
            std::any::type_name::<T>(),
            format!("value {wide} out of range"),
        )
    })
}

/// Write a `usize` as a 64-bit unsigned integer.
pub fn write_usize(writer: &mut CdrWriter, value: usize) {
    writer.write_primitive(value as u64);
}

/// Read a 64-bit unsigned integer into a `usize`.
pub fn read_usize(cursor: &mut CdrCursor<'_>) -> Result<usize> {
    narrow(cursor.read_primitive::<u64>()?)
}

/// Write an `isize` as a 64-bit signed integer.
pub fn write_isize(writer: &mut CdrWriter, value: isize) {
    writer.write_primitive(value as i64);
}

/// Read a 64-bit signed integer into an `isize`.
pub fn read_isize(cursor: &mut CdrCursor<'_>) -> Result<isize> {
    narrow(cursor.read_primitive::<i64>()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;

    #[test]
    fn test_bool() {
        let mut writer = CdrWriter::new();
        write_bool(&mut writer, false);
        write_bool(&mut writer, true);
        assert_eq!(writer.as_slice(), &[0, 1]);

        let data = [0, 1, 0x7f];
        let mut cursor = CdrCursor::new(&data);
        assert!(!read_bool(&mut cursor).unwrap());
        assert!(read_bool(&mut cursor).unwrap());
        assert!(read_bool(&mut cursor).unwrap());
    }

    #[test]
    fn test_float_round_trip_bits() {
        let mut writer = CdrWriter::new();
        write_scalar(&mut writer, -0.0f32);
        write_scalar(&mut writer, f64::from_bits(0x7ff0_0000_0000_0001));
        let data = writer.finish();

        let mut cursor = CdrCursor::new(&data);
        let a: f32 = read_scalar(&mut cursor).unwrap();
        let b: f64 = read_scalar(&mut cursor).unwrap();
        assert_eq!(a.to_bits(), (-0.0f32).to_bits());
        assert_eq!(b.to_bits(), 0x7ff0_0000_0000_0001);
    }

    #[test]
    fn test_narrow() {
        assert_eq!(narrow::<u8, i64>(255).unwrap(), 255);
        let err = narrow::<u8, i64>(256).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert!(err.to_string().contains("value 256 out of range"));
        assert_eq!(narrow::<i8, u64>(200).unwrap_err().kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_platform_integers() {
        let mut writer = CdrWriter::new();
        write_usize(&mut writer, 42);
        write_isize(&mut writer, -42);
        let data = writer.finish();
        assert_eq!(data.len(), 16);

        let mut cursor = CdrCursor::new(&data);
        assert_eq!(read_usize(&mut cursor).unwrap(), 42);
        assert_eq!(read_isize(&mut cursor).unwrap(), -42);
    }

    #[test]
    #[cfg(target_pointer_width = "32")]
    fn test_usize_too_large_for_target() {
        let data = u64::MAX.to_le_bytes();
        let mut cursor = CdrCursor::new(&data);
        assert_eq!(read_usize(&mut cursor).unwrap_err().kind(), ErrorKind::TypeMismatch);
    }
}
