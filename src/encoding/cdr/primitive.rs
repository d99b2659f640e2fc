// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Fixed-width numeric primitives.
//!
//! [`Primitive`] is implemented for the integer and float types that CDR
//! stores as self-aligned little-endian values. Slice conversions go through
//! `byteorder`, so bulk copies are correct on big-endian hosts as well.

use byteorder::{ByteOrder, LittleEndian};

use crate::schema::{ElementType, FloatType, IntegerType};

mod sealed {
    pub trait Sealed {}
}

/// A numeric type with a fixed little-endian wire layout.
///
/// This trait is sealed.
pub trait Primitive: Copy + Default + PartialEq + sealed::Sealed + 'static {
    /// Wire size in bytes, which is also the alignment.
    const SIZE: usize;

    /// Element kind used in shapes.
    const ELEMENT: ElementType;

    /// Load from exactly `SIZE` bytes.
    fn read_le(bytes: &[u8]) -> Self;

    /// Store into exactly `SIZE` bytes.
    fn write_le(self, out: &mut [u8]);

    /// Load `out.len()` values from `bytes.len() == out.len() * SIZE` bytes.
    fn read_slice_le(bytes: &[u8], out: &mut [Self]);

    /// Store `values` into `out.len() == values.len() * SIZE` bytes.
    fn write_slice_le(values: &[Self], out: &mut [u8]);
}

macro_rules! impl_primitive {
    ($ty:ty, $element:expr, $read:ident, $write:ident, $read_into:ident, $write_into:ident) => {
        impl sealed::Sealed for $ty {}

        impl Primitive for $ty {
            const SIZE: usize = std::mem::size_of::<$ty>();
            const ELEMENT: ElementType = $element;

            #[inline]
            fn read_le(bytes: &[u8]) -> Self {
                LittleEndian::$read(bytes)
            }

            #[inline]
            fn write_le(self, out: &mut [u8]) {
                LittleEndian::$write(out, self)
            }

            #[inline]
            fn read_slice_le(bytes: &[u8], out: &mut [Self]) {
                LittleEndian::$read_into(bytes, out)
            }

            #[inline]
            fn write_slice_le(values: &[Self], out: &mut [u8]) {
                LittleEndian::$write_into(values, out)
            }
        }
    };
}

impl_primitive!(
    u16,
    ElementType::Integer(IntegerType::UInt16),
    read_u16,
    write_u16,
    read_u16_into,
    write_u16_into
);
impl_primitive!(
    i16,
    ElementType::Integer(IntegerType::Int16),
    read_i16,
    write_i16,
    read_i16_into,
    write_i16_into
);
impl_primitive!(
    u32,
    ElementType::Integer(IntegerType::UInt32),
    read_u32,
    write_u32,
    read_u32_into,
    write_u32_into
);
impl_primitive!(
    i32,
    ElementType::Integer(IntegerType::Int32),
    read_i32,
    write_i32,
    read_i32_into,
    write_i32_into
);
impl_primitive!(
    u64,
    ElementType::Integer(IntegerType::UInt64),
    read_u64,
    write_u64,
    read_u64_into,
    write_u64_into
);
impl_primitive!(
    i64,
    ElementType::Integer(IntegerType::Int64),
    read_i64,
    write_i64,
    read_i64_into,
    write_i64_into
);

impl sealed::Sealed for u8 {}

impl Primitive for u8 {
    const SIZE: usize = 1;
    const ELEMENT: ElementType = ElementType::Integer(IntegerType::UInt8);

    #[inline]
    fn read_le(bytes: &[u8]) -> Self {
        bytes[0]
    }

    #[inline]
    fn write_le(self, out: &mut [u8]) {
        out[0] = self;
    }

    #[inline]
    fn read_slice_le(bytes: &[u8], out: &mut [Self]) {
        out.copy_from_slice(bytes);
    }

    #[inline]
    fn write_slice_le(values: &[Self], out: &mut [u8]) {
        out.copy_from_slice(values);
    }
}

impl sealed::Sealed for i8 {}

impl Primitive for i8 {
    const SIZE: usize = 1;
    const ELEMENT: ElementType = ElementType::Integer(IntegerType::Int8);

    #[inline]
    fn read_le(bytes: &[u8]) -> Self {
        bytes[0] as i8
    }

    #[inline]
    fn write_le(self, out: &mut [u8]) {
        out[0] = self as u8;
    }

    #[inline]
    fn read_slice_le(bytes: &[u8], out: &mut [Self]) {
        for (dst, src) in out.iter_mut().zip(bytes) {
            *dst = *src as i8;
        }
    }

    #[inline]
    fn write_slice_le(values: &[Self], out: &mut [u8]) {
        for (dst, src) in out.iter_mut().zip(values) {
            *dst = *src as u8;
        }
    }
}

// Floats travel as their raw bit patterns so NaN payloads and signed zero
// survive a round trip.

impl sealed::Sealed for f32 {}

impl Primitive for f32 {
    const SIZE: usize = 4;
    const ELEMENT: ElementType = ElementType::Float(FloatType::Float32);

    #[inline]
    fn read_le(bytes: &[u8]) -> Self {
        f32::from_bits(LittleEndian::read_u32(bytes))
    }

    #[inline]
    fn write_le(self, out: &mut [u8]) {
        LittleEndian::write_u32(out, self.to_bits());
    }

    #[inline]
    fn read_slice_le(bytes: &[u8], out: &mut [Self]) {
        for (dst, chunk) in out.iter_mut().zip(bytes.chunks_exact(4)) {
            *dst = f32::from_bits(LittleEndian::read_u32(chunk));
        }
    }

    #[inline]
    fn write_slice_le(values: &[Self], out: &mut [u8]) {
        for (src, chunk) in values.iter().zip(out.chunks_exact_mut(4)) {
            LittleEndian::write_u32(chunk, src.to_bits());
        }
    }
}

impl sealed::Sealed for f64 {}

impl Primitive for f64 {
    const SIZE: usize = 8;
    const ELEMENT: ElementType = ElementType::Float(FloatType::Float64);

    #[inline]
    fn read_le(bytes: &[u8]) -> Self {
        f64::from_bits(LittleEndian::read_u64(bytes))
    }

    #[inline]
    fn write_le(self, out: &mut [u8]) {
        LittleEndian::write_u64(out, self.to_bits());
    }

    #[inline]
    fn read_slice_le(bytes: &[u8], out: &mut [Self]) {
        for (dst, chunk) in out.iter_mut().zip(bytes.chunks_exact(8)) {
            *dst = f64::from_bits(LittleEndian::read_u64(chunk));
        }
    }

    #[inline]
    fn write_slice_le(values: &[Self], out: &mut [u8]) {
        for (src, chunk) in values.iter().zip(out.chunks_exact_mut(8)) {
            LittleEndian::write_u64(chunk, src.to_bits());
        }
    }
}
