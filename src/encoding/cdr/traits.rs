// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Typed encode/decode traits and their impls for standard types.
//!
//! A type participates in the codec by describing its [`Shape`] and by
//! walking its contents through a traversal root. Leaves open a single value
//! container, records open a keyed container and collections open a
//! sequence container.
//!
//! Slices of numeric elements skip the per-element path and go through one
//! bulk copy. The hidden `*_slice` and `*_vec` hooks carry that choice from
//! `Vec<T>` down to `T` without specialization.

use std::sync::Arc;

use crate::core::{CodecError, Result};
use crate::schema::{ElementType, Shape};

use super::decoder::Decoder;
use super::encoder::Encoder;
use super::primitive::Primitive;
use super::scalar::narrow;

/// A type with a known wire shape.
pub trait CdrType {
    /// Describe the wire layout of values of this type.
    ///
    /// Called once per type; the result is cached in the
    /// [`ShapeRegistry`](crate::core::ShapeRegistry).
    fn describe_shape() -> Shape;
}

fn fixed_unsupported(found: Shape) -> CodecError {
    CodecError::type_mismatch("array of numeric or string elements", found.to_string())
}

fn check_fixed_count(count: usize, expected: usize) -> Result<()> {
    if count != expected {
        return Err(CodecError::type_mismatch(
            format!("fixed array of {expected} elements"),
            format!("fixed-array marker of {count} elements"),
        ));
    }
    Ok(())
}

/// A value that can be written to CDR.
pub trait CdrEncode: CdrType {
    /// Write this value through `encoder`.
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()>;

    /// Write this value as a fixed array of `count` elements.
    #[doc(hidden)]
    fn encode_fixed(&self, _encoder: &mut Encoder<'_>, _count: usize) -> Result<()> {
        Err(fixed_unsupported(Self::describe_shape()))
    }

    /// Write a slice of values with its count.
    #[doc(hidden)]
    fn encode_slice(items: &[Self], encoder: &mut Encoder<'_>) -> Result<()>
    where
        Self: Sized,
    {
        let mut seq = encoder.sequence_container()?;
        for item in items {
            seq.encode(item)?;
        }
        seq.end()
    }

    /// Write exactly `count` values without a count.
    #[doc(hidden)]
    fn encode_fixed_slice(_items: &[Self], _encoder: &mut Encoder<'_>, _count: usize) -> Result<()>
    where
        Self: Sized,
    {
        Err(fixed_unsupported(Shape::sequence(Self::describe_shape())))
    }
}

/// A value that can be read from CDR.
pub trait CdrDecode: CdrType + Sized {
    /// Read a value through `decoder`.
    fn decode(decoder: &mut Decoder<'_, '_>) -> Result<Self>;

    /// Read a fixed array of `count` elements.
    #[doc(hidden)]
    fn decode_fixed(_decoder: &mut Decoder<'_, '_>, _count: usize) -> Result<Self> {
        Err(fixed_unsupported(Self::describe_shape()))
    }

    /// Read a count-prefixed list of values.
    #[doc(hidden)]
    fn decode_vec(decoder: &mut Decoder<'_, '_>) -> Result<Vec<Self>> {
        let mut seq = decoder.sequence_container()?;
        let mut items = Vec::with_capacity(seq.size_hint());
        while !seq.is_at_end() {
            items.push(seq.decode()?);
        }
        Ok(items)
    }

    /// Read exactly `count` values without a count.
    #[doc(hidden)]
    fn decode_fixed_vec(_decoder: &mut Decoder<'_, '_>, _count: usize) -> Result<Vec<Self>> {
        Err(fixed_unsupported(Shape::sequence(Self::describe_shape())))
    }
}

/// Element types allowed in fixed-size arrays: numbers and strings.
pub trait ArrayElement: CdrEncode + CdrDecode {
    /// Element kind in shapes.
    const ELEMENT: ElementType;
}

macro_rules! impl_numeric {
    ($($ty:ty),* $(,)?) => {$(
        impl CdrType for $ty {
            fn describe_shape() -> Shape {
                <$ty as Primitive>::ELEMENT.to_shape()
            }
        }

        impl CdrEncode for $ty {
            #[inline]
            fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
                encoder.single_value_container()?.encode_scalar(*self)
            }

            fn encode_slice(items: &[Self], encoder: &mut Encoder<'_>) -> Result<()> {
                encoder.single_value_container()?.encode_dynamic_array(items)
            }

            fn encode_fixed_slice(
                items: &[Self],
                encoder: &mut Encoder<'_>,
                count: usize,
            ) -> Result<()> {
                encoder.single_value_container()?.encode_fixed_array(items, count)
            }
        }

        impl CdrDecode for $ty {
            #[inline]
            fn decode(decoder: &mut Decoder<'_, '_>) -> Result<Self> {
                decoder.single_value_container()?.decode_scalar()
            }

            fn decode_vec(decoder: &mut Decoder<'_, '_>) -> Result<Vec<Self>> {
                decoder.single_value_container()?.decode_dynamic_array()
            }

            fn decode_fixed_vec(decoder: &mut Decoder<'_, '_>, count: usize) -> Result<Vec<Self>> {
                decoder.single_value_container()?.decode_fixed_array(count)
            }
        }

        impl ArrayElement for $ty {
            const ELEMENT: ElementType = <$ty as Primitive>::ELEMENT;
        }
    )*};
}

impl_numeric!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

impl CdrType for bool {
    fn describe_shape() -> Shape {
        Shape::Bool
    }
}

impl CdrEncode for bool {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
        encoder.single_value_container()?.encode_bool(*self)
    }
}

impl CdrDecode for bool {
    fn decode(decoder: &mut Decoder<'_, '_>) -> Result<Self> {
        decoder.single_value_container()?.decode_bool()
    }
}

/// Platform integers travel as their 64-bit counterparts, in arrays too.
macro_rules! impl_platform {
    ($($ty:ty => $wide:ty, $encode:ident, $decode:ident);* $(;)?) => {$(
        impl CdrType for $ty {
            fn describe_shape() -> Shape {
                <$wide as CdrType>::describe_shape()
            }
        }

        impl CdrEncode for $ty {
            fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
                encoder.single_value_container()?.$encode(*self)
            }

            fn encode_slice(items: &[Self], encoder: &mut Encoder<'_>) -> Result<()> {
                let wide: Vec<$wide> = items.iter().map(|&v| v as $wide).collect();
                <$wide>::encode_slice(&wide, encoder)
            }

            fn encode_fixed_slice(
                items: &[Self],
                encoder: &mut Encoder<'_>,
                count: usize,
            ) -> Result<()> {
                let wide: Vec<$wide> = items.iter().map(|&v| v as $wide).collect();
                <$wide>::encode_fixed_slice(&wide, encoder, count)
            }
        }

        impl CdrDecode for $ty {
            fn decode(decoder: &mut Decoder<'_, '_>) -> Result<Self> {
                decoder.single_value_container()?.$decode()
            }

            fn decode_vec(decoder: &mut Decoder<'_, '_>) -> Result<Vec<Self>> {
                <$wide>::decode_vec(decoder)?.into_iter().map(narrow).collect()
            }

            fn decode_fixed_vec(decoder: &mut Decoder<'_, '_>, count: usize) -> Result<Vec<Self>> {
                <$wide>::decode_fixed_vec(decoder, count)?
                    .into_iter()
                    .map(narrow)
                    .collect()
            }
        }

        impl ArrayElement for $ty {
            const ELEMENT: ElementType = <$wide as ArrayElement>::ELEMENT;
        }
    )*};
}

impl_platform! {
    usize => u64, encode_usize, decode_usize;
    isize => i64, encode_isize, decode_isize;
}

// ============================================================================
// Strings and blobs
// ============================================================================

impl CdrType for str {
    fn describe_shape() -> Shape {
        Shape::String
    }
}

impl CdrEncode for str {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
        encoder.single_value_container()?.encode_str(self)
    }
}

impl CdrType for String {
    fn describe_shape() -> Shape {
        Shape::String
    }
}

impl CdrEncode for String {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
        encoder.single_value_container()?.encode_str(self)
    }

    fn encode_fixed_slice(items: &[Self], encoder: &mut Encoder<'_>, count: usize) -> Result<()> {
        encoder.single_value_container()?.encode_fixed_strings(items, count)
    }
}

impl CdrDecode for String {
    fn decode(decoder: &mut Decoder<'_, '_>) -> Result<Self> {
        decoder.single_value_container()?.decode_string()
    }

    fn decode_fixed_vec(decoder: &mut Decoder<'_, '_>, count: usize) -> Result<Vec<Self>> {
        decoder.single_value_container()?.decode_fixed_strings(count)
    }
}

impl ArrayElement for String {
    const ELEMENT: ElementType = ElementType::String;
}

/// Opaque byte blob: a count followed by raw bytes.
///
/// `Vec<u8>` produces the same bytes as a dynamic `uint8` array; this
/// wrapper declares the value as [`Shape::Bytes`] instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bytes(pub Vec<u8>);

impl From<Vec<u8>> for Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Bytes(bytes)
    }
}

impl From<&[u8]> for Bytes {
    fn from(bytes: &[u8]) -> Self {
        Bytes(bytes.to_vec())
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl CdrType for Bytes {
    fn describe_shape() -> Shape {
        Shape::Bytes
    }
}

impl CdrEncode for Bytes {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
        encoder.single_value_container()?.encode_bytes(&self.0)
    }
}

impl CdrDecode for Bytes {
    fn decode(decoder: &mut Decoder<'_, '_>) -> Result<Self> {
        let bytes = decoder.single_value_container()?.decode_bytes()?;
        Ok(Bytes(bytes.to_vec()))
    }
}

// ============================================================================
// Collections
// ============================================================================

fn array_shape<T: CdrType + ?Sized>() -> Shape {
    match T::describe_shape() {
        Shape::Integer(t) => Shape::DynamicArray(ElementType::Integer(t)),
        Shape::Float(t) => Shape::DynamicArray(ElementType::Float(t)),
        Shape::String => Shape::DynamicArray(ElementType::String),
        element => Shape::sequence(element),
    }
}

impl<T: CdrType> CdrType for [T] {
    fn describe_shape() -> Shape {
        array_shape::<T>()
    }
}

impl<T: CdrEncode> CdrEncode for [T] {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
        T::encode_slice(self, encoder)
    }

    fn encode_fixed(&self, encoder: &mut Encoder<'_>, count: usize) -> Result<()> {
        T::encode_fixed_slice(self, encoder, count)
    }
}

impl<T: CdrType> CdrType for Vec<T> {
    fn describe_shape() -> Shape {
        array_shape::<T>()
    }
}

impl<T: CdrEncode> CdrEncode for Vec<T> {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
        T::encode_slice(self, encoder)
    }

    fn encode_fixed(&self, encoder: &mut Encoder<'_>, count: usize) -> Result<()> {
        T::encode_fixed_slice(self, encoder, count)
    }
}

impl<T: CdrDecode> CdrDecode for Vec<T> {
    fn decode(decoder: &mut Decoder<'_, '_>) -> Result<Self> {
        T::decode_vec(decoder)
    }

    fn decode_fixed(decoder: &mut Decoder<'_, '_>, count: usize) -> Result<Self> {
        T::decode_fixed_vec(decoder, count)
    }
}

impl<T: ArrayElement, const N: usize> CdrType for [T; N] {
    fn describe_shape() -> Shape {
        Shape::FixedArray(T::ELEMENT, N)
    }
}

impl<T: ArrayElement, const N: usize> CdrEncode for [T; N] {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
        T::encode_fixed_slice(self, encoder, N)
    }

    fn encode_fixed(&self, encoder: &mut Encoder<'_>, count: usize) -> Result<()> {
        check_fixed_count(count, N)?;
        self.encode(encoder)
    }
}

impl<T: ArrayElement, const N: usize> CdrDecode for [T; N] {
    fn decode(decoder: &mut Decoder<'_, '_>) -> Result<Self> {
        let items = T::decode_fixed_vec(decoder, N)?;
        let len = items.len();
        items.try_into().map_err(|_| {
            CodecError::data_corrupted(format!("Fixed array has {len} elements, expected {N}"))
        })
    }

    fn decode_fixed(decoder: &mut Decoder<'_, '_>, count: usize) -> Result<Self> {
        check_fixed_count(count, N)?;
        Self::decode(decoder)
    }
}

// ============================================================================
// Wrappers
// ============================================================================

/// Absent values write nothing and leave no trace on the wire, so an
/// optional value always decodes as `None`.
impl<T: CdrType> CdrType for Option<T> {
    fn describe_shape() -> Shape {
        T::describe_shape()
    }
}

impl<T: CdrEncode> CdrEncode for Option<T> {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
        match self {
            Some(value) => value.encode(encoder),
            None => encoder.single_value_container()?.encode_nil(),
        }
    }

    fn encode_fixed(&self, encoder: &mut Encoder<'_>, count: usize) -> Result<()> {
        match self {
            Some(value) => value.encode_fixed(encoder, count),
            None => encoder.single_value_container()?.encode_nil(),
        }
    }
}

impl<T: CdrDecode> CdrDecode for Option<T> {
    fn decode(_decoder: &mut Decoder<'_, '_>) -> Result<Self> {
        Ok(None)
    }

    fn decode_fixed(_decoder: &mut Decoder<'_, '_>, _count: usize) -> Result<Self> {
        Ok(None)
    }
}

macro_rules! impl_forward {
    ($($wrapper:ident),*) => {$(
        impl<T: CdrType + ?Sized> CdrType for $wrapper<T> {
            fn describe_shape() -> Shape {
                T::describe_shape()
            }
        }

        impl<T: CdrEncode + ?Sized> CdrEncode for $wrapper<T> {
            fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
                (**self).encode(encoder)
            }

            fn encode_fixed(&self, encoder: &mut Encoder<'_>, count: usize) -> Result<()> {
                (**self).encode_fixed(encoder, count)
            }
        }

        impl<T: CdrDecode> CdrDecode for $wrapper<T> {
            fn decode(decoder: &mut Decoder<'_, '_>) -> Result<Self> {
                T::decode(decoder).map($wrapper::new)
            }

            fn decode_fixed(decoder: &mut Decoder<'_, '_>, count: usize) -> Result<Self> {
                T::decode_fixed(decoder, count).map($wrapper::new)
            }
        }
    )*};
}

impl_forward!(Box, Arc);

impl<T: CdrType + ?Sized> CdrType for &T {
    fn describe_shape() -> Shape {
        T::describe_shape()
    }
}

impl<T: CdrEncode + ?Sized> CdrEncode for &T {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
        (**self).encode(encoder)
    }

    fn encode_fixed(&self, encoder: &mut Encoder<'_>, count: usize) -> Result<()> {
        (**self).encode_fixed(encoder, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;
    use crate::schema::{FloatType, IntegerType};
    use crate::{decode, encode};

    #[test]
    fn test_leaf_shapes() {
        assert_eq!(u8::describe_shape(), Shape::Integer(IntegerType::UInt8));
        assert_eq!(f32::describe_shape(), Shape::Float(FloatType::Float32));
        assert_eq!(usize::describe_shape(), Shape::Integer(IntegerType::UInt64));
        assert_eq!(String::describe_shape(), Shape::String);
        assert_eq!(<&str>::describe_shape(), Shape::String);
        assert_eq!(Bytes::describe_shape(), Shape::Bytes);
    }

    #[test]
    fn test_collection_shapes() {
        assert_eq!(
            Vec::<i16>::describe_shape(),
            Shape::DynamicArray(ElementType::Integer(IntegerType::Int16))
        );
        assert_eq!(
            Vec::<String>::describe_shape(),
            Shape::DynamicArray(ElementType::String)
        );
        assert_eq!(Vec::<bool>::describe_shape(), Shape::sequence(Shape::Bool));
        assert_eq!(
            Vec::<Vec<u8>>::describe_shape(),
            Shape::sequence(Shape::DynamicArray(ElementType::Integer(IntegerType::UInt8)))
        );
        assert_eq!(
            <[f64; 9]>::describe_shape(),
            Shape::FixedArray(ElementType::Float(FloatType::Float64), 9)
        );
    }

    #[test]
    fn test_dynamic_array_bulk_layout() {
        assert_eq!(
            encode(&vec![1i16, 2, 3]).unwrap(),
            vec![3, 0, 0, 0, 1, 0, 2, 0, 3, 0, 0, 0]
        );
        let bytes = [3, 0, 0, 0, 0xff, 0x02, 0x03, 0x00];
        assert_eq!(decode::<Vec<i8>>(&bytes).unwrap(), vec![-1, 2, 3]);
    }

    #[test]
    fn test_platform_integer_arrays() {
        assert_eq!(
            Vec::<usize>::describe_shape(),
            Shape::DynamicArray(ElementType::Integer(IntegerType::UInt64))
        );
        let bytes = encode(&vec![1usize, 2]).unwrap();
        assert_eq!(bytes, encode(&vec![1u64, 2]).unwrap());
        assert_eq!(decode::<Vec<usize>>(&bytes).unwrap(), vec![1, 2]);

        let fixed = encode(&[-1isize, 2]).unwrap();
        assert_eq!(fixed, encode(&[-1i64, 2]).unwrap());
        assert_eq!(decode::<[isize; 2]>(&fixed).unwrap(), [-1, 2]);
    }

    #[test]
    fn test_string_and_bytes_layout() {
        assert_eq!(
            encode("hello").unwrap(),
            vec![6, 0, 0, 0, b'h', b'e', b'l', b'l', b'o', 0, 0, 0]
        );
        let blob = encode(&Bytes(b"hello".to_vec())).unwrap();
        assert_eq!(blob, vec![5, 0, 0, 0, b'h', b'e', b'l', b'l', b'o', 0, 0, 0]);
        assert_eq!(encode(&b"hello".to_vec()).unwrap(), blob);
        assert_eq!(decode::<Bytes>(&blob).unwrap().as_ref(), b"hello");
    }

    #[test]
    fn test_string_list_uses_per_element_counts() {
        let names = vec!["a".to_string(), "bc".to_string()];
        let bytes = encode(&names).unwrap();
        assert_eq!(
            bytes,
            vec![2, 0, 0, 0, 2, 0, 0, 0, b'a', 0, 0, 0, 3, 0, 0, 0, b'b', b'c', 0, 0]
        );
        assert_eq!(decode::<Vec<String>>(&bytes).unwrap(), names);
    }

    #[test]
    fn test_fixed_array_has_no_count() {
        let bytes = encode(&[1u16, 2, 3]).unwrap();
        assert_eq!(bytes, vec![1, 0, 2, 0, 3, 0, 0, 0]);
        assert_eq!(decode::<[u16; 3]>(&bytes).unwrap(), [1, 2, 3]);

        let names = ["x".to_string(), "y".to_string()];
        let bytes = encode(&names).unwrap();
        assert_eq!(bytes, vec![2, 0, 0, 0, b'x', 0, 0, 0, 2, 0, 0, 0, b'y', 0, 0, 0]);
        assert_eq!(decode::<[String; 2]>(&bytes).unwrap(), names);
    }

    #[test]
    fn test_bool_list() {
        let bytes = encode(&vec![true, false, true]).unwrap();
        assert_eq!(bytes, vec![3, 0, 0, 0, 1, 0, 1, 0]);
        assert_eq!(decode::<Vec<bool>>(&bytes).unwrap(), vec![true, false, true]);
    }

    #[test]
    fn test_nested_lists() {
        let value = vec![vec![1u32], vec![], vec![2, 3]];
        let bytes = encode(&value).unwrap();
        assert_eq!(
            bytes,
            vec![
                3, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0
            ]
        );
        assert_eq!(decode::<Vec<Vec<u32>>>(&bytes).unwrap(), value);
    }

    #[test]
    fn test_option_writes_nothing() {
        assert!(encode(&None::<u32>).unwrap().is_empty());
        assert_eq!(encode(&Some(7u32)).unwrap(), vec![7, 0, 0, 0]);
        assert_eq!(decode::<Option<u32>>(&[7, 0, 0, 0]).unwrap(), None);
    }

    #[test]
    fn test_wrappers_forward() {
        assert_eq!(encode(&Box::new(5u8)).unwrap(), vec![5, 0, 0, 0]);
        assert_eq!(*decode::<Arc<u8>>(&[5, 0, 0, 0]).unwrap(), 5);
        assert_eq!(Box::<String>::describe_shape(), Shape::String);
    }

    #[test]
    fn test_fixed_hook_rejects_non_array() {
        let err = encode_fixed_standalone(&Bytes(vec![1]), 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        let err = encode_fixed_standalone(&[1u8, 2], 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        let err = encode_fixed_standalone(&vec![true], 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    fn encode_fixed_standalone<T: CdrEncode + ?Sized>(value: &T, count: usize) -> Result<Vec<u8>> {
        use super::super::cursor::CdrWriter;
        use super::super::encoder::EncodeState;
        use crate::core::{CodecOptions, CodingContext};

        let context = CodingContext::new();
        let options = CodecOptions::default();
        let mut state = EncodeState::new(CdrWriter::new());
        value.encode_fixed(&mut Encoder::new(&mut state, &context, &options), count)?;
        Ok(state.writer.finish())
    }
}
