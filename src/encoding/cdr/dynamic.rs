// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Encoding and decoding of [`CdrValue`]s against a runtime [`Shape`].
//!
//! Values walk the same traversal roots as typed values, so both produce
//! identical bytes for the same shape. Integer values are coerced to the
//! declared width and fail with `TypeMismatch` if they do not fit; float
//! values are converted with the usual `as` rounding.

use std::sync::Arc;

use crate::core::{CdrValue, CodecError, DecodedRecord, Result};
use crate::schema::{ElementType, FloatType, IntegerType, RecordShape, Shape};

use super::decoder::Decoder;
use super::encoder::Encoder;
use super::primitive::Primitive;
use super::scalar::narrow;

/// Calls `$f::<T>(args)` with `T` the Rust type of an [`IntegerType`].
macro_rules! dispatch_integer {
    ($kind:expr, $f:ident ( $($arg:expr),* )) => {
        match $kind {
            IntegerType::Int8 => $f::<i8>($($arg),*),
            IntegerType::Int16 => $f::<i16>($($arg),*),
            IntegerType::Int32 => $f::<i32>($($arg),*),
            IntegerType::Int64 => $f::<i64>($($arg),*),
            IntegerType::UInt8 => $f::<u8>($($arg),*),
            IntegerType::UInt16 => $f::<u16>($($arg),*),
            IntegerType::UInt32 => $f::<u32>($($arg),*),
            IntegerType::UInt64 => $f::<u64>($($arg),*),
        }
    };
}

fn mismatch(expected: impl ToString, value: &CdrValue) -> CodecError {
    CodecError::type_mismatch(expected.to_string(), value.type_name())
}

// ============================================================================
// Coercion
// ============================================================================

fn coerce_integer<P>(value: &CdrValue, kind: IntegerType) -> Result<P>
where
    P: TryFrom<i128>,
{
    let wide = value.as_i128().ok_or_else(|| mismatch(kind.name(), value))?;
    narrow(wide)
}

fn coerce_f32(value: &CdrValue) -> Result<f32> {
    match value {
        CdrValue::Float32(v) => Ok(*v),
        CdrValue::Float64(v) => Ok(*v as f32),
        other => other
            .as_f64()
            .map(|v| v as f32)
            .ok_or_else(|| mismatch(FloatType::Float32.name(), other)),
    }
}

fn coerce_f64(value: &CdrValue) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| mismatch(FloatType::Float64.name(), value))
}

// ============================================================================
// Encoding
// ============================================================================

/// Write `value` as `shape` through a traversal root.
///
/// `Null` writes nothing, like an absent optional.
pub(crate) fn encode_value(encoder: &mut Encoder<'_>, value: &CdrValue, shape: &Shape) -> Result<()> {
    if value.is_null() {
        return encoder.single_value_container()?.encode_nil();
    }
    match shape {
        Shape::Bool => {
            let v = value.as_bool().ok_or_else(|| mismatch(shape, value))?;
            encoder.single_value_container()?.encode_bool(v)
        }
        Shape::Integer(kind) => dispatch_integer!(*kind, encode_integer(encoder, value, *kind)),
        Shape::Float(FloatType::Float32) => {
            let v = coerce_f32(value)?;
            encoder.single_value_container()?.encode_scalar(v)
        }
        Shape::Float(FloatType::Float64) => {
            let v = coerce_f64(value)?;
            encoder.single_value_container()?.encode_scalar(v)
        }
        Shape::String => {
            let v = value.as_str().ok_or_else(|| mismatch(shape, value))?;
            encoder.single_value_container()?.encode_str(v)
        }
        Shape::Bytes => {
            let v = value.as_bytes().ok_or_else(|| mismatch(shape, value))?;
            encoder.single_value_container()?.encode_bytes(v)
        }
        Shape::DynamicArray(element) => encode_array(encoder, *element, value, None),
        Shape::FixedArray(element, count) => encode_array(encoder, *element, value, Some(*count)),
        Shape::Record(record) => encode_record(encoder, record, value),
        Shape::Sequence(element) => {
            let items = value.as_array().ok_or_else(|| mismatch(shape, value))?;
            let mut seq = encoder.sequence_container()?;
            for item in items {
                seq.with_element(|encoder| encode_value(encoder, item, element))?;
            }
            seq.end()
        }
    }
}

fn encode_integer<P>(encoder: &mut Encoder<'_>, value: &CdrValue, kind: IntegerType) -> Result<()>
where
    P: Primitive + TryFrom<i128>,
{
    let v: P = coerce_integer(value, kind)?;
    encoder.single_value_container()?.encode_scalar(v)
}

fn encode_array(
    encoder: &mut Encoder<'_>,
    element: ElementType,
    value: &CdrValue,
    fixed: Option<usize>,
) -> Result<()> {
    let shape = match fixed {
        Some(count) => Shape::FixedArray(element, count),
        None => Shape::DynamicArray(element),
    };
    let items = value.as_array().ok_or_else(|| mismatch(&shape, value))?;
    match element {
        ElementType::Integer(kind) => {
            dispatch_integer!(kind, encode_integer_array(encoder, items, kind, fixed))
        }
        ElementType::Float(FloatType::Float32) => encode_numeric(encoder, items, fixed, coerce_f32),
        ElementType::Float(FloatType::Float64) => encode_numeric(encoder, items, fixed, coerce_f64),
        ElementType::String => encode_string_array(encoder, items, fixed),
    }
}

fn encode_integer_array<P>(
    encoder: &mut Encoder<'_>,
    items: &[CdrValue],
    kind: IntegerType,
    fixed: Option<usize>,
) -> Result<()>
where
    P: Primitive + TryFrom<i128>,
{
    encode_numeric(encoder, items, fixed, |item| coerce_integer::<P>(item, kind))
}

/// Coerce every element first, then write the array in one bulk copy.
fn encode_numeric<P: Primitive>(
    encoder: &mut Encoder<'_>,
    items: &[CdrValue],
    fixed: Option<usize>,
    coerce: impl Fn(&CdrValue) -> Result<P>,
) -> Result<()> {
    let values = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            coerce(item).map_err(|e| e.with_path(&encoder.coding_path().index(index)))
        })
        .collect::<Result<Vec<P>>>()?;
    let mut single = encoder.single_value_container()?;
    match fixed {
        Some(count) => single.encode_fixed_array(&values, count),
        None => single.encode_dynamic_array(&values),
    }
}

fn encode_string_array(
    encoder: &mut Encoder<'_>,
    items: &[CdrValue],
    fixed: Option<usize>,
) -> Result<()> {
    match fixed {
        Some(count) => {
            let values = items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    item.as_str().ok_or_else(|| {
                        mismatch(&Shape::String, item).with_path(&encoder.coding_path().index(index))
                    })
                })
                .collect::<Result<Vec<&str>>>()?;
            encoder
                .single_value_container()?
                .encode_fixed_strings(&values, count)
        }
        None => {
            let mut seq = encoder.sequence_container()?;
            for item in items {
                seq.with_element(|encoder| encode_value(encoder, item, &Shape::String))?;
            }
            seq.end()
        }
    }
}

/// Write the fields of a `Struct` in declaration order.
///
/// Fields missing from the map, or set to `Null`, write nothing. Map
/// entries that the record does not declare are ignored.
fn encode_record(encoder: &mut Encoder<'_>, record: &Arc<RecordShape>, value: &CdrValue) -> Result<()> {
    let fields = value
        .as_struct()
        .ok_or_else(|| mismatch(record.name(), value))?;
    let mut keyed = encoder.keyed_container_with(Arc::clone(record))?;
    for field in record.fields() {
        let Some(field_value) = fields.get(&*field.name) else {
            continue;
        };
        if field_value.is_null() {
            continue;
        }
        keyed.with_field(field.ordinal, |encoder, field, fixed| {
            match (fixed, field.shape.array_element()) {
                (Some(count), Some(element)) => {
                    encode_array(encoder, element, field_value, Some(count))
                }
                _ => encode_value(encoder, field_value, &field.shape),
            }
        })?;
    }
    Ok(())
}

// ============================================================================
// Decoding
// ============================================================================

/// Read a value of `shape` through a traversal root.
pub(crate) fn decode_value(decoder: &mut Decoder<'_, '_>, shape: &Shape) -> Result<CdrValue> {
    match shape {
        Shape::Bool => decoder
            .single_value_container()?
            .decode_bool()
            .map(CdrValue::Bool),
        Shape::Integer(kind) => dispatch_integer!(*kind, decode_scalar(decoder)),
        Shape::Float(FloatType::Float32) => decode_scalar::<f32>(decoder),
        Shape::Float(FloatType::Float64) => decode_scalar::<f64>(decoder),
        Shape::String => decoder
            .single_value_container()?
            .decode_string()
            .map(CdrValue::String),
        Shape::Bytes => {
            let bytes = decoder.single_value_container()?.decode_bytes()?;
            Ok(CdrValue::Bytes(bytes.to_vec()))
        }
        Shape::DynamicArray(element) => decode_array(decoder, *element, None),
        Shape::FixedArray(element, count) => decode_array(decoder, *element, Some(*count)),
        Shape::Record(record) => decode_record(decoder, record),
        Shape::Sequence(element) => {
            let mut seq = decoder.sequence_container()?;
            let mut items = Vec::with_capacity(seq.size_hint());
            while !seq.is_at_end() {
                items.push(seq.with_element(|decoder| decode_value(decoder, element))?);
            }
            Ok(CdrValue::Array(items))
        }
    }
}

fn decode_scalar<P>(decoder: &mut Decoder<'_, '_>) -> Result<CdrValue>
where
    P: Primitive + Into<CdrValue>,
{
    let value: P = decoder.single_value_container()?.decode_scalar()?;
    Ok(value.into())
}

fn decode_array(
    decoder: &mut Decoder<'_, '_>,
    element: ElementType,
    fixed: Option<usize>,
) -> Result<CdrValue> {
    match element {
        ElementType::Integer(kind) => dispatch_integer!(kind, decode_numeric(decoder, fixed)),
        ElementType::Float(FloatType::Float32) => decode_numeric::<f32>(decoder, fixed),
        ElementType::Float(FloatType::Float64) => decode_numeric::<f64>(decoder, fixed),
        ElementType::String => match fixed {
            Some(count) => {
                let values = decoder
                    .single_value_container()?
                    .decode_fixed_strings(count)?;
                Ok(CdrValue::Array(
                    values.into_iter().map(CdrValue::String).collect(),
                ))
            }
            None => decode_value(decoder, &Shape::sequence(Shape::String)),
        },
    }
}

fn decode_numeric<P>(decoder: &mut Decoder<'_, '_>, fixed: Option<usize>) -> Result<CdrValue>
where
    P: Primitive + Into<CdrValue>,
{
    let mut single = decoder.single_value_container()?;
    let values: Vec<P> = match fixed {
        Some(count) => single.decode_fixed_array(count)?,
        None => single.decode_dynamic_array()?,
    };
    Ok(CdrValue::Array(values.into_iter().map(Into::into).collect()))
}

fn decode_record(decoder: &mut Decoder<'_, '_>, record: &Arc<RecordShape>) -> Result<CdrValue> {
    let mut keyed = decoder.keyed_container_with(Arc::clone(record))?;
    let mut fields = DecodedRecord::with_capacity(record.len());
    for field in record.fields() {
        let value = keyed.with_field(field.ordinal, |decoder, field, fixed| {
            match (fixed, field.shape.array_element()) {
                (Some(count), Some(element)) => decode_array(decoder, element, Some(count)),
                _ => decode_value(decoder, &field.shape),
            }
        })?;
        fields.insert(field.name.to_string(), value);
    }
    Ok(CdrValue::Struct(fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;
    use crate::{decode_value, encode_value};

    fn int(kind: IntegerType) -> Shape {
        Shape::Integer(kind)
    }

    #[test]
    fn test_integer_coercion() {
        let bytes = encode_value(&CdrValue::Int64(200), &int(IntegerType::UInt8)).unwrap();
        assert_eq!(bytes, vec![200, 0, 0, 0]);

        let err = encode_value(&CdrValue::Int64(256), &int(IntegerType::UInt8)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);

        let err = encode_value(&CdrValue::Int8(-1), &int(IntegerType::UInt32)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);

        let err = encode_value(&CdrValue::from("7"), &int(IntegerType::Int32)).unwrap_err();
        assert!(err.to_string().contains("expected int32, found string"));
    }

    #[test]
    fn test_float32_keeps_bits() {
        let nan = f32::from_bits(0x7fc0_1234);
        let bytes = encode_value(&CdrValue::Float32(nan), &Shape::Float(FloatType::Float32)).unwrap();
        assert_eq!(bytes, 0x7fc0_1234u32.to_le_bytes().to_vec());
        let back = decode_value(&Shape::Float(FloatType::Float32), &bytes).unwrap();
        assert!(back.bit_eq(&CdrValue::Float32(nan)));
    }

    #[test]
    fn test_null_writes_nothing() {
        assert!(encode_value(&CdrValue::Null, &Shape::String).unwrap().is_empty());
    }

    #[test]
    fn test_numeric_array_element_error_has_index() {
        let shape = Shape::DynamicArray(ElementType::Integer(IntegerType::Int8));
        let value = CdrValue::Array(vec![CdrValue::Int32(1), CdrValue::Int32(1000)]);
        let err = encode_value(&value, &shape).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.path().unwrap().to_string(), "[1]");
    }

    #[test]
    fn test_string_arrays() {
        let value = CdrValue::Array(vec!["a".into(), "bc".into()]);
        let dynamic = encode_value(&value, &Shape::DynamicArray(ElementType::String)).unwrap();
        assert_eq!(&dynamic[..4], &[2, 0, 0, 0]);
        let fixed = encode_value(&value, &Shape::FixedArray(ElementType::String, 2)).unwrap();
        assert_eq!(&dynamic[4..], &fixed[..]);

        let back = decode_value(&Shape::FixedArray(ElementType::String, 2), &fixed).unwrap();
        assert_eq!(back, value);
        let back = decode_value(&Shape::DynamicArray(ElementType::String), &dynamic).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_record_skips_missing_fields() {
        let shape = Shape::record(
            RecordShape::builder("Pair")
                .field("a", int(IntegerType::UInt16))
                .field("b", int(IntegerType::UInt16))
                .build(),
        );
        let mut fields = DecodedRecord::new();
        fields.insert("b".into(), CdrValue::UInt16(9));
        fields.insert("unknown".into(), CdrValue::Bool(true));
        let bytes = encode_value(&CdrValue::Struct(fields), &shape).unwrap();
        assert_eq!(bytes, vec![9, 0, 0, 0]);
    }

    #[test]
    fn test_record_type_mismatch() {
        let shape = Shape::record(RecordShape::builder("Empty").build());
        let err = encode_value(&CdrValue::Int32(1), &shape).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert!(err.to_string().contains("expected Empty, found int32"));
    }

    #[test]
    fn test_sequence_of_records() {
        let point = Shape::record(
            RecordShape::builder("Point")
                .field("x", Shape::Float(FloatType::Float32))
                .build(),
        );
        let shape = Shape::sequence(point);
        let mut p = DecodedRecord::new();
        p.insert("x".into(), CdrValue::Float32(1.5));
        let value = CdrValue::Array(vec![CdrValue::Struct(p.clone()), CdrValue::Struct(p)]);
        let bytes = encode_value(&value, &shape).unwrap();
        assert_eq!(bytes.len(), 12);
        assert_eq!(decode_value(&shape, &bytes).unwrap(), value);
    }

    #[test]
    fn test_decode_truncated_record_reports_field() {
        let shape = Shape::record(
            RecordShape::builder("Reading")
                .field("id", Shape::String)
                .field("value", Shape::Float(FloatType::Float64))
                .build(),
        );
        let bytes = [2, 0, 0, 0, b'x', 0, 0, 0, 1, 2, 3];
        let err = decode_value(&shape, &bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEndOfData);
        assert_eq!(err.path().unwrap().to_string(), "value");
    }
}
