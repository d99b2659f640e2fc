// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CDR decoding tests.
//!
//! Decodes hand-written wire images into typed values and runtime values.

mod common;

use cdrcodec::{
    decode, decode_value, encode, Bytes, CdrDecode, CdrEncode, CdrType, CdrValue, Decoder,
    ElementType, Encoder, ErrorKind, FloatType, IntegerType, RecordShape, Result, Shape,
};
use common::*;

// ============================================================================
// Test types
// ============================================================================

#[derive(Debug, PartialEq)]
struct Sample {
    b: u8,
    a: [i32; 1],
}

impl CdrType for Sample {
    fn describe_shape() -> Shape {
        Shape::record(
            RecordShape::builder("Sample")
                .field("b", Shape::Integer(IntegerType::UInt8))
                .fixed_field("a", ElementType::Integer(IntegerType::Int32), 1)
                .build(),
        )
    }
}

impl CdrDecode for Sample {
    fn decode(decoder: &mut Decoder<'_, '_>) -> Result<Self> {
        let mut record = decoder.keyed_container::<Self>()?;
        Ok(Sample {
            b: record.decode_field(0)?,
            a: record.decode_field(1)?,
        })
    }
}

#[derive(Debug, PartialEq)]
struct Labels {
    names: Vec<String>,
}

impl CdrType for Labels {
    fn describe_shape() -> Shape {
        Shape::record(
            RecordShape::builder("Labels")
                .fixed_field("names", ElementType::String, 2)
                .build(),
        )
    }
}

impl CdrDecode for Labels {
    fn decode(decoder: &mut Decoder<'_, '_>) -> Result<Self> {
        let mut record = decoder.keyed_container::<Self>()?;
        Ok(Labels {
            names: record.decode_field(0)?,
        })
    }
}

/// A wide array followed by a scalar, so the array's alignment is visible.
#[derive(Debug, PartialEq)]
struct Trailer {
    a: Vec<f64>,
    b: u32,
}

impl CdrType for Trailer {
    fn describe_shape() -> Shape {
        Shape::record(
            RecordShape::builder("Trailer")
                .field("a", Shape::DynamicArray(ElementType::Float(FloatType::Float64)))
                .field("b", Shape::Integer(IntegerType::UInt32))
                .build(),
        )
    }
}

impl CdrEncode for Trailer {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
        let mut record = encoder.keyed_container::<Self>()?;
        record.encode_field(0, &self.a)?;
        record.encode_field(1, &self.b)
    }
}

impl CdrDecode for Trailer {
    fn decode(decoder: &mut Decoder<'_, '_>) -> Result<Self> {
        let mut record = decoder.keyed_container::<Self>()?;
        Ok(Trailer {
            a: record.decode_field(0)?,
            b: record.decode_field(1)?,
        })
    }
}

/// Platform integers in a fixed and a dynamic array.
#[derive(Debug, PartialEq)]
struct Counters {
    fixed: Vec<usize>,
    offsets: Vec<isize>,
}

impl CdrType for Counters {
    fn describe_shape() -> Shape {
        Shape::record(
            RecordShape::builder("Counters")
                .fixed_field("fixed", ElementType::Integer(IntegerType::UInt64), 2)
                .field("offsets", Shape::DynamicArray(ElementType::Integer(IntegerType::Int64)))
                .build(),
        )
    }
}

impl CdrEncode for Counters {
    fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
        let mut record = encoder.keyed_container::<Self>()?;
        record.encode_field(0, &self.fixed)?;
        record.encode_field(1, &self.offsets)
    }
}

impl CdrDecode for Counters {
    fn decode(decoder: &mut Decoder<'_, '_>) -> Result<Self> {
        let mut record = decoder.keyed_container::<Self>()?;
        Ok(Counters {
            fixed: record.decode_field(0)?,
            offsets: record.decode_field(1)?,
        })
    }
}

/// Sequence of `u16` read element by element through a sequence container.
#[derive(Debug, PartialEq)]
struct Readings {
    values: Vec<u16>,
    hints: Vec<usize>,
}

impl CdrType for Readings {
    fn describe_shape() -> Shape {
        Shape::sequence(Shape::Integer(IntegerType::UInt16))
    }
}

impl CdrDecode for Readings {
    fn decode(decoder: &mut Decoder<'_, '_>) -> Result<Self> {
        let mut seq = decoder.sequence_container()?;
        let mut values = Vec::with_capacity(seq.count());
        let mut hints = Vec::new();
        while !seq.is_at_end() {
            hints.push(seq.size_hint());
            values.push(seq.decode()?);
        }
        Ok(Readings { values, hints })
    }
}

// ============================================================================
// Scalars
// ============================================================================

#[test]
fn test_decode_bool() {
    assert!(!decode::<bool>(&[0]).unwrap());
    assert!(decode::<bool>(&[1]).unwrap());
}

#[test]
fn test_decode_i64() {
    assert_eq!(decode::<i64>(&[0x2A, 0, 0, 0, 0, 0, 0, 0]).unwrap(), 42);
}

#[test]
fn test_decode_u8() {
    assert_eq!(decode::<u8>(&[0x80]).unwrap(), 128);
}

#[test]
#[allow(clippy::approx_constant)]
fn test_decode_floats() {
    assert_eq!(decode::<f32>(&[0xC3, 0xF5, 0x48, 0x40]).unwrap(), 3.14);
    assert_eq!(
        decode::<f64>(&[0x6E, 0x86, 0x1B, 0xF0, 0xF9, 0x21, 0x09, 0x40]).unwrap(),
        3.14159
    );
}

#[test]
fn test_decode_usize() {
    assert_eq!(decode::<usize>(&[9, 0, 0, 0, 0, 0, 0, 0]).unwrap(), 9);
    assert_eq!(
        decode::<isize>(&[0xfe, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]).unwrap(),
        -2
    );
}

// ============================================================================
// Strings, blobs and arrays
// ============================================================================

#[test]
fn test_decode_string() {
    let data = [6, 0, 0, 0, 0x68, 0x65, 0x6C, 0x6C, 0x6F, 0];
    assert_eq!(decode::<String>(&data).unwrap(), "hello");
}

#[test]
fn test_decode_string_with_padding() {
    let data = [6, 0, 0, 0, b'h', b'e', b'l', b'l', b'o', 0, 0, 0];
    assert_eq!(decode::<String>(&data).unwrap(), "hello");
}

#[test]
fn test_decode_bytes() {
    let data = [5, 0, 0, 0, 0x68, 0x65, 0x6C, 0x6C, 0x6F];
    assert_eq!(decode::<Bytes>(&data).unwrap().0, b"hello".to_vec());
}

#[test]
fn test_decode_i16_array() {
    let data = [3, 0, 0, 0, 1, 0, 2, 0, 3, 0];
    assert_eq!(decode::<Vec<i16>>(&data).unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_decode_i8_array() {
    let data = [0x03, 0, 0, 0, 0xFF, 0x02, 0x03, 0x00];
    assert_eq!(decode::<Vec<i8>>(&data).unwrap(), vec![-1, 2, 3]);
}

#[test]
fn test_decode_i8_array_as_value() {
    let data = [0x03, 0, 0, 0, 0xFF, 0x02, 0x03, 0x00];
    let shape = Shape::DynamicArray(ElementType::Integer(IntegerType::Int8));
    assert_eq!(
        decode_value(&shape, &data).unwrap(),
        CdrValue::Array(vec![
            CdrValue::Int8(-1),
            CdrValue::Int8(2),
            CdrValue::Int8(3)
        ])
    );
}

#[test]
fn test_decode_empty_f64_array() {
    // The payload alignment follows the count even with no elements.
    assert!(decode::<Vec<f64>>(&[0; 8]).unwrap().is_empty());
    let err = decode::<Vec<f64>>(&[0, 0, 0, 0]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedEndOfData);
}

#[test]
fn test_decode_field_after_empty_f64_array() {
    let data = [0, 0, 0, 0, 0, 0, 0, 0, 7, 0, 0, 0];
    let trailer = decode::<Trailer>(&data).unwrap();
    assert!(trailer.a.is_empty());
    assert_eq!(trailer.b, 7);
    assert_eq!(encode(&trailer).unwrap(), data.to_vec());
}

#[test]
fn test_decode_string_array() {
    let data = [
        2, 0, 0, 0, 2, 0, 0, 0, b'a', 0, 0, 0, 3, 0, 0, 0, b'b', b'c', 0, 0,
    ];
    assert_eq!(
        decode::<Vec<String>>(&data).unwrap(),
        vec!["a".to_string(), "bc".to_string()]
    );
}

#[test]
fn test_decode_fixed_array_value() {
    assert_eq!(decode::<[u16; 3]>(&[7, 0, 8, 0, 9, 0]).unwrap(), [7, 8, 9]);
}

// ============================================================================
// Records
// ============================================================================

#[test]
fn test_decode_fixed_array_field() {
    let sample = decode::<Sample>(&[0x00, 0, 0, 0, 0x04, 0, 0, 0]).unwrap();
    assert_eq!(sample, Sample { b: 0, a: [4] });
}

#[test]
fn test_platform_integer_array_fields() {
    let counters = Counters {
        fixed: vec![1, 2],
        offsets: vec![-3],
    };
    let bytes = encode(&counters).unwrap();
    #[rustfmt::skip]
    let expected = vec![
        1, 0, 0, 0, 0, 0, 0, 0,
        2, 0, 0, 0, 0, 0, 0, 0,
        1, 0, 0, 0, 0, 0, 0, 0,
        0xfd, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    ];
    assert_eq!(bytes, expected);
    assert_eq!(decode::<Counters>(&bytes).unwrap(), counters);

    let short = Counters {
        fixed: vec![1],
        offsets: Vec::new(),
    };
    let err = encode(&short).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidValue);
    assert_eq!(err.path().unwrap().to_string(), "fixed");
}

#[test]
fn test_decode_fixed_string_field() {
    let data = [2, 0, 0, 0, b'x', 0, 0, 0, 3, 0, 0, 0, b'y', b'z', 0];
    let labels = decode::<Labels>(&data).unwrap();
    assert_eq!(labels.names, vec!["x".to_string(), "yz".to_string()]);
}

#[test]
fn test_decode_flat_temperature() {
    let value = decode::<FlatTemperature>(&TEMPERATURE_DUMP).unwrap();
    assert_eq!(value, sample_flat_temperature());
}

#[test]
fn test_decode_nested_temperature() {
    let value = decode::<Temperature>(&TEMPERATURE_DUMP).unwrap();
    assert_eq!(value, sample_temperature());
    assert_eq!(value.reading.header.frame_id, "");
}

#[test]
fn test_decode_temperature_as_value() {
    let value = decode_value(&Temperature::describe_shape(), &TEMPERATURE_DUMP).unwrap();
    let reading = value.field("reading").unwrap();
    assert_eq!(reading.field("temperature"), Some(&CdrValue::Float64(23.456)));
    assert_eq!(
        reading.field("header").and_then(|h| h.field("frame_id")),
        Some(&CdrValue::String(String::new()))
    );
    assert_eq!(value.field("id").and_then(CdrValue::as_str), Some("ms5837"));
}

#[test]
fn test_decode_trailing_bytes_ignored() {
    let mut data = TEMPERATURE_DUMP.to_vec();
    data.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
    assert_eq!(
        decode::<FlatTemperature>(&data).unwrap(),
        sample_flat_temperature()
    );
}

#[test]
fn test_decode_absent_field_is_none() {
    assert_eq!(decode::<Option<u32>>(&[]).unwrap(), None);
}

// ============================================================================
// Sequences
// ============================================================================

#[test]
fn test_decode_sequence_container_element_by_element() {
    let data = [3, 0, 0, 0, 10, 0, 20, 0, 30, 0];
    let readings = decode::<Readings>(&data).unwrap();
    assert_eq!(readings.values, vec![10, 20, 30]);
    assert_eq!(readings.hints, vec![3, 2, 1]);
}

#[test]
fn test_decode_size_hint_bounded_by_input() {
    // Count claims 1000 elements but only six bytes follow.
    let data = [0xe8, 0x03, 0, 0, 1, 0, 2, 0, 3, 0];
    let err = decode::<Readings>(&data).unwrap_err();
    assert_eq!(err.kind(), cdrcodec::ErrorKind::UnexpectedEndOfData);
}

#[test]
fn test_decode_sequence_of_bools() {
    let data = [3, 0, 0, 0, 1, 0, 1, 0];
    assert_eq!(decode::<Vec<bool>>(&data).unwrap(), vec![true, false, true]);
}

#[test]
fn test_decode_nested_sequences() {
    let data = [
        3, 0, 0, 0, 2, 0, 0, 0, 1, 2, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 3, 0, 0, 0,
    ];
    assert_eq!(
        decode::<Vec<Vec<u8>>>(&data).unwrap(),
        vec![vec![1, 2], vec![], vec![3]]
    );
}

#[test]
fn test_decode_camera_info_reads_fixed_arrays() {
    let info = sample_camera_info();
    let bytes = cdrcodec::encode(&info).unwrap();
    let decoded = decode::<CameraInfo>(&bytes).unwrap();
    assert_eq!(decoded.k.len(), 9);
    assert_eq!(decoded.p.len(), 12);
    assert_eq!(decoded, info);
}
