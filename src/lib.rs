// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # cdrcodec
//!
//! Little-endian CDR (Common Data Representation) encoder and decoder for
//! ROS2-style messages.
//!
//! Values are laid out flat: scalars self-aligned from buffer offset 0,
//! strings and dynamic arrays with a 4-byte count, fixed arrays with no
//! count, and the whole buffer zero-padded to a multiple of 4.
//!
//! ## Architecture
//!
//! - `core/` - errors, coding paths, options, context, dynamic values, shape registry
//! - `schema/` - [`Shape`] descriptors and fixed-array field metadata
//! - `encoding/cdr/` - cursors, leaf codecs, traversal containers, typed traits
//!
//! ## Example: Typed records
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use cdrcodec::{
//!     CdrDecode, CdrEncode, CdrType, Decoder, Encoder, FloatType, RecordShape, Shape,
//! };
//!
//! #[derive(Debug, PartialEq)]
//! struct Temperature {
//!     temperature: f64,
//!     variance: f64,
//!     id: String,
//! }
//!
//! impl CdrType for Temperature {
//!     fn describe_shape() -> Shape {
//!         Shape::record(
//!             RecordShape::builder("Temperature")
//!                 .field("temperature", Shape::Float(FloatType::Float64))
//!                 .field("variance", Shape::Float(FloatType::Float64))
//!                 .field("id", Shape::String)
//!                 .build(),
//!         )
//!     }
//! }
//!
//! impl CdrEncode for Temperature {
//!     fn encode(&self, encoder: &mut Encoder<'_>) -> cdrcodec::Result<()> {
//!         let mut record = encoder.keyed_container::<Self>()?;
//!         record.encode_field(0, &self.temperature)?;
//!         record.encode_field(1, &self.variance)?;
//!         record.encode_field(2, &self.id)
//!     }
//! }
//!
//! impl CdrDecode for Temperature {
//!     fn decode(decoder: &mut Decoder<'_, '_>) -> cdrcodec::Result<Self> {
//!         let mut record = decoder.keyed_container::<Self>()?;
//!         Ok(Temperature {
//!             temperature: record.decode_field(0)?,
//!             variance: record.decode_field(1)?,
//!             id: record.decode_field(2)?,
//!         })
//!     }
//! }
//!
//! let value = Temperature {
//!     temperature: 21.5,
//!     variance: 0.25,
//!     id: "kitchen".to_string(),
//! };
//! let bytes = cdrcodec::encode(&value)?;
//! assert_eq!(bytes.len(), 28);
//! assert_eq!(cdrcodec::decode::<Temperature>(&bytes)?, value);
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Dynamic values
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use cdrcodec::{CdrValue, ElementType, IntegerType, Shape};
//!
//! let shape = Shape::DynamicArray(ElementType::Integer(IntegerType::Int16));
//! let value = CdrValue::Array(vec![1i16.into(), 2i16.into(), 3i16.into()]);
//! let bytes = cdrcodec::encode_value(&value, &shape)?;
//! assert_eq!(bytes, [3, 0, 0, 0, 1, 0, 2, 0, 3, 0, 0, 0]);
//! assert_eq!(cdrcodec::decode_value(&shape, &bytes)?, value);
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use crate::core::{
    CdrValue, CodecError, CodecOptions, CodingContext, CodingPath, DecodedRecord, ErrorKind,
    PathSegment, Result,
};

// Shape descriptors
pub mod schema;

pub use schema::{
    ElementType, FieldDescriptor, FieldMetadata, FixedArrayMarker, FloatType, IntegerType,
    RecordShape, Shape,
};

// Encoding/decoding
pub mod encoding;

pub use encoding::cdr::{
    ArrayElement, Bytes, CdrCodec, CdrDecode, CdrDecoder, CdrEncode, CdrEncoder, CdrType,
    ContainerKind, Decoder, Encoder, KeyedDecoder, KeyedEncoder, SequenceDecoder,
    SequenceEncoder, SingleValueDecoder, SingleValueEncoder,
};

/// Encode a typed value with default options.
pub fn encode<T: CdrEncode + ?Sized>(value: &T) -> Result<Vec<u8>> {
    CdrEncoder::new().encode(value)
}

/// Decode a typed value with default options.
pub fn decode<T: CdrDecode>(data: &[u8]) -> Result<T> {
    CdrDecoder::new().decode(data)
}

/// Encode a dynamic value against `shape` with default options.
pub fn encode_value(value: &CdrValue, shape: &Shape) -> Result<Vec<u8>> {
    CdrEncoder::new().encode_value(value, shape)
}

/// Decode a dynamic value of `shape` with default options.
pub fn decode_value(shape: &Shape, data: &[u8]) -> Result<CdrValue> {
    CdrDecoder::new().decode_value(shape, data)
}
