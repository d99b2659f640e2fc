// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Top-level CDR encoder, decoder and codec facade.
//!
//! Each call owns its buffer and coding path; [`CdrEncoder`] and
//! [`CdrDecoder`] only hold options and context, so one instance can serve
//! any number of calls, from any number of threads.

use std::any::type_name;

use tracing::debug;

use crate::core::{CdrValue, CodecOptions, CodingContext, Result};
use crate::schema::Shape;

use super::cursor::{CdrCursor, CdrWriter};
use super::decoder::{DecodeState, Decoder};
use super::dynamic;
use super::encoder::{EncodeState, Encoder};
use super::traits::{CdrDecode, CdrEncode};

/// CDR encoder.
///
/// # Example
///
/// ```
/// use cdrcodec::CdrEncoder;
///
/// let encoder = CdrEncoder::new();
/// assert_eq!(encoder.encode(&[1i16, 2, 3]).unwrap(), vec![1, 0, 2, 0, 3, 0, 0, 0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CdrEncoder {
    options: CodecOptions,
    context: CodingContext,
}

impl CdrEncoder {
    /// Create an encoder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an encoder with validated options.
    pub fn with_options(options: CodecOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            context: CodingContext::new(),
        })
    }

    /// Replace the context handed to every container.
    #[must_use]
    pub fn with_context(mut self, context: CodingContext) -> Self {
        self.context = context;
        self
    }

    /// Get the options.
    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Get the context.
    pub fn context(&self) -> &CodingContext {
        &self.context
    }

    /// Get a mutable reference to the context.
    pub fn context_mut(&mut self) -> &mut CodingContext {
        &mut self.context
    }

    /// Encode a typed value.
    pub fn encode<T: CdrEncode + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        let capacity = self.options.encode_capacity(std::mem::size_of_val(value));
        self.run(type_name::<T>(), capacity, |encoder| value.encode(encoder))
    }

    /// Encode a dynamic value against `shape`.
    pub fn encode_value(&self, value: &CdrValue, shape: &Shape) -> Result<Vec<u8>> {
        let capacity = self.options.initial_capacity;
        self.run(&shape.to_string(), capacity, |encoder| {
            dynamic::encode_value(encoder, value, shape)
        })
    }

    fn run<F>(&self, type_name: &str, capacity: usize, f: F) -> Result<Vec<u8>>
    where
        F: FnOnce(&mut Encoder<'_>) -> Result<()>,
    {
        let mut state = EncodeState::new(CdrWriter::with_capacity(capacity));
        let result = f(&mut Encoder::new(&mut state, &self.context, &self.options));
        match result {
            Ok(()) => {
                let bytes = state.writer.finish();
                debug!(type_name, len = bytes.len(), "Encoded CDR value");
                Ok(bytes)
            }
            Err(e) => {
                debug!(type_name, fields = ?e.log_fields(), "Failed to encode CDR value");
                Err(e)
            }
        }
    }
}

/// CDR decoder.
///
/// Bytes after the decoded value are ignored.
#[derive(Debug, Clone, Default)]
pub struct CdrDecoder {
    options: CodecOptions,
    context: CodingContext,
}

impl CdrDecoder {
    /// Create a decoder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with validated options.
    pub fn with_options(options: CodecOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            context: CodingContext::new(),
        })
    }

    /// Replace the context handed to every container.
    #[must_use]
    pub fn with_context(mut self, context: CodingContext) -> Self {
        self.context = context;
        self
    }

    /// Get the options.
    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Get the context.
    pub fn context(&self) -> &CodingContext {
        &self.context
    }

    /// Get a mutable reference to the context.
    pub fn context_mut(&mut self) -> &mut CodingContext {
        &mut self.context
    }

    /// Decode a typed value.
    pub fn decode<T: CdrDecode>(&self, data: &[u8]) -> Result<T> {
        self.run(type_name::<T>(), data, |decoder| T::decode(decoder))
    }

    /// Decode a dynamic value of `shape`.
    pub fn decode_value(&self, shape: &Shape, data: &[u8]) -> Result<CdrValue> {
        self.run(&shape.to_string(), data, |decoder| {
            dynamic::decode_value(decoder, shape)
        })
    }

    fn run<T, F>(&self, type_name: &str, data: &[u8], f: F) -> Result<T>
    where
        F: FnOnce(&mut Decoder<'_, '_>) -> Result<T>,
    {
        let mut state = DecodeState::new(CdrCursor::new(data));
        let result = f(&mut Decoder::new(&mut state, &self.context, &self.options));
        match &result {
            Ok(_) => debug!(
                type_name,
                len = data.len(),
                consumed = state.cursor.position(),
                "Decoded CDR value"
            ),
            Err(e) => debug!(type_name, fields = ?e.log_fields(), "Failed to decode CDR value"),
        }
        result
    }
}

/// Encoder and decoder sharing one set of options and context.
#[derive(Debug, Clone, Default)]
pub struct CdrCodec {
    encoder: CdrEncoder,
    decoder: CdrDecoder,
}

impl CdrCodec {
    /// Create a codec with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec with validated options.
    pub fn with_options(options: CodecOptions) -> Result<Self> {
        Ok(Self {
            encoder: CdrEncoder::with_options(options.clone())?,
            decoder: CdrDecoder::with_options(options)?,
        })
    }

    /// Replace the context on both sides.
    #[must_use]
    pub fn with_context(self, context: CodingContext) -> Self {
        Self {
            encoder: self.encoder.with_context(context.clone()),
            decoder: self.decoder.with_context(context),
        }
    }

    /// Get the CDR encoder.
    pub fn encoder(&self) -> &CdrEncoder {
        &self.encoder
    }

    /// Get the CDR decoder.
    pub fn decoder(&self) -> &CdrDecoder {
        &self.decoder
    }

    /// Encode a typed value.
    pub fn encode<T: CdrEncode + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        self.encoder.encode(value)
    }

    /// Decode a typed value.
    pub fn decode<T: CdrDecode>(&self, data: &[u8]) -> Result<T> {
        self.decoder.decode(data)
    }

    /// Encode a dynamic value against `shape`.
    pub fn encode_value(&self, value: &CdrValue, shape: &Shape) -> Result<Vec<u8>> {
        self.encoder.encode_value(value, shape)
    }

    /// Decode a dynamic value of `shape`.
    pub fn decode_value(&self, shape: &Shape, data: &[u8]) -> Result<CdrValue> {
        self.decoder.decode_value(shape, data)
    }
}
