// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Encoding side of the traversal protocol.
//!
//! An [`Encoder`] is a traversal root: a value's [`CdrEncode`] impl opens
//! exactly one container on it and writes through that container. All
//! containers of one encode call share a single [`CdrWriter`] by exclusive
//! borrow, so nested values are just more bytes in the same flat stream.
//!
//! # Example
//!
//! ```
//! use cdrcodec::{CdrEncode, CdrType, Encoder, IntegerType, RecordShape, Result, Shape};
//!
//! struct Sample {
//!     b: u8,
//!     a: Vec<i32>,
//! }
//!
//! impl CdrType for Sample {
//!     fn describe_shape() -> Shape {
//!         Shape::record(
//!             RecordShape::builder("Sample")
//!                 .field("b", Shape::Integer(IntegerType::UInt8))
//!                 .fixed_field("a", cdrcodec::ElementType::Integer(IntegerType::Int32), 1)
//!                 .build(),
//!         )
//!     }
//! }
//!
//! impl CdrEncode for Sample {
//!     fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
//!         let mut record = encoder.keyed_container::<Self>()?;
//!         record.encode_field(0, &self.b)?;
//!         record.encode_field(1, &self.a)
//!     }
//! }
//!
//! let bytes = cdrcodec::encode(&Sample { b: 0, a: vec![4] }).unwrap();
//! assert_eq!(bytes, [0, 0, 0, 0, 4, 0, 0, 0]);
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::core::{shape_of, CodecError, CodecOptions, CodingContext, CodingPath, PathSegment, Result};
use crate::schema::{FieldDescriptor, RecordShape, Shape};

use super::cursor::{CdrWriter, COUNT_SIZE};
use super::primitive::Primitive;
use super::traits::{CdrEncode, CdrType};
use super::{scalar, sequence};

/// Kind of container opened on a traversal root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Exactly one value, no framing.
    SingleValue,
    /// Record fields in declaration order.
    Keyed,
    /// Count-prefixed list of values.
    Sequence,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerKind::SingleValue => f.write_str("single value"),
            ContainerKind::Keyed => f.write_str("keyed"),
            ContainerKind::Sequence => f.write_str("sequence"),
        }
    }
}

/// Record shape out of a shape, or `TypeMismatch`.
pub(crate) fn record_shape(shape: &Shape) -> Result<Arc<RecordShape>> {
    shape
        .as_record()
        .cloned()
        .ok_or_else(|| CodecError::type_mismatch("record", shape.to_string()))
}

pub(crate) fn fixed_marker_mismatch(field: &FieldDescriptor) -> CodecError {
    CodecError::type_mismatch(
        "array of numeric or string elements for a fixed-array field",
        field.shape.to_string(),
    )
}

/// Check a typed value's shape against the field it is written to or read
/// from.
pub(crate) fn check_field_shape(field: &FieldDescriptor, value: &Shape) -> Result<()> {
    if value.fits(&field.shape) {
        Ok(())
    } else {
        Err(CodecError::type_mismatch(field.shape.to_string(), value.to_string()))
    }
}

pub(crate) fn nesting_unsupported(field: &FieldDescriptor, requested: ContainerKind) -> CodecError {
    CodecError::data_corrupted(format!(
        "Field '{}' of shape {} cannot hold a nested {requested} container",
        field.name, field.shape
    ))
}

/// Writer and coding path shared by every container of one encode call.
#[derive(Debug)]
pub(crate) struct EncodeState {
    pub(crate) writer: CdrWriter,
    pub(crate) path: CodingPath,
}

impl EncodeState {
    pub(crate) fn new(writer: CdrWriter) -> Self {
        Self {
            writer,
            path: CodingPath::root(),
        }
    }

    /// Push a path segment, enforcing the depth limit.
    ///
    /// Returns the depth to truncate back to when leaving.
    fn enter(&mut self, options: &CodecOptions, segment: PathSegment) -> Result<usize> {
        let depth = self.path.depth();
        if depth >= options.max_depth {
            return Err(CodecError::invalid_value(format!(
                "Maximum nesting depth {} exceeded",
                options.max_depth
            ))
            .with_path(&self.path));
        }
        self.path.push(segment);
        Ok(depth)
    }
}

// ============================================================================
// Traversal root
// ============================================================================

/// Traversal root for one value.
///
/// Exactly one container may be opened per root; a second request fails
/// with `InvalidValue`.
pub struct Encoder<'a> {
    state: &'a mut EncodeState,
    context: &'a CodingContext,
    options: &'a CodecOptions,
    opened: Option<ContainerKind>,
}

impl<'a> Encoder<'a> {
    pub(crate) fn new(
        state: &'a mut EncodeState,
        context: &'a CodingContext,
        options: &'a CodecOptions,
    ) -> Self {
        Self {
            state,
            context,
            options,
            opened: None,
        }
    }

    /// Route from the top-level value to this one.
    pub fn coding_path(&self) -> &CodingPath {
        &self.state.path
    }

    /// Caller-supplied context.
    pub fn context(&self) -> &'a CodingContext {
        self.context
    }

    /// Options of this encode call.
    pub fn options(&self) -> &'a CodecOptions {
        self.options
    }

    /// The container kind opened on this root, if any.
    pub fn opened(&self) -> Option<ContainerKind> {
        self.opened
    }

    /// Bytes written so far in this encode call, before final padding.
    pub fn position(&self) -> usize {
        self.state.writer.position()
    }

    fn open(&mut self, kind: ContainerKind) -> Result<()> {
        if let Some(opened) = self.opened {
            return Err(CodecError::invalid_value(format!(
                "Cannot open a {kind} container, this value already opened a {opened} container"
            ))
            .with_path(&self.state.path));
        }
        self.opened = Some(kind);
        trace!(
            kind = %kind,
            path = %self.state.path,
            position = self.state.writer.position(),
            "Opened encode container"
        );
        Ok(())
    }

    /// Open a container for exactly one value.
    pub fn single_value_container(&mut self) -> Result<SingleValueEncoder<'_>> {
        self.open(ContainerKind::SingleValue)?;
        Ok(SingleValueEncoder {
            state: &mut *self.state,
            context: self.context,
            options: self.options,
            used: false,
        })
    }

    /// Open a record container using the registered shape of `R`.
    pub fn keyed_container<R>(&mut self) -> Result<KeyedEncoder<'_>>
    where
        R: CdrType + ?Sized + 'static,
    {
        let record = record_shape(&shape_of::<R>()).map_err(|e| e.with_path(&self.state.path))?;
        self.keyed_container_with(record)
    }

    /// Open a record container for an explicit record shape.
    pub fn keyed_container_with(&mut self, record: Arc<RecordShape>) -> Result<KeyedEncoder<'_>> {
        self.open(ContainerKind::Keyed)?;
        let restore = self.state.path.depth();
        Ok(KeyedEncoder {
            state: &mut *self.state,
            context: self.context,
            options: self.options,
            record,
            restore,
        })
    }

    /// Open a count-prefixed sequence container.
    pub fn sequence_container(&mut self) -> Result<SequenceEncoder<'_>> {
        self.open(ContainerKind::Sequence)?;
        let restore = self.state.path.depth();
        Ok(SequenceEncoder::open(
            &mut *self.state,
            self.context,
            self.options,
            restore,
        ))
    }
}

// ============================================================================
// Single value container
// ============================================================================

/// Container holding exactly one leaf or nested value.
pub struct SingleValueEncoder<'a> {
    state: &'a mut EncodeState,
    context: &'a CodingContext,
    options: &'a CodecOptions,
    used: bool,
}

impl<'a> SingleValueEncoder<'a> {
    /// Route from the top-level value to this one.
    pub fn coding_path(&self) -> &CodingPath {
        &self.state.path
    }

    /// Caller-supplied context.
    pub fn context(&self) -> &'a CodingContext {
        self.context
    }

    fn begin(&mut self) -> Result<&mut CdrWriter> {
        if self.used {
            return Err(
                CodecError::invalid_value("Single value container already holds a value")
                    .with_path(&self.state.path),
            );
        }
        self.used = true;
        Ok(&mut self.state.writer)
    }

    fn annotate<T>(&self, result: Result<T>) -> Result<T> {
        result.map_err(|e| e.with_path(&self.state.path))
    }

    /// Absent value. Writes nothing.
    pub fn encode_nil(&mut self) -> Result<()> {
        Ok(())
    }

    /// Write a boolean.
    pub fn encode_bool(&mut self, value: bool) -> Result<()> {
        scalar::write_bool(self.begin()?, value);
        Ok(())
    }

    /// Write an integer or float.
    pub fn encode_scalar<P: Primitive>(&mut self, value: P) -> Result<()> {
        scalar::write_scalar(self.begin()?, value);
        Ok(())
    }

    /// Write a `usize` as 64 bits.
    pub fn encode_usize(&mut self, value: usize) -> Result<()> {
        scalar::write_usize(self.begin()?, value);
        Ok(())
    }

    /// Write an `isize` as 64 bits.
    pub fn encode_isize(&mut self, value: isize) -> Result<()> {
        scalar::write_isize(self.begin()?, value);
        Ok(())
    }

    /// Write a string.
    pub fn encode_str(&mut self, value: &str) -> Result<()> {
        let result = sequence::write_string(self.begin()?, value);
        self.annotate(result)
    }

    /// Write a byte blob.
    pub fn encode_bytes(&mut self, value: &[u8]) -> Result<()> {
        let result = sequence::write_blob(self.begin()?, value);
        self.annotate(result)
    }

    /// Write a count-prefixed numeric array in one bulk copy.
    pub fn encode_dynamic_array<P: Primitive>(&mut self, values: &[P]) -> Result<()> {
        let result = sequence::write_dynamic_array(self.begin()?, values);
        self.annotate(result)
    }

    /// Write exactly `count` numeric elements without a count.
    pub fn encode_fixed_array<P: Primitive>(&mut self, values: &[P], count: usize) -> Result<()> {
        let result = sequence::write_fixed_array(self.begin()?, values, count);
        self.annotate(result)
    }

    /// Write exactly `count` strings without a count.
    pub fn encode_fixed_strings<S: AsRef<str>>(&mut self, values: &[S], count: usize) -> Result<()> {
        let result = sequence::write_fixed_strings(self.begin()?, values, count);
        self.annotate(result)
    }

    /// Write a nested value through a fresh traversal root.
    pub fn encode<T: CdrEncode + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.begin()?;
        let mut root = Encoder::new(&mut *self.state, self.context, self.options);
        value.encode(&mut root)
    }
}

// ============================================================================
// Keyed container
// ============================================================================

/// Record container.
///
/// Fields are written flat, in the order they are encoded, with no tags or
/// framing. Callers encode them in declaration order.
pub struct KeyedEncoder<'a> {
    state: &'a mut EncodeState,
    context: &'a CodingContext,
    options: &'a CodecOptions,
    record: Arc<RecordShape>,
    restore: usize,
}

impl<'a> KeyedEncoder<'a> {
    /// Shape of the record being written.
    pub fn record(&self) -> &RecordShape {
        &self.record
    }

    /// Route from the top-level value to this record.
    pub fn coding_path(&self) -> &CodingPath {
        &self.state.path
    }

    /// Caller-supplied context.
    pub fn context(&self) -> &'a CodingContext {
        self.context
    }

    fn unknown_field(&self, ordinal: u16) -> CodecError {
        CodecError::invalid_value(format!(
            "Record {} has no field with ordinal {ordinal}",
            self.record.name()
        ))
        .with_path(&self.state.path)
    }

    /// Write one field.
    ///
    /// The shape of `T` must fit the field's declared shape. A field marked
    /// in the record's fixed-array metadata is written without its count.
    pub fn encode_field<T>(&mut self, ordinal: u16, value: &T) -> Result<()>
    where
        T: CdrEncode + ?Sized + 'static,
    {
        let shape = shape_of::<T>();
        self.with_field(ordinal, |encoder, field, fixed| {
            check_field_shape(field, &shape)?;
            match fixed {
                Some(count) => value.encode_fixed(encoder, count),
                None => value.encode(encoder),
            }
        })
    }

    /// Absent field. Writes nothing.
    pub fn encode_nil(&mut self, ordinal: u16) -> Result<()> {
        match self.record.field(ordinal) {
            Some(_) => Ok(()),
            None => Err(self.unknown_field(ordinal)),
        }
    }

    /// Open a record container for a nested record field.
    pub fn nested_keyed_container(&mut self, ordinal: u16) -> Result<KeyedEncoder<'_>> {
        let record = Arc::clone(&self.record);
        let field = record.field(ordinal).ok_or_else(|| self.unknown_field(ordinal))?;
        let nested = match &field.shape {
            Shape::Record(nested) => Arc::clone(nested),
            _ => {
                return Err(nesting_unsupported(field, ContainerKind::Keyed)
                    .with_path(&self.state.path))
            }
        };
        let restore = self.state.enter(self.options, field_segment(field))?;
        trace!(path = %self.state.path, "Opened nested keyed encode container");
        Ok(KeyedEncoder {
            state: &mut *self.state,
            context: self.context,
            options: self.options,
            record: nested,
            restore,
        })
    }

    /// Open a sequence container for a nested sequence field.
    pub fn nested_sequence_container(&mut self, ordinal: u16) -> Result<SequenceEncoder<'_>> {
        let record = Arc::clone(&self.record);
        let field = record.field(ordinal).ok_or_else(|| self.unknown_field(ordinal))?;
        if !matches!(field.shape, Shape::Sequence(_)) {
            return Err(
                nesting_unsupported(field, ContainerKind::Sequence).with_path(&self.state.path)
            );
        }
        let restore = self.state.enter(self.options, field_segment(field))?;
        trace!(path = %self.state.path, "Opened nested sequence encode container");
        Ok(SequenceEncoder::open(
            &mut *self.state,
            self.context,
            self.options,
            restore,
        ))
    }

    /// Run `f` on a fresh root for one field, with the path extended.
    pub(crate) fn with_field<R>(
        &mut self,
        ordinal: u16,
        f: impl FnOnce(&mut Encoder<'_>, &FieldDescriptor, Option<usize>) -> Result<R>,
    ) -> Result<R> {
        let record = Arc::clone(&self.record);
        let field = record.field(ordinal).ok_or_else(|| self.unknown_field(ordinal))?;
        let fixed = record.fixed_count(ordinal);

        let restore = self.state.enter(self.options, field_segment(field))?;
        let result = if fixed.is_some() && field.shape.array_element().is_none() {
            Err(fixed_marker_mismatch(field))
        } else {
            let mut encoder = Encoder::new(&mut *self.state, self.context, self.options);
            f(&mut encoder, field, fixed)
        };
        let result = result.map_err(|e| e.with_path(&self.state.path));
        self.state.path.truncate(restore);
        result
    }
}

impl Drop for KeyedEncoder<'_> {
    fn drop(&mut self) {
        self.state.path.truncate(self.restore);
    }
}

pub(crate) fn field_segment(field: &FieldDescriptor) -> PathSegment {
    PathSegment::Field {
        ordinal: field.ordinal,
        name: Some(Arc::clone(&field.name)),
    }
}

// ============================================================================
// Sequence container
// ============================================================================

/// Count-prefixed sequence container.
///
/// A placeholder count is written when the container opens and patched
/// with the number of appended elements when it is closed, either by
/// [`end`](Self::end) or on drop.
pub struct SequenceEncoder<'a> {
    state: &'a mut EncodeState,
    context: &'a CodingContext,
    options: &'a CodecOptions,
    count_position: usize,
    count: usize,
    restore: usize,
    ended: bool,
}

impl<'a> SequenceEncoder<'a> {
    fn open(
        state: &'a mut EncodeState,
        context: &'a CodingContext,
        options: &'a CodecOptions,
        restore: usize,
    ) -> Self {
        state.writer.write_primitive(0u32);
        let count_position = state.writer.position() - COUNT_SIZE;
        Self {
            state,
            context,
            options,
            count_position,
            count: 0,
            restore,
            ended: false,
        }
    }

    /// Number of elements appended so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Route from the top-level value to this sequence.
    pub fn coding_path(&self) -> &CodingPath {
        &self.state.path
    }

    /// Caller-supplied context.
    pub fn context(&self) -> &'a CodingContext {
        self.context
    }

    fn next_index(&self) -> Result<usize> {
        if self.count >= u32::MAX as usize {
            return Err(CodecError::count_overflow(self.count.saturating_add(1))
                .with_path(&self.state.path));
        }
        Ok(self.count)
    }

    /// Append one element through a fresh traversal root.
    pub fn encode<T: CdrEncode + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.with_element(|encoder| value.encode(encoder))
    }

    /// Append a record element and return its container.
    pub fn nested_keyed_container<R>(&mut self) -> Result<KeyedEncoder<'_>>
    where
        R: CdrType + ?Sized + 'static,
    {
        let record = record_shape(&shape_of::<R>()).map_err(|e| e.with_path(&self.state.path))?;
        self.nested_keyed_container_with(record)
    }

    /// Append a record element with an explicit shape and return its container.
    pub fn nested_keyed_container_with(
        &mut self,
        record: Arc<RecordShape>,
    ) -> Result<KeyedEncoder<'_>> {
        let index = self.next_index()?;
        let restore = self.state.enter(self.options, PathSegment::Index(index))?;
        self.count += 1;
        Ok(KeyedEncoder {
            state: &mut *self.state,
            context: self.context,
            options: self.options,
            record,
            restore,
        })
    }

    /// Append a sequence element and return its container.
    pub fn nested_sequence_container(&mut self) -> Result<SequenceEncoder<'_>> {
        let index = self.next_index()?;
        let restore = self.state.enter(self.options, PathSegment::Index(index))?;
        self.count += 1;
        Ok(SequenceEncoder::open(
            &mut *self.state,
            self.context,
            self.options,
            restore,
        ))
    }

    /// Run `f` on a fresh root for the next element.
    pub(crate) fn with_element<R>(
        &mut self,
        f: impl FnOnce(&mut Encoder<'_>) -> Result<R>,
    ) -> Result<R> {
        let index = self.next_index()?;
        let restore = self.state.enter(self.options, PathSegment::Index(index))?;
        self.count += 1;
        let result = {
            let mut encoder = Encoder::new(&mut *self.state, self.context, self.options);
            f(&mut encoder)
        };
        let result = result.map_err(|e| e.with_path(&self.state.path));
        self.state.path.truncate(restore);
        result
    }

    /// Close the sequence, patching the element count.
    pub fn end(mut self) -> Result<()> {
        self.close()
    }

    fn close(&mut self) -> Result<()> {
        if self.ended {
            return Ok(());
        }
        self.ended = true;
        let count = u32::try_from(self.count).map_err(|_| CodecError::count_overflow(self.count))?;
        self.state
            .writer
            .patch_u32(self.count_position, count)
            .map_err(|e| e.with_path(&self.state.path))
    }
}

impl Drop for SequenceEncoder<'_> {
    fn drop(&mut self) {
        // The count position is always inside the buffer, so this cannot fail.
        let _ = self.close();
        self.state.path.truncate(self.restore);
    }
}
