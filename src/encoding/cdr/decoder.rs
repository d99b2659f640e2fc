// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Decoding side of the traversal protocol.
//!
//! Mirrors [`encoder`](super::encoder): a [`Decoder`] is a traversal root
//! over a borrowed [`CdrCursor`], and exactly one container is opened on it.
//! Strings and blobs can be read without copying through
//! [`SingleValueDecoder::decode_str`] and [`SingleValueDecoder::decode_bytes`].

use std::sync::Arc;

use tracing::trace;

use crate::core::{shape_of, CodecError, CodecOptions, CodingContext, CodingPath, PathSegment, Result};
use crate::schema::{FieldDescriptor, RecordShape, Shape};

use super::cursor::CdrCursor;
use super::encoder::{
    check_field_shape, field_segment, fixed_marker_mismatch, nesting_unsupported, record_shape,
    ContainerKind,
};
use super::primitive::Primitive;
use super::traits::{CdrDecode, CdrType};
use super::{scalar, sequence};

/// Cursor and coding path shared by every container of one decode call.
#[derive(Debug)]
pub(crate) struct DecodeState<'de> {
    pub(crate) cursor: CdrCursor<'de>,
    pub(crate) path: CodingPath,
}

impl<'de> DecodeState<'de> {
    pub(crate) fn new(cursor: CdrCursor<'de>) -> Self {
        Self {
            cursor,
            path: CodingPath::root(),
        }
    }

    fn enter(&mut self, options: &CodecOptions, segment: PathSegment) -> Result<usize> {
        let depth = self.path.depth();
        if depth >= options.max_depth {
            return Err(CodecError::data_corrupted(format!(
                "Maximum nesting depth {} exceeded",
                options.max_depth
            ))
            .with_path(&self.path));
        }
        self.path.push(segment);
        Ok(depth)
    }

    fn read_sequence_count(&mut self, options: &CodecOptions) -> Result<usize> {
        let count = self.cursor.read_count()?;
        if count > options.max_sequence_length {
            return Err(CodecError::data_corrupted(format!(
                "Sequence count {count} exceeds the limit of {}",
                options.max_sequence_length
            )));
        }
        Ok(count)
    }

    /// Enter `segment` and read a sequence count, leaving the path as it
    /// was on failure.
    fn enter_sequence(&mut self, options: &CodecOptions, segment: PathSegment) -> Result<(usize, usize)> {
        let restore = self.enter(options, segment)?;
        match self.read_sequence_count(options) {
            Ok(count) => Ok((count, restore)),
            Err(e) => {
                let e = e.with_path(&self.path);
                self.path.truncate(restore);
                Err(e)
            }
        }
    }
}

// ============================================================================
// Traversal root
// ============================================================================

/// Traversal root for one value.
///
/// Exactly one container may be opened per root; a second request fails
/// with `DataCorrupted`.
pub struct Decoder<'a, 'de> {
    state: &'a mut DecodeState<'de>,
    context: &'a CodingContext,
    options: &'a CodecOptions,
    opened: Option<ContainerKind>,
}

impl<'a, 'de> Decoder<'a, 'de> {
    pub(crate) fn new(
        state: &'a mut DecodeState<'de>,
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

    /// Options of this decode call.
    pub fn options(&self) -> &'a CodecOptions {
        self.options
    }

    /// The container kind opened on this root, if any.
    pub fn opened(&self) -> Option<ContainerKind> {
        self.opened
    }

    fn open(&mut self, kind: ContainerKind) -> Result<()> {
        if let Some(opened) = self.opened {
            return Err(CodecError::data_corrupted(format!(
                "Cannot open a {kind} container, this value already opened a {opened} container"
            ))
            .with_path(&self.state.path));
        }
        self.opened = Some(kind);
        trace!(
            kind = %kind,
            path = %self.state.path,
            position = self.state.cursor.position(),
            "Opened decode container"
        );
        Ok(())
    }

    /// Open a container for exactly one value.
    pub fn single_value_container(&mut self) -> Result<SingleValueDecoder<'_, 'de>> {
        self.open(ContainerKind::SingleValue)?;
        Ok(SingleValueDecoder {
            state: &mut *self.state,
            context: self.context,
            options: self.options,
            used: false,
        })
    }

    /// Open a record container using the registered shape of `R`.
    pub fn keyed_container<R>(&mut self) -> Result<KeyedDecoder<'_, 'de>>
    where
        R: CdrType + ?Sized + 'static,
    {
        let record = record_shape(&shape_of::<R>()).map_err(|e| e.with_path(&self.state.path))?;
        self.keyed_container_with(record)
    }

    /// Open a record container for an explicit record shape.
    pub fn keyed_container_with(&mut self, record: Arc<RecordShape>) -> Result<KeyedDecoder<'_, 'de>> {
        self.open(ContainerKind::Keyed)?;
        let restore = self.state.path.depth();
        Ok(KeyedDecoder {
            state: &mut *self.state,
            context: self.context,
            options: self.options,
            record,
            restore,
        })
    }

    /// Open a count-prefixed sequence container, reading its count.
    pub fn sequence_container(&mut self) -> Result<SequenceDecoder<'_, 'de>> {
        self.open(ContainerKind::Sequence)?;
        let restore = self.state.path.depth();
        let count = self
            .state
            .read_sequence_count(self.options)
            .map_err(|e| e.with_path(&self.state.path))?;
        Ok(SequenceDecoder::new(
            &mut *self.state,
            self.context,
            self.options,
            count,
            restore,
        ))
    }
}

// ============================================================================
// Single value container
// ============================================================================

/// Container holding exactly one leaf or nested value.
pub struct SingleValueDecoder<'a, 'de> {
    state: &'a mut DecodeState<'de>,
    context: &'a CodingContext,
    options: &'a CodecOptions,
    used: bool,
}

impl<'a, 'de> SingleValueDecoder<'a, 'de> {
    /// Route from the top-level value to this one.
    pub fn coding_path(&self) -> &CodingPath {
        &self.state.path
    }

    /// Caller-supplied context.
    pub fn context(&self) -> &'a CodingContext {
        self.context
    }

    fn begin(&mut self) -> Result<&mut CdrCursor<'de>> {
        if self.used {
            return Err(CodecError::data_corrupted(
                "Single value container already produced its value",
            )
            .with_path(&self.state.path));
        }
        self.used = true;
        Ok(&mut self.state.cursor)
    }

    fn annotate<T>(&self, result: Result<T>) -> Result<T> {
        result.map_err(|e| e.with_path(&self.state.path))
    }

    /// Absent values leave nothing on the wire, so every value reads as nil.
    pub fn decode_nil(&mut self) -> bool {
        true
    }

    /// Read a boolean.
    pub fn decode_bool(&mut self) -> Result<bool> {
        let result = scalar::read_bool(self.begin()?);
        self.annotate(result)
    }

    /// Read an integer or float.
    pub fn decode_scalar<P: Primitive>(&mut self) -> Result<P> {
        let result = scalar::read_scalar(self.begin()?);
        self.annotate(result)
    }

    /// Read a 64-bit unsigned integer into a `usize`.
    pub fn decode_usize(&mut self) -> Result<usize> {
        let result = scalar::read_usize(self.begin()?);
        self.annotate(result)
    }

    /// Read a 64-bit signed integer into an `isize`.
    pub fn decode_isize(&mut self) -> Result<isize> {
        let result = scalar::read_isize(self.begin()?);
        self.annotate(result)
    }

    /// Read a string, borrowing from the input.
    pub fn decode_str(&mut self) -> Result<&'de str> {
        let result = sequence::read_str(self.begin()?);
        self.annotate(result)
    }

    /// Read a string.
    pub fn decode_string(&mut self) -> Result<String> {
        self.decode_str().map(str::to_owned)
    }

    /// Read a byte blob, borrowing from the input.
    pub fn decode_bytes(&mut self) -> Result<&'de [u8]> {
        let result = sequence::read_blob(self.begin()?);
        self.annotate(result)
    }

    /// Read a count-prefixed numeric array in one bulk copy.
    pub fn decode_dynamic_array<P: Primitive>(&mut self) -> Result<Vec<P>> {
        let result = sequence::read_dynamic_array(self.begin()?);
        self.annotate(result)
    }

    /// Read exactly `count` numeric elements.
    pub fn decode_fixed_array<P: Primitive>(&mut self, count: usize) -> Result<Vec<P>> {
        let result = sequence::read_fixed_array(self.begin()?, count);
        self.annotate(result)
    }

    /// Read exactly `count` strings.
    pub fn decode_fixed_strings(&mut self, count: usize) -> Result<Vec<String>> {
        let result = sequence::read_fixed_strings(self.begin()?, count);
        self.annotate(result)
    }

    /// Read a nested value through a fresh traversal root.
    pub fn decode<T: CdrDecode>(&mut self) -> Result<T> {
        self.begin()?;
        let mut root = Decoder::new(&mut *self.state, self.context, self.options);
        T::decode(&mut root)
    }
}

// ============================================================================
// Keyed container
// ============================================================================

/// Record container.
pub struct KeyedDecoder<'a, 'de> {
    state: &'a mut DecodeState<'de>,
    context: &'a CodingContext,
    options: &'a CodecOptions,
    record: Arc<RecordShape>,
    restore: usize,
}

impl<'a, 'de> KeyedDecoder<'a, 'de> {
    /// Shape of the record being read.
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

    /// Check if the record declares a field with this ordinal.
    pub fn contains(&self, ordinal: u16) -> bool {
        self.record.field(ordinal).is_some()
    }

    fn unknown_field(&self, ordinal: u16) -> CodecError {
        CodecError::data_corrupted(format!(
            "Record {} has no field with ordinal {ordinal}",
            self.record.name()
        ))
        .with_path(&self.state.path)
    }

    /// Read one field.
    ///
    /// The shape of `T` must fit the field's declared shape.
    pub fn decode_field<T: CdrDecode + 'static>(&mut self, ordinal: u16) -> Result<T> {
        let shape = shape_of::<T>();
        self.with_field(ordinal, |decoder, field, fixed| {
            check_field_shape(field, &shape)?;
            match fixed {
                Some(count) => T::decode_fixed(decoder, count),
                None => T::decode(decoder),
            }
        })
    }

    /// Absent fields leave nothing on the wire, so every field reads as nil.
    pub fn decode_nil(&mut self, ordinal: u16) -> Result<bool> {
        match self.record.field(ordinal) {
            Some(_) => Ok(true),
            None => Err(self.unknown_field(ordinal)),
        }
    }

    /// Open a record container for a nested record field.
    pub fn nested_keyed_container(&mut self, ordinal: u16) -> Result<KeyedDecoder<'_, 'de>> {
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
        trace!(path = %self.state.path, "Opened nested keyed decode container");
        Ok(KeyedDecoder {
            state: &mut *self.state,
            context: self.context,
            options: self.options,
            record: nested,
            restore,
        })
    }

    /// Open a sequence container for a nested sequence field.
    pub fn nested_sequence_container(&mut self, ordinal: u16) -> Result<SequenceDecoder<'_, 'de>> {
        let record = Arc::clone(&self.record);
        let field = record.field(ordinal).ok_or_else(|| self.unknown_field(ordinal))?;
        if !matches!(field.shape, Shape::Sequence(_)) {
            return Err(
                nesting_unsupported(field, ContainerKind::Sequence).with_path(&self.state.path)
            );
        }
        let (count, restore) = self.state.enter_sequence(self.options, field_segment(field))?;
        trace!(path = %self.state.path, count, "Opened nested sequence decode container");
        Ok(SequenceDecoder::new(
            &mut *self.state,
            self.context,
            self.options,
            count,
            restore,
        ))
    }

    /// Run `f` on a fresh root for one field, with the path extended.
    pub(crate) fn with_field<R>(
        &mut self,
        ordinal: u16,
        f: impl FnOnce(&mut Decoder<'_, 'de>, &FieldDescriptor, Option<usize>) -> Result<R>,
    ) -> Result<R> {
        let record = Arc::clone(&self.record);
        let field = record.field(ordinal).ok_or_else(|| self.unknown_field(ordinal))?;
        let fixed = record.fixed_count(ordinal);

        let restore = self.state.enter(self.options, field_segment(field))?;
        let result = if fixed.is_some() && field.shape.array_element().is_none() {
            Err(fixed_marker_mismatch(field))
        } else {
            let mut decoder = Decoder::new(&mut *self.state, self.context, self.options);
            f(&mut decoder, field, fixed)
        };
        let result = result.map_err(|e| e.with_path(&self.state.path));
        self.state.path.truncate(restore);
        result
    }
}

impl Drop for KeyedDecoder<'_, '_> {
    fn drop(&mut self) {
        self.state.path.truncate(self.restore);
    }
}

// ============================================================================
// Sequence container
// ============================================================================

/// Count-prefixed sequence container.
///
/// The count is read when the container opens; elements are then read one
/// by one until [`is_at_end`](Self::is_at_end).
pub struct SequenceDecoder<'a, 'de> {
    state: &'a mut DecodeState<'de>,
    context: &'a CodingContext,
    options: &'a CodecOptions,
    count: usize,
    index: usize,
    restore: usize,
}

impl<'a, 'de> SequenceDecoder<'a, 'de> {
    fn new(
        state: &'a mut DecodeState<'de>,
        context: &'a CodingContext,
        options: &'a CodecOptions,
        count: usize,
        restore: usize,
    ) -> Self {
        Self {
            state,
            context,
            options,
            count,
            index: 0,
            restore,
        }
    }

    /// Element count read from the wire.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Index of the next element.
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// Check if every element has been read.
    pub fn is_at_end(&self) -> bool {
        self.index >= self.count
    }

    /// Upper bound for preallocating the remaining elements.
    ///
    /// Every element occupies at least one byte, so a corrupt count cannot
    /// reserve more than the input holds.
    pub fn size_hint(&self) -> usize {
        (self.count - self.index.min(self.count)).min(self.state.cursor.remaining())
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
        if self.is_at_end() {
            return Err(CodecError::data_corrupted(format!(
                "Sequence has only {} elements",
                self.count
            ))
            .with_path(&self.state.path));
        }
        Ok(self.index)
    }

    /// Read the next element through a fresh traversal root.
    pub fn decode<T: CdrDecode>(&mut self) -> Result<T> {
        self.with_element(|decoder| T::decode(decoder))
    }

    /// Open a record container for the next element.
    pub fn nested_keyed_container<R>(&mut self) -> Result<KeyedDecoder<'_, 'de>>
    where
        R: CdrType + ?Sized + 'static,
    {
        let record = record_shape(&shape_of::<R>()).map_err(|e| e.with_path(&self.state.path))?;
        self.nested_keyed_container_with(record)
    }

    /// Open a record container with an explicit shape for the next element.
    pub fn nested_keyed_container_with(
        &mut self,
        record: Arc<RecordShape>,
    ) -> Result<KeyedDecoder<'_, 'de>> {
        let index = self.next_index()?;
        let restore = self.state.enter(self.options, PathSegment::Index(index))?;
        self.index += 1;
        Ok(KeyedDecoder {
            state: &mut *self.state,
            context: self.context,
            options: self.options,
            record,
            restore,
        })
    }

    /// Open a sequence container for the next element.
    pub fn nested_sequence_container(&mut self) -> Result<SequenceDecoder<'_, 'de>> {
        let index = self.next_index()?;
        let (count, restore) = self
            .state
            .enter_sequence(self.options, PathSegment::Index(index))?;
        self.index += 1;
        Ok(SequenceDecoder::new(
            &mut *self.state,
            self.context,
            self.options,
            count,
            restore,
        ))
    }

    /// Run `f` on a fresh root for the next element.
    pub(crate) fn with_element<R>(
        &mut self,
        f: impl FnOnce(&mut Decoder<'_, 'de>) -> Result<R>,
    ) -> Result<R> {
        let index = self.next_index()?;
        let restore = self.state.enter(self.options, PathSegment::Index(index))?;
        self.index += 1;
        let result = {
            let mut decoder = Decoder::new(&mut *self.state, self.context, self.options);
            f(&mut decoder)
        };
        let result = result.map_err(|e| e.with_path(&self.state.path));
        self.state.path.truncate(restore);
        result
    }
}

impl Drop for SequenceDecoder<'_, '_> {
    fn drop(&mut self) {
        self.state.path.truncate(self.restore);
    }
}
