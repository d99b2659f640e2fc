// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Shape descriptors.
//!
//! A [`Shape`] tells the codec how a value is laid out on the wire. Typed
//! values describe themselves through [`CdrType`](crate::CdrType); dynamic
//! values are encoded and decoded against a shape supplied at runtime.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::metadata::{FieldMetadata, FixedArrayMarker};

/// Fixed-width integer kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegerType {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
}

impl IntegerType {
    /// Wire size in bytes, which is also the alignment.
    pub const fn size(self) -> usize {
        match self {
            IntegerType::Int8 | IntegerType::UInt8 => 1,
            IntegerType::Int16 | IntegerType::UInt16 => 2,
            IntegerType::Int32 | IntegerType::UInt32 => 4,
            IntegerType::Int64 | IntegerType::UInt64 => 8,
        }
    }

    /// Check if the type is signed.
    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            IntegerType::Int8 | IntegerType::Int16 | IntegerType::Int32 | IntegerType::Int64
        )
    }

    /// Lowercase type name.
    pub const fn name(self) -> &'static str {
        match self {
            IntegerType::Int8 => "int8",
            IntegerType::Int16 => "int16",
            IntegerType::Int32 => "int32",
            IntegerType::Int64 => "int64",
            IntegerType::UInt8 => "uint8",
            IntegerType::UInt16 => "uint16",
            IntegerType::UInt32 => "uint32",
            IntegerType::UInt64 => "uint64",
        }
    }
}

/// IEEE-754 float kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatType {
    Float32,
    Float64,
}

impl FloatType {
    /// Wire size in bytes, which is also the alignment.
    pub const fn size(self) -> usize {
        match self {
            FloatType::Float32 => 4,
            FloatType::Float64 => 8,
        }
    }

    /// Lowercase type name.
    pub const fn name(self) -> &'static str {
        match self {
            FloatType::Float32 => "float32",
            FloatType::Float64 => "float64",
        }
    }
}

/// Element kinds allowed in fixed and dynamic arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Integer(IntegerType),
    Float(FloatType),
    String,
}

impl ElementType {
    /// Alignment of the array payload.
    ///
    /// String arrays are byte oriented; each string aligns its own count.
    pub const fn alignment(self) -> usize {
        match self {
            ElementType::Integer(t) => t.size(),
            ElementType::Float(t) => t.size(),
            ElementType::String => 1,
        }
    }

    /// Fixed element size, or `None` for strings.
    pub const fn size(self) -> Option<usize> {
        match self {
            ElementType::Integer(t) => Some(t.size()),
            ElementType::Float(t) => Some(t.size()),
            ElementType::String => None,
        }
    }

    /// The element as a standalone shape.
    pub fn to_shape(self) -> Shape {
        match self {
            ElementType::Integer(t) => Shape::Integer(t),
            ElementType::Float(t) => Shape::Float(t),
            ElementType::String => Shape::String,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::Integer(t) => f.write_str(t.name()),
            ElementType::Float(t) => f.write_str(t.name()),
            ElementType::String => f.write_str("string"),
        }
    }
}

/// Wire layout of a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// One byte, 0 or 1.
    Bool,
    /// Self-aligned little-endian integer.
    Integer(IntegerType),
    /// Self-aligned IEEE-754 bit pattern.
    Float(FloatType),
    /// Count (bytes + 1), UTF-8 payload, NUL.
    String,
    /// Count, raw bytes.
    Bytes,
    /// Payload only; the count is known out of band.
    FixedArray(ElementType, usize),
    /// Count, then a bulk payload aligned to the element.
    DynamicArray(ElementType),
    /// Fields in declaration order, no framing.
    Record(Arc<RecordShape>),
    /// Count, then each element through its own traversal root.
    Sequence(Box<Shape>),
}

impl Shape {
    /// Wrap a record shape.
    pub fn record(record: RecordShape) -> Self {
        Shape::Record(Arc::new(record))
    }

    /// Sequence of `element`.
    pub fn sequence(element: Shape) -> Self {
        Shape::Sequence(Box::new(element))
    }

    /// Short name of the shape kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Bool => "bool",
            Shape::Integer(_) => "integer",
            Shape::Float(_) => "float",
            Shape::String => "string",
            Shape::Bytes => "bytes",
            Shape::FixedArray(..) => "fixed array",
            Shape::DynamicArray(_) => "dynamic array",
            Shape::Record(_) => "record",
            Shape::Sequence(_) => "sequence",
        }
    }

    /// Element kind of a fixed or dynamic array.
    pub fn array_element(&self) -> Option<ElementType> {
        match self {
            Shape::FixedArray(element, _) | Shape::DynamicArray(element) => Some(*element),
            _ => None,
        }
    }

    /// The record shape, if this is a record.
    pub fn as_record(&self) -> Option<&Arc<RecordShape>> {
        match self {
            Shape::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Check if a nested keyed or sequence container can be opened for a
    /// value of this shape.
    pub fn can_nest(&self) -> bool {
        matches!(self, Shape::Record(_) | Shape::Sequence(_))
    }

    /// Element shape of an array or sequence.
    fn element_shape(&self) -> Option<Shape> {
        match self {
            Shape::FixedArray(element, _) | Shape::DynamicArray(element) => {
                Some(element.to_shape())
            }
            Shape::Sequence(element) => Some((**element).clone()),
            _ => None,
        }
    }

    /// Check if a value of this shape can fill a field declared as
    /// `declared`.
    ///
    /// Arrays and sequences match on their element; fixed counts are checked
    /// against the field metadata instead. Records match by name, as their
    /// fields are checked when the nested record is traversed. A blob
    /// matches a `uint8` array, which has the same layout.
    pub fn fits(&self, declared: &Shape) -> bool {
        const BYTE_ARRAY: Shape = Shape::DynamicArray(ElementType::Integer(IntegerType::UInt8));
        match (self, declared) {
            (Shape::Record(value), Shape::Record(field)) => {
                Arc::ptr_eq(value, field) || value.name() == field.name()
            }
            (Shape::Bytes, Shape::Bytes) => true,
            (Shape::Bytes, other) | (other, Shape::Bytes) => *other == BYTE_ARRAY,
            _ => match (self.element_shape(), declared.element_shape()) {
                (Some(value), Some(field)) => value.fits(&field),
                (None, None) => self == declared,
                _ => false,
            },
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Bool => f.write_str("bool"),
            Shape::Integer(t) => f.write_str(t.name()),
            Shape::Float(t) => f.write_str(t.name()),
            Shape::String => f.write_str("string"),
            Shape::Bytes => f.write_str("bytes"),
            Shape::FixedArray(element, count) => write!(f, "{element}[{count}]"),
            Shape::DynamicArray(element) => write!(f, "{element}[]"),
            Shape::Record(record) => f.write_str(record.name()),
            Shape::Sequence(element) => write!(f, "sequence<{element}>"),
        }
    }
}

/// One field of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Stable field ordinal
    pub ordinal: u16,
    /// Field name
    pub name: Arc<str>,
    /// Declared shape
    pub shape: Shape,
}

/// Ordered field list of a record plus its fixed-array side table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordShape {
    name: String,
    fields: Vec<FieldDescriptor>,
    #[serde(default, skip_serializing_if = "FieldMetadata::is_empty")]
    metadata: FieldMetadata,
}

impl RecordShape {
    /// Start building a record shape.
    pub fn builder(name: impl Into<String>) -> RecordShapeBuilder {
        RecordShapeBuilder {
            name: name.into(),
            fields: Vec::new(),
            metadata: FieldMetadata::new(),
        }
    }

    /// Record type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a field by ordinal.
    pub fn field(&self, ordinal: u16) -> Option<&FieldDescriptor> {
        // Builder-assigned ordinals equal the index.
        match self.fields.get(usize::from(ordinal)) {
            Some(field) if field.ordinal == ordinal => Some(field),
            _ => self.fields.iter().find(|f| f.ordinal == ordinal),
        }
    }

    /// Look up a field by name.
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| &*f.name == name)
    }

    /// Fixed element count attached to a field ordinal.
    pub fn fixed_count(&self, ordinal: u16) -> Option<usize> {
        self.metadata.fixed_count(ordinal)
    }

    /// The fixed-array side table.
    pub fn metadata(&self) -> &FieldMetadata {
        &self.metadata
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for [`RecordShape`].
///
/// Fields get consecutive ordinals in the order they are added.
///
/// ```
/// use cdrcodec::{ElementType, IntegerType, RecordShape, Shape};
///
/// let shape = RecordShape::builder("Sample")
///     .field("b", Shape::Integer(IntegerType::UInt8))
///     .fixed_field("a", ElementType::Integer(IntegerType::Int32), 1)
///     .build();
/// assert_eq!(shape.fixed_count(1), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct RecordShapeBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
    metadata: FieldMetadata,
}

impl RecordShapeBuilder {
    fn next_ordinal(&self) -> u16 {
        u16::try_from(self.fields.len()).unwrap_or(u16::MAX)
    }

    /// Append a field.
    #[must_use]
    pub fn field(mut self, name: &str, shape: Shape) -> Self {
        let ordinal = self.next_ordinal();
        self.fields.push(FieldDescriptor {
            ordinal,
            name: Arc::from(name),
            shape,
        });
        self
    }

    /// Append an array field that is fixed to `count` elements on the wire.
    ///
    /// The field is declared as a dynamic array and marked in the side table,
    /// the same layout generated message types use.
    #[must_use]
    pub fn fixed_field(self, name: &str, element: ElementType, count: usize) -> Self {
        let ordinal = self.next_ordinal();
        self.field(name, Shape::DynamicArray(element))
            .marker(FixedArrayMarker::new(ordinal, count))
    }

    /// Attach a fixed-array marker to an ordinal.
    #[must_use]
    pub fn marker(mut self, marker: FixedArrayMarker) -> Self {
        self.metadata.insert(marker);
        self
    }

    /// Finish the shape.
    pub fn build(self) -> RecordShape {
        RecordShape {
            name: self.name,
            fields: self.fields,
            metadata: self.metadata,
        }
    }
}
