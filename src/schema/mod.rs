// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Shape descriptors and fixed-array field metadata.

pub mod metadata;
pub mod shape;

pub use metadata::{ordinal_of, FieldMetadata, FixedArrayMarker};
pub use shape::{
    ElementType, FieldDescriptor, FloatType, IntegerType, RecordShape, RecordShapeBuilder, Shape,
};
