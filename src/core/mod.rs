// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout cdrcodec.
//!
//! This module provides the foundational types for the library:
//! - [`CodecError`] - Error taxonomy with coding paths
//! - [`CdrValue`] - Untyped value representation
//! - [`ShapeRegistry`] - Per-type shape cache
//! - [`CodecOptions`] / [`CodingContext`] - Caller configuration

pub mod context;
pub mod error;
pub mod options;
pub mod path;
pub mod registry;
pub mod value;

pub use context::CodingContext;
pub use error::{CodecError, ErrorKind, Result};
pub use options::CodecOptions;
pub use path::{CodingPath, PathSegment};
pub use registry::{global_shapes, shape_of, ShapeRegistry};
pub use value::{CdrValue, DecodedRecord};
