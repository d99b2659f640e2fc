// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CDR (Common Data Representation) module.
//!
//! Layered bottom-up:
//! - [`cursor`] - aligned byte reads and writes
//! - [`scalar`] / [`sequence`] - leaf and counted layouts
//! - [`encoder`] / [`decoder`] - traversal roots and containers
//! - [`traits`] - typed values on top of the containers
//! - `dynamic` - [`CdrValue`](crate::CdrValue)s against runtime shapes
//! - [`codec`] - top-level entry points

pub mod codec;
pub mod cursor;
pub mod decoder;
pub(crate) mod dynamic;
pub mod encoder;
pub mod primitive;
pub mod scalar;
pub mod sequence;
pub mod traits;

pub use codec::{CdrCodec, CdrDecoder, CdrEncoder};
pub use cursor::{CdrCursor, CdrWriter, COUNT_SIZE, FINAL_ALIGNMENT};
pub use decoder::{Decoder, KeyedDecoder, SequenceDecoder, SingleValueDecoder};
pub use encoder::{ContainerKind, Encoder, KeyedEncoder, SequenceEncoder, SingleValueEncoder};
pub use primitive::Primitive;
pub use traits::{ArrayElement, Bytes, CdrDecode, CdrEncode, CdrType};
