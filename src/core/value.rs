// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Dynamic value type.
//!
//! [`CdrValue`] is the runtime counterpart of a [`Shape`](crate::Shape): it
//! is what [`decode_value`](crate::decode_value) produces and what
//! [`encode_value`](crate::encode_value) consumes when the record type is not
//! known at compile time. All variants are serde-serializable.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Type alias for a decoded record as field name -> value mapping.
pub type DecodedRecord = HashMap<String, CdrValue>;

/// Untyped CDR value.
///
/// Integer and float variants keep their wire width so that a decoded value
/// re-encodes byte-for-byte against the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CdrValue {
    // Boolean
    Bool(bool),

    // Signed integers
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),

    // Unsigned integers
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),

    // Floating point
    Float32(f32),
    Float64(f64),

    // String (UTF-8)
    String(String),

    // Opaque byte blob
    Bytes(Vec<u8>),

    // Fixed or dynamic array, or a sequence of records
    Array(Vec<CdrValue>),

    // Nested record
    Struct(DecodedRecord),

    /// Absent value. Encodes to nothing.
    Null,
}

impl CdrValue {
    // ========================================================================
    // Type Checking Predicates
    // ========================================================================

    /// Check if this value is a numeric type (integers or floats).
    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Check if this value is an integer type (signed or unsigned).
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            CdrValue::Int8(_)
                | CdrValue::Int16(_)
                | CdrValue::Int32(_)
                | CdrValue::Int64(_)
                | CdrValue::UInt8(_)
                | CdrValue::UInt16(_)
                | CdrValue::UInt32(_)
                | CdrValue::UInt64(_)
        )
    }

    /// Check if this value is a floating-point type.
    pub fn is_float(&self) -> bool {
        matches!(self, CdrValue::Float32(_) | CdrValue::Float64(_))
    }

    /// Check if this value is a container type (array or struct).
    pub fn is_container(&self) -> bool {
        matches!(self, CdrValue::Array(_) | CdrValue::Struct(_))
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, CdrValue::Null)
    }

    // ========================================================================
    // Type Conversion Methods
    // ========================================================================

    /// Widen an integer value to i128.
    ///
    /// Every CDR integer fits, so callers can narrow with `try_from` and
    /// detect values that do not fit their target exactly.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            CdrValue::Int8(v) => Some(i128::from(*v)),
            CdrValue::Int16(v) => Some(i128::from(*v)),
            CdrValue::Int32(v) => Some(i128::from(*v)),
            CdrValue::Int64(v) => Some(i128::from(*v)),
            CdrValue::UInt8(v) => Some(i128::from(*v)),
            CdrValue::UInt16(v) => Some(i128::from(*v)),
            CdrValue::UInt32(v) => Some(i128::from(*v)),
            CdrValue::UInt64(v) => Some(i128::from(*v)),
            _ => None,
        }
    }

    /// Try to convert this value to i64 (for integer types only).
    pub fn as_i64(&self) -> Option<i64> {
        self.as_i128().and_then(|v| i64::try_from(v).ok())
    }

    /// Try to convert this value to u64 (for integer types only).
    pub fn as_u64(&self) -> Option<u64> {
        self.as_i128().and_then(|v| u64::try_from(v).ok())
    }

    /// Try to convert this value to f64 (for numeric values only).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CdrValue::Float32(v) => Some(f64::from(*v)),
            CdrValue::Float64(v) => Some(*v),
            other => other.as_i128().map(|v| v as f64),
        }
    }

    /// Get the boolean value, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CdrValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the string value, if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CdrValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the blob contents, if this is `Bytes`.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            CdrValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Get the field map, if this is a `Struct`.
    pub fn as_struct(&self) -> Option<&DecodedRecord> {
        match self {
            CdrValue::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Get the elements, if this is an `Array`.
    pub fn as_array(&self) -> Option<&[CdrValue]> {
        match self {
            CdrValue::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Look up a field of a `Struct` by name.
    pub fn field(&self, name: &str) -> Option<&CdrValue> {
        self.as_struct().and_then(|s| s.get(name))
    }

    /// Get the type name as a string (for diagnostics).
    pub fn type_name(&self) -> &'static str {
        match self {
            CdrValue::Bool(_) => "bool",
            CdrValue::Int8(_) => "int8",
            CdrValue::Int16(_) => "int16",
            CdrValue::Int32(_) => "int32",
            CdrValue::Int64(_) => "int64",
            CdrValue::UInt8(_) => "uint8",
            CdrValue::UInt16(_) => "uint16",
            CdrValue::UInt32(_) => "uint32",
            CdrValue::UInt64(_) => "uint64",
            CdrValue::Float32(_) => "float32",
            CdrValue::Float64(_) => "float64",
            CdrValue::String(_) => "string",
            CdrValue::Bytes(_) => "bytes",
            CdrValue::Array(_) => "array",
            CdrValue::Struct(_) => "struct",
            CdrValue::Null => "null",
        }
    }

    /// Structural equality that compares floats by bit pattern.
    ///
    /// `PartialEq` follows IEEE-754, so `NaN != NaN` and `0.0 == -0.0`.
    /// Round-trip checks need the exact bits instead.
    pub fn bit_eq(&self, other: &CdrValue) -> bool {
        match (self, other) {
            (CdrValue::Float32(a), CdrValue::Float32(b)) => a.to_bits() == b.to_bits(),
            (CdrValue::Float64(a), CdrValue::Float64(b)) => a.to_bits() == b.to_bits(),
            (CdrValue::Array(a), CdrValue::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.bit_eq(y))
            }
            (CdrValue::Struct(a), CdrValue::Struct(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .all(|(k, v)| b.get(k).is_some_and(|w| v.bit_eq(w)))
            }
            _ => self == other,
        }
    }
}

impl fmt::Display for CdrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CdrValue::Bool(v) => write!(f, "{v}"),
            CdrValue::Int8(v) => write!(f, "{v}"),
            CdrValue::Int16(v) => write!(f, "{v}"),
            CdrValue::Int32(v) => write!(f, "{v}"),
            CdrValue::Int64(v) => write!(f, "{v}"),
            CdrValue::UInt8(v) => write!(f, "{v}"),
            CdrValue::UInt16(v) => write!(f, "{v}"),
            CdrValue::UInt32(v) => write!(f, "{v}"),
            CdrValue::UInt64(v) => write!(f, "{v}"),
            CdrValue::Float32(v) => write!(f, "{v}"),
            CdrValue::Float64(v) => write!(f, "{v}"),
            CdrValue::String(s) => write!(f, "\"{s}\""),
            CdrValue::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            CdrValue::Array(a) => write!(f, "[{} elements]", a.len()),
            CdrValue::Struct(s) => write!(f, "{{{} fields}}", s.len()),
            CdrValue::Null => write!(f, "null"),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for CdrValue {
                fn from(v: $ty) -> Self {
                    CdrValue::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    String => String,
}

impl From<&str> for CdrValue {
    fn from(v: &str) -> Self {
        CdrValue::String(v.to_string())
    }
}

impl From<Vec<CdrValue>> for CdrValue {
    fn from(v: Vec<CdrValue>) -> Self {
        CdrValue::Array(v)
    }
}

impl From<DecodedRecord> for CdrValue {
    fn from(v: DecodedRecord) -> Self {
        CdrValue::Struct(v)
    }
}
