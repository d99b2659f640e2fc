// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for cdrcodec.
//!
//! Every failure of an encode or decode call is one of four kinds:
//! - [`CodecError::UnexpectedEndOfData`] - a read would run past the buffer
//! - [`CodecError::DataCorrupted`] - bytes of valid length violate a content rule
//! - [`CodecError::TypeMismatch`] - declared shape and actual content disagree
//! - [`CodecError::InvalidValue`] - a value cannot be represented on the wire
//!
//! Errors carry the [`CodingPath`] of the innermost value that failed.

use super::path::CodingPath;

/// Coarse classification of a [`CodecError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A read would exceed the buffer bounds.
    UnexpectedEndOfData,
    /// Content constraint violated.
    DataCorrupted,
    /// Shape and content disagree.
    TypeMismatch,
    /// Value not representable on the wire.
    InvalidValue,
    /// Invalid codec options.
    Config,
}

/// Errors that can occur while encoding or decoding CDR data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    /// Buffer too short for the requested read
    #[error(
        "Unexpected end of data at {path}: requested {requested} bytes at position {position}, but only {available} bytes available"
    )]
    UnexpectedEndOfData {
        /// Requested bytes
        requested: usize,
        /// Available bytes
        available: usize,
        /// Cursor position when the error occurred
        position: usize,
        /// Coding path of the failing value
        path: CodingPath,
    },

    /// Structurally valid-length bytes that fail a content constraint
    #[error("Data corrupted at {path}: {message}")]
    DataCorrupted {
        /// Error message
        message: String,
        /// Coding path of the failing value
        path: CodingPath,
    },

    /// Declared shape and actual wire/value content disagree
    #[error("Type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        /// What the shape declared
        expected: String,
        /// What was actually present
        found: String,
        /// Coding path of the failing value
        path: CodingPath,
    },

    /// A count, length or value that cannot be represented in its wire field
    #[error("Invalid value at {path}: {message}")]
    InvalidValue {
        /// Error message
        message: String,
        /// Coding path of the failing value
        path: CodingPath,
    },

    /// Invalid codec configuration
    #[error("Invalid configuration: {message}")]
    Config {
        /// Error message
        message: String,
    },
}

impl CodecError {
    /// Create an unexpected end of data error.
    pub fn unexpected_end(requested: usize, available: usize, position: usize) -> Self {
        CodecError::UnexpectedEndOfData {
            requested,
            available,
            position,
            path: CodingPath::root(),
        }
    }

    /// Create a data corrupted error.
    pub fn data_corrupted(message: impl Into<String>) -> Self {
        CodecError::DataCorrupted {
            message: message.into(),
            path: CodingPath::root(),
        }
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        CodecError::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
            path: CodingPath::root(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(message: impl Into<String>) -> Self {
        CodecError::InvalidValue {
            message: message.into(),
            path: CodingPath::root(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        CodecError::Config {
            message: message.into(),
        }
    }

    /// Error for a count that does not fit a 4-byte wire field.
    pub fn count_overflow(count: usize) -> Self {
        Self::invalid_value(format!("Cannot encode data of length {count}"))
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::UnexpectedEndOfData { .. } => ErrorKind::UnexpectedEndOfData,
            CodecError::DataCorrupted { .. } => ErrorKind::DataCorrupted,
            CodecError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            CodecError::InvalidValue { .. } => ErrorKind::InvalidValue,
            CodecError::Config { .. } => ErrorKind::Config,
        }
    }

    /// Coding path attached to this error, if any.
    pub fn path(&self) -> Option<&CodingPath> {
        match self {
            CodecError::UnexpectedEndOfData { path, .. }
            | CodecError::DataCorrupted { path, .. }
            | CodecError::TypeMismatch { path, .. }
            | CodecError::InvalidValue { path, .. } => Some(path),
            CodecError::Config { .. } => None,
        }
    }

    /// Attach a coding path unless a deeper one is already recorded.
    #[must_use]
    pub fn with_path(mut self, at: &CodingPath) -> Self {
        match &mut self {
            CodecError::UnexpectedEndOfData { path, .. }
            | CodecError::DataCorrupted { path, .. }
            | CodecError::TypeMismatch { path, .. }
            | CodecError::InvalidValue { path, .. } => {
                if path.depth() < at.depth() {
                    *path = at.clone();
                }
            }
            CodecError::Config { .. } => {}
        }
        self
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = match self {
            CodecError::UnexpectedEndOfData {
                requested,
                available,
                position,
                ..
            } => vec![
                ("requested", requested.to_string()),
                ("available", available.to_string()),
                ("position", position.to_string()),
            ],
            CodecError::DataCorrupted { message, .. }
            | CodecError::InvalidValue { message, .. }
            | CodecError::Config { message } => vec![("message", message.clone())],
            CodecError::TypeMismatch {
                expected, found, ..
            } => vec![("expected", expected.clone()), ("found", found.clone())],
        };
        if let Some(path) = self.path() {
            fields.push(("path", path.to_string()));
        }
        fields
    }
}

/// Result type for cdrcodec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
