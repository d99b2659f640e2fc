// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Codec options.
//!
//! Options can be built in code or loaded from TOML:
//!
//! ```
//! use cdrcodec::CodecOptions;
//!
//! let options = CodecOptions::from_toml_str("max_depth = 16").unwrap();
//! assert_eq!(options.max_depth, 16);
//! assert_eq!(options.initial_capacity, 64);
//! ```

use serde::{Deserialize, Serialize};

use super::error::{CodecError, Result};

/// Default minimum encode buffer reservation.
pub const DEFAULT_INITIAL_CAPACITY: usize = 64;

/// Default maximum nesting depth of traversal roots.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Default upper bound on decoded record sequence counts.
pub const DEFAULT_MAX_SEQUENCE_LENGTH: usize = 10_000_000;

/// Tunables shared by encoders and decoders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecOptions {
    /// Minimum number of bytes reserved for an encode buffer.
    pub initial_capacity: usize,
    /// Maximum nesting depth of records and sequences.
    pub max_depth: usize,
    /// Maximum element count accepted for a decoded record sequence.
    pub max_sequence_length: usize,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
        }
    }
}

impl CodecOptions {
    /// Parse options from a TOML document and validate them.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let options: CodecOptions =
            toml::from_str(text).map_err(|e| CodecError::config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Check that all limits are usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(CodecError::config("max_depth must be non-zero"));
        }
        if self.max_sequence_length == 0 {
            return Err(CodecError::config("max_sequence_length must be non-zero"));
        }
        Ok(())
    }

    /// Builder-style setter for `max_depth`.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Builder-style setter for `max_sequence_length`.
    #[must_use]
    pub fn with_max_sequence_length(mut self, max_sequence_length: usize) -> Self {
        self.max_sequence_length = max_sequence_length;
        self
    }

    /// Buffer reservation for encoding a value occupying `value_size` bytes
    /// in memory.
    pub(crate) fn encode_capacity(&self, value_size: usize) -> usize {
        let estimate = value_size
            .saturating_add(value_size / 10)
            .saturating_add(8);
        estimate.max(self.initial_capacity)
    }
}
