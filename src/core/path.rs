// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Coding paths for error diagnostics.
//!
//! A [`CodingPath`] records the route from the root value to the leaf that is
//! currently being encoded or decoded. It never influences the wire format.

use std::fmt;
use std::sync::Arc;

/// One step of a coding path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A record field, identified by its ordinal and (when known) its name.
    Field {
        /// Stable field ordinal
        ordinal: u16,
        /// Field name from the record shape
        name: Option<Arc<str>>,
    },
    /// An element of a sequence.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field {
                name: Some(name), ..
            } => write!(f, "{name}"),
            PathSegment::Field { ordinal, name: None } => write!(f, "#{ordinal}"),
            PathSegment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Ordered trail of field identifiers leading to the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CodingPath {
    segments: Vec<PathSegment>,
}

impl CodingPath {
    /// The empty path of a top-level value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Path extended by a record field.
    pub fn field(&self, ordinal: u16, name: Option<Arc<str>>) -> Self {
        self.extended(PathSegment::Field { ordinal, name })
    }

    /// Path extended by a sequence index.
    pub fn index(&self, index: usize) -> Self {
        self.extended(PathSegment::Index(index))
    }

    fn extended(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }

    pub(crate) fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    pub(crate) fn truncate(&mut self, depth: usize) {
        self.segments.truncate(depth);
    }

    /// Check if this is the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The individual segments, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl fmt::Display for CodingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 && !matches!(segment, PathSegment::Index(_)) {
                write!(f, ".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
