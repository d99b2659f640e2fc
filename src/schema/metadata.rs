// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Fixed-array field metadata.
//!
//! The wire format omits the element count of fixed-size arrays, so a field
//! that is "an array of exactly N elements" must be told apart from a dynamic
//! array out of band. A [`FieldMetadata`] table maps field ordinals to their
//! fixed element counts and travels with the [`RecordShape`](super::RecordShape).
//!
//! Generated code for other CDR stacks packs the same information into a
//! single integer key, `element_count << 16 | ordinal`. [`FixedArrayMarker`]
//! converts between both forms.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Number of low bits of a packed key that hold the field ordinal.
pub const ORDINAL_BITS: u32 = 16;

const ORDINAL_MASK: u64 = (1 << ORDINAL_BITS) - 1;

/// Marks a field as a fixed-size array of `element_count` elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixedArrayMarker {
    /// Ordinal of the marked field
    pub ordinal: u16,
    /// Exact number of elements on the wire
    pub element_count: usize,
}

impl FixedArrayMarker {
    /// Create a marker.
    pub const fn new(ordinal: u16, element_count: usize) -> Self {
        Self {
            ordinal,
            element_count,
        }
    }

    /// Decode a packed key.
    ///
    /// Returns `None` for a key whose count bits are zero, which is a plain
    /// field ordinal rather than a marker.
    ///
    /// ```
    /// use cdrcodec::FixedArrayMarker;
    ///
    /// let marker = FixedArrayMarker::from_packed(0x9_0005).unwrap();
    /// assert_eq!(marker.ordinal, 5);
    /// assert_eq!(marker.element_count, 9);
    /// assert!(FixedArrayMarker::from_packed(5).is_none());
    /// ```
    pub fn from_packed(key: u64) -> Option<Self> {
        let count = key >> ORDINAL_BITS;
        if count == 0 {
            return None;
        }
        Some(Self {
            ordinal: (key & ORDINAL_MASK) as u16,
            element_count: usize::try_from(count).ok()?,
        })
    }

    /// Encode as a packed key.
    pub fn packed(&self) -> u64 {
        ((self.element_count as u64) << ORDINAL_BITS) | u64::from(self.ordinal)
    }
}

/// Field ordinal component of a packed key, marker or not.
pub fn ordinal_of(key: u64) -> u16 {
    (key & ORDINAL_MASK) as u16
}

/// Side table of fixed-array markers, keyed by field ordinal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMetadata {
    fixed: BTreeMap<u16, usize>,
}

impl FieldMetadata {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a marker, replacing any earlier one for the same ordinal.
    pub fn insert(&mut self, marker: FixedArrayMarker) {
        self.fixed.insert(marker.ordinal, marker.element_count);
    }

    /// Fixed element count of a field, or `None` for a dynamic field.
    pub fn fixed_count(&self, ordinal: u16) -> Option<usize> {
        self.fixed.get(&ordinal).copied()
    }

    /// Iterate over all markers in ordinal order.
    pub fn markers(&self) -> impl Iterator<Item = FixedArrayMarker> + '_ {
        self.fixed
            .iter()
            .map(|(&ordinal, &element_count)| FixedArrayMarker::new(ordinal, element_count))
    }

    /// Number of markers.
    pub fn len(&self) -> usize {
        self.fixed.len()
    }

    /// Check if no field is marked.
    pub fn is_empty(&self) -> bool {
        self.fixed.is_empty()
    }

    /// Build a table from packed keys, skipping keys that carry no count.
    pub fn from_packed_keys<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        keys.into_iter()
            .filter_map(FixedArrayMarker::from_packed)
            .collect()
    }
}

impl FromIterator<FixedArrayMarker> for FieldMetadata {
    fn from_iter<I: IntoIterator<Item = FixedArrayMarker>>(iter: I) -> Self {
        let mut metadata = FieldMetadata::new();
        for marker in iter {
            metadata.insert(marker);
        }
        metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_camera_info_keys() {
        // K, R and P of a camera calibration message.
        let k = FixedArrayMarker::from_packed(0x9_0005).unwrap();
        let r = FixedArrayMarker::from_packed(0x9_0006).unwrap();
        let p = FixedArrayMarker::from_packed(0xc_0007).unwrap();

        assert_eq!(k, FixedArrayMarker::new(5, 9));
        assert_eq!(r, FixedArrayMarker::new(6, 9));
        assert_eq!(p, FixedArrayMarker::new(7, 12));
        assert_eq!(p.packed(), 0xc_0007);
    }

    #[test]
    fn test_plain_ordinal_is_not_a_marker() {
        assert!(FixedArrayMarker::from_packed(0).is_none());
        assert!(FixedArrayMarker::from_packed(0xffff).is_none());
        assert_eq!(ordinal_of(0xffff), 0xffff);
        assert_eq!(ordinal_of(0x1_0001), 1);
    }

    #[test]
    fn test_metadata_lookup() {
        let metadata = FieldMetadata::from_packed_keys([0, 0x1_0001, 2, 0x3_0004]);
        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata.fixed_count(1), Some(1));
        assert_eq!(metadata.fixed_count(4), Some(3));
        assert_eq!(metadata.fixed_count(0), None);
        assert_eq!(metadata.fixed_count(2), None);

        let markers: Vec<_> = metadata.markers().collect();
        assert_eq!(
            markers,
            vec![FixedArrayMarker::new(1, 1), FixedArrayMarker::new(4, 3)]
        );
    }

    #[test]
    fn test_insert_replaces() {
        let mut metadata = FieldMetadata::new();
        assert!(metadata.is_empty());
        metadata.insert(FixedArrayMarker::new(3, 4));
        metadata.insert(FixedArrayMarker::new(3, 9));
        assert_eq!(metadata.fixed_count(3), Some(9));
        assert_eq!(metadata.len(), 1);
    }

    #[test]
    fn test_serde_transparent() {
        let metadata: FieldMetadata = [FixedArrayMarker::new(5, 9)].into_iter().collect();
        let json = serde_json::to_string(&metadata).unwrap();
        assert_eq!(json, r#"{"5":9}"#);
        let back: FieldMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, metadata);
    }
}
