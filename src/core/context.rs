// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Caller-supplied coding context.
//!
//! The codec never interprets these entries. They are handed unchanged to
//! every container so that hand-written `CdrEncode`/`CdrDecode` impls can
//! read custom settings during traversal.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Opaque key-value map passed through to every container.
#[derive(Clone, Default)]
pub struct CodingContext {
    entries: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl CodingContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any previous value under the same key.
    pub fn insert<T>(&mut self, key: impl Into<String>, value: T)
    where
        T: Any + Send + Sync,
    {
        self.entries.insert(key.into(), Arc::new(value));
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with<T>(mut self, key: impl Into<String>, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        self.insert(key, value);
        self
    }

    /// Look up an entry of the given type.
    ///
    /// Returns `None` if the key is absent or holds a value of another type.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.entries.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    /// Check whether a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove an entry.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the context is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for CodingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.entries.keys().collect();
        keys.sort();
        f.debug_struct("CodingContext").field("keys", &keys).finish()
    }
}
