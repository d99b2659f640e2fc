// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Shape registry.
//!
//! Shapes of typed values are resolved once per Rust type and cached here,
//! so keyed containers do not rebuild field lists on every call.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::encoding::cdr::traits::CdrType;
use crate::schema::Shape;

/// Thread-safe cache of shapes keyed by Rust type.
///
/// Uses RwLock for concurrent read access with exclusive write access.
/// Shapes are immutable once inserted, so a poisoned lock still guards a
/// consistent map and is recovered rather than reported.
pub struct ShapeRegistry {
    inner: RwLock<HashMap<TypeId, Arc<Shape>>>,
}

impl ShapeRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Shape of `T`, described on first use.
    pub fn shape_of<T>(&self) -> Arc<Shape>
    where
        T: CdrType + ?Sized + 'static,
    {
        let key = TypeId::of::<T>();
        if let Some(shape) = self.get(key) {
            return shape;
        }

        // Describe outside the lock: nested types may consult the registry.
        let shape = Arc::new(T::describe_shape());
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(inner.entry(key).or_insert(shape))
    }

    /// Register a shape explicitly, replacing any cached one.
    pub fn register(&self, key: TypeId, shape: Shape) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.insert(key, Arc::new(shape));
    }

    /// Get a cached shape.
    pub fn get(&self, key: TypeId) -> Option<Arc<Shape>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.get(&key).cloned()
    }

    /// Check if a shape is cached.
    pub fn contains(&self, key: TypeId) -> bool {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.contains_key(&key)
    }

    /// Number of cached shapes.
    pub fn len(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all cached shapes.
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.clear();
    }
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_SHAPES: OnceLock<ShapeRegistry> = OnceLock::new();

/// Get the process-wide shape registry.
pub fn global_shapes() -> &'static ShapeRegistry {
    GLOBAL_SHAPES.get_or_init(ShapeRegistry::new)
}

/// Shape of `T` from the process-wide registry.
pub fn shape_of<T>() -> Arc<Shape>
where
    T: CdrType + ?Sized + 'static,
{
    global_shapes().shape_of::<T>()
}
