//! Process-wide cache of table descriptors, keyed by entity type.
//!
//! Descriptors are computed on first request and shared afterwards. Failed
//! declarations are not cached, so the error repeats on every request.

use super::table::TableDescriptor;
use crate::error::BuoyError;
use crate::model::Entity;
use once_cell::sync::Lazy;
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

static REGISTRY: Lazy<SchemaRegistry> = Lazy::new(SchemaRegistry::new);

/// Table descriptor for `E` from the global registry
pub fn table_of<E: Entity>() -> Result<Arc<TableDescriptor>, BuoyError> {
    REGISTRY.table_of::<E>()
}

/// Thread-safe map from entity type to its frozen [`TableDescriptor`].
///
/// Concurrent first requests may both build the descriptor; the first one
/// inserted wins and every caller receives that same `Arc`.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    tables: RwLock<HashMap<TypeId, Arc<TableDescriptor>>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table_of<E: Entity>(&self) -> Result<Arc<TableDescriptor>, BuoyError> {
        let key = TypeId::of::<E>();
        if let Some(table) = self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(E::declare().build(short_type_name::<E>())?);
        log::debug!(
            "Registered table '{}' for {} ({} columns)",
            table.name(),
            type_name::<E>(),
            table.columns().len()
        );

        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(tables.entry(key).or_insert(table)))
    }

    /// Number of cached descriptors
    pub fn len(&self) -> usize {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn short_type_name<E>() -> &'static str {
    let full = type_name::<E>();
    full.rsplit("::").next().unwrap_or(full)
}
