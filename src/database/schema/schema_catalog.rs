use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use indexmap::IndexMap;
use tracing::debug;

use crate::database::{FieldInfo, SchemaDict, SchemaProvider};

/// Reflected metadata of one table: its real name and its columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    pub name: String,
    pub columns: IndexMap<String, FieldInfo>,
}

impl TableDescriptor {
    pub fn new(name: &str, schema: &SchemaDict) -> Self {
        Self { name: name.to_string(), columns: schema.fields.clone() }
    }

    pub fn column(&self, name: &str) -> Option<&FieldInfo> {
        self.columns.get(name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.keys().cloned().collect()
    }
}

#[derive(Debug, Default)]
struct CatalogState {
    version: Option<u64>,
    tables: HashMap<String, Arc<TableDescriptor>>,
}

/// Cache of reflected table descriptors.
///
/// Descriptors are built lazily from a [`SchemaProvider`] and shared as
/// `Arc`s. The whole cache is dropped as soon as the provider reports a new
/// schema version, so a run never compiles against stale metadata.
#[derive(Debug, Default)]
pub struct SchemaCatalog {
    state: RwLock<CatalogState>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a table by its real name. `None` when the table does not exist.
    pub fn describe(&self, provider: &dyn SchemaProvider, table: &str) -> Option<Arc<TableDescriptor>> {
        let version = provider.schema_version();
        {
            let state = self.state.read().unwrap_or_else(|e| e.into_inner());
            if state.version == Some(version) {
                if let Some(found) = state.tables.get(table) {
                    return Some(Arc::clone(found));
                }
            }
        }

        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if state.version != Some(version) {
            if state.version.is_some() {
                debug!(from = ?state.version, to = version, "schema changed, dropping cached descriptors");
            }
            state.tables.clear();
            state.version = Some(version);
        }

        let schema = provider.schema_of(table)?;
        let descriptor = Arc::new(TableDescriptor::new(table, &schema));
        state.tables.insert(table.to_string(), Arc::clone(&descriptor));
        Some(descriptor)
    }

    /// Forget every cached descriptor.
    pub fn invalidate(&self) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.tables.clear();
        state.version = None;
    }

    pub fn cached_tables(&self) -> usize {
        self.state.read().unwrap_or_else(|e| e.into_inner()).tables.len()
    }
}
