use std::sync::Arc;

use indexmap::IndexMap;

use crate::compiler::{QueryError, Result};
use crate::database::TableDescriptor;
use crate::functions::FunctionRegistry;
use crate::template::TableReference;

/// A table usage bound to its reflected descriptor. Two usages of one
/// physical table under different aliases are distinct `ResolvedTable`s.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTable {
    pub key: String,
    pub reference: TableReference,
    pub descriptor: Arc<TableDescriptor>,
}

impl ResolvedTable {
    pub fn name(&self) -> &str {
        &self.reference.name
    }

    pub fn is_aliased(&self) -> bool {
        self.reference.alias.is_some()
    }
}

/// The resolved table map shared by every clause compiler of one template.
pub struct CompileContext<'a> {
    tables: IndexMap<String, ResolvedTable>,
    functions: &'a FunctionRegistry,
}

impl<'a> CompileContext<'a> {
    pub fn new(tables: IndexMap<String, ResolvedTable>, functions: &'a FunctionRegistry) -> Self {
        Self { tables, functions }
    }

    /// Look up a reference by its key.
    pub fn table(&self, reference: &TableReference) -> Result<&ResolvedTable> {
        self.tables.get(reference.key()).ok_or_else(|| QueryError::UndeclaredTable(reference.key().to_string()))
    }

    pub fn tables(&self) -> impl Iterator<Item = &ResolvedTable> {
        self.tables.values()
    }

    pub fn functions(&self) -> &'a FunctionRegistry {
        self.functions
    }
}
