use crate::database::{Db, SchemaCatalog};
use crate::functions::FunctionRegistry;

/// Everything one compile-and-execute pass needs, passed explicitly into
/// every compiler and executor call.
#[derive(Debug, Clone, Copy)]
pub struct EngineContext<'a> {
    pub db: &'a Db,
    pub catalog: &'a SchemaCatalog,
    pub functions: &'a FunctionRegistry,
}

impl<'a> EngineContext<'a> {
    pub fn new(db: &'a Db, catalog: &'a SchemaCatalog, functions: &'a FunctionRegistry) -> Self {
        Self { db, catalog, functions }
    }
}
