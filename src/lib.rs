pub mod database;
pub use database::{Config, Db, DbCollection, DbCommon, IdType, JsonPrimitive, MemoryCollection, SchemaCatalog, SchemaDict};

pub mod template;
pub use template::QueryTemplate;

pub mod compiler;
pub use compiler::{ErrorKind, QueryError, Result};

pub mod functions;
pub mod planner;
pub mod executor;

pub mod context;
pub use context::EngineContext;

pub mod interface;
pub use interface::{EngineConfig, QueryRunner, QueryStore, RunOutput, RunStatus};

#[cfg(test)]
pub(crate) mod test_support;
