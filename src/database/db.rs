use std::sync::{Arc, RwLock};

use indexmap::IndexMap;
use tracing::debug;

use crate::database::{
    Config, DbCollection, InternalMemoryCollection, MemoryCollection, SchemaDict, SchemaProvider, SchemaVersion,
};

/// Shared handle to the in-memory database.
pub type Db = Arc<RwLock<InternalDb>>;

#[derive(Debug, Default)]
pub struct InternalDb {
    config: Config,
    collections: IndexMap<String, MemoryCollection>,
    version: SchemaVersion,
}

impl InternalDb {
    pub fn into_protected(self) -> Db {
        Arc::new(RwLock::new(self))
    }

    pub fn new_db() -> Self {
        Self::new_db_with_config(Config::default())
    }

    pub fn new_db_with_config(config: Config) -> Self {
        Self { config, collections: IndexMap::new(), version: SchemaVersion::default() }
    }

    pub fn create(&mut self, coll_name: &str) -> MemoryCollection {
        self.create_with_config(coll_name, self.config.clone())
    }

    /// Create (or replace) a table whose schema is inferred from its rows.
    pub fn create_with_config(&mut self, coll_name: &str, config: Config) -> MemoryCollection {
        let collection = InternalMemoryCollection::new(coll_name, config, self.version.clone()).into_protected();
        self.register(coll_name, collection)
    }

    /// Create (or replace) a table with a declared schema. Rows written later
    /// still widen it.
    pub fn create_with_schema(&mut self, coll_name: &str, config: Config, schema: SchemaDict) -> MemoryCollection {
        let collection =
            InternalMemoryCollection::with_schema(coll_name, config, schema, self.version.clone()).into_protected();
        self.register(coll_name, collection)
    }

    fn register(&mut self, coll_name: &str, collection: MemoryCollection) -> MemoryCollection {
        self.collections.insert(coll_name.to_string(), Arc::clone(&collection));
        let version = self.version.bump();
        debug!(table = coll_name, version, "table created");
        collection
    }

    pub fn get(&self, coll_name: &str) -> Option<MemoryCollection> {
        self.collections.get(coll_name).map(Arc::clone)
    }

    pub fn drop_table(&mut self, coll_name: &str) -> bool {
        let dropped = self.collections.shift_remove(coll_name).is_some();
        if dropped {
            let version = self.version.bump();
            debug!(table = coll_name, version, "table dropped");
        }
        dropped
    }

    pub fn list_collections(&self) -> Vec<String> {
        self.collections.keys().cloned().collect()
    }

    pub fn schema_version(&self) -> u64 {
        self.version.current()
    }
}

pub trait DbCommon {
    fn new_db() -> Self;
    fn new_db_with_config(config: Config) -> Self;
    fn create(&self, coll_name: &str) -> MemoryCollection;
    fn create_with_config(&self, coll_name: &str, config: Config) -> MemoryCollection;
    fn create_with_schema(&self, coll_name: &str, config: Config, schema: SchemaDict) -> MemoryCollection;
    fn get(&self, coll_name: &str) -> Option<MemoryCollection>;
    fn drop_table(&self, coll_name: &str) -> bool;
    fn list_collections(&self) -> Vec<String>;
}

impl DbCommon for Db {
    fn new_db() -> Self {
        InternalDb::new_db().into_protected()
    }

    fn new_db_with_config(config: Config) -> Self {
        InternalDb::new_db_with_config(config).into_protected()
    }

    fn create(&self, coll_name: &str) -> MemoryCollection {
        self.write().unwrap_or_else(|e| e.into_inner()).create(coll_name)
    }

    fn create_with_config(&self, coll_name: &str, config: Config) -> MemoryCollection {
        self.write().unwrap_or_else(|e| e.into_inner()).create_with_config(coll_name, config)
    }

    fn create_with_schema(&self, coll_name: &str, config: Config, schema: SchemaDict) -> MemoryCollection {
        self.write().unwrap_or_else(|e| e.into_inner()).create_with_schema(coll_name, config, schema)
    }

    fn get(&self, coll_name: &str) -> Option<MemoryCollection> {
        self.read().unwrap_or_else(|e| e.into_inner()).get(coll_name)
    }

    fn drop_table(&self, coll_name: &str) -> bool {
        self.write().unwrap_or_else(|e| e.into_inner()).drop_table(coll_name)
    }

    fn list_collections(&self) -> Vec<String> {
        self.read().unwrap_or_else(|e| e.into_inner()).list_collections()
    }
}

impl SchemaProvider for Db {
    fn schema_of(&self, table: &str) -> Option<SchemaDict> {
        let coll = DbCommon::get(self, table)?;
        Some(coll.schema().unwrap_or_default())
    }

    fn schema_version(&self) -> u64 {
        self.read().unwrap_or_else(|e| e.into_inner()).schema_version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IdType, JsonPrimitive};
    use serde_json::json;

    #[test]
    fn test_create_and_list_in_creation_order() {
        let db = Db::new_db();
        db.create("b");
        db.create("a");
        assert_eq!(db.list_collections(), vec!["b".to_string(), "a".to_string()]);
        assert!(DbCommon::get(&db, "a").is_some());
        assert!(DbCommon::get(&db, "zzz").is_none());
    }

    #[test]
    fn test_default_config_is_inherited() {
        let db = Db::new_db_with_config(Config::int("id"));
        let t = db.create("t");
        assert_eq!(t.get_config().id_type, IdType::Int);
        assert_eq!(t.add(json!({"x": 1})).unwrap()["id"], json!(1));
    }

    #[test]
    fn test_schema_of_reflects_rows_and_empty_tables() {
        let db = Db::new_db_with_config(Config::int("id"));
        let t = db.create("t");
        assert_eq!(db.schema_of("t"), Some(SchemaDict::default()));
        assert_eq!(db.schema_of("missing"), None);

        t.add(json!({"name": "Ana"}));
        let schema = db.schema_of("t").unwrap();
        assert_eq!(schema.get("id").unwrap().ty, JsonPrimitive::Int);
        assert_eq!(schema.get("name").unwrap().ty, JsonPrimitive::String);
    }

    #[test]
    fn test_declared_schema_is_visible_before_rows() {
        let db = Db::new_db();
        db.create_with_schema(
            "users",
            Config::int("id"),
            SchemaDict::declare([("id", JsonPrimitive::Int, false), ("email", JsonPrimitive::String, false)]),
        );
        let schema = db.schema_of("users").unwrap();
        assert_eq!(schema.column_names().collect::<Vec<_>>(), vec!["id", "email"]);
    }

    #[test]
    fn test_version_moves_on_create_drop_and_widening() {
        let db = Db::new_db();
        let v0 = db.schema_version();

        let t = db.create("t");
        let v1 = db.schema_version();
        assert!(v1 > v0);

        t.add(json!({"a": 1}));
        let v2 = db.schema_version();
        assert!(v2 > v1);

        t.add(json!({"a": 2}));
        assert_eq!(db.schema_version(), v2);

        assert!(db.drop_table("t"));
        assert!(db.schema_version() > v2);
        assert!(!db.drop_table("t"));
    }
}
