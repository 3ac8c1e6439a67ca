use std::{
    fs,
    path::Path,
    sync::{Arc, RwLock},
};

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::{
    compiler::QueryError,
    database::{id_key_of, Config, IdManager, IdType, SchemaDict, SchemaVersion},
};

/// Shared handle to a table.
pub type MemoryCollection = Arc<RwLock<InternalMemoryCollection>>;

/// One in-memory table: rows keyed by id in insertion order, an id generator
/// and the table schema (declared, inferred, or both).
#[derive(Debug)]
pub struct InternalMemoryCollection {
    rows: IndexMap<String, Value>,
    id_manager: IdManager,
    config: Config,
    version: SchemaVersion,
    pub name: String,
    pub schema: Option<SchemaDict>,
}

impl InternalMemoryCollection {
    pub fn new(name: &str, config: Config, version: SchemaVersion) -> Self {
        Self {
            rows: IndexMap::new(),
            id_manager: IdManager::new(config.id_type),
            config,
            version,
            name: name.to_string(),
            schema: None,
        }
    }

    pub fn with_schema(name: &str, config: Config, schema: SchemaDict, version: SchemaVersion) -> Self {
        let mut coll = Self::new(name, config, version);
        coll.schema = Some(schema);
        coll
    }

    pub fn into_protected(self) -> MemoryCollection {
        Arc::new(RwLock::new(self))
    }

    pub fn schema(&self) -> Option<SchemaDict> {
        self.schema.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn ensure_update_schema_for_item(&mut self, item: &Value) {
        let Value::Object(map) = item else { return };
        let changed = match &mut self.schema {
            Some(schema) => schema.merge_schema(map),
            None => {
                self.schema = Some(SchemaDict::infer_schema_from_object(map));
                true
            }
        };
        if changed {
            let version = self.version.bump();
            debug!(table = %self.name, version, "table schema widened");
        }
    }

    pub fn get_all(&self) -> Vec<Value> {
        self.rows.values().cloned().collect()
    }

    pub fn get_paginated(&self, offset: usize, limit: usize) -> Vec<Value> {
        self.rows.values().skip(offset).take(limit).cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<Value> {
        self.rows.get(id).cloned()
    }

    pub fn exists(&self, id: &str) -> bool {
        self.rows.contains_key(id)
    }

    pub fn count(&self) -> usize {
        self.rows.len()
    }

    /// Insert a row. A generated id overwrites whatever the row carried;
    /// with `IdType::None` the row must bring its own id.
    pub fn add(&mut self, item: Value) -> Option<Value> {
        let Value::Object(mut map) = item else { return None };

        let key = match self.id_manager.next() {
            Some(id) => {
                map.insert(self.config.id_key.clone(), id.to_json());
                id.to_string()
            }
            None => id_key_of(map.get(&self.config.id_key)?)?,
        };

        let item = Value::Object(map);
        self.ensure_update_schema_for_item(&item);
        self.rows.insert(key, item.clone());
        Some(item)
    }

    /// Insert rows that already carry their ids. Rows without a usable id are
    /// skipped. Integer sequences continue after the largest id seen.
    pub fn add_batch(&mut self, items: Value) -> Vec<Value> {
        let Value::Array(items) = items else { return Vec::new() };

        let mut added = Vec::with_capacity(items.len());
        for item in items {
            let Some(id) = item.get(&self.config.id_key) else { continue };
            let key = match (self.config.id_type, id) {
                (IdType::Uuid, Value::String(s)) => s.clone(),
                (IdType::Int, Value::Number(n)) if n.is_u64() => n.to_string(),
                (IdType::None, v) => match id_key_of(v) {
                    Some(k) => k,
                    None => continue,
                },
                _ => continue,
            };
            self.id_manager.observe(id);
            self.ensure_update_schema_for_item(&item);
            self.rows.insert(key, item.clone());
            added.push(item);
        }
        added
    }

    /// Replace a row, keeping its stored id.
    pub fn update(&mut self, id: &str, item: Value) -> Option<Value> {
        let stored_id = self.rows.get(id)?.get(&self.config.id_key).cloned()?;
        let Value::Object(mut map) = item else { return None };
        map.insert(self.config.id_key.clone(), stored_id);

        let item = Value::Object(map);
        self.ensure_update_schema_for_item(&item);
        self.rows.insert(id.to_string(), item.clone());
        Some(item)
    }

    /// Overwrite the top-level fields present in `patch`, leaving the others.
    pub fn update_partial(&mut self, id: &str, patch: Map<String, Value>) -> Option<Value> {
        let mut row = self.rows.get(id)?.clone();
        let map = row.as_object_mut()?;
        for (key, value) in patch {
            if key != self.config.id_key {
                map.insert(key, value);
            }
        }

        self.ensure_update_schema_for_item(&row);
        self.rows.insert(id.to_string(), row.clone());
        Some(row)
    }

    pub fn delete(&mut self, id: &str) -> Option<Value> {
        self.rows.shift_remove(id)
    }

    pub fn clear(&mut self) -> usize {
        let count = self.rows.len();
        self.rows.clear();
        count
    }

    pub fn load_from_json(&mut self, json_value: Value, keep: bool) -> Result<Vec<Value>, QueryError> {
        if !json_value.is_array() {
            return Err(QueryError::Storage(format!(
                "data for table '{}' must be a JSON array",
                self.name
            )));
        }
        if !keep {
            self.clear();
        }
        Ok(self.add_batch(json_value))
    }

    pub fn load_from_file(&mut self, file_path: &Path) -> Result<usize, QueryError> {
        let shown = file_path.display();
        let content = fs::read_to_string(file_path)
            .map_err(|e| QueryError::Storage(format!("could not read {shown}: {e}")))?;
        let json_value = serde_json::from_str::<Value>(&content)
            .map_err(|e| QueryError::Storage(format!("{shown} is not valid JSON: {e}")))?;

        let added = self.load_from_json(json_value, false)?.len();
        info!(table = %self.name, rows = added, file = %shown, "loaded table data");
        Ok(added)
    }
}

/// Lock-taking convenience methods on a shared table handle.
pub trait DbCollection {
    fn get_name(&self) -> String;
    fn get_config(&self) -> Config;
    fn schema(&self) -> Option<SchemaDict>;
    fn get_all(&self) -> Vec<Value>;
    fn get_paginated(&self, offset: usize, limit: usize) -> Vec<Value>;
    fn get(&self, id: &str) -> Option<Value>;
    fn exists(&self, id: &str) -> bool;
    fn count(&self) -> usize;
    fn add(&self, item: Value) -> Option<Value>;
    fn add_batch(&self, items: Value) -> Vec<Value>;
    fn update(&self, id: &str, item: Value) -> Option<Value>;
    fn update_partial(&self, id: &str, patch: Map<String, Value>) -> Option<Value>;
    fn delete(&self, id: &str) -> Option<Value>;
    fn clear(&self) -> usize;
    fn load_from_json(&self, json_value: Value, keep: bool) -> Result<Vec<Value>, QueryError>;
    fn load_from_file(&self, file_path: &Path) -> Result<usize, QueryError>;
}

impl DbCollection for MemoryCollection {
    fn get_name(&self) -> String {
        self.read().unwrap_or_else(|e| e.into_inner()).name.clone()
    }

    fn get_config(&self) -> Config {
        self.read().unwrap_or_else(|e| e.into_inner()).config.clone()
    }

    fn schema(&self) -> Option<SchemaDict> {
        self.read().unwrap_or_else(|e| e.into_inner()).schema()
    }

    fn get_all(&self) -> Vec<Value> {
        self.read().unwrap_or_else(|e| e.into_inner()).get_all()
    }

    fn get_paginated(&self, offset: usize, limit: usize) -> Vec<Value> {
        self.read().unwrap_or_else(|e| e.into_inner()).get_paginated(offset, limit)
    }

    fn get(&self, id: &str) -> Option<Value> {
        self.read().unwrap_or_else(|e| e.into_inner()).get(id)
    }

    fn exists(&self, id: &str) -> bool {
        self.read().unwrap_or_else(|e| e.into_inner()).exists(id)
    }

    fn count(&self) -> usize {
        self.read().unwrap_or_else(|e| e.into_inner()).count()
    }

    fn add(&self, item: Value) -> Option<Value> {
        self.write().unwrap_or_else(|e| e.into_inner()).add(item)
    }

    fn add_batch(&self, items: Value) -> Vec<Value> {
        self.write().unwrap_or_else(|e| e.into_inner()).add_batch(items)
    }

    fn update(&self, id: &str, item: Value) -> Option<Value> {
        self.write().unwrap_or_else(|e| e.into_inner()).update(id, item)
    }

    fn update_partial(&self, id: &str, patch: Map<String, Value>) -> Option<Value> {
        self.write().unwrap_or_else(|e| e.into_inner()).update_partial(id, patch)
    }

    fn delete(&self, id: &str) -> Option<Value> {
        self.write().unwrap_or_else(|e| e.into_inner()).delete(id)
    }

    fn clear(&self) -> usize {
        self.write().unwrap_or_else(|e| e.into_inner()).clear()
    }

    fn load_from_json(&self, json_value: Value, keep: bool) -> Result<Vec<Value>, QueryError> {
        self.write().unwrap_or_else(|e| e.into_inner()).load_from_json(json_value, keep)
    }

    fn load_from_file(&self, file_path: &Path) -> Result<usize, QueryError> {
        self.write().unwrap_or_else(|e| e.into_inner()).load_from_file(file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JsonPrimitive;
    use serde_json::json;
    use std::io::Write;

    fn int_collection() -> InternalMemoryCollection {
        InternalMemoryCollection::new("people", Config::int("id"), SchemaVersion::default())
    }

    #[test]
    fn test_add_assigns_numeric_ids_in_order() {
        let mut c = int_collection();
        c.add(json!({"name": "Ana"}));
        c.add(json!({"name": "Bob"}));

        let all = c.get_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0]["id"], json!(1));
        assert_eq!(all[1]["id"], json!(2));
        assert_eq!(c.get("2").unwrap()["name"], "Bob");
    }

    #[test]
    fn test_add_rejects_non_objects() {
        let mut c = int_collection();
        assert!(c.add(json!([1, 2])).is_none());
        assert_eq!(c.count(), 0);
    }

    #[test]
    fn test_none_ids_come_from_the_row() {
        let mut c = InternalMemoryCollection::new("t", Config::none("code"), SchemaVersion::default());
        assert!(c.add(json!({"name": "no code"})).is_none());
        c.add(json!({"code": "x1", "name": "ok"}));
        assert!(c.exists("x1"));
    }

    #[test]
    fn test_uuid_ids_are_strings() {
        let mut c = InternalMemoryCollection::new("t", Config::uuid("id"), SchemaVersion::default());
        let row = c.add(json!({"a": 1})).unwrap();
        assert!(row["id"].is_string());
        assert_eq!(c.schema().unwrap().get("id").unwrap().ty, JsonPrimitive::String);
    }

    #[test]
    fn test_add_batch_continues_sequence() {
        let mut c = int_collection();
        let added = c.add_batch(json!([
            {"id": 3, "name": "a"},
            {"id": 7, "name": "b"},
            {"name": "missing id"},
            "not an object"
        ]));
        assert_eq!(added.len(), 2);

        let next = c.add(json!({"name": "c"})).unwrap();
        assert_eq!(next["id"], json!(8));
    }

    #[test]
    fn test_schema_changes_bump_version() {
        let version = SchemaVersion::default();
        let mut c = InternalMemoryCollection::new("t", Config::int("id"), version.clone());

        c.add(json!({"name": "a"}));
        let after_first = version.current();
        assert!(after_first > 0);

        c.add(json!({"name": "b"}));
        assert_eq!(version.current(), after_first);

        c.add(json!({"name": "c", "age": 3}));
        assert!(version.current() > after_first);
    }

    #[test]
    fn test_update_keeps_stored_id() {
        let mut c = int_collection();
        c.add(json!({"name": "Ana"}));
        let row = c.update("1", json!({"id": 99, "name": "Ana Maria"})).unwrap();
        assert_eq!(row["id"], json!(1));
        assert_eq!(c.get("1").unwrap()["name"], "Ana Maria");
        assert!(c.update("42", json!({"name": "x"})).is_none());
    }

    #[test]
    fn test_update_partial_is_shallow() {
        let mut c = int_collection();
        c.add(json!({"name": "Ana", "meta": {"a": 1, "b": 2}}));

        let mut patch = Map::new();
        patch.insert("meta".into(), json!({"c": 3}));
        let row = c.update_partial("1", patch).unwrap();

        assert_eq!(row["name"], "Ana");
        assert_eq!(row["meta"], json!({"c": 3}));
    }

    #[test]
    fn test_delete_keeps_order_of_remaining() {
        let mut c = int_collection();
        for n in ["a", "b", "c"] {
            c.add(json!({"name": n}));
        }
        assert!(c.delete("2").is_some());
        let names: Vec<_> = c.get_all().iter().map(|r| r["name"].clone()).collect();
        assert_eq!(names, vec![json!("a"), json!("c")]);
        assert_eq!(c.get_paginated(1, 5).len(), 1);
    }

    #[test]
    fn test_load_from_json_requires_array() {
        let mut c = int_collection();
        assert!(matches!(c.load_from_json(json!({"id": 1}), false), Err(QueryError::Storage(_))));

        c.add(json!({"name": "old"}));
        let added = c.load_from_json(json!([{"id": 10, "name": "new"}]), false).unwrap();
        assert_eq!(added.len(), 1);
        assert_eq!(c.count(), 1);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": 1, "name": "a"}}, {{"id": 2, "name": "b"}}]"#).unwrap();

        let handle = int_collection().into_protected();
        assert_eq!(handle.load_from_file(file.path()).unwrap(), 2);
        assert_eq!(handle.count(), 2);
    }

    #[test]
    fn test_load_from_file_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let handle = int_collection().into_protected();
        let err = handle.load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }
}
