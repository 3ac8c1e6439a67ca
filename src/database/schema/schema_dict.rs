use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::database::FieldInfo;
use crate::JsonPrimitive;

/// The column layout of one table, keyed by column name in first-seen order.
///
/// A schema is either declared up front or inferred from the rows written to
/// a table; inferred schemas widen as new rows arrive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDict {
    pub fields: IndexMap<String, FieldInfo>,
}

impl SchemaDict {
    /// Declare a schema from `(column, type, nullable)` triples.
    pub fn declare<'a, I>(columns: I) -> SchemaDict
    where
        I: IntoIterator<Item = (&'a str, JsonPrimitive, bool)>,
    {
        let fields = columns
            .into_iter()
            .map(|(name, ty, nullable)| (name.to_string(), FieldInfo::new(ty, nullable)))
            .collect();
        SchemaDict { fields }
    }

    pub fn get(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.get(name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn infer_schema_from_object(obj: &Map<String, Value>) -> SchemaDict {
        let fields = obj
            .iter()
            .map(|(k, v)| (k.clone(), FieldInfo::infer_field_info(v)))
            .collect();
        SchemaDict { fields }
    }

    /// Merge a row into the schema. Columns missing from the row become
    /// nullable, new columns are appended and types are widened.
    ///
    /// Returns `true` when the schema changed.
    pub fn merge_schema(&mut self, obj: &Map<String, Value>) -> bool {
        let before = self.clone();

        for (key, field_info) in self.fields.iter_mut() {
            if !obj.contains_key(key) {
                field_info.nullable = true;
            }
        }

        for (key, value) in obj {
            let new_info = FieldInfo::infer_field_info(value);
            match self.fields.get_mut(key) {
                Some(old) => *old = old.merge_field_info(&new_info),
                None => {
                    self.fields.insert(key.clone(), new_info);
                }
            }
        }

        *self != before
    }
}
