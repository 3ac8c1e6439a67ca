use serde::{ser::SerializeStruct, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::compiler::{QueryError, Result};
use crate::template::Comparison;

/// A recursive boolean filter: a single comparison, or an `and` / `or`
/// group of nested clauses.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterClause {
    Comparison(Comparison),
    And(Vec<FilterClause>),
    Or(Vec<FilterClause>),
}

fn shape_error() -> QueryError {
    QueryError::validation("filter clause not in the correct format")
}

fn has_exactly(map: &Map<String, Value>, keys: &[&str]) -> bool {
    map.len() == keys.len() && keys.iter().all(|k| map.contains_key(*k))
}

impl FilterClause {
    /// Classify a JSON object by its exact key set.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut map) = value else { return Err(shape_error()) };

        if has_exactly(&map, &["left", "comparator", "right"]) {
            let cmp: Comparison = serde_json::from_value(Value::Object(map))?;
            return Ok(FilterClause::Comparison(cmp));
        }

        if !has_exactly(&map, &["type", "filters"]) {
            return Err(shape_error());
        }

        let is_and = match map.get("type").and_then(Value::as_str).map(str::to_ascii_lowercase).as_deref() {
            Some("and") => true,
            Some("or") => false,
            _ => return Err(QueryError::validation("filter clause type must be 'and' or 'or'")),
        };
        let Some(Value::Array(children)) = map.remove("filters") else {
            return Err(shape_error());
        };
        let children = children.into_iter().map(FilterClause::from_value).collect::<Result<Vec<_>>>()?;

        Ok(if is_and { FilterClause::And(children) } else { FilterClause::Or(children) })
    }

    /// Depth-first walk over every comparison leaf.
    pub fn comparisons(&self) -> Vec<&Comparison> {
        let mut out = Vec::new();
        self.collect_comparisons(&mut out);
        out
    }

    fn collect_comparisons<'a>(&'a self, out: &mut Vec<&'a Comparison>) {
        match self {
            FilterClause::Comparison(c) => out.push(c),
            FilterClause::And(children) | FilterClause::Or(children) => {
                children.iter().for_each(|c| c.collect_comparisons(out))
            }
        }
    }
}

impl<'de> Deserialize<'de> for FilterClause {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        FilterClause::from_value(value).map_err(serde::de::Error::custom)
    }
}

impl Serialize for FilterClause {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let (kind, children) = match self {
            FilterClause::Comparison(c) => return c.serialize(serializer),
            FilterClause::And(children) => ("and", children),
            FilterClause::Or(children) => ("or", children),
        };
        let mut s = serializer.serialize_struct("FilterClause", 2)?;
        s.serialize_field("type", kind)?;
        s.serialize_field("filters", children)?;
        s.end()
    }
}
