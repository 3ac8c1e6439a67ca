use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::compiler::{QueryError, Result};
use crate::template::TableReference;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentType {
    Scalar,
    List,
    Column,
}

/// An operand inside a comparison or a function call: a literal value, a
/// literal list, or a column of a declared table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    #[serde(rename = "type")]
    pub kind: ArgumentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<TableReference>,
    pub value: Value,
}

impl Argument {
    pub fn column(table: TableReference, column: &str) -> Self {
        Self { kind: ArgumentType::Column, table: Some(table), value: Value::String(column.to_string()) }
    }

    pub fn scalar(value: Value) -> Self {
        Self { kind: ArgumentType::Scalar, table: None, value }
    }

    pub fn list(values: Vec<Value>) -> Self {
        Self { kind: ArgumentType::List, table: None, value: Value::Array(values) }
    }

    pub fn validate(&self) -> Result<()> {
        match (self.kind, &self.table) {
            (ArgumentType::Column, None) => {
                return Err(QueryError::validation("a 'column' argument requires a table"));
            }
            (ArgumentType::Scalar | ArgumentType::List, Some(_)) => {
                return Err(QueryError::validation("only 'column' arguments may name a table"));
            }
            _ => {}
        }

        match (self.kind, &self.value) {
            (ArgumentType::Column, Value::String(c)) if c == "*" => {
                Err(QueryError::validation("'*' is only valid as a selected table column"))
            }
            (ArgumentType::Column, Value::String(_)) => Ok(()),
            (ArgumentType::Column, _) => Err(QueryError::validation("a 'column' argument value must be a column name")),
            (ArgumentType::List, Value::Array(_)) => Ok(()),
            (ArgumentType::List, _) => Err(QueryError::validation("a 'list' argument value must be an array")),
            (ArgumentType::Scalar, _) => Ok(()),
        }
    }
}
