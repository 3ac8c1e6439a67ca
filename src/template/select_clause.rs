use serde::{Deserialize, Serialize};

use crate::template::{Argument, TableReference};

/// A column of a declared table. `"*"` stands for every column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    pub table: TableReference,
    pub column: String,
}

impl TableColumn {
    pub fn new(table: TableReference, column: &str) -> Self {
        Self { table, column: column.to_string() }
    }

    pub fn is_wildcard(&self) -> bool {
        self.column == "*"
    }
}

/// A function applied to arguments, optionally renamed in the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedColumn {
    pub func: String,
    #[serde(default)]
    pub args: Vec<Argument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectClause {
    #[serde(default)]
    pub columns: Vec<TableColumn>,
    #[serde(default)]
    pub calculated_columns: Vec<CalculatedColumn>,
}
