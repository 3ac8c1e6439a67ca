use thiserror::Error;

use crate::JsonPrimitive;

/// Coarse classification of a [`QueryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced table is missing from the reflected schema.
    Schema,
    /// A name in the template could not be bound.
    Resolution,
    /// The template is structurally invalid.
    Validation,
    /// Operand types cannot meet under the requested operator or function.
    TypeMismatch,
    NotFound,
    Storage,
}

pub type Result<T> = std::result::Result<T, QueryError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("table '{0}' does not exist in the schema")]
    UnknownTable(String),

    #[error("table key '{key}' is used for both '{first}' and '{second}'")]
    ConflictingTableKey { key: String, first: String, second: String },

    #[error("table '{0}' is not declared by any table reference in the template")]
    UndeclaredTable(String),

    #[error("column '{column}' not found on table '{table}'")]
    UnknownColumn { table: String, column: String, candidates: Vec<String> },

    #[error("function '{0}' is not supported")]
    UnknownFunction(String),

    #[error("function '{name}' expects {expected}, got {got:?}")]
    FunctionArgMismatch { name: String, expected: String, got: Vec<JsonPrimitive> },

    #[error("{0}")]
    Validation(String),

    #[error("Attempting the comparison: ({left} {op} {right}) raised the following error: {reason}")]
    TypeMismatch { left: String, op: String, right: String, reason: String },

    #[error("query interface {0} not found")]
    QueryNotFound(u64),

    #[error("storage error: {0}")]
    Storage(String),
}

impl QueryError {
    pub fn validation(msg: impl Into<String>) -> Self {
        QueryError::Validation(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::UnknownTable(_) | QueryError::ConflictingTableKey { .. } => ErrorKind::Schema,
            QueryError::UndeclaredTable(_) | QueryError::UnknownColumn { .. } | QueryError::UnknownFunction(_) => {
                ErrorKind::Resolution
            }
            QueryError::Validation(_) => ErrorKind::Validation,
            QueryError::TypeMismatch { .. } | QueryError::FunctionArgMismatch { .. } => ErrorKind::TypeMismatch,
            QueryError::QueryNotFound(_) => ErrorKind::NotFound,
            QueryError::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(e: serde_json::Error) -> Self {
        QueryError::Validation(e.to_string())
    }
}
