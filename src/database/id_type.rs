use serde::{Deserialize, Serialize};

/// How a table assigns ids to new rows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub enum IdType {
    /// Random v4 UUIDs, stored as strings.
    #[default]
    Uuid,
    /// Sequential integers starting at 1, stored as JSON numbers.
    Int,
    /// No generation; the caller supplies the id.
    None,
}
