use serde::{Deserialize, Serialize};

use crate::template::{Comparison, TableReference};

/// Join `table` onto the query so far; the `by` comparisons are conjoined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinClause {
    pub table: TableReference,
    #[serde(default)]
    pub by: Vec<Comparison>,
}
