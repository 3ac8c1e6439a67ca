use serde::{Deserialize, Serialize};

use crate::template::TableColumn;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupByClause {
    #[serde(default)]
    pub columns: Vec<TableColumn>,
}
