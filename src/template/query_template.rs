use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::compiler::Result;
use crate::template::{FilterClause, GroupByClause, JoinClause, SelectClause, TableReference};

/// A complete, storable query description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryTemplate {
    pub select: SelectClause,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joins: Option<Vec<JoinClause>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<FilterClause>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<GroupByClause>,
}

impl QueryTemplate {
    /// Deserialize and validate a template as it arrives from storage or from
    /// an operator. Structural problems surface as validation errors.
    pub fn parse(value: &Value) -> Result<Self> {
        let template: QueryTemplate = serde_json::from_value(value.clone())?;
        template.validate()?;
        Ok(template)
    }

    pub fn validate(&self) -> Result<()> {
        for calc in &self.select.calculated_columns {
            calc.args.iter().try_for_each(|a| a.validate())?;
        }
        for join in self.joins.iter().flatten() {
            join.by.iter().try_for_each(|c| c.validate())?;
        }
        for clause in self.filters.iter().flatten() {
            clause.comparisons().into_iter().try_for_each(|c| c.validate())?;
        }
        Ok(())
    }

    pub fn joins(&self) -> &[JoinClause] {
        self.joins.as_deref().unwrap_or_default()
    }

    pub fn filters(&self) -> &[FilterClause] {
        self.filters.as_deref().unwrap_or_default()
    }

    /// Every table reference embedded anywhere in the template, in the order
    /// select, joins, filters, group by.
    pub fn table_references(&self) -> Vec<&TableReference> {
        let mut refs: Vec<&TableReference> = Vec::new();

        refs.extend(self.select.columns.iter().map(|c| &c.table));
        for calc in &self.select.calculated_columns {
            refs.extend(calc.args.iter().filter_map(|a| a.table.as_ref()));
        }
        for join in self.joins() {
            refs.push(&join.table);
            for cmp in &join.by {
                refs.extend([&cmp.left, &cmp.right].into_iter().filter_map(|a| a.table.as_ref()));
            }
        }
        for clause in self.filters() {
            for cmp in clause.comparisons() {
                refs.extend([&cmp.left, &cmp.right].into_iter().filter_map(|a| a.table.as_ref()));
            }
        }
        if let Some(group_by) = &self.group_by {
            refs.extend(group_by.columns.iter().map(|c| &c.table));
        }

        refs
    }
}
