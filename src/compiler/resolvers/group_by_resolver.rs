use crate::compiler::{ArgumentResolver, ColumnRef, CompileContext, Result};
use crate::template::GroupByClause;

pub struct GroupByResolver;

impl GroupByResolver {
    /// Grouping columns in declared order, `*` expanded, duplicates dropped.
    pub fn compile(group_by: &GroupByClause, ctx: &CompileContext) -> Result<Vec<ColumnRef>> {
        let mut keys: Vec<ColumnRef> = Vec::new();
        for tc in &group_by.columns {
            let table = ctx.table(&tc.table)?;
            let columns = if tc.is_wildcard() {
                ArgumentResolver::all_columns(table)
            } else {
                vec![ArgumentResolver::column(table, &tc.column)?]
            };
            for c in columns {
                if !keys.iter().any(|k| k.qualified() == c.qualified()) {
                    keys.push(c);
                }
            }
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Harness;
    use crate::template::{TableColumn, TableReference};

    #[test]
    fn expands_and_dedupes() {
        let h = Harness::seeded();
        let g = TableReference::new("user_group");
        let ctx = h.compile_context(&[&g]);
        let clause = GroupByClause {
            columns: vec![TableColumn::new(g.clone(), "name"), TableColumn::new(g.clone(), "*")],
        };
        let keys: Vec<String> = GroupByResolver::compile(&clause, &ctx).unwrap().iter().map(|c| c.qualified()).collect();
        assert_eq!(keys, vec!["user_group.name", "user_group.id"]);
    }
}
