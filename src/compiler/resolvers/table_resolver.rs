use indexmap::IndexMap;
use tracing::debug;

use crate::compiler::{QueryError, ResolvedTable, Result};
use crate::context::EngineContext;
use crate::template::TableReference;

pub struct TableResolver;

impl TableResolver {
    /// Bind every table reference to the live schema, keyed by alias or name
    /// in order of first appearance.
    ///
    /// Repeated references with the same key and name collapse into one
    /// usage. A key naming two different tables is rejected, as is a name
    /// the schema does not know.
    pub fn resolve(references: &[&TableReference], ctx: &EngineContext) -> Result<IndexMap<String, ResolvedTable>> {
        let mut tables: IndexMap<String, ResolvedTable> = IndexMap::new();

        for reference in references {
            let key = reference.key();
            if let Some(existing) = tables.get(key) {
                if existing.name() != reference.name {
                    return Err(QueryError::ConflictingTableKey {
                        key: key.to_string(),
                        first: existing.name().to_string(),
                        second: reference.name.clone(),
                    });
                }
                continue;
            }

            let descriptor = ctx
                .catalog
                .describe(ctx.db, &reference.name)
                .ok_or_else(|| QueryError::UnknownTable(reference.name.clone()))?;

            debug!(key, table = %reference.name, columns = descriptor.columns.len(), "resolved table");
            tables.insert(
                key.to_string(),
                ResolvedTable { key: key.to_string(), reference: (*reference).clone(), descriptor },
            );
        }

        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Harness;
    use crate::ErrorKind;

    #[test]
    fn aliases_make_independent_usages() {
        let h = Harness::seeded();
        let user = TableReference::new("user");
        let boss = TableReference::aliased("user", "boss");
        let tables = TableResolver::resolve(&[&user, &boss, &user], &h.engine()).unwrap();

        assert_eq!(tables.keys().collect::<Vec<_>>(), vec!["user", "boss"]);
        assert!(tables["boss"].is_aliased());
        assert_eq!(tables["boss"].descriptor, tables["user"].descriptor);
    }

    #[test]
    fn unknown_table_is_a_schema_error() {
        let h = Harness::seeded();
        let garbage = TableReference::new("garbage");
        let err = TableResolver::resolve(&[&garbage], &h.engine()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(err.to_string().contains("garbage"));
    }

    #[test]
    fn key_reused_for_another_table_is_rejected() {
        let h = Harness::seeded();
        let a = TableReference::aliased("user", "x");
        let b = TableReference::aliased("user_group", "x");
        let err = TableResolver::resolve(&[&a, &b], &h.engine()).unwrap_err();
        assert!(matches!(err, QueryError::ConflictingTableKey { .. }));
    }

    #[test]
    fn tables_created_after_a_first_resolve_are_seen() {
        let h = Harness::seeded();
        let late = TableReference::new("late");
        assert!(TableResolver::resolve(&[&late], &h.engine()).is_err());

        crate::database::DbCommon::create(&h.db, "late");
        assert!(TableResolver::resolve(&[&late], &h.engine()).is_ok());
    }
}
