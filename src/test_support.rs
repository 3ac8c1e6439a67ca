use std::sync::Arc;

use serde_json::{json, Value};

use crate::compiler::{CompileContext, TableResolver};
use crate::context::EngineContext;
use crate::database::{Config, Db, DbCollection, DbCommon, SchemaCatalog};
use crate::functions::FunctionRegistry;
use crate::template::TableReference;

/// Users aliased as `monkey`, joined through the membership table to their
/// groups, filtered and grouped per user with a group count.
pub fn sample_template_json() -> Value {
    json!({
        "select": {
            "columns": [
                {"table": {"name": "user", "alias": "monkey"}, "column": "full_name"},
                {"table": {"name": "user", "alias": "monkey"}, "column": "email"}
            ],
            "calculated_columns": [
                {"func": "count", "args": [{"type": "scalar", "value": 1}], "label": "num_groups"}
            ]
        },
        "joins": [
            {
                "table": {"name": "user_group_user_rel"},
                "by": [{
                    "left": {"type": "column", "table": {"name": "user", "alias": "monkey"}, "value": "id"},
                    "comparator": "==",
                    "right": {"type": "column", "table": {"name": "user_group_user_rel"}, "value": "user_id"}
                }]
            },
            {
                "table": {"name": "user_group"},
                "by": [{
                    "left": {"type": "column", "table": {"name": "user_group_user_rel"}, "value": "user_group_id"},
                    "comparator": "==",
                    "right": {"type": "column", "table": {"name": "user_group"}, "value": "id"}
                }]
            }
        ],
        "filters": [{
            "type": "or",
            "filters": [
                {
                    "type": "and",
                    "filters": [{
                        "left": {"type": "column", "table": {"name": "user", "alias": "monkey"}, "value": "email"},
                        "comparator": "==",
                        "right": {"type": "scalar", "value": "mon@key.com"}
                    }]
                },
                {
                    "left": {"type": "column", "table": {"name": "user", "alias": "monkey"}, "value": "id"},
                    "comparator": "=",
                    "right": {"type": "scalar", "value": 1}
                }
            ]
        }],
        "group_by": {
            "columns": [
                {"table": {"name": "user", "alias": "monkey"}, "column": "full_name"},
                {"table": {"name": "user", "alias": "monkey"}, "column": "email"}
            ]
        }
    })
}

pub fn create_users(db: &Db) {
    let users = db.create_with_config("user", Config::int("id"));
    users
        .load_from_json(
            json!([
                {"id": 1, "full_name": "Ana", "email": "ana@x.com", "active": true},
                {"id": 2, "full_name": "Mon", "email": "mon@key.com", "active": false},
                {"id": 3, "full_name": "Cy", "email": "cy@z.com", "active": true}
            ]),
            false,
        )
        .unwrap();
}

pub fn create_groups(db: &Db) {
    let groups = db.create_with_config("user_group", Config::int("id"));
    groups
        .load_from_json(json!([{"id": 1, "name": "admins"}, {"id": 2, "name": "staff"}]), false)
        .unwrap();

    let rel = db.create_with_config("user_group_user_rel", Config::int("id"));
    rel.load_from_json(
        json!([
            {"id": 1, "user_id": 1, "user_group_id": 1},
            {"id": 2, "user_id": 1, "user_group_id": 2},
            {"id": 3, "user_id": 2, "user_group_id": 2},
            {"id": 4, "user_id": 3, "user_group_id": 1}
        ]),
        false,
    )
    .unwrap();
}

/// A seeded store with its catalog and function registry.
pub struct Harness {
    pub db: Db,
    pub catalog: SchemaCatalog,
    pub functions: Arc<FunctionRegistry>,
}

impl Harness {
    pub fn seeded() -> Self {
        let db = Db::new_db();
        create_users(&db);
        create_groups(&db);
        Harness { db, catalog: SchemaCatalog::new(), functions: FunctionRegistry::default_registry() }
    }

    pub fn engine(&self) -> EngineContext<'_> {
        EngineContext::new(&self.db, &self.catalog, &self.functions)
    }

    pub fn compile_context(&self, references: &[&TableReference]) -> CompileContext<'_> {
        let tables = TableResolver::resolve(references, &self.engine()).unwrap();
        CompileContext::new(tables, &self.functions)
    }
}
