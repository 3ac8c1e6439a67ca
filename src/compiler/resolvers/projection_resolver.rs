use std::collections::HashSet;

use crate::compiler::{ArgumentResolver, ColumnRef, CompileContext, Result, ScalarExpr};
use crate::functions::{ArgType, FunctionImpl};
use crate::template::{CalculatedColumn, SelectClause};

/// A calculated column with its function bound and its arguments evaluated.
#[derive(Debug, Clone)]
pub struct CalculatedUnit {
    pub func: FunctionImpl,
    pub args: Vec<ScalarExpr>,
    pub result: ArgType,
    pub label: Option<String>,
}

impl CalculatedUnit {
    /// Output name before collision handling.
    pub fn base_name(&self) -> String {
        self.label.clone().unwrap_or_else(|| self.func.name().to_string())
    }
}

#[derive(Debug, Clone)]
pub enum ProjectionUnit {
    /// `table.*`, expanded in schema order.
    AllColumns { table: String, columns: Vec<ColumnRef> },
    Column(ColumnRef),
    Calculated(CalculatedUnit),
}

pub struct ProjectionResolver;

impl ProjectionResolver {
    /// Plain columns in declared order, then calculated columns in declared order.
    pub fn compile(select: &SelectClause, ctx: &CompileContext) -> Result<Vec<ProjectionUnit>> {
        let mut units = Vec::with_capacity(select.columns.len() + select.calculated_columns.len());

        for tc in &select.columns {
            let table = ctx.table(&tc.table)?;
            if tc.is_wildcard() {
                units.push(ProjectionUnit::AllColumns {
                    table: table.key.clone(),
                    columns: ArgumentResolver::all_columns(table),
                });
            } else {
                units.push(ProjectionUnit::Column(ArgumentResolver::column(table, &tc.column)?));
            }
        }

        for calc in &select.calculated_columns {
            units.push(ProjectionUnit::Calculated(Self::compile_calculated(calc, ctx)?));
        }
        Ok(units)
    }

    fn compile_calculated(calc: &CalculatedColumn, ctx: &CompileContext) -> Result<CalculatedUnit> {
        let func = ctx.functions().resolve(&calc.func)?;
        let operands = calc.args.iter().map(|a| ArgumentResolver::evaluate(a, ctx)).collect::<Result<Vec<_>>>()?;
        let arg_types: Vec<ArgType> = operands.iter().map(|o| o.arg_type()).collect();

        let result = match &func {
            FunctionImpl::Aggregate(a) => a.infer_type(&arg_types)?,
            FunctionImpl::Scalar(s) => s.infer_type(&arg_types)?,
        };

        Ok(CalculatedUnit {
            func,
            args: operands.into_iter().map(|o| o.into_expr()).collect(),
            result,
            label: calc.label.clone(),
        })
    }
}

/// Hands out unique record field names.
///
/// Plain columns fall back to `<table key>.<column>` on a clash, calculated
/// columns to `<name>_1`, `<name>_2`, and so on.
#[derive(Debug, Default)]
pub struct OutputNamer {
    used: HashSet<String>,
}

impl OutputNamer {
    pub fn column(&mut self, column: &ColumnRef) -> String {
        if self.used.insert(column.column.clone()) {
            return column.column.clone();
        }
        self.suffixed(&column.qualified())
    }

    pub fn calculated(&mut self, base: &str) -> String {
        self.suffixed(base)
    }

    fn suffixed(&mut self, base: &str) -> String {
        if self.used.insert(base.to_string()) {
            return base.to_string();
        }
        let mut n = 1;
        loop {
            let candidate = format!("{base}_{n}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Harness;
    use crate::template::{Argument, TableColumn, TableReference};
    use crate::{ErrorKind, JsonPrimitive};
    use serde_json::json;

    #[test]
    fn plain_columns_come_before_calculated_ones() {
        let h = Harness::seeded();
        let user = TableReference::new("user");
        let ctx = h.compile_context(&[&user]);
        let select = SelectClause {
            columns: vec![TableColumn::new(user.clone(), "email"), TableColumn::new(user.clone(), "*")],
            calculated_columns: vec![CalculatedColumn {
                func: "UPPER".into(),
                args: vec![Argument::column(user.clone(), "full_name")],
                label: Some("shout".into()),
            }],
        };
        let units = ProjectionResolver::compile(&select, &ctx).unwrap();
        assert!(matches!(&units[0], ProjectionUnit::Column(c) if c.column == "email"));
        assert!(matches!(&units[1], ProjectionUnit::AllColumns { columns, .. } if columns.len() == 4));
        match &units[2] {
            ProjectionUnit::Calculated(calc) => {
                assert_eq!(calc.base_name(), "shout");
                assert_eq!(calc.result.0, JsonPrimitive::String);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_function_is_a_resolution_error() {
        let h = Harness::seeded();
        let ctx = h.compile_context(&[]);
        let select = SelectClause {
            columns: vec![],
            calculated_columns: vec![CalculatedColumn { func: "median".into(), args: vec![], label: None }],
        };
        let err = ProjectionResolver::compile(&select, &ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Resolution);
    }

    #[test]
    fn function_argument_types_are_checked() {
        let h = Harness::seeded();
        let user = TableReference::new("user");
        let ctx = h.compile_context(&[&user]);
        let select = SelectClause {
            columns: vec![],
            calculated_columns: vec![CalculatedColumn {
                func: "sum".into(),
                args: vec![Argument::column(user.clone(), "email")],
                label: None,
            }],
        };
        assert_eq!(ProjectionResolver::compile(&select, &ctx).unwrap_err().kind(), ErrorKind::TypeMismatch);

        let unlabeled = CalculatedColumn { func: "Count".into(), args: vec![Argument::scalar(json!(1))], label: None };
        let units =
            ProjectionResolver::compile(&SelectClause { columns: vec![], calculated_columns: vec![unlabeled] }, &ctx)
                .unwrap();
        assert!(matches!(&units[0], ProjectionUnit::Calculated(c) if c.base_name() == "count"));
    }

    #[test]
    fn namer_resolves_collisions() {
        let mut namer = OutputNamer::default();
        let a = ColumnRef { table: "a".into(), column: "id".into(), ty: JsonPrimitive::Int, nullable: false };
        let b = ColumnRef { table: "b".into(), column: "id".into(), ty: JsonPrimitive::Int, nullable: false };
        assert_eq!(namer.column(&a), "id");
        assert_eq!(namer.column(&b), "b.id");
        assert_eq!(namer.calculated("count"), "count");
        assert_eq!(namer.calculated("count"), "count_1");
        assert_eq!(namer.calculated("id"), "id_1");
    }
}
