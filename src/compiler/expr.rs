use std::{fmt, sync::Arc};

use serde_json::Value;

use crate::compiler::{LikeMatcher, Truth};
use crate::functions::{ArgType, ScalarImpl};
use crate::template::ComparatorOp;
use crate::JsonPrimitive;

/// A column bound to a declared table key, with its reflected type.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
    pub ty: JsonPrimitive,
    pub nullable: bool,
}

impl ColumnRef {
    /// Key of this column in an executor row: `<table key>.<column>`.
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.table, self.column)
    }

    pub fn arg_type(&self) -> ArgType {
        (self.ty, self.nullable)
    }
}

/// What an argument evaluates to at compile time.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Column(ColumnRef),
    Scalar(Value),
    List(Vec<Value>),
}

impl Operand {
    pub fn arg_type(&self) -> ArgType {
        match self {
            Operand::Column(c) => c.arg_type(),
            Operand::Scalar(v) => (JsonPrimitive::of_value(v), v.is_null()),
            Operand::List(_) => (JsonPrimitive::Array, false),
        }
    }

    /// Human readable form used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Operand::Column(c) => c.qualified(),
            Operand::Scalar(v) => v.to_string(),
            Operand::List(items) => Value::Array(items.clone()).to_string(),
        }
    }

    pub fn into_expr(self) -> ScalarExpr {
        match self {
            Operand::Column(c) => ScalarExpr::Column(c),
            Operand::Scalar(v) => ScalarExpr::Literal(v),
            Operand::List(items) => ScalarExpr::Literal(Value::Array(items)),
        }
    }
}

/// A call to a row-wise function.
#[derive(Clone)]
pub struct ScalarCall {
    pub func: Arc<dyn ScalarImpl>,
    pub args: Vec<ScalarExpr>,
}

impl fmt::Debug for ScalarCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarCall").field("func", &self.func.name()).field("args", &self.args).finish()
    }
}

impl PartialEq for ScalarCall {
    fn eq(&self, other: &Self) -> bool {
        self.func.name() == other.func.name() && self.args == other.args
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScalarExpr {
    Column(ColumnRef),
    Literal(Value),
    Call(ScalarCall),
    /// A value already computed under this row key (aggregate results).
    Slot(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LikePattern {
    /// Literal pattern, compiled once.
    Compiled(LikeMatcher),
    /// Pattern read from a column, compiled per row.
    Dynamic(ScalarExpr),
}

/// A compiled boolean condition, evaluated with three-valued logic.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Compare { left: ScalarExpr, op: ComparatorOp, right: ScalarExpr },
    InList { expr: ScalarExpr, list: ScalarExpr, negated: bool },
    Like { expr: ScalarExpr, pattern: LikePattern, negated: bool },
    Const3(Truth),
}

impl Predicate {
    /// Conjunction that avoids wrapping zero or one predicate.
    pub fn conjoin(mut predicates: Vec<Predicate>) -> Predicate {
        match predicates.len() {
            0 => Predicate::Const3(Truth::True),
            1 => predicates.remove(0),
            _ => Predicate::And(predicates),
        }
    }

    /// Every column this predicate reads.
    pub fn columns(&self) -> Vec<&ColumnRef> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a ColumnRef>) {
        match self {
            Predicate::And(ps) | Predicate::Or(ps) => ps.iter().for_each(|p| p.collect_columns(out)),
            Predicate::Compare { left, right, .. } => {
                left.collect_columns(out);
                right.collect_columns(out);
            }
            Predicate::InList { expr, list, .. } => {
                expr.collect_columns(out);
                list.collect_columns(out);
            }
            Predicate::Like { expr, pattern, .. } => {
                expr.collect_columns(out);
                if let LikePattern::Dynamic(p) = pattern {
                    p.collect_columns(out);
                }
            }
            Predicate::Const3(_) => {}
        }
    }
}

impl ScalarExpr {
    pub fn columns(&self) -> Vec<&ColumnRef> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a ColumnRef>) {
        match self {
            ScalarExpr::Column(c) => out.push(c),
            ScalarExpr::Call(call) => call.args.iter().for_each(|a| a.collect_columns(out)),
            ScalarExpr::Literal(_) | ScalarExpr::Slot(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn col(table: &str, column: &str) -> ColumnRef {
        ColumnRef { table: table.into(), column: column.into(), ty: JsonPrimitive::Int, nullable: false }
    }

    #[test]
    fn conjoin_flattens_trivial_cases() {
        assert_eq!(Predicate::conjoin(vec![]), Predicate::Const3(Truth::True));
        let one = Predicate::Const3(Truth::False);
        assert_eq!(Predicate::conjoin(vec![one.clone()]), one);
        assert!(matches!(Predicate::conjoin(vec![one.clone(), one]), Predicate::And(v) if v.len() == 2));
    }

    #[test]
    fn collects_columns_from_nested_predicates() {
        let p = Predicate::Or(vec![
            Predicate::Compare {
                left: ScalarExpr::Column(col("a", "id")),
                op: ComparatorOp::Eq,
                right: ScalarExpr::Column(col("b", "a_id")),
            },
            Predicate::InList {
                expr: ScalarExpr::Column(col("c", "x")),
                list: ScalarExpr::Literal(json!([1, 2])),
                negated: false,
            },
        ]);
        let keys: Vec<String> = p.columns().iter().map(|c| c.qualified()).collect();
        assert_eq!(keys, vec!["a.id", "b.a_id", "c.x"]);
    }

    #[test]
    fn operand_descriptions() {
        assert_eq!(Operand::Column(col("monkey", "email")).describe(), "monkey.email");
        assert_eq!(Operand::Scalar(json!("x")).describe(), "\"x\"");
        assert_eq!(Operand::List(vec![json!(1), json!(2)]).describe(), "[1,2]");
    }
}
