use serde_json::{Map, Value};

use crate::compiler::{LikeMatcher, LikePattern, Predicate, QueryError, Result, ScalarExpr, Truth};
use crate::executor::Helpers;
use crate::template::ComparatorOp;

pub struct Eval;

impl Eval {
    pub fn eval_scalar(expr: &ScalarExpr, row: &Map<String, Value>) -> Result<Value> {
        match expr {
            ScalarExpr::Literal(v) => Ok(v.clone()),
            ScalarExpr::Column(c) => Ok(row.get(&c.qualified()).cloned().unwrap_or(Value::Null)),
            ScalarExpr::Slot(key) => Ok(row.get(key).cloned().unwrap_or(Value::Null)),
            ScalarExpr::Call(call) => {
                let args = call.args.iter().map(|a| Self::eval_scalar(a, row)).collect::<Result<Vec<_>>>()?;
                call.func.invoke(&args)
            }
        }
    }

    /// Evaluate with SQL three-valued logic: any comparison against null is
    /// `Unknown`, and only `True` keeps a row.
    pub fn eval_predicate3(predicate: &Predicate, row: &Map<String, Value>) -> Result<Truth> {
        match predicate {
            Predicate::And(ps) => {
                let mut acc = Truth::True;
                for p in ps {
                    acc = acc & Self::eval_predicate3(p, row)?;
                    if acc == Truth::False {
                        break;
                    }
                }
                Ok(acc)
            }
            Predicate::Or(ps) => {
                let mut acc = Truth::False;
                for p in ps {
                    acc = acc | Self::eval_predicate3(p, row)?;
                    if acc == Truth::True {
                        break;
                    }
                }
                Ok(acc)
            }
            Predicate::Compare { left, op, right } => {
                let l = Self::eval_scalar(left, row)?;
                let r = Self::eval_scalar(right, row)?;
                Self::compare3(&l, *op, &r)
            }
            Predicate::InList { expr, list, negated } => {
                let v = Self::eval_scalar(expr, row)?;
                let items = Self::eval_scalar(list, row)?;
                let t = Self::member3(&v, &items)?;
                Ok(if *negated { !t } else { t })
            }
            Predicate::Like { expr, pattern, negated } => {
                let v = Self::eval_scalar(expr, row)?;
                let t = Self::like3(&v, pattern, row)?;
                Ok(if *negated { !t } else { t })
            }
            Predicate::Const3(t) => Ok(*t),
        }
    }

    fn compare3(l: &Value, op: ComparatorOp, r: &Value) -> Result<Truth> {
        if l.is_null() || r.is_null() {
            return Ok(Truth::Unknown);
        }
        let mismatch = || Self::mismatch(l, op, r, "operand types cannot be compared");
        match op {
            ComparatorOp::Eq => Helpers::values_equal(l, r).map(Truth::from).ok_or_else(mismatch),
            ComparatorOp::NotEq => Helpers::values_equal(l, r).map(|eq| Truth::from(!eq)).ok_or_else(mismatch),
            ComparatorOp::Lt | ComparatorOp::LtEq | ComparatorOp::Gt | ComparatorOp::GtEq => {
                if l.is_boolean() {
                    return Err(mismatch());
                }
                let ord = Helpers::compare_values(l, r).ok_or_else(mismatch)?;
                Ok(Truth::from(match op {
                    ComparatorOp::Lt => ord.is_lt(),
                    ComparatorOp::LtEq => ord.is_le(),
                    ComparatorOp::Gt => ord.is_gt(),
                    _ => ord.is_ge(),
                }))
            }
            _ => Err(Self::mismatch(l, op, r, "operator is not a binary comparison")),
        }
    }

    fn member3(v: &Value, items: &Value) -> Result<Truth> {
        let list = match items {
            Value::Null => return Ok(Truth::Unknown),
            Value::Array(list) => list,
            other => return Err(Self::mismatch(v, ComparatorOp::In, other, "right-hand side is not a list")),
        };
        if v.is_null() {
            return Ok(if list.is_empty() { Truth::False } else { Truth::Unknown });
        }

        let mut has_null = false;
        for item in list {
            if item.is_null() {
                has_null = true;
                continue;
            }
            match Helpers::values_equal(v, item) {
                Some(true) => return Ok(Truth::True),
                Some(false) => {}
                None => return Err(Self::mismatch(v, ComparatorOp::In, items, "list element cannot be compared")),
            }
        }
        Ok(if has_null { Truth::Unknown } else { Truth::False })
    }

    fn like3(v: &Value, pattern: &LikePattern, row: &Map<String, Value>) -> Result<Truth> {
        let s = match v {
            Value::Null => return Ok(Truth::Unknown),
            Value::String(s) => s,
            other => {
                let shown = match pattern {
                    LikePattern::Compiled(m) => Value::String(m.pattern().to_string()),
                    LikePattern::Dynamic(_) => Value::Null,
                };
                return Err(Self::mismatch(other, ComparatorOp::Like, &shown, "value is not a string"));
            }
        };
        match pattern {
            LikePattern::Compiled(m) => Ok(Truth::from(m.is_match(s))),
            LikePattern::Dynamic(expr) => match Self::eval_scalar(expr, row)? {
                Value::Null => Ok(Truth::Unknown),
                Value::String(p) => Ok(Truth::from(LikeMatcher::new(&p)?.is_match(s))),
                other => Err(Self::mismatch(v, ComparatorOp::Like, &other, "pattern is not a string")),
            },
        }
    }

    fn mismatch(l: &Value, op: ComparatorOp, r: &Value, reason: &str) -> QueryError {
        QueryError::TypeMismatch {
            left: l.to_string(),
            op: op.symbol().to_string(),
            right: r.to_string(),
            reason: reason.to_string(),
        }
    }
}
