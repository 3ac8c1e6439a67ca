use crate::compiler::{
    ArgumentResolver, ColumnRef, CompileContext, LikeMatcher, LikePattern, Operand, Predicate, QueryError, Result,
};
use crate::template::{ArgumentType, ComparatorOp, Comparison};
use crate::JsonPrimitive;

pub struct ComparisonResolver;

impl ComparisonResolver {
    pub fn compile(cmp: &Comparison, ctx: &CompileContext) -> Result<Predicate> {
        if cmp.left.kind != ArgumentType::Column {
            return Err(QueryError::validation("left-hand side must be a column"));
        }
        let op = cmp.operator()?;

        let Operand::Column(left) = ArgumentResolver::evaluate(&cmp.left, ctx)? else {
            return Err(QueryError::validation("left-hand side must be a column"));
        };
        let right = ArgumentResolver::evaluate(&cmp.right, ctx)?;
        Self::check_types(&left, op, &cmp.comparator, &right)?;

        let expr = crate::compiler::ScalarExpr::Column(left);
        let negated = op.is_negated();
        let predicate = if op.is_membership() {
            Predicate::InList { expr, list: right.into_expr(), negated }
        } else if op.is_pattern() {
            let pattern = match right {
                Operand::Scalar(serde_json::Value::String(p)) => LikePattern::Compiled(LikeMatcher::new(&p)?),
                other => LikePattern::Dynamic(other.into_expr()),
            };
            Predicate::Like { expr, pattern, negated }
        } else {
            Predicate::Compare { left: expr, op, right: right.into_expr() }
        };
        Ok(predicate)
    }

    /// Reject operand types the operator cannot relate. A `Null` kind (an
    /// all-null column or a null literal) is compatible with anything.
    fn check_types(left: &ColumnRef, op: ComparatorOp, symbol: &str, right: &Operand) -> Result<()> {
        let mismatch = |reason: String| QueryError::TypeMismatch {
            left: left.qualified(),
            op: symbol.to_string(),
            right: right.describe(),
            reason,
        };
        let lt = left.ty;
        let (rt, _) = right.arg_type();

        if op.is_membership() {
            return match right {
                Operand::List(items) => {
                    for item in items {
                        let it = JsonPrimitive::of_value(item);
                        if !lt.is_comparable_with(it) {
                            return Err(mismatch(format!("list element {item} cannot be compared with a {lt} column")));
                        }
                    }
                    Ok(())
                }
                Operand::Column(c) if matches!(c.ty, JsonPrimitive::Array | JsonPrimitive::Null) => Ok(()),
                _ => Err(mismatch(format!("'{symbol}' requires a list on the right-hand side"))),
            };
        }

        if matches!(right, Operand::List(_)) {
            return Err(mismatch("a list can only be used with 'in' or 'not in'".to_string()));
        }

        if op.is_pattern() {
            if !matches!(lt, JsonPrimitive::String | JsonPrimitive::Null) {
                return Err(mismatch(format!("'{symbol}' requires a string column, found {lt}")));
            }
            if !matches!(rt, JsonPrimitive::String | JsonPrimitive::Null) {
                return Err(mismatch(format!("the pattern must be a string, found {rt}")));
            }
            return Ok(());
        }

        if op.is_ordering() {
            for ty in [lt, rt] {
                if ty != JsonPrimitive::Null && !ty.is_orderable() {
                    return Err(mismatch(format!("ordering is not defined for {ty} values")));
                }
            }
        }

        if !lt.is_comparable_with(rt) {
            return Err(mismatch(format!("cannot compare {lt} with {rt}")));
        }
        Ok(())
    }
}
