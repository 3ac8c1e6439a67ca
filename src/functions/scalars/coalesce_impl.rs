use serde_json::Value;

use crate::compiler::Result;
use crate::functions::{arg_mismatch, check_arity, ArgType, ScalarImpl};
use crate::JsonPrimitive;

/// First non-null argument.
pub struct CoalesceImpl;

impl ScalarImpl for CoalesceImpl {
    fn name(&self) -> &'static str {
        "coalesce"
    }

    fn infer_type(&self, args: &[ArgType]) -> Result<ArgType> {
        check_arity(self.name(), args.len(), 1, None)?;

        let mut ty = JsonPrimitive::Null;
        for (arg_ty, _) in args {
            if !ty.is_comparable_with(*arg_ty) {
                return Err(arg_mismatch(self.name(), "arguments of one type", args));
            }
            ty = JsonPrimitive::promote(ty, *arg_ty);
        }
        let nullable = args.iter().all(|(t, n)| *n || *t == JsonPrimitive::Null);
        Ok((ty, nullable))
    }

    fn invoke(&self, args: &[Value]) -> Result<Value> {
        check_arity(self.name(), args.len(), 1, None)?;
        Ok(args.iter().find(|v| !v.is_null()).cloned().unwrap_or(Value::Null))
    }
}
