use serde_json::Value;

use crate::compiler::Result;
use crate::functions::{arg_mismatch, check_arity, value_mismatch, ArgType, ScalarImpl};
use crate::JsonPrimitive;

fn accepts_string(ty: JsonPrimitive) -> bool {
    matches!(ty, JsonPrimitive::String | JsonPrimitive::Null)
}

/// Shared shape of the one-argument string functions: null in, null out.
fn unary_string(name: &str, args: &[ArgType], result: JsonPrimitive) -> Result<ArgType> {
    check_arity(name, args.len(), 1, Some(1))?;
    if !accepts_string(args[0].0) {
        return Err(arg_mismatch(name, "string", args));
    }
    Ok((result, args[0].1 || args[0].0 == JsonPrimitive::Null))
}

fn map_string(name: &str, args: &[Value], f: impl Fn(&str) -> Value) -> Result<Value> {
    check_arity(name, args.len(), 1, Some(1))?;
    match &args[0] {
        Value::Null => Ok(Value::Null),
        Value::String(s) => Ok(f(s)),
        other => Err(value_mismatch(name, "string", other)),
    }
}

pub struct UpperImpl;
pub struct LowerImpl;
pub struct TrimImpl;
pub struct LengthImpl;
pub struct ConcatImpl;

impl ScalarImpl for UpperImpl {
    fn name(&self) -> &'static str {
        "upper"
    }

    fn infer_type(&self, args: &[ArgType]) -> Result<ArgType> {
        unary_string(self.name(), args, JsonPrimitive::String)
    }

    fn invoke(&self, args: &[Value]) -> Result<Value> {
        map_string(self.name(), args, |s| Value::String(s.to_uppercase()))
    }
}

impl ScalarImpl for LowerImpl {
    fn name(&self) -> &'static str {
        "lower"
    }

    fn infer_type(&self, args: &[ArgType]) -> Result<ArgType> {
        unary_string(self.name(), args, JsonPrimitive::String)
    }

    fn invoke(&self, args: &[Value]) -> Result<Value> {
        map_string(self.name(), args, |s| Value::String(s.to_lowercase()))
    }
}

impl ScalarImpl for TrimImpl {
    fn name(&self) -> &'static str {
        "trim"
    }

    fn infer_type(&self, args: &[ArgType]) -> Result<ArgType> {
        unary_string(self.name(), args, JsonPrimitive::String)
    }

    fn invoke(&self, args: &[Value]) -> Result<Value> {
        map_string(self.name(), args, |s| Value::String(s.trim().to_string()))
    }
}

impl ScalarImpl for LengthImpl {
    fn name(&self) -> &'static str {
        "length"
    }

    fn infer_type(&self, args: &[ArgType]) -> Result<ArgType> {
        unary_string(self.name(), args, JsonPrimitive::Int)
    }

    fn invoke(&self, args: &[Value]) -> Result<Value> {
        map_string(self.name(), args, |s| Value::from(s.chars().count()))
    }
}

/// Concatenates the text of every non-null argument.
impl ScalarImpl for ConcatImpl {
    fn name(&self) -> &'static str {
        "concat"
    }

    fn infer_type(&self, args: &[ArgType]) -> Result<ArgType> {
        check_arity(self.name(), args.len(), 1, None)?;
        Ok((JsonPrimitive::String, false))
    }

    fn invoke(&self, args: &[Value]) -> Result<Value> {
        check_arity(self.name(), args.len(), 1, None)?;
        let mut out = String::new();
        for arg in args {
            match arg {
                Value::Null => {}
                Value::String(s) => out.push_str(s),
                other => out.push_str(&other.to_string()),
            }
        }
        Ok(Value::String(out))
    }
}
