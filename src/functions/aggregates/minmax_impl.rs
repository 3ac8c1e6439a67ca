use serde_json::Value;

use crate::compiler::Result;
use crate::executor::Helpers;
use crate::functions::{arg_mismatch, check_arity, value_mismatch, Accumulator, AggregateImpl, ArgType};

pub struct MinImpl;
pub struct MaxImpl;

fn infer_extremum(name: &str, args: &[ArgType]) -> Result<ArgType> {
    check_arity(name, args.len(), 1, Some(1))?;
    let (ty, _) = args[0];
    if ty.is_orderable() || ty == crate::JsonPrimitive::Null {
        Ok((ty, true))
    } else {
        Err(arg_mismatch(name, "number or string", args))
    }
}

impl AggregateImpl for MinImpl {
    fn name(&self) -> &'static str {
        "min"
    }

    fn infer_type(&self, args: &[ArgType]) -> Result<ArgType> {
        infer_extremum(self.name(), args)
    }

    fn create_accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(ExtremaAcc { keep_smaller: true, current: None })
    }
}

impl AggregateImpl for MaxImpl {
    fn name(&self) -> &'static str {
        "max"
    }

    fn infer_type(&self, args: &[ArgType]) -> Result<ArgType> {
        infer_extremum(self.name(), args)
    }

    fn create_accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(ExtremaAcc { keep_smaller: false, current: None })
    }
}

struct ExtremaAcc {
    keep_smaller: bool,
    current: Option<Value>,
}

impl ExtremaAcc {
    fn name(&self) -> &'static str {
        if self.keep_smaller { "min" } else { "max" }
    }
}

impl Accumulator for ExtremaAcc {
    fn update(&mut self, args: &[Value]) -> Result<()> {
        check_arity(self.name(), args.len(), 1, Some(1))?;
        let v = &args[0];
        if v.is_null() {
            return Ok(());
        }
        let Some(cur) = &self.current else {
            self.current = Some(v.clone());
            return Ok(());
        };

        let ord = Helpers::compare_values(v, cur).ok_or_else(|| value_mismatch(self.name(), "number or string", v))?;
        if (self.keep_smaller && ord.is_lt()) || (!self.keep_smaller && ord.is_gt()) {
            self.current = Some(v.clone());
        }
        Ok(())
    }

    fn finalize(&self) -> Value {
        self.current.clone().unwrap_or(Value::Null)
    }
}
