use serde_json::Value;

use crate::compiler::Result;
use crate::functions::{check_arity, Accumulator, AggregateImpl, ArgType};
use crate::JsonPrimitive;

/// `count()` counts rows; `count(x)` counts rows where `x` is not null.
pub struct CountImpl;

impl AggregateImpl for CountImpl {
    fn name(&self) -> &'static str {
        "count"
    }

    fn infer_type(&self, args: &[ArgType]) -> Result<ArgType> {
        check_arity(self.name(), args.len(), 0, Some(1))?;
        Ok((JsonPrimitive::Int, false))
    }

    fn create_accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(CountAcc { cnt: 0 })
    }
}

struct CountAcc {
    cnt: i64,
}

impl Accumulator for CountAcc {
    fn update(&mut self, args: &[Value]) -> Result<()> {
        match args {
            [] => self.cnt += 1,
            [Value::Null] => {}
            [_] => self.cnt += 1,
            _ => check_arity("count", args.len(), 0, Some(1))?,
        }
        Ok(())
    }

    fn finalize(&self) -> Value {
        Value::from(self.cnt)
    }
}
