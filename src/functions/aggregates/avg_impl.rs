use serde_json::{Number, Value};

use crate::compiler::Result;
use crate::functions::{arg_mismatch, check_arity, value_mismatch, Accumulator, AggregateImpl, ArgType};
use crate::JsonPrimitive;

pub struct AvgImpl;

impl AggregateImpl for AvgImpl {
    fn name(&self) -> &'static str {
        "avg"
    }

    fn infer_type(&self, args: &[ArgType]) -> Result<ArgType> {
        check_arity(self.name(), args.len(), 1, Some(1))?;
        match args[0].0 {
            JsonPrimitive::Int | JsonPrimitive::Float | JsonPrimitive::Null => Ok((JsonPrimitive::Float, true)),
            _ => Err(arg_mismatch(self.name(), "numeric", args)),
        }
    }

    fn create_accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(AvgAcc { sum: 0.0, cnt: 0 })
    }
}

struct AvgAcc {
    sum: f64,
    cnt: i64,
}

impl Accumulator for AvgAcc {
    fn update(&mut self, args: &[Value]) -> Result<()> {
        check_arity("avg", args.len(), 1, Some(1))?;
        match &args[0] {
            Value::Null => {}
            Value::Number(n) => {
                let f = n.as_f64().ok_or_else(|| value_mismatch("avg", "numeric", &args[0]))?;
                self.sum += f;
                self.cnt += 1;
            }
            other => return Err(value_mismatch("avg", "numeric", other)),
        }
        Ok(())
    }

    fn finalize(&self) -> Value {
        if self.cnt == 0 {
            return Value::Null;
        }
        Number::from_f64(self.sum / self.cnt as f64).map(Value::Number).unwrap_or(Value::Null)
    }
}
