use serde_json::{Number, Value};

use crate::compiler::Result;
use crate::functions::{arg_mismatch, check_arity, value_mismatch, Accumulator, AggregateImpl, ArgType};
use crate::JsonPrimitive;

pub struct SumImpl;

impl AggregateImpl for SumImpl {
    fn name(&self) -> &'static str {
        "sum"
    }

    fn infer_type(&self, args: &[ArgType]) -> Result<ArgType> {
        check_arity(self.name(), args.len(), 1, Some(1))?;
        match args[0].0 {
            JsonPrimitive::Int => Ok((JsonPrimitive::Int, true)),
            JsonPrimitive::Float | JsonPrimitive::Null => Ok((JsonPrimitive::Float, true)),
            _ => Err(arg_mismatch(self.name(), "numeric", args)),
        }
    }

    fn create_accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(SumAcc::Empty)
    }
}

/// Integer sums stay exact until the first float arrives.
enum SumAcc {
    Empty,
    Int(i128),
    Float(f64),
}

impl Accumulator for SumAcc {
    fn update(&mut self, args: &[Value]) -> Result<()> {
        check_arity("sum", args.len(), 1, Some(1))?;
        let n = match &args[0] {
            Value::Null => return Ok(()),
            Value::Number(n) => n,
            other => return Err(value_mismatch("sum", "numeric", other)),
        };

        *self = match (&*self, n.as_i64(), n.as_f64()) {
            (SumAcc::Empty, Some(i), _) => SumAcc::Int(i as i128),
            (SumAcc::Int(acc), Some(i), _) => SumAcc::Int(acc + i as i128),
            (SumAcc::Int(acc), None, Some(f)) => SumAcc::Float(*acc as f64 + f),
            (SumAcc::Float(acc), _, Some(f)) => SumAcc::Float(acc + f),
            (_, _, Some(f)) => SumAcc::Float(f),
            (_, _, None) => return Err(value_mismatch("sum", "numeric", &args[0])),
        };
        Ok(())
    }

    fn finalize(&self) -> Value {
        match self {
            SumAcc::Empty => Value::Null,
            SumAcc::Int(i) => match i64::try_from(*i) {
                Ok(i) => Value::from(i),
                Err(_) => Number::from_f64(*i as f64).map(Value::Number).unwrap_or(Value::Null),
            },
            SumAcc::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        }
    }
}
