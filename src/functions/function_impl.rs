use std::fmt;

use serde_json::Value;

use crate::compiler::{QueryError, Result};
use crate::functions::Accumulator;
use crate::JsonPrimitive;

/// Static type of an argument or result: kind plus nullability.
pub type ArgType = (JsonPrimitive, bool);

/// An aggregate function. One stateless instance is shared by every query.
pub trait AggregateImpl: Send + Sync {
    /// Canonical lowercase name.
    fn name(&self) -> &'static str;

    /// Check the argument types and return the result type.
    fn infer_type(&self, args: &[ArgType]) -> Result<ArgType>;

    /// Fresh state for one group.
    fn create_accumulator(&self) -> Box<dyn Accumulator>;
}

/// A row-wise function.
pub trait ScalarImpl: Send + Sync {
    fn name(&self) -> &'static str;

    fn infer_type(&self, args: &[ArgType]) -> Result<ArgType>;

    fn invoke(&self, args: &[Value]) -> Result<Value>;
}

#[derive(Clone)]
pub enum FunctionImpl {
    Aggregate(std::sync::Arc<dyn AggregateImpl>),
    Scalar(std::sync::Arc<dyn ScalarImpl>),
}

impl FunctionImpl {
    pub fn name(&self) -> &'static str {
        match self {
            FunctionImpl::Aggregate(a) => a.name(),
            FunctionImpl::Scalar(s) => s.name(),
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, FunctionImpl::Aggregate(_))
    }
}

impl fmt::Debug for FunctionImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionImpl::Aggregate(a) => write!(f, "Aggregate({})", a.name()),
            FunctionImpl::Scalar(s) => write!(f, "Scalar({})", s.name()),
        }
    }
}

/// Reject a call whose argument count falls outside `min..=max`.
pub fn check_arity(name: &str, got: usize, min: usize, max: Option<usize>) -> Result<()> {
    let within = got >= min && max.is_none_or(|m| got <= m);
    if within {
        return Ok(());
    }
    let expected = match max {
        Some(m) if m == min => format!("{min}"),
        Some(m) => format!("{min} to {m}"),
        None => format!("at least {min}"),
    };
    Err(QueryError::Validation(format!("function '{name}' takes {expected} argument(s), got {got}")))
}

pub fn arg_mismatch(name: &str, expected: &str, got: &[ArgType]) -> QueryError {
    QueryError::FunctionArgMismatch {
        name: name.to_string(),
        expected: expected.to_string(),
        got: got.iter().map(|(ty, _)| *ty).collect(),
    }
}

/// Runtime counterpart of [`arg_mismatch`] for a value that slipped past the
/// static check (columns whose rows disagree with the widened schema).
pub fn value_mismatch(name: &str, expected: &str, got: &Value) -> QueryError {
    QueryError::FunctionArgMismatch {
        name: name.to_string(),
        expected: expected.to_string(),
        got: vec![JsonPrimitive::of_value(got)],
    }
}
