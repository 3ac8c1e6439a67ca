use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Coarse classification of a JSON value, used both for inferred schemas and
/// for the compile-time type checks of comparisons and function calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JsonPrimitive {
    Null,
    Bool,
    Int,
    Float,
    String,
    Object,
    Array,
}

impl JsonPrimitive {
    /// Classify a `Value` into its primitive kind.
    pub fn of_value(v: &Value) -> JsonPrimitive {
        match v {
            Value::Null => JsonPrimitive::Null,
            Value::Bool(_) => JsonPrimitive::Bool,
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    JsonPrimitive::Int
                } else {
                    JsonPrimitive::Float
                }
            }
            Value::String(_) => JsonPrimitive::String,
            Value::Array(_) => JsonPrimitive::Array,
            Value::Object(_) => JsonPrimitive::Object,
        }
    }

    /// Widen two kinds to a common one when merging schemas.
    ///
    /// `Int` and `Float` widen to `Float`. For any other pair of distinct kinds
    /// the first seen one wins, unless it is `Null`.
    pub fn promote(a: JsonPrimitive, b: JsonPrimitive) -> JsonPrimitive {
        use JsonPrimitive::*;
        if a == b {
            return a;
        }
        match (a, b) {
            (Int, Float) | (Float, Int) => Float,
            (Null, y) => y,
            (x, _) => x,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, JsonPrimitive::Int | JsonPrimitive::Float)
    }

    /// Kinds that support `<`, `<=`, `>` and `>=`.
    pub fn is_orderable(self) -> bool {
        matches!(self, JsonPrimitive::Int | JsonPrimitive::Float | JsonPrimitive::String)
    }

    /// Whether values of the two kinds may meet in a comparison.
    /// `Null` is compatible with everything.
    pub fn is_comparable_with(self, other: JsonPrimitive) -> bool {
        self == other
            || self == JsonPrimitive::Null
            || other == JsonPrimitive::Null
            || (self.is_numeric() && other.is_numeric())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JsonPrimitive::Null => "null",
            JsonPrimitive::Bool => "bool",
            JsonPrimitive::Int => "int",
            JsonPrimitive::Float => "float",
            JsonPrimitive::String => "string",
            JsonPrimitive::Object => "object",
            JsonPrimitive::Array => "array",
        }
    }
}

impl fmt::Display for JsonPrimitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
