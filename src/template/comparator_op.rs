use std::{fmt, str::FromStr};

use crate::compiler::QueryError;

/// The closed set of comparison operators a template may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparatorOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    In,
    NotIn,
    Like,
    NotLike,
}

impl ComparatorOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ComparatorOp::Eq => "=",
            ComparatorOp::NotEq => "<>",
            ComparatorOp::Lt => "<",
            ComparatorOp::LtEq => "<=",
            ComparatorOp::Gt => ">",
            ComparatorOp::GtEq => ">=",
            ComparatorOp::In => "in",
            ComparatorOp::NotIn => "not in",
            ComparatorOp::Like => "like",
            ComparatorOp::NotLike => "not like",
        }
    }

    pub fn is_ordering(self) -> bool {
        matches!(self, ComparatorOp::Lt | ComparatorOp::LtEq | ComparatorOp::Gt | ComparatorOp::GtEq)
    }

    pub fn is_membership(self) -> bool {
        matches!(self, ComparatorOp::In | ComparatorOp::NotIn)
    }

    pub fn is_pattern(self) -> bool {
        matches!(self, ComparatorOp::Like | ComparatorOp::NotLike)
    }

    pub fn is_negated(self) -> bool {
        matches!(self, ComparatorOp::NotIn | ComparatorOp::NotLike)
    }
}

impl FromStr for ComparatorOp {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ").to_ascii_lowercase();
        let op = match normalized.as_str() {
            "=" | "==" => ComparatorOp::Eq,
            "<>" | "!=" => ComparatorOp::NotEq,
            "<" => ComparatorOp::Lt,
            "<=" => ComparatorOp::LtEq,
            ">" => ComparatorOp::Gt,
            ">=" => ComparatorOp::GtEq,
            "in" => ComparatorOp::In,
            "not in" => ComparatorOp::NotIn,
            "like" => ComparatorOp::Like,
            "not like" => ComparatorOp::NotLike,
            _ => return Err(QueryError::Validation(format!("comparison operator not defined: '{s}'"))),
        };
        Ok(op)
    }
}

impl fmt::Display for ComparatorOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_symbol() {
        for (s, op) in [
            ("=", ComparatorOp::Eq),
            ("==", ComparatorOp::Eq),
            ("<>", ComparatorOp::NotEq),
            ("!=", ComparatorOp::NotEq),
            (">", ComparatorOp::Gt),
            (">=", ComparatorOp::GtEq),
            ("<", ComparatorOp::Lt),
            ("<=", ComparatorOp::LtEq),
            ("in", ComparatorOp::In),
            ("not in", ComparatorOp::NotIn),
            ("NOT  LIKE", ComparatorOp::NotLike),
            ("like", ComparatorOp::Like),
        ] {
            assert_eq!(s.parse::<ComparatorOp>().unwrap(), op, "{s}");
        }
    }

    #[test]
    fn rejects_between() {
        let err = "between".parse::<ComparatorOp>().unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Validation);
        assert!(err.to_string().contains("comparison operator not defined"));
    }
}
