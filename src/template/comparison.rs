use serde::{Deserialize, Serialize};

use crate::compiler::{QueryError, Result};
use crate::template::{Argument, ArgumentType, ComparatorOp};

/// `left <comparator> right`, anchored on a column.
///
/// The comparator is kept as written so a stored template round-trips
/// unchanged; [`Comparison::operator`] maps it onto the closed operator set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Comparison {
    pub left: Argument,
    pub comparator: String,
    pub right: Argument,
}

impl Comparison {
    pub fn new(left: Argument, comparator: &str, right: Argument) -> Self {
        Self { left, comparator: comparator.to_string(), right }
    }

    pub fn operator(&self) -> Result<ComparatorOp> {
        self.comparator.parse()
    }

    pub fn validate(&self) -> Result<()> {
        if self.left.kind != ArgumentType::Column {
            return Err(QueryError::validation("left-hand side must be a column"));
        }
        self.operator()?;
        self.left.validate()?;
        self.right.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TableReference;
    use serde_json::json;

    #[test]
    fn scalar_on_the_left_is_rejected() {
        let c = Comparison::new(Argument::scalar(json!(1)), "=", Argument::scalar(json!(1)));
        assert_eq!(c.validate().unwrap_err().to_string(), "left-hand side must be a column");
    }

    #[test]
    fn unknown_comparator_is_rejected() {
        let c = Comparison::new(
            Argument::column(TableReference::new("t"), "a"),
            "between",
            Argument::list(vec![json!(1), json!(2)]),
        );
        assert!(c.validate().unwrap_err().to_string().contains("comparison operator not defined"));
    }

    #[test]
    fn comparator_text_round_trips() {
        let raw = json!({
            "left": {"type": "column", "table": {"name": "t"}, "value": "a"},
            "comparator": "==",
            "right": {"type": "scalar", "value": 1}
        });
        let c: Comparison = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(c.operator().unwrap(), ComparatorOp::Eq);
        assert_eq!(serde_json::to_value(&c).unwrap(), raw);
    }

    #[test]
    fn misspelled_keys_are_rejected() {
        let raw = json!({
            "left": {"type": "column", "table": {"name": "t"}, "value": "a"},
            "comparator": "=",
            "right": {"type": "scalar", "value": 1},
            "rigth": {"type": "scalar", "value": 2}
        });
        assert!(serde_json::from_value::<Comparison>(raw).is_err());
    }
}
