use std::cmp::Ordering;

use ordered_float::OrderedFloat;
use serde_json::{Number, Value};

pub struct Helpers;

impl Helpers {
    /// Stable text key for a tuple of values (group keys).
    pub fn canonical_tuple(vals: &[Value]) -> String {
        Value::Array(vals.to_vec()).to_string()
    }

    /// Order two non-null values of the same kind. Integers and floats
    /// compare numerically; mixed or unordered kinds yield `None`.
    pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => Self::compare_numbers(x, y),
            (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
            (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
            _ => None,
        }
    }

    /// Equality for the `=` family. `None` when either side is null or the
    /// kinds cannot be related.
    pub fn values_equal(a: &Value, b: &Value) -> Option<bool> {
        match (a, b) {
            (Value::Null, _) | (_, Value::Null) => None,
            (Value::Number(_), Value::Number(_))
            | (Value::String(_), Value::String(_))
            | (Value::Bool(_), Value::Bool(_))
            | (Value::Array(_), Value::Array(_))
            | (Value::Object(_), Value::Object(_)) => Some(Self::deep_equal(a, b)),
            _ => None,
        }
    }

    fn deep_equal(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => Self::compare_numbers(x, y).is_some_and(Ordering::is_eq),
            (Value::Array(x), Value::Array(y)) => {
                x.len() == y.len() && x.iter().zip(y).all(|(l, r)| Self::deep_equal(l, r))
            }
            (Value::Object(x), Value::Object(y)) => {
                x.len() == y.len() && x.iter().all(|(k, l)| y.get(k).is_some_and(|r| Self::deep_equal(l, r)))
            }
            _ => a == b,
        }
    }

    fn compare_numbers(x: &Number, y: &Number) -> Option<Ordering> {
        if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
            return Some(a.cmp(&b));
        }
        if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
            return Some(a.cmp(&b));
        }
        Some(OrderedFloat(x.as_f64()?).cmp(&OrderedFloat(y.as_f64()?)))
    }
}

#[cfg(test)]
mod tests {
    use super::Helpers;
    use serde_json::json;
    use std::cmp::Ordering::*;

    #[test]
    fn canonical_tuple_is_deterministic_for_same_values() {
        let a = vec![json!(1), json!("x"), json!(true)];
        let b = vec![json!(1), json!("x"), json!(true)];
        assert_eq!(Helpers::canonical_tuple(&a), Helpers::canonical_tuple(&b));
    }

    #[test]
    fn canonical_tuple_differs_for_different_values() {
        let a = vec![json!(1), json!("x")];
        let b = vec![json!(1), json!("y")];
        assert_ne!(Helpers::canonical_tuple(&a), Helpers::canonical_tuple(&b));
        assert_ne!(Helpers::canonical_tuple(&[json!(null)]), Helpers::canonical_tuple(&[json!("null")]));
    }

    #[test]
    fn numbers_compare_across_int_and_float() {
        assert_eq!(Helpers::compare_values(&json!(1), &json!(1.5)), Some(Less));
        assert_eq!(Helpers::compare_values(&json!(2.0), &json!(2)), Some(Equal));
        assert_eq!(Helpers::compare_values(&json!(-3), &json!(u64::MAX)), Some(Less));
        assert_eq!(Helpers::compare_values(&json!(10), &json!(9)), Some(Greater));
    }

    #[test]
    fn strings_and_bools_order_within_kind() {
        assert_eq!(Helpers::compare_values(&json!("Alice"), &json!("Bob")), Some(Less));
        assert_eq!(Helpers::compare_values(&json!(false), &json!(true)), Some(Less));
    }

    #[test]
    fn mixed_kinds_do_not_order() {
        assert_eq!(Helpers::compare_values(&json!(1), &json!("1")), None);
        assert_eq!(Helpers::compare_values(&json!([1]), &json!([1])), None);
        assert_eq!(Helpers::compare_values(&json!(null), &json!(null)), None);
    }

    #[test]
    fn equality_is_deep_and_numeric() {
        assert_eq!(Helpers::values_equal(&json!(1), &json!(1.0)), Some(true));
        assert_eq!(Helpers::values_equal(&json!([1, "a"]), &json!([1.0, "a"])), Some(true));
        assert_eq!(Helpers::values_equal(&json!({"a": 1}), &json!({"a": 2})), Some(false));
        assert_eq!(Helpers::values_equal(&json!("x"), &json!("x")), Some(true));
    }

    #[test]
    fn equality_with_null_or_mixed_kinds_is_undecided() {
        assert_eq!(Helpers::values_equal(&json!(null), &json!(1)), None);
        assert_eq!(Helpers::values_equal(&json!(true), &json!(1)), None);
    }
}
