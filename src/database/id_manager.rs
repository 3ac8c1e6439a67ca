use std::fmt::Display;

use serde_json::Value;
use uuid::Uuid;

use crate::IdType;

#[derive(Debug, Clone, PartialEq)]
pub enum IdValue {
    Uuid(String),
    Int(u64),
}

impl Display for IdValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdValue::Uuid(uuid) => f.write_str(uuid),
            IdValue::Int(id) => write!(f, "{id}"),
        }
    }
}

impl IdValue {
    /// The value written into the row under the id key.
    pub fn to_json(&self) -> Value {
        match self {
            IdValue::Uuid(uuid) => Value::String(uuid.clone()),
            IdValue::Int(id) => Value::from(*id),
        }
    }
}

/// Storage key for a JSON id value. Numbers and strings are accepted.
pub fn id_key_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct IdManager {
    pub id_type: IdType,
    pub current: Option<IdValue>,
}

impl IdManager {
    pub fn new(id_type: IdType) -> Self {
        Self { id_type, current: None }
    }

    /// Keep the integer sequence ahead of an id supplied by the caller.
    pub fn observe(&mut self, value: &Value) {
        if self.id_type != IdType::Int {
            return;
        }
        if let Some(seen) = value.as_u64() {
            match self.current {
                Some(IdValue::Int(current)) if current >= seen => {}
                _ => self.current = Some(IdValue::Int(seen)),
            }
        }
    }
}

impl Iterator for IdManager {
    type Item = IdValue;

    fn next(&mut self) -> Option<Self::Item> {
        let item = match (&self.current, self.id_type) {
            (_, IdType::None) => return None,
            (Some(IdValue::Int(id)), _) => IdValue::Int(id.checked_add(1)?),
            (_, IdType::Int) => IdValue::Int(1),
            (_, IdType::Uuid) => IdValue::Uuid(Uuid::new_v4().to_string()),
        };

        self.current = Some(item.clone());
        Some(item)
    }
}
