use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::JsonPrimitive;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub ty: JsonPrimitive,
    pub nullable: bool,
}

impl FieldInfo {
    pub fn new(ty: JsonPrimitive, nullable: bool) -> Self {
        Self { ty, nullable }
    }

    pub fn infer_field_info(value: &Value) -> FieldInfo {
        let ty = JsonPrimitive::of_value(value);
        FieldInfo { ty, nullable: ty == JsonPrimitive::Null }
    }

    pub fn merge_field_info(&self, new: &FieldInfo) -> FieldInfo {
        let promoted = JsonPrimitive::promote(self.ty, new.ty);
        FieldInfo {
            ty: if promoted == JsonPrimitive::Null { self.ty } else { promoted },
            nullable: self.nullable || new.nullable || new.ty == JsonPrimitive::Null,
        }
    }
}
