use serde::{Deserialize, Serialize};

/// A named, optionally aliased use of a table inside one template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableReference {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl TableReference {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), alias: None }
    }

    pub fn aliased(name: &str, alias: &str) -> Self {
        Self { name: name.to_string(), alias: Some(alias.to_string()) }
    }

    /// The key this usage is known by: the alias if any, else the table name.
    pub fn key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_prefers_alias() {
        assert_eq!(TableReference::new("user").key(), "user");
        assert_eq!(TableReference::aliased("user", "monkey").key(), "monkey");
    }

    #[test]
    fn null_alias_is_accepted() {
        let t: TableReference = serde_json::from_value(json!({"name": "user", "alias": null})).unwrap();
        assert_eq!(t, TableReference::new("user"));
    }
}
