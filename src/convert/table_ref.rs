use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// One `(owner, name)` pair from the CSV, both sides trimmed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableRef {
    pub owner: String,
    pub name: String,
}

impl TableRef {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.trim().to_string(),
            name: name.trim().to_string(),
        }
    }
}

impl From<&TableRef> for Value {
    fn from(table: &TableRef) -> Self {
        json!({
            "owner": table.owner,
            "name": table.name,
        })
    }
}
