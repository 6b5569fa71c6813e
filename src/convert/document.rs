use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::convert::output::render_pretty;
use crate::convert::{Mode, TableRef};
use crate::core::TabconvError::{self, MalformedJson};

/// Top-level key of a replication document. The dot is part of the key.
pub const ROOT_KEY: &str = "cmd.replication_definition";
pub const TABLES_KEY: &str = "explicit_included_tables";

const TABLES_POINTER: &str =
    "/cmd.replication_definition/tasks/0/source/source_tables/explicit_included_tables";

/// A replication definition document.
///
/// Only `cmd.replication_definition.tasks[0].source.source_tables.explicit_included_tables`
/// is interpreted; every other key is carried through untouched and in its
/// original order.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    root: Value,
}

impl ConfigDocument {
    pub fn from_path(path: &Path) -> Result<Self, TabconvError> {
        let bytes = fs::read(path).map_err(|e| TabconvError::opening(path, e))?;
        Self::from_slice(&bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, TabconvError> {
        let root: Value =
            serde_json::from_slice(bytes).map_err(|e| MalformedJson(e.to_string()))?;
        Ok(Self { root })
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    /// Current table list, if the full path resolves to an array.
    pub fn explicit_included_tables(&self) -> Option<&Vec<Value>> {
        self.root.pointer(TABLES_POINTER).and_then(Value::as_array)
    }

    /// Applies `refs` to the table list and returns the resulting list length.
    ///
    /// Merge appends after the existing entries and needs the list to exist.
    /// Replace only needs `source_tables` to exist and overwrites or inserts
    /// the list.
    pub fn apply(&mut self, mode: Mode, refs: &[TableRef]) -> Result<usize, TabconvError> {
        let new_values = refs.iter().map(Value::from);
        let source_tables = self.source_tables_mut()?;
        match mode {
            Mode::Merge => {
                let tables = source_tables
                    .get_mut(TABLES_KEY)
                    .ok_or_else(|| missing(TABLES_KEY, "source_tables"))?
                    .as_array_mut()
                    .ok_or_else(|| MalformedJson(format!("'{TABLES_KEY}' is not an array")))?;
                tables.extend(new_values);
                Ok(tables.len())
            }
            Mode::Replace => {
                source_tables.insert(TABLES_KEY.to_string(), Value::Array(new_values.collect()));
                Ok(refs.len())
            }
        }
    }

    pub fn to_pretty_bytes(&self) -> Result<Vec<u8>, TabconvError> {
        render_pretty(&self.root)
    }

    fn source_tables_mut(&mut self) -> Result<&mut Map<String, Value>, TabconvError> {
        let definition = field_mut(&mut self.root, ROOT_KEY, "document root")?;
        let first_task = field_mut(definition, "tasks", ROOT_KEY)?
            .as_array_mut()
            .ok_or_else(|| MalformedJson("'tasks' is not an array".to_string()))?
            .first_mut()
            .ok_or_else(|| MalformedJson("'tasks' is empty".to_string()))?;
        let source = field_mut(first_task, "source", "tasks[0]")?;
        field_mut(source, "source_tables", "source")?
            .as_object_mut()
            .ok_or_else(|| MalformedJson("'source_tables' is not an object".to_string()))
    }
}

fn field_mut<'a>(value: &'a mut Value, key: &str, parent: &str) -> Result<&'a mut Value, TabconvError> {
    value
        .as_object_mut()
        .ok_or_else(|| MalformedJson(format!("'{parent}' is not an object")))?
        .get_mut(key)
        .ok_or_else(|| missing(key, parent))
}

fn missing(key: &str, parent: &str) -> TabconvError {
    MalformedJson(format!("missing '{key}' in '{parent}'"))
}
