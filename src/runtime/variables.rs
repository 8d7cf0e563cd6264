//=====================================================
// File: runtime/variables.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Global variable table for a QuillScript run
// Objective: Type-inferring assignment plus plain, indexed and keyed lookup
//=====================================================

use std::collections::HashMap;

use tracing::trace;

use super::value::Value;
use crate::interpreter::RuntimeError;

/// Name to value table. One per interpreter run; entries live until it is dropped.
#[derive(Debug, Default, Clone)]
pub struct VariableStore {
    values: HashMap<String, Value>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `raw` and store it under `name`, replacing any previous value.
    pub fn assign(&mut self, name: &str, raw: &str) -> Result<(), RuntimeError> {
        let value = Value::from_literal(raw)?;
        trace!(name, kind = value.type_name(), "assign");
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&Value, RuntimeError> {
        self.values
            .get(name)
            .ok_or_else(|| RuntimeError::UndefinedVariable(name.to_string()))
    }

    /// `name[index]` on a string array. Negative indices are out of bounds.
    pub fn index(&self, name: &str, index: i64) -> Result<&str, RuntimeError> {
        match self.lookup(name)? {
            Value::StringArray(items) => usize::try_from(index)
                .ok()
                .and_then(|position| items.get(position))
                .map(String::as_str)
                .ok_or_else(|| RuntimeError::IndexOutOfBounds {
                    name: name.to_string(),
                    index,
                    len: items.len(),
                }),
            other => Err(RuntimeError::type_mismatch(
                name,
                "array",
                other.type_name(),
            )),
        }
    }

    /// `name["key"]` on an integer map.
    pub fn key(&self, name: &str, key: &str) -> Result<i64, RuntimeError> {
        match self.lookup(name)? {
            Value::IntMap(entries) => {
                entries
                    .get(key)
                    .copied()
                    .ok_or_else(|| RuntimeError::KeyNotFound {
                        name: name.to_string(),
                        key: key.to_string(),
                    })
            }
            other => Err(RuntimeError::type_mismatch(
                name,
                "dictionary",
                other.type_name(),
            )),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}


//=====================================================
// End of file
//=====================================================
