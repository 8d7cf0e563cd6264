//=====================================================
// File: runtime/value.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: QuillScript runtime value types
// Objective: Tagged value representation with literal classification and
//            stringification rules used by print and placeholder rendering
//=====================================================

use std::collections::BTreeMap;
use std::fmt;

use crate::interpreter::RuntimeError;

//=====================================================
// Section 1.0 - Value
//=====================================================

/// A value held by a variable. Immutable once built; reassignment replaces it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    StringArray(Vec<String>),
    IntMap(BTreeMap<String, i64>),
}

impl Value {
    /// Classify raw assignment text into a value.
    ///
    /// Precedence: integer, float, boolean, array, map, then string. Only a map
    /// literal can fail to classify; every other text falls back to a string.
    pub fn from_literal(raw: &str) -> Result<Value, RuntimeError> {
        if is_integer_literal(raw) {
            if let Ok(value) = raw.parse::<i64>() {
                return Ok(Value::Integer(value));
            }
        }
        if let Some(value) = parse_float_literal(raw) {
            return Ok(Value::Float(value));
        }
        match raw {
            "true" => return Ok(Value::Boolean(true)),
            "false" => return Ok(Value::Boolean(false)),
            _ => {}
        }
        if raw.len() >= 2 && raw.starts_with('[') && raw.ends_with(']') {
            return Ok(Value::StringArray(parse_array(&raw[1..raw.len() - 1])));
        }
        if raw.len() >= 2 && raw.starts_with('{') && raw.ends_with('}') {
            return parse_map(raw).map(Value::IntMap);
        }
        Ok(Value::String(trim_quotes(raw).to_string()))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::StringArray(_) => "array",
            Value::IntMap(_) => "dictionary",
        }
    }

    /// Numeric view used by arithmetic; only integers and floats qualify.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(text) => f.write_str(text),
            Value::Integer(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value:.6}"),
            Value::Boolean(value) => write!(f, "{value}"),
            Value::StringArray(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "\"{item}\"")?;
                }
                f.write_str("]")
            }
            Value::IntMap(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "\"{key}\": {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

//=====================================================
// Section 2.0 - Literal Helpers
//=====================================================

fn is_integer_literal(raw: &str) -> bool {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

// `f64::from_str` also accepts `inf`/`nan` spellings, which stay strings here.
fn parse_float_literal(raw: &str) -> Option<f64> {
    if !raw.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    if raw.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') {
        return None;
    }
    raw.parse::<f64>().ok()
}

pub(crate) fn trim_quotes(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &text[1..text.len() - 1];
        }
    }
    text
}

fn parse_array(inner: &str) -> Vec<String> {
    if inner.trim().is_empty() {
        return Vec::new();
    }
    inner
        .split(',')
        .map(|item| trim_quotes(item.trim()).to_string())
        .collect()
}

fn parse_map(raw: &str) -> Result<BTreeMap<String, i64>, RuntimeError> {
    let inner = &raw[1..raw.len() - 1];
    let mut entries = BTreeMap::new();
    if inner.trim().is_empty() {
        return Ok(entries);
    }
    for pair in inner.split(',') {
        let (key, value) = pair
            .split_once(':')
            .ok_or_else(|| RuntimeError::InvalidDictionaryFormat(raw.to_string()))?;
        let key = trim_quotes(key.trim()).to_string();
        let value = value
            .trim()
            .parse::<i64>()
            .map_err(|_| RuntimeError::InvalidDictionaryFormat(raw.to_string()))?;
        entries.insert(key, value);
    }
    Ok(entries)
}


//=====================================================
// End of file
//=====================================================
