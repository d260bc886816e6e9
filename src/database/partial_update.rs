//! Partial-update `SET` clause builder.
//!
//! Turns a sparse [`ChangeSet`] into a `SET` fragment plus its positional
//! parameters. Column names cannot be bound as parameters, so they are
//! interpolated (double-quoted) into the fragment; they must come from a
//! [`FieldNameMap`] compiled into the binary or from keys that already passed
//! an allow-list in the validation layer.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PartialUpdateError {
    /// The change set had no keys.
    #[error("No data")]
    InvalidInput,

    #[error("Unsupported value for field '{0}': expected string, number, boolean or null")]
    UnsupportedValue(String),
}

/// A value that can be bound opaquely to a positional placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SqlValue {
    pub fn from_json(field: &str, value: Value) -> Result<Self, PartialUpdateError> {
        match value {
            Value::Null => Ok(SqlValue::Null),
            Value::Bool(b) => Ok(SqlValue::Bool(b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(SqlValue::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(SqlValue::Float(f))
                } else {
                    Err(PartialUpdateError::UnsupportedValue(field.to_string()))
                }
            }
            Value::String(s) => Ok(SqlValue::Text(s)),
            Value::Array(_) | Value::Object(_) => {
                Err(PartialUpdateError::UnsupportedValue(field.to_string()))
            }
        }
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        SqlValue::Text(s)
    }
}

impl From<i64> for SqlValue {
    fn from(i: i64) -> Self {
        SqlValue::Int(i)
    }
}

impl From<f64> for SqlValue {
    fn from(f: f64) -> Self {
        SqlValue::Float(f)
    }
}

impl From<bool> for SqlValue {
    fn from(b: bool) -> Self {
        SqlValue::Bool(b)
    }
}

/// Ordered field → value pairs. Iteration follows insertion order, which
/// fixes the placeholder numbering of the generated fragment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    entries: Vec<(String, SqlValue)>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `field`. An existing key keeps its position and takes the new value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<SqlValue>) -> &mut Self {
        let field = field.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
        self
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&SqlValue> {
        self.entries.iter().find(|(k, _)| k == field).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Builds a change set from a JSON object, keeping the object's key order.
    pub fn from_json_object(object: Map<String, Value>) -> Result<Self, PartialUpdateError> {
        let mut changes = ChangeSet::new();
        for (field, value) in object {
            let value = SqlValue::from_json(&field, value)?;
            changes.entries.push((field, value));
        }
        Ok(changes)
    }
}

/// Logical field name → physical column name.
///
/// Only constructible from `'static` tables so column names stay under code
/// control.
#[derive(Debug, Clone, Copy)]
pub struct FieldNameMap {
    entries: &'static [(&'static str, &'static str)],
}

impl FieldNameMap {
    pub const EMPTY: FieldNameMap = FieldNameMap { entries: &[] };

    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// Mapped column for `field`, or `field` itself when unmapped.
    pub fn resolve<'a>(&self, field: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|(logical, _)| *logical == field)
            .map(|(_, column)| *column)
            .unwrap_or(field)
    }
}

/// `SET` clause text and its bound values. `values[i]` binds to `$<i+1>`.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFragment {
    pub set_clause: String,
    pub values: Vec<SqlValue>,
}

impl SqlFragment {
    /// Placeholder index for the first parameter after the `SET` values,
    /// e.g. the row key in `WHERE id = $n`.
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }
}

pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Builds the `SET` fragment for a partial update.
///
/// `{firstName: "Aliya", age: 32}` with `{firstName: "first_name"}` becomes
/// `"first_name"=$1, "age"=$2` with values `["Aliya", 32]`.
pub fn build(changes: &ChangeSet, field_names: &FieldNameMap) -> Result<SqlFragment, PartialUpdateError> {
    if changes.is_empty() {
        return Err(PartialUpdateError::InvalidInput);
    }

    let set_clause = changes
        .keys()
        .enumerate()
        .map(|(i, field)| format!("{}=${}", quote_identifier(field_names.resolve(field)), i + 1))
        .collect::<Vec<_>>()
        .join(", ");

    let values = changes.iter().map(|(_, v)| v.clone()).collect();

    Ok(SqlFragment { set_clause, values })
}
