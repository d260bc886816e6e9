//! Request body validation.
//!
//! Each endpoint declares a [`Schema`]: an allow-list of fields with their
//! kinds. Validation collects every violation, mirroring JSON Schema's
//! `instance.<field> ...` messages, and rejects unknown properties so that
//! only allow-listed keys reach the partial-update builder.

pub mod schemas;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::database::partial_update::ChangeSet;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    String { min: usize, max: Option<usize> },
    /// Whole numbers within `[min, max]`; `10.0` counts as `10`.
    Integer { min: i64, max: i64 },
    /// Any JSON number within `[min, max]`.
    Number { min: f64, max: f64 },
    Boolean,
    Email { min: usize, max: usize },
    Uri,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub nullable: bool,
}

impl FieldRule {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, required: false, nullable: false }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [FieldRule],
}

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid built-in email regex"));

impl Schema {
    /// Rewrites whole-valued floats in integer fields (`10.0`) as integers so
    /// they deserialize and bind like `10`. Call after `validate`.
    fn normalize(&self, body: &mut Value) {
        let Value::Object(object) = body else { return };
        for rule in self.fields {
            if !matches!(rule.kind, FieldKind::Integer { .. }) {
                continue;
            }
            if let Some(value) = object.get_mut(rule.name) {
                if value.is_f64() {
                    if let Some(n) = as_integer(value) {
                        *value = Value::from(n as i64);
                    }
                }
            }
        }
    }

    pub fn validate(&self, body: &Value) -> Result<(), Vec<String>> {
        let object = match body {
            Value::Object(map) => map,
            _ => return Err(vec!["instance is not of a type(s) object".to_string()]),
        };

        let mut errors = Vec::new();

        for key in object.keys() {
            if !self.fields.iter().any(|rule| rule.name == key) {
                errors.push(format!(
                    "instance is not allowed to have the additional property \"{}\"",
                    key
                ));
            }
        }

        for rule in self.fields {
            match object.get(rule.name) {
                None if rule.required => {
                    errors.push(format!("instance requires property \"{}\"", rule.name));
                }
                None => {}
                Some(Value::Null) if rule.nullable => {}
                Some(value) => {
                    if let Err(msg) = check_kind(rule.kind, value) {
                        errors.push(format!("instance.{} {}", rule.name, msg));
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_kind(kind: FieldKind, value: &Value) -> Result<(), String> {
    match kind {
        FieldKind::String { min, max } => {
            let s = value.as_str().ok_or("is not of a type(s) string")?;
            check_length(s, min, max)
        }
        FieldKind::Integer { min, max } => {
            let n = as_integer(value).ok_or("is not of a type(s) integer")?;
            if n < min as f64 {
                return Err(format!("must be greater than or equal to {}", min));
            }
            if n > max as f64 {
                return Err(format!("must be less than or equal to {}", max));
            }
            Ok(())
        }
        FieldKind::Number { min, max } => {
            let n = value.as_f64().ok_or("is not of a type(s) number")?;
            if n < min {
                return Err(format!("must be greater than or equal to {}", min));
            }
            if n > max {
                return Err(format!("must be less than or equal to {}", max));
            }
            Ok(())
        }
        FieldKind::Boolean => value
            .as_bool()
            .map(|_| ())
            .ok_or_else(|| "is not of a type(s) boolean".to_string()),
        FieldKind::Email { min, max } => {
            let s = value.as_str().ok_or("is not of a type(s) string")?;
            check_length(s, min, Some(max))?;
            if !EMAIL_RE.is_match(s) {
                return Err("does not conform to the \"email\" format".to_string());
            }
            Ok(())
        }
        FieldKind::Uri => {
            let s = value.as_str().ok_or("is not of a type(s) string")?;
            url::Url::parse(s)
                .map(|_| ())
                .map_err(|_| "does not conform to the \"uri\" format".to_string())
        }
    }
}

/// Integral value of a JSON number, including whole-valued floats.
fn as_integer(value: &Value) -> Option<f64> {
    if let Some(i) = value.as_i64() {
        return Some(i as f64);
    }
    value.as_f64().filter(|f| f.is_finite() && f.fract() == 0.0)
}

fn check_length(s: &str, min: usize, max: Option<usize>) -> Result<(), String> {
    let len = s.chars().count();
    if len < min {
        return Err(format!("does not meet minimum length of {}", min));
    }
    if let Some(max) = max {
        if len > max {
            return Err(format!("does not meet maximum length of {}", max));
        }
    }
    Ok(())
}

/// Validates `body` against `schema` and deserializes it.
pub fn validate_into<T: DeserializeOwned>(schema: &Schema, mut body: Value) -> Result<T, ApiError> {
    schema.validate(&body).map_err(ApiError::validation_error)?;
    schema.normalize(&mut body);
    serde_json::from_value(body).map_err(|e| {
        tracing::warn!("{} body passed validation but failed to deserialize: {}", schema.name, e);
        ApiError::bad_request(e.to_string())
    })
}

/// Validates a partial-update body and converts it to an ordered change set.
pub fn validate_changes(schema: &Schema, mut body: Value) -> Result<ChangeSet, ApiError> {
    schema.validate(&body).map_err(ApiError::validation_error)?;
    schema.normalize(&mut body);
    match body {
        Value::Object(map) => Ok(ChangeSet::from_json_object(map)?),
        _ => Err(ApiError::bad_request("instance is not of a type(s) object")),
    }
}
