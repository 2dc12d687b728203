/*
 * value.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Type coercion and merging of JSON values.
//!
//! A token may declare the type its value is cast to (`{{number:age}}`).
//! Tokens without a declared type pass values through unchanged.

use crate::error::{TemplateError, TemplateResult};
use serde_json::{Number, Value};
use std::fmt;

/// The type a token's value is cast to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CastType {
    String,
    Number,
    Object,
    /// No declared type; the value is used as-is.
    #[default]
    Passthrough,
}

impl CastType {
    /// Parse a declared type tag. Returns `None` for unknown tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "string" => Some(CastType::String),
            "number" => Some(CastType::Number),
            "object" => Some(CastType::Object),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CastType::String => "string",
            CastType::Number => "number",
            CastType::Object => "object",
            CastType::Passthrough => "passthrough",
        }
    }

    /// Cast `value` to this type.
    pub fn cast(self, value: Value) -> TemplateResult<Value> {
        match self {
            CastType::Passthrough => Ok(value),
            CastType::String => Ok(Value::String(stringify(&value))),
            CastType::Number => to_number(&value),
            CastType::Object => to_object(value),
        }
    }
}

impl fmt::Display for CastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render a value as text: strings as-is, everything else as JSON.
///
/// Whole floats render like integers, so `5.0` and `5` both give `5`.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_f64() => match n.as_f64().and_then(number_from_f64) {
            Some(normalized) => normalized.to_string(),
            None => n.to_string(),
        },
        other => other.to_string(),
    }
}

fn to_number(value: &Value) -> TemplateResult<Value> {
    let failure = |message: String| TemplateError::Coercion {
        target: CastType::Number.as_str(),
        message,
    };

    let parsed = match value {
        Value::Number(_) => return Ok(value.clone()),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| failure(format!("`{}` is not a number", s)))?,
        other => return Err(failure(format!("`{}` is not a number", other))),
    };
    number_from_f64(parsed).ok_or_else(|| failure(format!("`{}` is not finite", parsed)))
}

/// Build a JSON number, preferring an integer when no precision is lost.
pub fn number_from_f64(n: f64) -> Option<Value> {
    if n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        return Some(Value::from(n as i64));
    }
    Number::from_f64(n).map(Value::Number)
}

fn to_object(value: Value) -> TemplateResult<Value> {
    match value {
        Value::String(s) => serde_json::from_str(&s).map_err(|e| TemplateError::Coercion {
            target: CastType::Object.as_str(),
            message: format!("`{}` is not valid JSON: {}", s, e),
        }),
        other => Ok(other),
    }
}

/// Deep-merge `source` into `target`.
///
/// Objects merge per key and arrays per index. Any other pairing is
/// replaced by `source`, so the last merged value wins on collisions.
/// A `null` array element in `source` is a hole left by [`crate::path::set`]
/// and never overwrites an existing element.
pub fn merge(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                match target.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(target), Value::Array(source)) => {
            for (index, value) in source.into_iter().enumerate() {
                match target.get_mut(index) {
                    Some(_) if value.is_null() => {}
                    Some(existing) => merge(existing, value),
                    None => target.push(value),
                }
            }
        }
        (target, source) => *target = source,
    }
}
