/*
 * interpolate.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Forward substitution of tokens in a single template string.

use crate::error::{TemplateError, TemplateResult};
use crate::options::TemplateOptions;
use crate::path;
use crate::token::{self, Token};
use crate::value;
use serde_json::Value;

/// Substitute the tokens of `source` with values from `data`.
///
/// - No tokens: `source` is returned unchanged.
/// - A single token spanning the whole string: the resolved value is
///   returned with its own type (after the token's cast).
/// - Otherwise every token is replaced by its value rendered as text.
///
/// With `allow_missing`, a token that cannot be resolved makes the whole
/// of `source` come back unchanged.
pub fn interpolate(source: &str, data: &Value, options: &TemplateOptions) -> TemplateResult<Value> {
    let tokens = token::scan(source, &options.delimiters)?;
    if tokens.is_empty() {
        return Ok(Value::String(source.to_string()));
    }

    if let Some(whole) = token::bounded(source, &tokens) {
        return Ok(match resolve(whole, data, options)? {
            Some(value) => value,
            None => Value::String(source.to_string()),
        });
    }

    let mut out = String::with_capacity(source.len());
    let mut literal_start = 0;
    for token in &tokens {
        let Some(value) = resolve(token, data, options)? else {
            return Ok(Value::String(source.to_string()));
        };
        out.push_str(&source[literal_start..token.span.start]);
        out.push_str(&value::stringify(&value));
        literal_start = token.span.end;
    }
    out.push_str(&source[literal_start..]);

    Ok(Value::String(out))
}

/// Resolve one token against `data` and apply its cast.
///
/// Returns `None` when the value is missing, there is no default and
/// `allow_missing` is set.
fn resolve(
    token: &Token,
    data: &Value,
    options: &TemplateOptions,
) -> TemplateResult<Option<Value>> {
    let segments = path::parse(&token.path)?;
    let found = path::get(data, &segments);

    // Absent and null both count as missing
    let value = if let Some(found) = found.filter(|v| !v.is_null()) {
        found.clone()
    } else if let Some(default) = &token.default {
        tracing::trace!(path = %token.path, "using default value");
        default.clone()
    } else if options.allow_missing {
        tracing::debug!(expression = %token.expression, "leaving unresolved string unchanged");
        return Ok(None);
    } else {
        return Err(TemplateError::MissingVariable {
            expression: token.expression.clone(),
        });
    };

    token.cast.cast(value).map(Some)
}
