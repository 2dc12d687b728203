/*
 * deinterpolate.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Reverse substitution: recover data from a template string and the
//! value that was produced from it.

use crate::error::{TemplateError, TemplateResult};
use crate::options::Delimiters;
use crate::path;
use crate::token::{self, Token};
use crate::value;
use regex::Regex;
use serde_json::{Map, Value};

/// Recover the data referenced by the tokens of `source` from `produced`.
///
/// `produced` is `None` when the result tree has nothing at the position
/// of `source`. The returned fragment is always an object; values from
/// several tokens are deep-merged and a path written twice keeps the
/// value of its last token.
pub fn deinterpolate(
    source: &str,
    produced: Option<&Value>,
    delimiters: &Delimiters,
) -> TemplateResult<Value> {
    let tokens = token::scan(source, delimiters)?;
    let mut fragment = Value::Object(Map::new());
    if tokens.is_empty() {
        return Ok(fragment);
    }

    if let Some(whole) = token::bounded(source, &tokens) {
        if let Some(produced) = produced {
            let recovered = recover_whole(whole, produced)?;
            assign(&mut fragment, &whole.path, recovered)?;
        }
        return Ok(fragment);
    }

    let text = match produced {
        Some(Value::String(s)) => s.clone(),
        Some(other) if !other.is_null() => value::stringify(other),
        _ => {
            return Err(TemplateError::NoMatch {
                expression: tokens[0].expression.clone(),
            });
        }
    };

    let captures = capture_tokens(source, &tokens, &text)?;
    for (token, captured) in tokens.iter().zip(captures) {
        let Some(captured) = captured else {
            return Err(TemplateError::NoMatch {
                expression: token.expression.clone(),
            });
        };
        let recovered = match &token.default {
            Some(default) if value::stringify(default) == captured => default.clone(),
            _ => token.cast.cast(Value::String(captured))?,
        };
        assign(&mut fragment, &token.path, recovered)?;
    }

    Ok(fragment)
}

/// Recover the value of a token that made up its whole string.
fn recover_whole(token: &Token, produced: &Value) -> TemplateResult<Value> {
    match &token.default {
        Some(default) if default == produced => {
            tracing::trace!(path = %token.path, "produced value equals default");
            Ok(default.clone())
        }
        _ => token.cast.cast(produced.clone()),
    }
}

/// Match `text` against the literal skeleton of `source`, capturing the
/// text each token produced. Every capture is `None` when `text` does not
/// fit the skeleton.
fn capture_tokens(
    source: &str,
    tokens: &[Token],
    text: &str,
) -> TemplateResult<Vec<Option<String>>> {
    let mut pattern = String::from("(?s)^");
    let mut literal_start = 0;
    for token in tokens {
        pattern.push_str(&regex::escape(&source[literal_start..token.span.start]));
        pattern.push_str("(.*)");
        literal_start = token.span.end;
    }
    pattern.push_str(&regex::escape(&source[literal_start..]));
    pattern.push('$');

    let skeleton = Regex::new(&pattern).map_err(|e| TemplateError::NoMatch {
        expression: format!("{} ({})", source, e),
    })?;

    Ok(match skeleton.captures(text) {
        Some(caps) => (1..=tokens.len())
            .map(|i| caps.get(i).map(|m| m.as_str().to_string()))
            .collect(),
        None => vec![None; tokens.len()],
    })
}

fn assign(fragment: &mut Value, path: &str, recovered: Value) -> TemplateResult<()> {
    let segments = path::parse(path)?;
    let mut piece = Value::Object(Map::new());
    path::set(&mut piece, &segments, recovered).map_err(|e| match e {
        TemplateError::InvalidPath { message, .. } => TemplateError::InvalidPath {
            path: path.to_string(),
            message,
        },
        other => other,
    })?;
    value::merge(fragment, piece);
    Ok(())
}
