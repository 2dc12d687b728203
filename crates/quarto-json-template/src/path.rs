/*
 * path.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Property paths into JSON trees.
//!
//! A path addresses a value with dot and bracket segments, for example
//! `employee.salary`, `items[0].name` or `meta["odd.key"]`.

use crate::error::{TemplateError, TemplateResult};
use serde_json::{Map, Value};

/// One step of a property path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// An object key.
    Key(String),
    /// An array index written in brackets.
    Index(usize),
}

/// Parse a property path into its segments.
pub fn parse(path: &str) -> TemplateResult<Vec<Segment>> {
    let invalid = |message: &str| TemplateError::InvalidPath {
        path: path.to_string(),
        message: message.to_string(),
    };

    let mut segments = Vec::new();
    let mut chars = path.char_indices().peekable();
    let mut key = String::new();
    // Set after a closing bracket, where a bare key may not follow directly
    let mut after_bracket = false;

    while let Some((_, ch)) = chars.next() {
        match ch {
            '.' => {
                if key.is_empty() && !after_bracket {
                    return Err(invalid("empty segment"));
                }
                if !key.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut key)));
                }
                after_bracket = false;
                // A trailing or doubled dot leaves an empty segment behind
                if matches!(chars.peek(), None | Some((_, '.' | '['))) {
                    return Err(invalid("empty segment"));
                }
            }
            '[' => {
                if !key.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut key)));
                }
                let mut inner = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == ']' && !is_open_quote(&inner) {
                        closed = true;
                        break;
                    }
                    inner.push(c);
                }
                if !closed {
                    return Err(invalid("unterminated bracket"));
                }
                segments.push(bracket_segment(inner.trim()).ok_or_else(|| invalid("bad bracket"))?);
                after_bracket = true;
            }
            _ => {
                if after_bracket {
                    return Err(invalid("expected `.` or `[` after `]`"));
                }
                key.push(ch);
            }
        }
    }

    if !key.is_empty() {
        segments.push(Segment::Key(key));
    }
    if segments.is_empty() {
        return Err(invalid("empty path"));
    }
    Ok(segments)
}

/// Whether `inner` starts a quoted key that has not been closed yet.
fn is_open_quote(inner: &str) -> bool {
    let inner = inner.trim_start();
    match inner.chars().next() {
        Some(q @ ('"' | '\'')) => inner.len() == 1 || !inner[1..].ends_with(q),
        _ => false,
    }
}

fn bracket_segment(inner: &str) -> Option<Segment> {
    for quote in ['"', '\''] {
        if let Some(rest) = inner.strip_prefix(quote) {
            return rest
                .strip_suffix(quote)
                .map(|key| Segment::Key(key.to_string()));
        }
    }
    inner.parse::<usize>().ok().map(Segment::Index)
}

/// Look up a value by path.
pub fn get<'a>(value: &'a Value, segments: &[Segment]) -> Option<&'a Value> {
    segments.iter().try_fold(value, |current, segment| match (current, segment) {
        (Value::Object(map), Segment::Key(key)) => map.get(key),
        (Value::Object(map), Segment::Index(index)) => map.get(&index.to_string()),
        (Value::Array(items), Segment::Index(index)) => items.get(*index),
        (Value::Array(items), Segment::Key(key)) => {
            key.parse::<usize>().ok().and_then(|index| items.get(index))
        }
        _ => None,
    })
}

/// Largest array index [`set`] will create.
pub const MAX_INDEX: usize = 1 << 16;

/// Assign `value` at `segments`, creating intermediate objects and arrays.
///
/// Existing scalars in the way are replaced by containers. An index above
/// [`MAX_INDEX`] is rejected rather than padded out.
pub fn set(target: &mut Value, segments: &[Segment], value: Value) -> TemplateResult<()> {
    let Some((segment, rest)) = segments.split_first() else {
        *target = value;
        return Ok(());
    };

    let slot = match segment {
        Segment::Key(key) => {
            if !target.is_object() {
                *target = Value::Object(Map::new());
            }
            let Value::Object(map) = target else {
                return Ok(());
            };
            map.entry(key.clone()).or_insert(Value::Null)
        }
        Segment::Index(index) => {
            if *index > MAX_INDEX {
                return Err(TemplateError::InvalidPath {
                    path: format!("[{}]", index),
                    message: format!("index exceeds {}", MAX_INDEX),
                });
            }
            if !target.is_array() {
                *target = Value::Array(Vec::new());
            }
            let Value::Array(items) = target else {
                return Ok(());
            };
            if items.len() <= *index {
                items.resize(*index + 1, Value::Null);
            }
            &mut items[*index]
        }
    };
    set(slot, rest, value)
}
