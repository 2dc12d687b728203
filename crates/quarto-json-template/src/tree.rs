/*
 * tree.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Tree-level operations: apply the string engines across nested
//! objects and arrays.

use crate::deinterpolate::deinterpolate;
use crate::error::TemplateResult;
use crate::interpolate::interpolate;
use crate::options::TemplateOptions;
use crate::token;
use crate::value;
use serde_json::{Map, Value};

/// Compile `template` with `data` into a result tree.
///
/// Objects and arrays are walked recursively, strings are interpolated
/// and every other value is copied unchanged.
pub fn compile(template: &Value, data: &Value, options: &TemplateOptions) -> TemplateResult<Value> {
    match template {
        Value::Object(map) => map
            .iter()
            .map(|(key, child)| Ok((key.clone(), compile(child, data, options)?)))
            .collect::<TemplateResult<Map<String, Value>>>()
            .map(Value::Object),
        Value::Array(items) => items
            .iter()
            .map(|child| compile(child, data, options))
            .collect::<TemplateResult<Vec<Value>>>()
            .map(Value::Array),
        Value::String(source) => interpolate(source, data, options),
        other => Ok(other.clone()),
    }
}

/// Recover the data context that `result` was compiled from.
///
/// Only paths referenced by the template's tokens can be recovered.
pub fn decompile(
    template: &Value,
    result: &Value,
    options: &TemplateOptions,
) -> TemplateResult<Value> {
    let mut data = Value::Object(Map::new());
    collect(template, Some(result), options, &mut data)?;
    Ok(data)
}

fn collect(
    template: &Value,
    result: Option<&Value>,
    options: &TemplateOptions,
    data: &mut Value,
) -> TemplateResult<()> {
    match template {
        Value::Object(map) => {
            for (key, child) in map {
                let produced = result.and_then(|r| r.get(key));
                collect(child, produced, options, data)?;
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                let produced = result.and_then(|r| r.get(index));
                collect(child, produced, options, data)?;
            }
        }
        Value::String(source) => {
            let fragment = deinterpolate(source, result, &options.delimiters)?;
            value::merge(data, fragment);
        }
        _ => {}
    }
    Ok(())
}

/// Check whether `object` is a compilation of `template`.
///
/// The data recovered from `object` is compiled again and compared with
/// `object`. A variable that cannot be resolved during that compile means
/// "no match"; every other error is returned.
pub fn matches(
    template: &Value,
    object: &Value,
    options: &TemplateOptions,
) -> TemplateResult<bool> {
    let data = decompile(template, object, options)?;
    let strict = TemplateOptions {
        allow_missing: false,
        ..options.clone()
    };
    match compile(template, &data, &strict) {
        Ok(recompiled) => Ok(&recompiled == object),
        Err(e) if e.is_missing_variable() => {
            tracing::debug!(error = %e, "recompile failed, treating as no match");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Every property path referenced by `template`, in document order and
/// without duplicates.
pub fn referenced_paths(
    template: &Value,
    options: &TemplateOptions,
) -> TemplateResult<Vec<String>> {
    let mut paths = Vec::new();
    visit_paths(template, options, &mut paths)?;
    Ok(paths)
}

fn visit_paths(
    template: &Value,
    options: &TemplateOptions,
    paths: &mut Vec<String>,
) -> TemplateResult<()> {
    match template {
        Value::Object(map) => {
            for child in map.values() {
                visit_paths(child, options, paths)?;
            }
        }
        Value::Array(items) => {
            for child in items {
                visit_paths(child, options, paths)?;
            }
        }
        Value::String(source) => {
            for token in token::scan(source, &options.delimiters)? {
                if !paths.contains(&token.path) {
                    paths.push(token.path);
                }
            }
        }
        _ => {}
    }
    Ok(())
}
