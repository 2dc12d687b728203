/*
 * token.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Token scanner.
//!
//! A token is `open [type ":"] path ["||" json-default] close`, e.g.
//! `{{name}}`, `{{number:age}}` or `{{name || "Jane"}}`. The scanner walks
//! the template text directly, so literal text is never interpreted as a
//! pattern and may contain any characters.

use crate::error::{TemplateError, TemplateResult};
use crate::options::Delimiters;
use crate::value::CastType;
use serde_json::Value;
use std::ops::Range;

const DEFAULT_SEPARATOR: &str = "||";

/// A token found in a template string.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Byte range of the whole token, delimiters included.
    pub span: Range<usize>,

    /// Declared cast type.
    pub cast: CastType,

    /// The property path, trimmed.
    pub path: String,

    /// The parsed default clause, if any.
    pub default: Option<Value>,

    /// Path and default clause as written, e.g. `name || "Jane"`.
    pub expression: String,
}

/// Find every token in `source`, in order.
///
/// An open delimiter without a matching close delimiter, or a token with
/// an empty path, is left as literal text.
pub fn scan(source: &str, delimiters: &Delimiters) -> TemplateResult<Vec<Token>> {
    let open = delimiters.open();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(found) = source[pos..].find(open) {
        let start = pos + found;
        match parse_token(source, start, delimiters)? {
            Some(token) => {
                pos = token.span.end;
                tokens.push(token);
            }
            None => pos = start + open.len(),
        }
    }

    Ok(tokens)
}

/// The token occupying the whole of `source`, if there is exactly one.
pub fn whole_token(source: &str, delimiters: &Delimiters) -> TemplateResult<Option<Token>> {
    let tokens = scan(source, delimiters)?;
    Ok(bounded(source, &tokens).cloned())
}

/// Among tokens already scanned from `source`, the one spanning all of it.
pub fn bounded<'a>(source: &str, tokens: &'a [Token]) -> Option<&'a Token> {
    match tokens {
        [token] if token.span == (0..source.len()) => Some(token),
        _ => None,
    }
}

/// The cast type and expression of the first token in `source`.
pub fn extract(
    source: &str,
    delimiters: &Delimiters,
) -> TemplateResult<Option<(CastType, String)>> {
    Ok(scan(source, delimiters)?
        .into_iter()
        .next()
        .map(|token| (token.cast, token.expression)))
}

/// Parse a token whose open delimiter starts at `start`.
fn parse_token(
    source: &str,
    start: usize,
    delimiters: &Delimiters,
) -> TemplateResult<Option<Token>> {
    let close = delimiters.close();
    let body_start = start + delimiters.open().len();
    let body = &source[body_start..];

    let Some(close_at) = body.find(close) else {
        return Ok(None);
    };

    let (cast, path_at) = match cast_prefix(body) {
        (cast, path_at) if path_at <= close_at => (cast, path_at),
        _ => (CastType::Passthrough, 0),
    };

    let separator_at = body[path_at..close_at]
        .find(DEFAULT_SEPARATOR)
        .map(|at| path_at + at);

    let Some(separator_at) = separator_at else {
        let path = body[path_at..close_at].trim();
        if path.is_empty() {
            return Ok(None);
        }
        return Ok(Some(Token {
            span: start..body_start + close_at + close.len(),
            cast,
            path: path.to_string(),
            default: None,
            expression: path.to_string(),
        }));
    };

    let path = body[path_at..separator_at].trim();
    if path.is_empty() {
        return Ok(None);
    }

    let default_at = separator_at + DEFAULT_SEPARATOR.len();
    let (default, default_end) = parse_default(body, default_at, close_at, close).map_err(
        |message| TemplateError::InvalidDefault {
            expression: body[path_at..close_at].trim().to_string(),
            message,
        },
    )?;

    Ok(Some(Token {
        span: start..body_start + default_end + close.len(),
        cast,
        path: path.to_string(),
        default: Some(default),
        expression: body[path_at..default_end].trim().to_string(),
    }))
}

/// Strip an optional `type:` prefix, returning the cast and where the path begins.
fn cast_prefix(body: &str) -> (CastType, usize) {
    let leading = body.len() - body.trim_start().len();
    let trimmed = &body[leading..];
    if let Some((tag, _)) = trimmed.split_once(':') {
        if let Some(cast) = CastType::from_tag(tag) {
            return (cast, leading + tag.len() + 1);
        }
    }
    (CastType::Passthrough, 0)
}

/// Parse the JSON default that begins at `default_at` in `body`.
///
/// Returns the value and the offset of the close delimiter that ends the
/// token. The default usually runs up to the first close delimiter; when
/// it does not parse there, it may itself contain the close delimiter
/// (`{{x || {"a":{"b":1}}}}`), so the JSON is read as a stream instead.
fn parse_default(
    body: &str,
    default_at: usize,
    close_at: usize,
    close: &str,
) -> Result<(Value, usize), String> {
    let simple = body[default_at..close_at].trim();
    let simple_error = match serde_json::from_str::<Value>(simple) {
        Ok(value) => return Ok((value, close_at)),
        Err(e) => e.to_string(),
    };

    let rest = &body[default_at..];
    let json_at = default_at + (rest.len() - rest.trim_start().len());
    let mut stream = serde_json::Deserializer::from_str(&body[json_at..]).into_iter::<Value>();
    if let Some(Ok(value)) = stream.next() {
        let after = json_at + stream.byte_offset();
        let tail = &body[after..];
        let end = after + (tail.len() - tail.trim_start().len());
        if body[end..].starts_with(close) {
            return Ok((value, end));
        }
    }

    Err(simple_error)
}
