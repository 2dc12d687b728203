/*
 * options.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Options shared by `compile`, `decompile` and `matches`.
//!
//! Options can be built in code or deserialized from JSON configuration:
//!
//! ```json
//! { "delimiters": ["[", "]"], "allowMissing": true }
//! ```
//!
//! Delimiters in configuration may be backslash-escaped (`["\\[", "\\]"]`).

use crate::error::{TemplateError, TemplateResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_OPEN: &str = "{{";
pub const DEFAULT_CLOSE: &str = "}}";

/// The open/close text that bounds a token.
///
/// In configuration the pair is written in the escaped form accepted by
/// [`Delimiters::from_escaped`], so `["\\[", "\\]"]` and `["[", "]"]` both
/// mean `[`/`]`. A literal backslash is written `\\\\`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[String; 2]", into = "[String; 2]")]
pub struct Delimiters {
    open: String,
    close: String,
}

impl Delimiters {
    /// Create a delimiter pair from literal text.
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> TemplateResult<Self> {
        let open = open.into();
        let close = close.into();
        if open.is_empty() || close.is_empty() {
            return Err(TemplateError::InvalidDelimiters {
                message: "delimiters must not be empty".to_string(),
            });
        }
        if open == close {
            return Err(TemplateError::InvalidDelimiters {
                message: format!("open and close delimiters are both `{}`", open),
            });
        }
        Ok(Delimiters { open, close })
    }

    /// Create a delimiter pair from backslash-escaped text, e.g. `\[` and `\]`.
    ///
    /// Every `\x` sequence stands for the literal character `x`.
    pub fn from_escaped(open: &str, close: &str) -> TemplateResult<Self> {
        Self::new(unescape(open), unescape(close))
    }

    pub fn open(&self) -> &str {
        &self.open
    }

    pub fn close(&self) -> &str {
        &self.close
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Delimiters {
            open: DEFAULT_OPEN.to_string(),
            close: DEFAULT_CLOSE.to_string(),
        }
    }
}

impl TryFrom<[String; 2]> for Delimiters {
    type Error = TemplateError;

    fn try_from([open, close]: [String; 2]) -> TemplateResult<Self> {
        Delimiters::from_escaped(&open, &close)
    }
}

impl From<Delimiters> for [String; 2] {
    fn from(delimiters: Delimiters) -> Self {
        [escape(&delimiters.open), escape(&delimiters.close)]
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            // A trailing backslash stands for itself
            out.push(chars.next().unwrap_or('\\'));
        } else {
            out.push(ch);
        }
    }
    out
}

/// Options for template operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateOptions {
    /// Token delimiters, `{{`/`}}` unless overridden.
    pub delimiters: Delimiters,

    /// Compile only: return a string containing an unresolved token
    /// unchanged instead of failing with `MissingVariable`.
    pub allow_missing: bool,
}

impl TemplateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiters(mut self, delimiters: Delimiters) -> Self {
        self.delimiters = delimiters;
        self
    }

    pub fn with_allow_missing(mut self, allow_missing: bool) -> Self {
        self.allow_missing = allow_missing;
        self
    }
}
