/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for compiling and decompiling templates.

use thiserror::Error;

/// Errors that can occur during template operations.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A token resolved to a missing value and had no default.
    #[error("Missing variable: {expression}")]
    MissingVariable { expression: String },

    /// A value could not be cast to the type declared by its token.
    #[error("Cannot cast value to {target}: {message}")]
    Coercion {
        target: &'static str,
        message: String,
    },

    /// The produced text does not fit the template's literal skeleton.
    #[error("No match for {expression}")]
    NoMatch { expression: String },

    /// A default clause is not valid JSON.
    #[error("Invalid default in `{expression}`: {message}")]
    InvalidDefault { expression: String, message: String },

    /// A property path could not be parsed.
    #[error("Invalid property path `{path}`: {message}")]
    InvalidPath { path: String, message: String },

    /// The delimiter pair is unusable.
    #[error("Invalid delimiters: {message}")]
    InvalidDelimiters { message: String },
}

impl TemplateError {
    /// True for [`TemplateError::MissingVariable`].
    pub fn is_missing_variable(&self) -> bool {
        matches!(self, TemplateError::MissingVariable { .. })
    }
}

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;
