/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Bidirectional templating over JSON trees.
//!
//! A template is any JSON value whose strings may contain tokens:
//!
//! - Interpolation: `{{name}}`
//! - Nested paths: `{{employee.salary}}`, `{{items[0].title}}`
//! - Casts: `{{string:id}}`, `{{number:age}}`, `{{object:payload}}`
//! - Defaults (any JSON literal): `{{name || "Jane"}}`
//!
//! Three operations are provided:
//!
//! - [`compile`] fills a template from a data context. A string that is a
//!   single token keeps the value's own type; tokens embedded in text are
//!   rendered as text.
//! - [`decompile`] recovers the data context from a compiled result.
//! - [`matches`] checks whether an object is a compilation of a template
//!   by decompiling and compiling again.
//!
//! # Example
//!
//! ```
//! use quarto_json_template::{TemplateOptions, compile, decompile};
//! use serde_json::json;
//!
//! let template = json!({"title": "Hello, {{name}}!", "age": "{{age}}"});
//! let data = json!({"name": "World", "age": 42});
//! let options = TemplateOptions::default();
//!
//! let result = compile(&template, &data, &options)?;
//! assert_eq!(result, json!({"title": "Hello, World!", "age": 42}));
//!
//! let recovered = decompile(&template, &result, &options)?;
//! assert_eq!(recovered, data);
//! # Ok::<(), quarto_json_template::TemplateError>(())
//! ```

pub mod deinterpolate;
pub mod error;
pub mod interpolate;
pub mod options;
pub mod path;
pub mod token;
pub mod tree;
pub mod value;

// Re-export main types at crate root
pub use error::{TemplateError, TemplateResult};
pub use options::{Delimiters, TemplateOptions};
pub use token::Token;
pub use tree::{compile, decompile, matches, referenced_paths};
pub use value::CastType;
