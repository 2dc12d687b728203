/*
 * round_trip_tests.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Integration tests for compile/decompile/matches over whole templates.
 */

use pretty_assertions::assert_eq;
use quarto_json_template::{
    Delimiters, TemplateError, TemplateOptions, compile, decompile, matches, referenced_paths,
};
use serde_json::{Value, json};

fn opts() -> TemplateOptions {
    TemplateOptions::default()
}

/// Compile then decompile, asserting the data comes back unchanged.
fn assert_round_trip(template: Value, data: Value) {
    let result = compile(&template, &data, &opts()).expect("compile should succeed");
    let recovered = decompile(&template, &result, &opts()).expect("decompile should succeed");
    assert_eq!(recovered, data);
    assert!(matches(&template, &result, &opts()).unwrap());
}

#[test]
fn test_round_trip_flat() {
    assert_round_trip(
        json!({"greeting": "Hello {{name}}", "age": "{{age}}", "flag": "{{on}}"}),
        json!({"name": "Ada", "age": 36, "on": false}),
    );
}

#[test]
fn test_round_trip_nested_and_typed() {
    assert_round_trip(
        json!({
            "user": {
                "label": "{{user.first}} {{user.last}} ({{number:user.id}})",
                "roles": "{{user.roles}}"
            },
            "rows": ["{{rows.a}}", {"b": "b={{object:rows.b}}"}],
            "literal": [1, true, null]
        }),
        json!({
            "user": {"first": "Ada", "last": "Lovelace", "id": 7, "roles": ["admin"]},
            "rows": {"a": "first", "b": {"k": [1, 2]}}
        }),
    );
}

#[test]
fn test_round_trip_custom_delimiters() {
    let options = TemplateOptions::default()
        .with_delimiters(Delimiters::new("<%", "%>").unwrap());
    let template = json!({"msg": "{{not a token}} <% who %> (<%number:n%>)"});
    let data = json!({"who": "me", "n": 3});

    let result = compile(&template, &data, &options).unwrap();
    assert_eq!(result, json!({"msg": "{{not a token}} me (3)"}));
    assert_eq!(decompile(&template, &result, &options).unwrap(), data);
    assert!(matches(&template, &result, &options).unwrap());
}

#[test]
fn test_unreferenced_data_is_not_recovered() {
    let template = json!({"a": "{{x}}"});
    let data = json!({"x": 1, "y": 2});
    let result = compile(&template, &data, &opts()).unwrap();
    assert_eq!(decompile(&template, &result, &opts()).unwrap(), json!({"x": 1}));
}

#[test]
fn test_documented_examples() {
    let empty = json!({});
    assert_eq!(compile(&json!("{{x}}"), &json!({"x": 5}), &opts()).unwrap(), json!(5));
    assert_eq!(
        compile(&json!("Foo {{x}}"), &json!({"x": 5}), &opts()).unwrap(),
        json!("Foo 5")
    );
    assert_eq!(
        compile(&json!("{{string:x}}"), &json!({"x": 5}), &opts()).unwrap(),
        json!("5")
    );
    assert_eq!(
        compile(&json!(r#"{{x || "Jane"}}"#), &empty, &opts()).unwrap(),
        json!("Jane")
    );
    assert_eq!(
        decompile(&json!(r#"{{x || "Jane"}}"#), &json!("Jane"), &opts()).unwrap(),
        json!({"x": "Jane"})
    );
    assert_eq!(
        compile(&json!("{{x}}"), &empty, &opts().with_allow_missing(true)).unwrap(),
        json!("{{x}}")
    );

    let escaped = opts().with_delimiters(Delimiters::from_escaped("\\[", "\\]").unwrap());
    assert_eq!(
        compile(&json!("[age]"), &json!({"age": 21}), &escaped).unwrap(),
        json!(21)
    );
}

#[test]
fn test_missing_variable_names_expression() {
    let err = compile(&json!({"a": ["{{x.y}}"]}), &json!({}), &opts()).unwrap_err();
    assert!(err.is_missing_variable());
    assert_eq!(err.to_string(), "Missing variable: x.y");
}

#[test]
fn test_malformed_default_is_an_error() {
    let err = compile(&json!("{{x || nope}}"), &json!({"x": 1}), &opts()).unwrap_err();
    assert!(matches!(err, TemplateError::InvalidDefault { .. }));
}

#[test]
fn test_bad_bracket_paths_are_errors() {
    for path in ["a[18446744073709551615]", "a[4000000000]", "a[x]", "a[0"] {
        let template = json!({"v": format!("{{{{{}}}}}", path)});
        let object = json!({"v": 1});

        let err = decompile(&template, &object, &opts()).unwrap_err();
        assert!(matches!(err, TemplateError::InvalidPath { .. }), "{path}: {err}");

        let err = matches(&template, &object, &opts()).unwrap_err();
        assert!(matches!(err, TemplateError::InvalidPath { .. }), "{path}: {err}");
    }
}

#[test]
fn test_matches_examples() {
    let template = json!({"foo": "{{bar}}"});
    assert!(matches(&template, &json!({"foo": "bar"}), &opts()).unwrap());
    assert!(!matches(&template, &json!({}), &opts()).unwrap());
    assert!(!matches(&template, &json!({"foo": "bar", "baz": 1}), &opts()).unwrap());
}

#[test]
fn test_matches_uses_defaults() {
    let template = json!({"name": r#"{{name || "anon"}}"#});
    assert!(matches(&template, &json!({"name": "anon"}), &opts()).unwrap());
}

#[test]
fn test_options_from_json_config() {
    let options: TemplateOptions =
        serde_json::from_value(json!({"delimiters": ["${", "}"], "allowMissing": true})).unwrap();
    let result = compile(&json!("${a}/${b}"), &json!({"a": 1}), &options).unwrap();
    assert_eq!(result, json!("${a}/${b}"));
}

#[test]
fn test_escaped_delimiters_from_json_config() {
    let options: TemplateOptions =
        serde_json::from_value(json!({"delimiters": ["\\[", "\\]"]})).unwrap();
    assert_eq!(
        compile(&json!("[age]"), &json!({"age": 21}), &options).unwrap(),
        json!(21)
    );
}

#[test]
fn test_referenced_paths() {
    let template = json!({"title": "{{title}}", "body": ["{{a.b}} {{title}}"]});
    assert_eq!(
        referenced_paths(&template, &opts()).unwrap(),
        vec!["title", "a.b"]
    );
}
