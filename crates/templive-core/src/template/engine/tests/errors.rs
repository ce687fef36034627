//! Error handling tests for template engine

use super::helpers::{nested_data, simple_data};
use super::*;
use serde_json::json;
use std::time::Duration;

#[test]
fn test_error_unclosed_if_tag() {
    let result = Template::compile("{{#if");
    match result {
        Err(TemplateError::MalformedSyntax { message, line }) => {
            assert!(message.contains("Unclosed"));
            assert_eq!(line, 1);
        }
        other => panic!("Expected MalformedSyntax error, got {:?}", other),
    }
}

#[test]
fn test_error_unclosed_placeholder_reports_line() {
    let result = Template::compile("line one\nline two {{title");
    match result {
        Err(TemplateError::MalformedSyntax { line, .. }) => assert_eq!(line, 2),
        other => panic!("Expected MalformedSyntax error, got {:?}", other),
    }
}

#[test]
fn test_error_unclosed_block() {
    let result = Template::compile("a\n{{#each items}}{{this}}");
    match result {
        Err(TemplateError::MalformedSyntax { message, line }) => {
            assert!(message.contains("Unclosed {{#each}}"));
            assert_eq!(line, 2);
        }
        other => panic!("Expected MalformedSyntax error, got {:?}", other),
    }
}

#[test]
fn test_error_mismatched_close() {
    let result = Template::compile("{{#if a}}x{{/each}}");
    match result {
        Err(TemplateError::MalformedSyntax { message, .. }) => {
            assert!(message.contains("{{/if}}"));
        }
        other => panic!("Expected MalformedSyntax error, got {:?}", other),
    }
}

#[test]
fn test_error_stray_close_and_else() {
    assert!(matches!(
        Template::compile("{{/if}}"),
        Err(TemplateError::MalformedSyntax { .. })
    ));
    assert!(matches!(
        Template::compile("{{else}}"),
        Err(TemplateError::MalformedSyntax { .. })
    ));
    assert!(matches!(
        Template::compile("{{#if a}}x{{else}}y{{else}}z{{/if}}"),
        Err(TemplateError::MalformedSyntax { .. })
    ));
}

#[test]
fn test_error_unknown_helpers() {
    match Template::compile("{{#repeat items}}x{{/repeat}}") {
        Err(TemplateError::UnknownHelper { name, .. }) => assert_eq!(name, "repeat"),
        other => panic!("Expected UnknownHelper error, got {:?}", other),
    }
    match Template::compile("{{uppercase title}}") {
        Err(TemplateError::UnknownHelper { name, .. }) => assert_eq!(name, "uppercase"),
        other => panic!("Expected UnknownHelper error, got {:?}", other),
    }
}

#[test]
fn test_error_empty_expression_and_block_argument() {
    assert!(matches!(
        Template::compile("{{ }}"),
        Err(TemplateError::MalformedSyntax { .. })
    ));
    assert!(matches!(
        Template::compile("{{#if}}x{{/if}}"),
        Err(TemplateError::MalformedSyntax { .. })
    ));
    assert!(matches!(
        Template::compile("{{#each @index}}x{{/each}}"),
        Err(TemplateError::MalformedSyntax { .. })
    ));
}

#[test]
fn test_error_invalid_paths() {
    for template in ["{{a..b}}", "{{@unknown}}", "{{a.}}"] {
        assert!(
            matches!(
                Template::compile(template),
                Err(TemplateError::MalformedSyntax { .. })
            ),
            "{} should not compile",
            template
        );
    }
}

#[test]
fn test_error_nesting_too_deep() {
    let depth = 65;
    let template = format!("{}x{}", "{{#if a}}".repeat(depth), "{{/if}}".repeat(depth));
    match Template::compile(&template) {
        Err(TemplateError::NestingTooDeep { max_depth, .. }) => assert_eq!(max_depth, 64),
        other => panic!("Expected NestingTooDeep error, got {:?}", other),
    }
}

#[test]
fn test_error_array_in_placeholder() {
    let result = render("Tags: {{tags}}", &nested_data());
    match result {
        Err(TemplateError::ArrayInNonEachContext { key }) => assert_eq!(key, "tags"),
        other => panic!("Expected ArrayInNonEachContext error, got {:?}", other),
    }
}

#[test]
fn test_error_object_in_placeholder() {
    let result = render("Page: {{page}}", &nested_data());
    match result {
        Err(TemplateError::ObjectInPlaceholder { key }) => assert_eq!(key, "page"),
        other => panic!("Expected ObjectInPlaceholder error, got {:?}", other),
    }
}

#[test]
fn test_error_render_timeout() {
    let engine = TemplateEngine::new().with_timeout(Duration::ZERO);
    let result = engine.render("{{title}}", &simple_data());
    assert!(matches!(result, Err(TemplateError::Timeout { .. })));
}

#[test]
fn test_compile_and_render_errors_are_classified() {
    let compile_error = Template::compile("{{#if").unwrap_err();
    assert!(compile_error.is_compile_error());

    let render_error = render("{{page}}", &nested_data()).unwrap_err();
    assert!(!render_error.is_compile_error());
}

#[test]
fn test_error_messages_are_readable() {
    let err = Template::compile("{{#if a}}").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Malformed syntax at line 1: Unclosed {{#if}} block"
    );
    let err = render("{{count}}{{tags}}", &json!({ "count": 1, "tags": [] })).unwrap_err();
    assert!(err.to_string().contains("{{#each tags}}"));
}
