//! Basic rendering tests for template engine

use super::helpers::{nested_data, simple_data};
use super::*;
use serde_json::json;

#[test]
fn test_render_simple_placeholder() {
    let result = render("Hello, {{title}}!", &json!({ "title": "World" })).unwrap();
    assert_eq!(result, "Hello, World!");
}

#[test]
fn test_render_placeholder_with_spaces() {
    let result = render("Title: {{  title  }}", &simple_data()).unwrap();
    assert_eq!(result, "Title: My Title");
}

#[test]
fn test_render_nested_key() {
    let result = render("Page: {{page.title}}", &nested_data()).unwrap();
    assert_eq!(result, "Page: Release Notes");
}

#[test]
fn test_render_array_index_segment() {
    let result = render("First: {{page.authors.1.name}}", &nested_data()).unwrap();
    assert_eq!(result, "First: Jane Smith");
}

#[test]
fn test_render_scalar_values() {
    let template = "{{count}} {{price}} {{enabled}}";
    let result = render(template, &simple_data()).unwrap();
    assert_eq!(result, "42 9.99 true");
}

#[test]
fn test_render_null_and_missing_as_empty() {
    let result = render("[{{nothing}}][{{missing}}][{{page.missing.deeper}}]", &simple_data())
        .unwrap();
    assert_eq!(result, "[][][]");
}

#[test]
fn test_render_no_placeholders() {
    let template = "<p>This is plain markup with no placeholders.</p>";
    let result = render(template, &json!({})).unwrap();
    assert_eq!(result, template);
}

#[test]
fn test_render_empty_data_object() {
    let result = render("<h1>{{title}}</h1>", &json!({})).unwrap();
    assert_eq!(result, "<h1></h1>");
}

#[test]
fn test_render_this_at_root() {
    let result = render("{{this}}|{{.}}", &json!("scalar root")).unwrap();
    assert_eq!(result, "scalar root|scalar root");
}

#[test]
fn test_render_is_deterministic() {
    let template = Template::compile("{{#each page.authors}}{{name}};{{/each}}").unwrap();
    let data = nested_data();
    let first = template.render(&data).unwrap();
    let second = template.render(&data).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, "John Doe;Jane Smith;");
}

#[test]
fn test_render_comments_are_dropped() {
    let template = "a{{! short note }}b{{!-- note with {{braces}} --}}c";
    let result = render(template, &json!({})).unwrap();
    assert_eq!(result, "abc");
}

#[test]
fn test_render_multiline_template() {
    let template = "<ul>\n  <li>{{page.title}}</li>\n</ul>\n";
    let result = render(template, &nested_data()).unwrap();
    assert_eq!(result, "<ul>\n  <li>Release Notes</li>\n</ul>\n");
}
