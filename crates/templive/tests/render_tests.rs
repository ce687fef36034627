//! Integration tests for `templive render`

mod common;

use common::Workspace;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_render_to_stdout() {
    let ws = Workspace::new();
    let template = ws.write("card.hbs", "Hello, {{title}}!");
    let data = ws.write("data.json", r#"{"title":"World"}"#);

    ws.templive()
        .arg("render")
        .arg("--template")
        .arg(&template)
        .arg("--data")
        .arg(&data)
        .assert()
        .success()
        .stdout("Hello, World!\n");
}

#[test]
fn test_render_without_data_uses_empty_object() {
    let ws = Workspace::new();
    let template = ws.write("card.hbs", "[{{#if x}}Y{{/if}}]");

    ws.templive()
        .arg("render")
        .arg("--template")
        .arg(&template)
        .assert()
        .success()
        .stdout("[]\n");
}

#[test]
fn test_render_to_file() {
    let ws = Workspace::new();
    let template = ws.write("list.hbs", "{{#each items}}<li>{{this}}</li>{{/each}}");
    let data = ws.write("data.json", r#"{"items":["a","<b>"]}"#);
    let out = ws.path("out/list.html");

    ws.templive()
        .arg("render")
        .arg("--template")
        .arg(&template)
        .arg("--data")
        .arg(&data)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout("");

    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "<li>a</li><li>&lt;b&gt;</li>"
    );
}

#[test]
fn test_render_malformed_template_fails() {
    let ws = Workspace::new();
    let template = ws.write("broken.hbs", "{{#if");

    ws.templive()
        .arg("render")
        .arg("--template")
        .arg(&template)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to render"));
}

#[test]
fn test_render_invalid_data_fails() {
    let ws = Workspace::new();
    let template = ws.write("card.hbs", "{{title}}");
    let data = ws.write("data.json", "{title:");

    ws.templive()
        .arg("render")
        .arg("--template")
        .arg(&template)
        .arg("--data")
        .arg(&data)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON"));
}

#[test]
fn test_render_missing_template_fails() {
    let ws = Workspace::new();

    ws.templive()
        .args(["render", "--template", "nope.hbs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read template"));
}
