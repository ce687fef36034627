//! Built-in example documents used when the store has nothing saved

use crate::document::Role;

pub const DEFAULT_MARKUP: &str = r#"<main class="card">
  <h1>{{title}}</h1>
  <p class="lead">{{summary}}</p>
  {{#if items}}
  <ul>
    {{#each items}}
    <li class="{{#if done}}done{{/if}}">{{@index}}. {{label}}</li>
    {{/each}}
  </ul>
  {{else}}
  <p>Nothing to show yet.</p>
  {{/if}}
  <footer>Signed, {{author.name}}</footer>
</main>
"#;

pub const DEFAULT_STYLESHEET: &str = r#".card {
  font-family: system-ui, sans-serif;
  max-width: 32rem;
  margin: 2rem auto;
  padding: 1.5rem;
  border-radius: 0.5rem;
  box-shadow: 0 1px 4px rgba(0, 0, 0, 0.15);
}

.lead {
  color: #555;
}

li.done {
  text-decoration: line-through;
}
"#;

pub const DEFAULT_DATA: &str = r#"{
  "title": "Welcome to templive",
  "summary": "Edit the template, the styles or this data and watch the preview update.",
  "items": [
    { "label": "Write some markup", "done": true },
    { "label": "Style it", "done": false },
    { "label": "Publish it", "done": false }
  ],
  "author": { "name": "templive" }
}
"#;

/// Built-in text for a document role
pub fn default_text(role: Role) -> &'static str {
    match role {
        Role::Markup => DEFAULT_MARKUP,
        Role::Stylesheet => DEFAULT_STYLESHEET,
        Role::Data => DEFAULT_DATA,
    }
}
