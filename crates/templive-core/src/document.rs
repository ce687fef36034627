//! Editable documents and the values the session holds alongside them

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which of the three editor panes a document belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Markup,
    Stylesheet,
    Data,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Markup, Role::Stylesheet, Role::Data];

    /// Key under which the document text is persisted
    pub fn store_key(self) -> &'static str {
        match self {
            Role::Markup => "html",
            Role::Stylesheet => "css",
            Role::Data => "params",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Markup => "markup",
            Role::Stylesheet => "stylesheet",
            Role::Data => "data",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "markup" | "html" => Ok(Role::Markup),
            "stylesheet" | "css" => Ok(Role::Stylesheet),
            "data" | "params" => Ok(Role::Data),
            other => Err(format!(
                "unknown document '{}' (expected markup, stylesheet or data)",
                other
            )),
        }
    }
}

/// Lifecycle of a document between an edit and its settled side effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    /// Unchanged since the session opened
    Clean,
    /// Edited; debounce timers pending
    Editing,
    /// A debounce timer fired and its action is running
    Quiescing,
    /// Latest text is reflected in the preview
    Compiled,
    /// Latest text has been written to the store
    Persisted,
}

/// One user-edited text buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    role: Role,
    text: String,
    state: DocumentState,
}

impl Document {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            state: DocumentState::Clean,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn state(&self) -> DocumentState {
        self.state
    }

    /// Replace the text; takes effect immediately
    pub fn edit(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.state = DocumentState::Editing;
    }

    pub(crate) fn set_state(&mut self, state: DocumentState) {
        self.state = state;
    }
}

/// Bearer credential for publishing
///
/// Held in memory only. It has no `Serialize` impl and its `Debug` output is
/// redacted, so it cannot end up in the store or in logs by accident.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// The raw secret, for building the request header
    pub fn expose(&self) -> &str {
        self.0.trim()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("Credential(<empty>)")
        } else {
            f.write_str("Credential(<redacted>)")
        }
    }
}
