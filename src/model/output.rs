use super::table::Table;
use crate::export::table_records;
use serde_json::{json, Value};
use std::fmt;
use std::path::PathBuf;

/// One answer handed to a downstream consumer (chat view, agent tool).
///
/// The variant is chosen once when the answer is produced, so renderers
/// match on it instead of probing the payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Table(Table),
    Image(PathBuf),
    Text(String),
    Integer(i64),
}

impl Output {
    /// Classifies free text: a path ending in `.png` is an image reference,
    /// anything else stays text.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.trim_end().to_ascii_lowercase().ends_with(".png") {
            Self::Image(PathBuf::from(text.trim_end()))
        } else {
            Self::Text(text)
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Table(_) => "table",
            Self::Image(_) => "image",
            Self::Text(_) => "text",
            Self::Integer(_) => "integer",
        }
    }

    /// Payload as JSON; tables become a list of row objects.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Table(table) => table_records(table),
            Self::Image(path) => Value::String(path.display().to_string()),
            Self::Text(text) => Value::String(text.clone()),
            Self::Integer(n) => Value::from(*n),
        }
    }

    /// History entry `{role, content, type}` for a chat transcript.
    #[must_use]
    pub fn to_message(&self) -> Value {
        json!({ "role": "assistant", "content": self.to_json(), "type": self.kind() })
    }
}

impl From<Table> for Output {
    fn from(table: Table) -> Self {
        Self::Table(table)
    }
}

impl From<i64> for Output {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<String> for Output {
    fn from(text: String) -> Self {
        Self::from_text(text)
    }
}

impl From<&str> for Output {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table(table) => write!(
                f,
                "table with {} rows and {} columns",
                table.row_count(),
                table.column_count()
            ),
            Self::Image(path) => write!(f, "{}", path.display()),
            Self::Text(text) => f.write_str(text),
            Self::Integer(n) => write!(f, "{n}"),
        }
    }
}
