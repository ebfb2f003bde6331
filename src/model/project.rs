use super::node::{RawNode, Scalar};
use crate::error::ExplorerError;
use serde::Deserialize;
use url::Url;

const LEGACY_HOST: &str = "speckle.xyz";
const CURRENT_HOST: &str = "app.speckle.systems";

/// Layout of the received object graph, decided by the server host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    /// `speckle.xyz` streams: categories hang directly off the root.
    Legacy,
    /// `app.speckle.systems` projects: categories live under `@Types`.
    Current,
}

impl SchemaVersion {
    /// Picks the schema variant from the host component of `url`.
    pub fn from_url(url: &str) -> Result<Self, ExplorerError> {
        let parsed = Url::parse(url).map_err(|e| ExplorerError::MalformedSourceUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let host = parsed.host_str().unwrap_or_default();

        if host.contains(LEGACY_HOST) {
            Ok(SchemaVersion::Legacy)
        } else if host.contains(CURRENT_HOST) {
            Ok(SchemaVersion::Current)
        } else {
            Err(ExplorerError::MalformedSourceUrl {
                url: url.to_string(),
                reason: format!("host '{host}' is not a Speckle server"),
            })
        }
    }

    /// Root member holding the project information block.
    #[must_use]
    pub fn metadata_member(self) -> &'static str {
        match self {
            SchemaVersion::Legacy => "@Projektinformationen",
            SchemaVersion::Current => "@Project Information",
        }
    }
}

/// A named entry of the known-projects registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct ProjectHandle {
    pub name: String,
    #[serde(rename = "url")]
    pub source_url: String,
}

impl ProjectHandle {
    #[must_use]
    pub fn new(name: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_url: source_url.into(),
        }
    }
}

/// Root of one received commit. Never mutated after the fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitGraph {
    pub object_id: String,
    pub schema: SchemaVersion,
    pub root: RawNode,
}

/// Parameter display name to value, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    entries: Vec<(String, Scalar)>,
}

impl ParameterSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites; an overwritten name keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: Scalar) {
        let name = name.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for ParameterSet {
    type Item = (String, Scalar);
    type IntoIter = std::vec::IntoIter<(String, Scalar)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
