//! Upstream model source: authentication, commit lookup and object download.

pub mod resolve;
pub mod speckle;

pub use speckle::SpeckleSource;

use crate::error::{ExplorerError, SourceError};
use crate::model::RawNode;
use url::Url;

/// Authenticated connection to one server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub server: Url,
    pub token: String,
    pub user: Option<String>,
}

/// What a project URL points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitTarget {
    /// `/streams/{stream}/commits/{commit}`
    Commit {
        stream_id: String,
        commit_id: String,
    },
    /// `/streams/{stream}/branches/{branch}`, or `/streams/{stream}` for `main`
    Branch { stream_id: String, branch: String },
    /// `/projects/{project}/models/{model}`: the latest version
    Model {
        project_id: String,
        model_id: String,
    },
    /// `/projects/{project}/models/{model}@{version}`
    Version {
        project_id: String,
        model_id: String,
        version_id: String,
    },
}

/// Server plus target parsed from a project URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitLocator {
    pub server: Url,
    pub target: CommitTarget,
}

impl CommitLocator {
    pub fn parse(url: &str) -> Result<Self, ExplorerError> {
        let malformed = |reason: &str| ExplorerError::MalformedSourceUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        };

        let parsed = Url::parse(url).map_err(|e| malformed(&e.to_string()))?;
        let mut server = parsed.clone();
        server.set_path("");
        server.set_query(None);
        server.set_fragment(None);

        let segments: Vec<&str> = parsed
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        let target = match segments.as_slice() {
            ["streams", stream] => CommitTarget::Branch {
                stream_id: (*stream).to_string(),
                branch: "main".to_string(),
            },
            ["streams", stream, "commits", commit] => CommitTarget::Commit {
                stream_id: (*stream).to_string(),
                commit_id: (*commit).to_string(),
            },
            ["streams", stream, "branches", branch @ ..] if !branch.is_empty() => {
                CommitTarget::Branch {
                    stream_id: (*stream).to_string(),
                    branch: branch.join("/"),
                }
            }
            ["projects", project, "models", models] => {
                // Multi-model URLs list ids separated by commas; the first wins.
                let model = models.split(',').next().unwrap_or_default();
                match model.split_once('@') {
                    Some((model_id, version_id)) => CommitTarget::Version {
                        project_id: (*project).to_string(),
                        model_id: model_id.to_string(),
                        version_id: version_id.to_string(),
                    },
                    None => CommitTarget::Model {
                        project_id: (*project).to_string(),
                        model_id: model.to_string(),
                    },
                }
            }
            _ => {
                return Err(malformed(
                    "expected /streams/{id}[/commits|branches/...] or /projects/{id}/models/{id}",
                ))
            }
        };

        Ok(Self { server, target })
    }

    /// Stream (legacy) or project (current) id objects are stored under.
    #[must_use]
    pub fn stream_id(&self) -> &str {
        match &self.target {
            CommitTarget::Commit { stream_id, .. } | CommitTarget::Branch { stream_id, .. } => {
                stream_id
            }
            CommitTarget::Model { project_id, .. } | CommitTarget::Version { project_id, .. } => {
                project_id
            }
        }
    }
}

/// The remote service commits are pulled from.
pub trait ModelSource: Send + Sync {
    /// Checks `token` against `server`.
    fn authenticate(&self, server: &Url, token: Option<&str>) -> Result<Session, SourceError>;

    /// Resolves the locator to the id of the commit's root object.
    fn resolve_commit(&self, locator: &CommitLocator, session: &Session)
        -> Result<String, SourceError>;

    /// Downloads the object and everything it references.
    fn receive(
        &self,
        stream_id: &str,
        object_id: &str,
        session: &Session,
    ) -> Result<RawNode, SourceError>;
}
