//! Error types for BIM Explorer.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by the typed accessors on [`RawNode`](crate::model::RawNode).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NodeError {
    /// A required dynamic member does not exist on the node.
    #[error("member '{member}' not found on {context}")]
    MissingMember { member: String, context: String },

    /// The node was expected to be an object.
    #[error("expected an object at {context}")]
    NotAnObject { context: String },

    /// The node was expected to be a list.
    #[error("expected a list at {context}")]
    NotAList { context: String },

    /// The node was expected to be a scalar value.
    #[error("expected a scalar value at {context}")]
    NotAScalar { context: String },
}

/// Errors reported by a [`ModelSource`](crate::source::ModelSource).
///
/// Cloneable so one failed fetch can be handed to every caller waiting on it.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// The server rejected the credential, or none was given.
    #[error("authentication against '{server}' failed: {reason}")]
    AuthenticationFailed { server: String, reason: String },

    /// The stream, branch, model, version or object does not exist.
    #[error("commit not found: {reason}")]
    CommitNotFound { reason: String },

    /// Transport-level failure talking to the server.
    #[error("request to '{url}' failed: {source}")]
    Network {
        url: String,
        source: Arc<reqwest::Error>,
    },

    /// The server answered with something we cannot interpret.
    #[error("unexpected response from server: {message}")]
    Protocol { message: String },

    /// The downloaded object closure lacks a referenced child.
    #[error("object '{id}' is referenced but was not received")]
    UnresolvedReference { id: String },
}

/// Errors surfaced by the [`Explorer`](crate::project::Explorer) facade.
#[derive(Debug, Clone, Error)]
pub enum ExplorerError {
    /// The project name is not in the registry.
    #[error("unknown project '{name}'")]
    UnknownProject { name: String },

    /// The source URL is not a recognised Speckle URL.
    #[error("malformed source URL '{url}': {reason}")]
    MalformedSourceUrl { url: String, reason: String },

    /// Bad or missing credential for the upstream source.
    #[error("authentication failed for project '{project}': {reason}")]
    AuthenticationFailed { project: String, reason: String },

    /// The commit behind the project URL could not be located.
    #[error("commit not found for project '{project}': {reason}")]
    CommitNotFound { project: String, reason: String },

    /// The category is not part of the commit.
    #[error("category '{category}' not found in project '{project}'")]
    UnknownCategory { project: String, category: String },

    /// An element does not carry the parameter container we need.
    #[error("element {element} in '{category}' has no usable parameters: {reason}")]
    UnsupportedElementShape {
        category: String,
        element: String,
        reason: String,
    },

    /// An element is not part of the built element type family.
    #[error("element {element} is not a built element, but '{speckle_type}'")]
    NotABuiltElement {
        element: String,
        speckle_type: String,
    },

    /// The project information block is absent from the commit.
    #[error("project '{project}' has no metadata block '{member}'")]
    MetadataMissing { project: String, member: String },

    /// Any other failure of the upstream source.
    #[error("source error for project '{project}': {source}")]
    Source {
        project: String,
        source: SourceError,
    },

    #[error(transparent)]
    Node(#[from] NodeError),
}

/// Errors that can occur when loading the project registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Failed to read the registry file from disk.
    #[error("failed to read registry '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The registry file is not valid TOML.
    #[error("invalid registry '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Two projects share a name.
    #[error("project '{name}' is registered twice")]
    DuplicateProject { name: String },
}

/// Errors that can occur when exporting data.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to create the output file.
    #[error("failed to create file '{path}': {source}")]
    FileCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write data to the file.
    #[error("failed to write data: {message}")]
    WriteError { message: String },

    /// Failed to serialize data to JSON.
    #[error("JSON serialization failed: {source}")]
    JsonSerialize {
        #[from]
        source: serde_json::Error,
    },

    /// Failed to write CSV data.
    #[error("CSV write failed: {source}")]
    CsvWrite {
        #[from]
        source: csv::Error,
    },
}
