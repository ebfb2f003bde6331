use super::cache::CommitCache;
use super::registry::ProjectRegistry;
use crate::error::{ExplorerError, RegistryError, SourceError};
use crate::extract::element::{extract_parameters, label};
use crate::extract::{
    clean, find_category, list_categories, list_parameter_names, materialize, Category,
};
use crate::model::{CommitGraph, ParameterSet, ProjectHandle, RawNode, SchemaVersion, Table};
use crate::source::{CommitLocator, ModelSource};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Entry point for UI and agent code: resolves projects, fetches each
/// commit once and serves categories, parameters and cleaned tables.
pub struct Explorer<S> {
    source: S,
    registry: ProjectRegistry,
    cache: Arc<CommitCache>,
    token: Option<String>,
}

impl<S: ModelSource> Explorer<S> {
    #[must_use]
    pub fn new(source: S, registry: ProjectRegistry, cache: Arc<CommitCache>) -> Self {
        Self {
            source,
            registry,
            cache,
            token: None,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    #[must_use]
    pub fn registry(&self) -> &ProjectRegistry {
        &self.registry
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<CommitCache> {
        &self.cache
    }

    pub fn register(&mut self, handle: ProjectHandle) -> Result<(), RegistryError> {
        self.registry.register(handle)
    }

    pub fn resolve(&self, name: &str) -> Result<ProjectHandle, ExplorerError> {
        self.registry.resolve(name)
    }

    /// The project's commit, fetched on first use and cached afterwards.
    pub fn fetch_commit(&self, handle: &ProjectHandle) -> Result<Arc<CommitGraph>, ExplorerError> {
        self.cache.get_or_fetch(handle, || self.fetch_uncached(handle))
    }

    /// Drops the cached commit so the next request fetches again.
    pub fn invalidate(&self, handle: &ProjectHandle) -> bool {
        self.cache.invalidate(handle)
    }

    fn fetch_uncached(&self, handle: &ProjectHandle) -> Result<CommitGraph, ExplorerError> {
        let schema = SchemaVersion::from_url(&handle.source_url)?;
        let locator = CommitLocator::parse(&handle.source_url)?;
        info!(project = %handle.name, ?schema, "fetching commit");

        let wrap = |e: SourceError| source_error(handle, e);
        let session = self
            .source
            .authenticate(&locator.server, self.token.as_deref())
            .map_err(wrap)?;
        let object_id = self.source.resolve_commit(&locator, &session).map_err(wrap)?;
        let root = self
            .source
            .receive(locator.stream_id(), &object_id, &session)
            .map_err(wrap)?;

        info!(project = %handle.name, object_id = %object_id, "commit received");
        Ok(CommitGraph {
            object_id,
            schema,
            root,
        })
    }

    pub fn categories(&self, handle: &ProjectHandle) -> Result<Vec<String>, ExplorerError> {
        let graph = self.fetch_commit(handle)?;
        Ok(list_categories(&graph.root))
    }

    /// Sorted parameter names found across the category's elements.
    pub fn parameters(
        &self,
        handle: &ProjectHandle,
        category: &str,
    ) -> Result<Vec<String>, ExplorerError> {
        let graph = self.fetch_commit(handle)?;
        let elements = lookup_category(handle, &graph, category)?;
        list_parameter_names(&elements)
    }

    /// Cleaned table of the category, optionally limited to `parameters`.
    pub fn table(
        &self,
        handle: &ProjectHandle,
        category: &str,
        parameters: Option<&[String]>,
    ) -> Result<Table, ExplorerError> {
        let graph = self.fetch_commit(handle)?;
        let elements = lookup_category(handle, &graph, category)?;
        let table = clean(materialize(&elements, parameters)?);
        info!(
            project = %handle.name,
            category,
            rows = table.row_count(),
            columns = table.column_count(),
            "built table"
        );
        Ok(table)
    }

    /// Project information block: its scalar members followed by its
    /// authoring-tool parameters.
    pub fn project_metadata(&self, handle: &ProjectHandle) -> Result<ParameterSet, ExplorerError> {
        let graph = self.fetch_commit(handle)?;
        let member = graph.schema.metadata_member();
        let missing = || ExplorerError::MetadataMissing {
            project: handle.name.clone(),
            member: member.to_string(),
        };

        let block = graph.root.get(member).ok_or_else(missing)?;
        let record = match block {
            RawNode::List(items) => items.first().ok_or_else(missing)?,
            RawNode::Object(_) => block,
            RawNode::Scalar(_) => return Err(missing()),
        };

        let mut metadata = ParameterSet::new();
        for name in record.dynamic_member_names() {
            if name == "parameters" {
                continue;
            }
            if let Some(value) = record.get(name).and_then(RawNode::as_scalar) {
                metadata.insert(name, value.clone());
            }
        }
        let parameters =
            extract_parameters(record, None).map_err(|e| ExplorerError::UnsupportedElementShape {
                category: member.to_string(),
                element: label(record),
                reason: e.to_string(),
            })?;
        for (name, value) in parameters {
            metadata.insert(name, value);
        }
        Ok(metadata)
    }

    /// The whole commit as a JSON tree, for raw inspection.
    pub fn commit_tree(&self, handle: &ProjectHandle) -> Result<Value, ExplorerError> {
        Ok(self.fetch_commit(handle)?.root.to_json())
    }
}

fn lookup_category<'a>(
    handle: &ProjectHandle,
    graph: &'a CommitGraph,
    category: &'a str,
) -> Result<Category<'a>, ExplorerError> {
    find_category(&graph.root, category)?.ok_or_else(|| ExplorerError::UnknownCategory {
        project: handle.name.clone(),
        category: category.to_string(),
    })
}

fn source_error(handle: &ProjectHandle, error: SourceError) -> ExplorerError {
    let project = handle.name.clone();
    match error {
        SourceError::AuthenticationFailed { server, reason } => {
            ExplorerError::AuthenticationFailed {
                project,
                reason: format!("{server}: {reason}"),
            }
        }
        SourceError::CommitNotFound { reason } => ExplorerError::CommitNotFound { project, reason },
        source => ExplorerError::Source { project, source },
    }
}
