use super::resolve::{parse_object_lines, recompose};
use super::{CommitLocator, CommitTarget, ModelSource, Session};
use crate::error::SourceError;
use crate::model::RawNode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

const ACTIVE_USER_QUERY: &str = "query { activeUser { id name } }";

const COMMIT_QUERY: &str = "query($stream: String!, $commit: String!) { \
    stream(id: $stream) { commit(id: $commit) { referencedObject } } }";

const BRANCH_QUERY: &str = "query($stream: String!, $branch: String!) { \
    stream(id: $stream) { branch(name: $branch) { commits(limit: 1) { items { referencedObject } } } } }";

const MODEL_QUERY: &str = "query($project: String!, $model: String!) { \
    project(id: $project) { model(id: $model) { versions(limit: 1) { items { referencedObject } } } } }";

const VERSION_QUERY: &str = "query($project: String!, $version: String!) { \
    project(id: $project) { version(id: $version) { referencedObject } } }";

/// [`ModelSource`] talking to a Speckle server over GraphQL and the object
/// download endpoint.
#[derive(Debug, Clone, Default)]
pub struct SpeckleSource {
    client: Client,
}

struct GraphQlReply {
    data: Value,
    errors: Vec<String>,
}

impl SpeckleSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn endpoint(server: &Url, path: &str) -> Result<Url, SourceError> {
        server.join(path).map_err(|e| SourceError::Protocol {
            message: format!("cannot build '{path}' on '{server}': {e}"),
        })
    }

    fn send(url: &Url, request: RequestBuilder) -> Result<Response, SourceError> {
        request.send().map_err(|source| SourceError::Network {
            url: url.to_string(),
            source: Arc::new(source),
        })
    }

    fn graphql(
        &self,
        server: &Url,
        token: &str,
        query: &str,
        variables: Value,
    ) -> Result<GraphQlReply, SourceError> {
        let url = Self::endpoint(server, "graphql")?;
        let request = self
            .client
            .post(url.clone())
            .bearer_auth(token)
            .json(&json!({ "query": query, "variables": variables }));
        let response = Self::send(&url, request)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SourceError::AuthenticationFailed {
                server: server.to_string(),
                reason: format!("server answered {status}"),
            });
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SourceError::Protocol {
                message: format!("GraphQL request failed with {status}: {body}"),
            });
        }

        let body: Value = response.json().map_err(|source| SourceError::Network {
            url: url.to_string(),
            source: Arc::new(source),
        })?;
        let errors = body
            .get("errors")
            .and_then(Value::as_array)
            .map(|errs| {
                errs.iter()
                    .map(|e| {
                        e.get("message")
                            .and_then(Value::as_str)
                            .unwrap_or("unknown GraphQL error")
                            .to_string()
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(GraphQlReply {
            data: body.get("data").cloned().unwrap_or(Value::Null),
            errors,
        })
    }
}

impl ModelSource for SpeckleSource {
    fn authenticate(&self, server: &Url, token: Option<&str>) -> Result<Session, SourceError> {
        let token = match token {
            Some(t) if !t.trim().is_empty() => t.trim(),
            _ => {
                return Err(SourceError::AuthenticationFailed {
                    server: server.to_string(),
                    reason: "no token provided".to_string(),
                })
            }
        };

        let reply = self.graphql(server, token, ACTIVE_USER_QUERY, json!({}))?;
        let user = reply.data.pointer("/activeUser").filter(|u| !u.is_null());
        let Some(user) = user else {
            let reason = if reply.errors.is_empty() {
                "token was not accepted".to_string()
            } else {
                reply.errors.join("; ")
            };
            return Err(SourceError::AuthenticationFailed {
                server: server.to_string(),
                reason,
            });
        };

        let name = user.get("name").and_then(Value::as_str).map(str::to_string);
        debug!(server = %server, user = name.as_deref().unwrap_or("-"), "authenticated");
        Ok(Session {
            server: server.clone(),
            token: token.to_string(),
            user: name,
        })
    }

    fn resolve_commit(
        &self,
        locator: &CommitLocator,
        session: &Session,
    ) -> Result<String, SourceError> {
        let (query, variables, pointer, what) = match &locator.target {
            CommitTarget::Commit {
                stream_id,
                commit_id,
            } => (
                COMMIT_QUERY,
                json!({ "stream": stream_id, "commit": commit_id }),
                "/stream/commit/referencedObject",
                format!("commit '{commit_id}' in stream '{stream_id}'"),
            ),
            CommitTarget::Branch { stream_id, branch } => (
                BRANCH_QUERY,
                json!({ "stream": stream_id, "branch": branch }),
                "/stream/branch/commits/items/0/referencedObject",
                format!("latest commit on branch '{branch}' in stream '{stream_id}'"),
            ),
            CommitTarget::Model {
                project_id,
                model_id,
            } => (
                MODEL_QUERY,
                json!({ "project": project_id, "model": model_id }),
                "/project/model/versions/items/0/referencedObject",
                format!("latest version of model '{model_id}' in '{project_id}'"),
            ),
            CommitTarget::Version {
                project_id,
                version_id,
                ..
            } => (
                VERSION_QUERY,
                json!({ "project": project_id, "version": version_id }),
                "/project/version/referencedObject",
                format!("version '{version_id}' in project '{project_id}'"),
            ),
        };

        let reply = self.graphql(&session.server, &session.token, query, variables)?;
        match reply.data.pointer(pointer).and_then(Value::as_str) {
            Some(object_id) => {
                debug!(object_id, "resolved {what}");
                Ok(object_id.to_string())
            }
            None => {
                let mut reason = format!("{what} does not exist");
                if !reply.errors.is_empty() {
                    reason = format!("{reason}: {}", reply.errors.join("; "));
                }
                Err(SourceError::CommitNotFound { reason })
            }
        }
    }

    fn receive(
        &self,
        stream_id: &str,
        object_id: &str,
        session: &Session,
    ) -> Result<RawNode, SourceError> {
        let url = Self::endpoint(&session.server, &format!("objects/{stream_id}/{object_id}"))?;
        let request = self
            .client
            .get(url.clone())
            .bearer_auth(&session.token)
            .header(reqwest::header::ACCEPT, "text/plain");
        let response = Self::send(&url, request)?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(SourceError::CommitNotFound {
                    reason: format!("object '{object_id}' not found in '{stream_id}'"),
                })
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(SourceError::AuthenticationFailed {
                    server: session.server.to_string(),
                    reason: format!("no access to stream '{stream_id}'"),
                })
            }
            status if !status.is_success() => {
                return Err(SourceError::Protocol {
                    message: format!("object download failed with {status}"),
                })
            }
            _ => {}
        }

        let body = response.text().map_err(|source| SourceError::Network {
            url: url.to_string(),
            source: Arc::new(source),
        })?;
        let objects = parse_object_lines(&body)?;
        info!(
            object_id,
            objects = objects.len(),
            "received object closure"
        );
        recompose(object_id, &objects)
    }
}
