#![allow(dead_code)]

use bim_explorer::error::SourceError;
use bim_explorer::model::{ProjectHandle, RawNode};
use bim_explorer::project::{CommitCache, Explorer, ProjectRegistry};
use bim_explorer::source::{CommitLocator, ModelSource, Session};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub const LEGACY_URL: &str = "https://speckle.xyz/streams/s1/commits/c1";
pub const CURRENT_URL: &str = "https://app.speckle.systems/projects/p1/models/m1";

/// How the fake server answers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behaviour {
    Serve,
    RejectToken,
    MissingCommit,
    /// The object download fails after the commit was resolved.
    LostObject,
}

/// In-memory server that counts downloads.
pub struct FakeSource {
    root: RawNode,
    behaviour: Behaviour,
    delay: Duration,
    pub receives: AtomicUsize,
}

impl FakeSource {
    pub fn new(root: Value) -> Self {
        Self {
            root: RawNode::from_json(root),
            behaviour: Behaviour::Serve,
            delay: Duration::ZERO,
            receives: AtomicUsize::new(0),
        }
    }

    pub fn with_behaviour(mut self, behaviour: Behaviour) -> Self {
        self.behaviour = behaviour;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn receive_count(&self) -> usize {
        self.receives.load(Ordering::SeqCst)
    }
}

impl ModelSource for FakeSource {
    fn authenticate(&self, server: &Url, token: Option<&str>) -> Result<Session, SourceError> {
        if self.behaviour == Behaviour::RejectToken || token.is_none() {
            return Err(SourceError::AuthenticationFailed {
                server: server.to_string(),
                reason: "token was not accepted".to_string(),
            });
        }
        Ok(Session {
            server: server.clone(),
            token: token.unwrap_or_default().to_string(),
            user: Some("Test".to_string()),
        })
    }

    fn resolve_commit(
        &self,
        locator: &CommitLocator,
        _session: &Session,
    ) -> Result<String, SourceError> {
        if self.behaviour == Behaviour::MissingCommit {
            return Err(SourceError::CommitNotFound {
                reason: format!("nothing in '{}'", locator.stream_id()),
            });
        }
        Ok("root".to_string())
    }

    fn receive(
        &self,
        stream_id: &str,
        object_id: &str,
        _session: &Session,
    ) -> Result<RawNode, SourceError> {
        self.receives.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        if self.behaviour == Behaviour::LostObject {
            return Err(SourceError::CommitNotFound {
                reason: format!("object '{object_id}' not found in '{stream_id}'"),
            });
        }
        Ok(self.root.clone())
    }
}

pub fn explorer(source: FakeSource, handles: &[ProjectHandle]) -> Explorer<FakeSource> {
    let registry = ProjectRegistry::from_handles(handles.iter().cloned()).unwrap();
    Explorer::new(source, registry, Arc::new(CommitCache::new())).with_token("secret")
}

fn element(id: &str, speckle_type: &str, params: &[(&str, Value)]) -> Value {
    let mut container = serde_json::Map::new();
    container.insert("id".to_string(), json!(format!("{id}-params")));
    container.insert("speckle_type".to_string(), json!("Base"));
    for (i, (name, value)) in params.iter().enumerate() {
        container.insert(format!("PARAM_{i}_{id}"), json!({ "name": name, "value": value }));
    }
    json!({
        "id": id,
        "speckle_type": speckle_type,
        "parameters": container,
    })
}

pub fn wall(id: &str, params: &[(&str, Value)]) -> Value {
    element(
        id,
        "Objects.BuiltElements.Wall:Objects.BuiltElements.Revit.RevitWall",
        params,
    )
}

/// A `speckle.xyz` commit: categories and metadata blocks on the root.
pub fn legacy_commit() -> Value {
    json!({
        "id": "root",
        "speckle_type": "Base",
        "totalChildrenCount": 7,
        "@Projektinformationen": [{
            "id": "pi",
            "speckle_type": "Objects.Organization.ProjectInformation",
            "name": "Schule am See",
            "number": "2024-17",
            "parameters": {
                "PROJECT_ADDRESS": { "name": "Projektadresse", "value": "Seeweg 1" },
            },
        }],
        "@Wände": [
            wall(
                "w1",
                &[
                    ("Name", json!("Außenwand")),
                    ("Breite", json!(0.36)),
                    ("Kommentar", json!("")),
                ],
            ),
            wall(
                "w2",
                &[
                    ("Breite", json!(0.24)),
                    ("Name", json!("Innenwand")),
                    ("Brandschutz", json!(0)),
                ],
            ),
        ],
        "@Raster": [{ "id": "g1", "speckle_type": "Objects.BuiltElements.GridLine" }],
        "@Türen": [
            wall("d1", &[("Höhe", json!(2.1))]),
        ],
        "@Materialien": [],
        "@Räume": [
            { "id": "r1", "speckle_type": "Objects.BuiltElements.Room", "name": "Aula" },
        ],
    })
}

/// An `app.speckle.systems` commit: categories nested under `@Types`.
pub fn current_commit() -> Value {
    json!({
        "id": "root",
        "speckle_type": "Base",
        "@Project Information": {
            "id": "pi",
            "speckle_type": "Objects.Organization.ProjectInformation",
            "name": "Revit Demo Haus",
        },
        "@Types": {
            "id": "types",
            "speckle_type": "Base",
            "Walls": [
                wall("w1", &[("Name", json!("Basic Wall")), ("Width", json!(0.3))]),
            ],
            "Floors": [
                wall("f1", &[("Thickness", json!(0.25))]),
                wall("f2", &[("Level", json!("EG"))]),
            ],
        },
    })
}
