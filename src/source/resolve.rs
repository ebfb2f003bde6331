//! Recomposition of a downloaded object closure into one tree.
//!
//! The server stores every detachable child as its own object and ships a
//! commit as a flat list of `id<TAB>json` lines. Children are linked through
//! `{"speckle_type": "reference", "referencedId": ...}` stubs, and large
//! lists are split into `DataChunk` objects.

use crate::error::SourceError;
use crate::model::RawNode;
use serde_json::{Map, Value};
use std::collections::HashMap;

const REFERENCE_TYPE: &str = "reference";
const DATA_CHUNK_TYPE: &str = "DataChunk";

/// Parses the object download body into id → object.
///
/// Lines are `id<TAB>json`; bare JSON lines are accepted when they carry
/// their own `id`.
pub fn parse_object_lines(body: &str) -> Result<HashMap<String, Value>, SourceError> {
    let mut objects = HashMap::new();

    for (n, line) in body.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (id, json) = match line.split_once('\t') {
            Some((id, json)) => (Some(id.to_string()), json),
            None => (None, line),
        };
        let value: Value = serde_json::from_str(json).map_err(|e| SourceError::Protocol {
            message: format!("object line {}: {e}", n + 1),
        })?;
        let id = id.or_else(|| value.get("id")?.as_str().map(str::to_string));
        let id = match id {
            Some(id) => id,
            None => {
                return Err(SourceError::Protocol {
                    message: format!("object line {} has no id", n + 1),
                })
            }
        };
        objects.insert(id, value);
    }

    Ok(objects)
}

/// Builds the tree rooted at `root_id`, inlining references and flattening
/// chunked lists. `__closure` bookkeeping is dropped.
pub fn recompose(root_id: &str, objects: &HashMap<String, Value>) -> Result<RawNode, SourceError> {
    let root = objects
        .get(root_id)
        .ok_or_else(|| SourceError::UnresolvedReference {
            id: root_id.to_string(),
        })?;
    let mut stack = vec![root_id.to_string()];
    let value = inline(root, objects, &mut stack)?;
    Ok(RawNode::from_json(value))
}

fn inline(
    value: &Value,
    objects: &HashMap<String, Value>,
    stack: &mut Vec<String>,
) -> Result<Value, SourceError> {
    match value {
        Value::Object(map) => {
            if let Some(id) = reference_target(map) {
                return inline_reference(id, objects, stack);
            }
            let mut out = Map::new();
            for (k, v) in map {
                if k == "__closure" {
                    continue;
                }
                out.insert(k.clone(), inline(v, objects, stack)?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => {
            let resolved = items
                .iter()
                .map(|item| inline(item, objects, stack))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(flatten_chunks(resolved)))
        }
        other => Ok(other.clone()),
    }
}

fn inline_reference(
    id: &str,
    objects: &HashMap<String, Value>,
    stack: &mut Vec<String>,
) -> Result<Value, SourceError> {
    if stack.iter().any(|seen| seen == id) {
        return Err(SourceError::Protocol {
            message: format!("object '{id}' references itself"),
        });
    }
    let target = objects
        .get(id)
        .ok_or_else(|| SourceError::UnresolvedReference { id: id.to_string() })?;
    stack.push(id.to_string());
    let resolved = inline(target, objects, stack);
    stack.pop();
    resolved
}

fn reference_target(map: &Map<String, Value>) -> Option<&str> {
    if map.get("speckle_type").and_then(Value::as_str) != Some(REFERENCE_TYPE) {
        return None;
    }
    map.get("referencedId").and_then(Value::as_str)
}

fn is_chunk(value: &Value) -> bool {
    value
        .get("speckle_type")
        .and_then(Value::as_str)
        .is_some_and(|t| t.ends_with(DATA_CHUNK_TYPE))
}

/// A list made only of chunks is the concatenation of their `data`.
fn flatten_chunks(items: Vec<Value>) -> Vec<Value> {
    if items.is_empty() || !items.iter().all(is_chunk) {
        return items;
    }
    items
        .into_iter()
        .flat_map(|chunk| match chunk.get("data") {
            Some(Value::Array(data)) => data.clone(),
            _ => Vec::new(),
        })
        .collect()
}
