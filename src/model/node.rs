use crate::error::NodeError;
use serde_json::{Map, Number, Value};
use std::fmt;

/// Typed members every Speckle `Base` carries; everything else is dynamic.
const TYPED_MEMBERS: &[&str] = &[
    "id",
    "speckle_type",
    "applicationId",
    "totalChildrenCount",
    "units",
    "__closure",
];

/// A leaf value of the object graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// True for values a column cleaner counts as "no data": null, `false`,
    /// numeric zero and the empty string.
    #[must_use]
    pub fn is_zero_like(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::Bool(b) => !b,
            Scalar::Int(i) => *i == 0,
            Scalar::Float(f) => *f == 0.0,
            Scalar::Text(s) => s.is_empty(),
        }
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Int(i) => Value::from(*i),
            Scalar::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            Scalar::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// One node of a received commit: an object with dynamic members, an
/// ordered list, or a scalar. Object members keep source order.
#[derive(Debug, Clone, PartialEq)]
pub enum RawNode {
    Object(Vec<(String, RawNode)>),
    List(Vec<RawNode>),
    Scalar(Scalar),
}

impl RawNode {
    #[must_use]
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => RawNode::Object(
                map.into_iter()
                    .map(|(k, v)| (k, RawNode::from_json(v)))
                    .collect(),
            ),
            Value::Array(items) => {
                RawNode::List(items.into_iter().map(RawNode::from_json).collect())
            }
            Value::Null => RawNode::Scalar(Scalar::Null),
            Value::Bool(b) => RawNode::Scalar(Scalar::Bool(b)),
            Value::Number(n) => RawNode::Scalar(match n.as_i64() {
                Some(i) => Scalar::Int(i),
                None => Scalar::Float(n.as_f64().unwrap_or_default()),
            }),
            Value::String(s) => RawNode::Scalar(Scalar::Text(s)),
        }
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            RawNode::Object(members) => {
                let mut map = Map::new();
                for (k, v) in members {
                    map.insert(k.clone(), v.to_json());
                }
                Value::Object(map)
            }
            RawNode::List(items) => Value::Array(items.iter().map(RawNode::to_json).collect()),
            RawNode::Scalar(s) => s.to_json(),
        }
    }

    /// Optional member lookup. Returns `None` for non-objects too.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RawNode> {
        match self {
            RawNode::Object(members) => members.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Required member lookup.
    pub fn member(&self, name: &str) -> Result<&RawNode, NodeError> {
        if !matches!(self, RawNode::Object(_)) {
            return Err(NodeError::NotAnObject {
                context: self.describe(),
            });
        }
        self.get(name).ok_or_else(|| NodeError::MissingMember {
            member: name.to_string(),
            context: self.describe(),
        })
    }

    #[must_use]
    pub fn has_member(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Member names excluding the typed `Base` fields, in source order.
    #[must_use]
    pub fn dynamic_member_names(&self) -> Vec<&str> {
        match self {
            RawNode::Object(members) => members
                .iter()
                .map(|(k, _)| k.as_str())
                .filter(|k| !TYPED_MEMBERS.contains(k))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn as_list(&self) -> Result<&[RawNode], NodeError> {
        match self {
            RawNode::List(items) => Ok(items),
            _ => Err(NodeError::NotAList {
                context: self.describe(),
            }),
        }
    }

    #[must_use]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            RawNode::Scalar(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawNode::Scalar(Scalar::Text(s)) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, RawNode::Scalar(Scalar::Null))
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.get("id").and_then(RawNode::as_str)
    }

    #[must_use]
    pub fn speckle_type(&self) -> Option<&str> {
        self.get("speckle_type").and_then(RawNode::as_str)
    }

    /// Short human description used in error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            RawNode::Object(_) => match (self.speckle_type(), self.id()) {
                (Some(t), Some(id)) => format!("{t} '{id}'"),
                (None, Some(id)) => format!("object '{id}'"),
                (Some(t), None) => t.to_string(),
                (None, None) => "object".to_string(),
            },
            RawNode::List(items) => format!("list of {}", items.len()),
            RawNode::Scalar(_) => "scalar".to_string(),
        }
    }
}
