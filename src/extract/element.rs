use crate::error::{ExplorerError, NodeError};
use crate::model::{ParameterSet, RawNode, Scalar};
use std::collections::BTreeSet;

const BUILT_ELEMENTS: &str = "Objects.BuiltElements";
const PARAMETERS: &str = "parameters";

/// One element of a category, checked to be a built element.
///
/// Reads the authoring-tool parameter container: every dynamic member of
/// `parameters` is an opaque parameter id whose entry carries the display
/// `name` and the `value`.
#[derive(Debug, Clone, Copy)]
pub struct ElementRecord<'a> {
    node: &'a RawNode,
}

impl<'a> ElementRecord<'a> {
    /// Wraps `node`, failing when its `speckle_type` is outside the
    /// `Objects.BuiltElements` family.
    pub fn new(node: &'a RawNode) -> Result<Self, ExplorerError> {
        let speckle_type = node.speckle_type().unwrap_or_default();
        if !speckle_type.contains(BUILT_ELEMENTS) {
            return Err(ExplorerError::NotABuiltElement {
                element: label(node),
                speckle_type: speckle_type.to_string(),
            });
        }
        Ok(Self { node })
    }

    #[must_use]
    pub fn node(&self) -> &'a RawNode {
        self.node
    }

    #[must_use]
    pub fn label(&self) -> String {
        label(self.node)
    }

    /// The element's own `category` member, if the source sets one.
    #[must_use]
    pub fn category(&self) -> Option<&'a str> {
        self.node.get("category").and_then(RawNode::as_str)
    }

    /// Extracts the parameter set, keeping only names in `filter` when one is
    /// given. Names outside the filter are skipped, not reported.
    ///
    /// An element without a parameter container yields an empty set.
    pub fn parameters(&self, filter: Option<&BTreeSet<String>>) -> Result<ParameterSet, NodeError> {
        extract_parameters(self.node, filter)
    }
}

/// Identifier used in error messages: the element id, else its description.
pub(crate) fn label(node: &RawNode) -> String {
    node.id().map_or_else(|| node.describe(), |id| format!("'{id}'"))
}

/// True when `node` has a non-null `parameters` member.
#[must_use]
pub fn has_parameter_container(node: &RawNode) -> bool {
    node.get(PARAMETERS).is_some_and(|p| !p.is_null())
}

/// Flattens the `parameters` container of `node` into display name → value.
pub fn extract_parameters(
    node: &RawNode,
    filter: Option<&BTreeSet<String>>,
) -> Result<ParameterSet, NodeError> {
    let mut set = ParameterSet::new();
    let container = match node.get(PARAMETERS) {
        Some(c) if !c.is_null() => c,
        _ => return Ok(set),
    };

    for id in container.dynamic_member_names() {
        let entry = container.member(id)?;
        let name = parameter_name(entry)?;
        if filter.is_some_and(|f| !f.contains(&name)) {
            continue;
        }
        let value = parameter_value(entry.member("value")?);
        set.insert(name, value);
    }

    Ok(set)
}

/// Display names of every parameter on `node`, unfiltered.
pub(crate) fn parameter_names(node: &RawNode) -> Result<Vec<String>, NodeError> {
    let container = node.member(PARAMETERS)?;
    container
        .dynamic_member_names()
        .into_iter()
        .map(|id| parameter_name(container.member(id)?))
        .collect()
}

fn parameter_name(entry: &RawNode) -> Result<String, NodeError> {
    let name = entry.member("name")?;
    match name.as_scalar() {
        Some(Scalar::Text(s)) => Ok(s.clone()),
        Some(other) => Ok(other.to_string()),
        None => Err(NodeError::NotAScalar {
            context: format!("name of {}", entry.describe()),
        }),
    }
}

fn parameter_value(value: &RawNode) -> Scalar {
    match value {
        RawNode::Scalar(s) => s.clone(),
        nested => Scalar::Text(nested.to_json().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn wall() -> RawNode {
        RawNode::from_json(json!({
            "id": "w1",
            "speckle_type": "Objects.BuiltElements.Wall:Objects.BuiltElements.Revit.RevitWall",
            "category": "Wände",
            "parameters": {
                "id": "p1",
                "speckle_type": "Base",
                "WALL_ATTR_WIDTH_PARAM": { "name": "Breite", "value": 0.24 },
                "ALL_MODEL_MARK": { "name": "Kennzeichen", "value": "W-01" },
                "HOST_AREA_COMPUTED": { "name": "Fläche", "value": 12 },
            },
        }))
    }

    #[test]
    fn extracts_display_names_not_ids() {
        let node = wall();
        let set = ElementRecord::new(&node).unwrap().parameters(None).unwrap();

        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![
                ("Breite", &Scalar::Float(0.24)),
                ("Kennzeichen", &Scalar::Text("W-01".to_string())),
                ("Fläche", &Scalar::Int(12)),
            ]
        );
    }

    #[test]
    fn filter_skips_names_outside_it() {
        let node = wall();
        let filter: BTreeSet<String> = ["Fläche".to_string(), "Volumen".to_string()].into();

        let set = extract_parameters(&node, Some(&filter)).unwrap();

        assert_eq!(set.names().collect::<Vec<_>>(), vec!["Fläche"]);
    }

    #[test]
    fn element_without_parameters_yields_empty_set() {
        let node = RawNode::from_json(json!({
            "id": "x",
            "speckle_type": "Objects.BuiltElements.Room",
        }));

        assert!(extract_parameters(&node, None).unwrap().is_empty());
        assert!(!has_parameter_container(&node));
    }

    #[test]
    fn non_built_element_is_rejected() {
        let node = RawNode::from_json(json!({
            "id": "m1",
            "speckle_type": "Objects.Other.RenderMaterial",
        }));

        let err = ElementRecord::new(&node).unwrap_err();
        assert!(matches!(
            err,
            ExplorerError::NotABuiltElement { ref speckle_type, .. }
                if speckle_type == "Objects.Other.RenderMaterial"
        ));
    }

    #[test]
    fn parameter_entry_without_name_is_an_error() {
        let node = RawNode::from_json(json!({
            "speckle_type": "Objects.BuiltElements.Wall",
            "parameters": { "X": { "value": 1 } },
        }));

        assert!(matches!(
            extract_parameters(&node, None),
            Err(NodeError::MissingMember { ref member, .. }) if member == "name"
        ));
    }

    #[test]
    fn nested_value_is_kept_as_json_text() {
        let node = RawNode::from_json(json!({
            "speckle_type": "Objects.BuiltElements.Wall",
            "parameters": { "X": { "name": "Material", "value": { "name": "Beton" } } },
        }));

        let set = extract_parameters(&node, None).unwrap();
        assert_eq!(
            set.get("Material"),
            Some(&Scalar::Text(r#"{"name":"Beton"}"#.to_string()))
        );
    }

    #[test]
    fn category_member_is_exposed() {
        let node = wall();
        assert_eq!(ElementRecord::new(&node).unwrap().category(), Some("Wände"));
    }
}
