use super::category::Category;
use super::element::{has_parameter_container, label, parameter_names};
use crate::error::ExplorerError;
use crate::model::RawNode;
use std::collections::BTreeSet;
use tracing::debug;

/// Sorted union of parameter display names over every element of
/// `category`.
///
/// Elements of one category need not share a parameter set, so all of them
/// are visited. An element without a parameter container fails the whole
/// request with [`ExplorerError::UnsupportedElementShape`].
pub fn list_parameter_names(category: &Category<'_>) -> Result<Vec<String>, ExplorerError> {
    let mut names = BTreeSet::new();

    for element in category.elements {
        require_parameter_container(category, element)?;
        let element_names =
            parameter_names(element).map_err(|e| ExplorerError::UnsupportedElementShape {
                category: category.name.to_string(),
                element: label(element),
                reason: e.to_string(),
            })?;
        names.extend(element_names);
    }

    debug!(
        category = category.name,
        elements = category.len(),
        parameters = names.len(),
        "discovered parameters"
    );
    Ok(names.into_iter().collect())
}

/// Fails with [`ExplorerError::UnsupportedElementShape`] when `element`
/// carries no authoring-tool parameters.
pub(crate) fn require_parameter_container(
    category: &Category<'_>,
    element: &RawNode,
) -> Result<(), ExplorerError> {
    if has_parameter_container(element) {
        return Ok(());
    }
    Err(ExplorerError::UnsupportedElementShape {
        category: category.name.to_string(),
        element: label(element),
        reason: "no authoring-tool parameters".to_string(),
    })
}
