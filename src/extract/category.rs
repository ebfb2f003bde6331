use crate::error::NodeError;
use crate::model::RawNode;
use tracing::debug;

/// Member nesting the categories in the current schema.
pub const TYPES_MEMBER: &str = "@Types";

/// Metadata blocks of the legacy schema that sit next to the categories.
pub const NON_CATEGORY_MEMBERS: &[&str] = &["@Projektinformationen", "@Raster", "@Materialien"];

/// A named, ordered collection of elements.
#[derive(Debug, Clone, Copy)]
pub struct Category<'a> {
    pub name: &'a str,
    pub elements: &'a [RawNode],
}

impl<'a> Category<'a> {
    /// A category over an explicit element list.
    #[must_use]
    pub fn from_elements(name: &'a str, elements: &'a [RawNode]) -> Self {
        Self { name, elements }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// The node whose members are the categories: `@Types` when present,
/// otherwise the commit root itself.
#[must_use]
pub fn schema_root(root: &RawNode) -> &RawNode {
    root.get(TYPES_MEMBER).unwrap_or(root)
}

/// Category names of a commit, in source order.
#[must_use]
pub fn list_categories(root: &RawNode) -> Vec<String> {
    let categories: Vec<String> = schema_root(root)
        .dynamic_member_names()
        .into_iter()
        .filter(|name| !NON_CATEGORY_MEMBERS.contains(name))
        .map(str::to_string)
        .collect();
    debug!(count = categories.len(), "listed categories");
    categories
}

/// Looks up a category by name. Metadata blocks are not categories.
///
/// A category holding a single object is treated as a one-element list.
pub fn find_category<'a>(
    root: &'a RawNode,
    name: &'a str,
) -> Result<Option<Category<'a>>, NodeError> {
    if NON_CATEGORY_MEMBERS.contains(&name) {
        return Ok(None);
    }
    let Some(node) = schema_root(root).get(name) else {
        return Ok(None);
    };
    let elements = match node {
        RawNode::List(items) => items.as_slice(),
        RawNode::Object(_) => std::slice::from_ref(node),
        RawNode::Scalar(_) => node.as_list()?,
    };
    Ok(Some(Category { name, elements }))
}
