//! Structural edits shared by tag sanitizers.

use dom::{Document, DomError, NodeId};

pub const FALLBACK_ISLAND_TAG: &str = "noscript";

/// True when `node` sits directly inside a `<noscript>` fallback island.
pub fn is_in_fallback_island(doc: &Document, node: NodeId) -> bool {
    doc.parent(node)
        .is_some_and(|parent| doc.is_element_named(parent, FALLBACK_ISLAND_TAG))
}

/// Detach every child of `node`, first to last, and return them in their original order.
pub fn detach_children(doc: &mut Document, node: NodeId) -> Result<Vec<NodeId>, DomError> {
    let mut detached = Vec::with_capacity(doc.children(node).len());
    while let Some(child) = doc.first_child(node) {
        detached.push(doc.remove_child(node, child)?);
    }
    Ok(detached)
}

/// Swap `source` for `replacement` and keep the old markup reachable for
/// readers without script support:
///
/// ```text
/// <replacement> …children… <noscript> <fallback/> </noscript> </replacement>
/// ```
///
/// `source` ends up detached.
pub fn wrap_with_fallback(
    doc: &mut Document,
    source: NodeId,
    replacement: NodeId,
    fallback: NodeId,
) -> Result<NodeId, DomError> {
    let parent = doc.parent(source).ok_or(DomError::MissingNode(source))?;
    let noscript = doc.create_element(FALLBACK_ISLAND_TAG);
    doc.append_child(replacement, noscript)?;
    doc.replace_child(parent, replacement, source)?;
    doc.append_child(noscript, fallback)?;
    Ok(noscript)
}

/// Remove `node` and its subtree from the document.
pub fn remove_element(doc: &mut Document, node: NodeId) -> Result<(), DomError> {
    doc.discard(node)
}
