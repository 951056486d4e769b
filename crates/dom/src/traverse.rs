use crate::{Document, NodeId};

/// Preorder descendants of `node` (excluding `node`) in document order.
pub fn descendants(doc: &Document, node: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack: Vec<NodeId> = doc.children(node).iter().rev().copied().collect();
    while let Some(current) = stack.pop() {
        out.push(current);
        // Reverse push so children are visited in original order.
        stack.extend(doc.children(current).iter().rev().copied());
    }
    out
}

/// Snapshot of every connected element named `name`, in document order.
///
/// The result is a plain vector, so callers can mutate the tree while
/// iterating it without the list shifting underneath them.
pub fn elements_by_tag_name(doc: &Document, name: &str) -> Vec<NodeId> {
    descendants(doc, doc.root())
        .into_iter()
        .filter(|&id| doc.is_element_named(id, name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elements_are_returned_in_document_order() {
        let mut doc = Document::new();
        let first = doc.create_element("audio");
        let wrapper = doc.create_element("div");
        let nested = doc.create_element("AUDIO");
        let last = doc.create_element("audio");
        doc.append_child(doc.root(), first).unwrap();
        doc.append_child(doc.root(), wrapper).unwrap();
        doc.append_child(wrapper, nested).unwrap();
        doc.append_child(doc.root(), last).unwrap();

        assert_eq!(elements_by_tag_name(&doc, "audio"), vec![first, nested, last]);
    }

    #[test]
    fn detached_elements_are_not_selected() {
        let mut doc = Document::new();
        let attached = doc.create_element("audio");
        doc.append_child(doc.root(), attached).unwrap();
        let _detached = doc.create_element("audio");
        assert_eq!(elements_by_tag_name(&doc, "audio"), vec![attached]);
    }

    #[test]
    fn deep_nesting_does_not_recurse() {
        let mut doc = Document::new();
        let mut parent = doc.root();
        for _ in 0..10_000 {
            let div = doc.create_element("div");
            doc.append_child(parent, div).unwrap();
            parent = div;
        }
        assert_eq!(descendants(&doc, doc.root()).len(), 10_000);
    }
}
