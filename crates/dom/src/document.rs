//! Arena-backed mutable document tree.
//!
//! Invariants:
//! - The root is always the document node created by [`Document::new`].
//! - A node has at most one parent, and its parent's child list holds it exactly once.
//! - Detaching a node keeps it allocated; it can be re-attached elsewhere. Discarding a
//!   node frees its whole subtree and invalidates every handle in it.
//! - Freed slots are never reused: the arena only grows, so a document is meant to
//!   live for one sanitizing pass, not to be edited indefinitely.
//! - Operations never create cycles.

use crate::types::{Attributes, ElementData, NodeId, NodeKind};
use crate::DomError;

#[derive(Clone, Debug)]
struct NodeRecord {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    live: bool,
}

impl NodeRecord {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            live: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<NodeRecord>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeRecord::new(NodeKind::Document)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeRecord::new(kind));
        id
    }

    fn record(&self, id: NodeId) -> Result<&NodeRecord, DomError> {
        match self.nodes.get(id.index()) {
            Some(record) if record.live => Ok(record),
            _ => Err(DomError::MissingNode(id)),
        }
    }

    fn record_mut(&mut self, id: NodeId) -> Result<&mut NodeRecord, DomError> {
        match self.nodes.get_mut(id.index()) {
            Some(record) if record.live => Ok(record),
            _ => Err(DomError::MissingNode(id)),
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.record(id).is_ok()
    }

    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.create_element_with(name, Attributes::new())
    }

    pub fn create_element_with(&mut self, name: &str, attributes: Attributes) -> NodeId {
        self.push(NodeKind::Element(ElementData::new(name, attributes)))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Comment(text.into()))
    }

    // ---------------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------------

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.record(id).ok().map(|r| &r.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.record(id).ok().and_then(|r| r.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.record(id).map(|r| r.children.as_slice()).unwrap_or(&[])
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|c| *c == id)?;
        siblings.get(pos + 1).copied()
    }

    /// True when `id` is reachable from the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == self.root {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    // ---------------------------------------------------------------------
    // Element accessors
    // ---------------------------------------------------------------------

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.kind(id).and_then(NodeKind::as_element)
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        self.record_mut(id)?
            .kind
            .as_element_mut()
            .ok_or(DomError::WrongNodeKind(id))
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(ElementData::name)
    }

    pub fn is_element_named(&self, id: NodeId, name: &str) -> bool {
        self.element(id).is_some_and(|e| e.is_named(name))
    }

    pub fn attributes(&self, id: NodeId) -> Option<&Attributes> {
        self.element(id).map(|e| &e.attributes)
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id).and_then(|a| a.get(name))
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attributes(id).is_some_and(|a| a.contains(name))
    }

    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        self.element_mut(id)?.attributes.set(name, value);
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<Option<String>, DomError> {
        Ok(self.element_mut(id)?.attributes.remove(name))
    }

    pub fn set_attributes(&mut self, id: NodeId, attributes: Attributes) -> Result<(), DomError> {
        self.element_mut(id)?.attributes = attributes;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Structural mutation
    // ---------------------------------------------------------------------

    fn ensure_attachable(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if !self.record(parent)?.kind.allows_children() {
            return Err(DomError::InvalidParent(parent));
        }
        if child == self.root {
            return Err(DomError::RootImmovable);
        }
        if self.record(child)?.parent.is_some() {
            return Err(DomError::AlreadyAttached(child));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(DomError::CycleDetected { parent, child });
        }
        Ok(())
    }

    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.ensure_attachable(parent, child)?;
        self.record_mut(parent)?.children.push(child);
        self.record_mut(child)?.parent = Some(parent);
        Ok(())
    }

    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        before: NodeId,
    ) -> Result<(), DomError> {
        self.ensure_attachable(parent, child)?;
        let pos = self
            .record(parent)?
            .children
            .iter()
            .position(|k| *k == before)
            .ok_or(DomError::NotAChild {
                parent,
                child: before,
            })?;
        self.record_mut(parent)?.children.insert(pos, child);
        self.record_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Detach `child` from `parent`. The child stays allocated and can be re-attached.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, DomError> {
        if self.record(child)?.parent != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.record_mut(parent)?.children.retain(|k| *k != child);
        self.record_mut(child)?.parent = None;
        Ok(child)
    }

    /// Detach `node` from whatever parent it has. No-op for detached nodes.
    pub fn detach(&mut self, node: NodeId) -> Result<(), DomError> {
        if node == self.root {
            return Err(DomError::RootImmovable);
        }
        if let Some(parent) = self.record(node)?.parent {
            self.remove_child(parent, node)?;
        }
        Ok(())
    }

    /// Put `new_child` at the position of `old_child`, which becomes detached.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> Result<NodeId, DomError> {
        if self.record(old_child)?.parent != Some(parent) {
            return Err(DomError::NotAChild {
                parent,
                child: old_child,
            });
        }
        self.ensure_attachable(parent, new_child)?;
        let children = &mut self.record_mut(parent)?.children;
        let pos = children
            .iter()
            .position(|k| *k == old_child)
            .ok_or(DomError::NotAChild {
                parent,
                child: old_child,
            })?;
        children[pos] = new_child;
        self.record_mut(new_child)?.parent = Some(parent);
        self.record_mut(old_child)?.parent = None;
        Ok(old_child)
    }

    /// Detach `node` and free its entire subtree.
    pub fn discard(&mut self, node: NodeId) -> Result<(), DomError> {
        self.detach(node)?;
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let record = self.record_mut(current)?;
            record.live = false;
            record.parent = None;
            stack.append(&mut record.children);
        }
        Ok(())
    }

    /// Copy `node` into a new detached node. A deep clone copies the whole subtree;
    /// a shallow clone copies only the node itself (tag and attributes for elements).
    pub fn clone_node(&mut self, node: NodeId, deep: bool) -> Result<NodeId, DomError> {
        let kind = self.record(node)?.kind.clone();
        let copy = self.push(kind);
        if !deep {
            return Ok(copy);
        }
        // (original, its copy) pairs whose children still need copying.
        let mut pending = vec![(node, copy)];
        while let Some((original, parent_copy)) = pending.pop() {
            let children = self.record(original)?.children.clone();
            for child in children {
                let kind = self.record(child)?.kind.clone();
                let child_copy = self.push(kind);
                self.record_mut(parent_copy)?.children.push(child_copy);
                self.record_mut(child_copy)?.parent = Some(parent_copy);
                pending.push((child, child_copy));
            }
        }
        Ok(copy)
    }

    /// Verify parent/child links of everything reachable from the root.
    pub fn check_integrity(&self) -> Result<(), DomError> {
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            let record = self.record(node)?;
            if std::mem::replace(&mut seen[node.index()], true) {
                return Err(DomError::Integrity {
                    node,
                    detail: "reachable more than once".to_string(),
                });
            }
            if !record.kind.allows_children() && !record.children.is_empty() {
                return Err(DomError::Integrity {
                    node,
                    detail: "leaf node has children".to_string(),
                });
            }
            for &child in &record.children {
                let child_record = self.record(child).map_err(|_| DomError::Integrity {
                    node,
                    detail: format!("dangling child {child:?}"),
                })?;
                if child_record.parent != Some(node) {
                    return Err(DomError::Integrity {
                        node: child,
                        detail: format!(
                            "parent link {:?} does not match {node:?}",
                            child_record.parent
                        ),
                    });
                }
                stack.push(child);
            }
        }
        Ok(())
    }
}
