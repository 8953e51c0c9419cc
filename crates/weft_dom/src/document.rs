//! Element arena and structural queries.

use core::fmt;

use hashbrown::HashMap;

/// Errors raised by structural document mutations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomError {
    /// The target of a replacement has no parent.
    #[error("cannot replace a detached element: {0}")]
    ReplaceDetached(NodeId),
}

/// Unique identifier for an element within one [`Document`].
///
/// Ids are indices into the document's arena and are never reused. An id is
/// only meaningful for the document that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Returns the raw arena index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el_{}", self.0)
    }
}

#[derive(Debug)]
struct ElementData {
    tag: String,
    attributes: HashMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An element tree stored as an index-addressed arena.
///
/// Child order is document order. Detached elements stay in the arena (their
/// ids remain valid) but are unreachable from any root they were removed
/// from.
#[derive(Debug, Default)]
pub struct Document {
    nodes: Vec<ElementData>,
}

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detached element with the given tag name.
    ///
    /// Tag case is preserved as written; callers that need case-insensitive
    /// matching fold it themselves.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ElementData {
            tag: tag.into(),
            attributes: HashMap::new(),
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Returns the element's tag name as written.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    /// Sets an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, node: NodeId, name: impl Into<String>, value: impl Into<String>) {
        self.nodes[node.0].attributes.insert(name.into(), value.into());
    }

    /// Returns an attribute value, if present.
    #[must_use]
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0].attributes.get(name).map(String::as_str)
    }

    /// Returns the element's parent, if attached.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    /// Returns the element's children in document order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Appends `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Removes `node` from its parent's child list. No-op when detached.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    /// Returns `root` plus all descendants, pre-order, depth-first.
    ///
    /// This is the flat document-order view the tree reconstructor scans.
    #[must_use]
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            out.push(node);
            // Reverse so the first child is visited first.
            for child in self.nodes[node.0].children.iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// Returns whether `node` is `ancestor` or one of its descendants.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.nodes[n.0].parent;
        }
        false
    }

    /// Moves `new` into `old`'s position and detaches `old`.
    ///
    /// `new` is removed from wherever it currently sits (typically the tail
    /// of a surface root during placeholder swapping).
    ///
    /// # Errors
    ///
    /// Returns [`DomError::ReplaceDetached`] when `old` has no parent.
    pub fn replace_with(&mut self, old: NodeId, new: NodeId) -> Result<(), DomError> {
        let parent = self.nodes[old.0]
            .parent
            .ok_or(DomError::ReplaceDetached(old))?;
        self.detach(new);
        let position = self.nodes[parent.0]
            .children
            .iter()
            .position(|c| *c == old)
            .ok_or(DomError::ReplaceDetached(old))?;
        self.nodes[parent.0].children[position] = new;
        self.nodes[new.0].parent = Some(parent);
        self.nodes[old.0].parent = None;
        Ok(())
    }

    /// Number of elements ever created in this document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the document has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(doc: &mut Document) -> (NodeId, NodeId, NodeId, NodeId) {
        let root = doc.create_element("div");
        let a = doc.create_element("span");
        let b = doc.create_element("p");
        let c = doc.create_element("em");
        doc.append_child(root, a);
        doc.append_child(root, b);
        doc.append_child(b, c);
        (root, a, b, c)
    }

    #[test]
    fn descendants_are_pre_order() {
        let mut doc = Document::new();
        let (root, a, b, c) = tree(&mut doc);
        assert_eq!(doc.descendants(root), vec![root, a, b, c]);
    }

    #[test]
    fn contains_is_inclusive() {
        let mut doc = Document::new();
        let (root, a, b, c) = tree(&mut doc);
        assert!(doc.contains(root, c));
        assert!(doc.contains(b, c));
        assert!(doc.contains(a, a));
        assert!(!doc.contains(a, c));
    }

    #[test]
    fn replace_with_keeps_position() {
        let mut doc = Document::new();
        let (root, a, b, _) = tree(&mut doc);
        let fresh = doc.create_element("section");
        doc.append_child(root, fresh);

        doc.replace_with(a, fresh).unwrap();

        assert_eq!(doc.children(root), &[fresh, b]);
        assert_eq!(doc.parent(a), None);
        assert_eq!(doc.parent(fresh), Some(root));
    }

    #[test]
    fn replace_detached_fails() {
        let mut doc = Document::new();
        let old = doc.create_element("div");
        let new = doc.create_element("div");
        assert!(matches!(
            doc.replace_with(old, new),
            Err(DomError::ReplaceDetached(_))
        ));
    }

    #[test]
    fn append_child_reparents() {
        let mut doc = Document::new();
        let (root, a, b, _) = tree(&mut doc);
        doc.append_child(b, a);
        assert_eq!(doc.children(root), &[b]);
        assert_eq!(doc.parent(a), Some(b));
    }
}
