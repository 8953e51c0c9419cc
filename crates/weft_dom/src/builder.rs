//! Fluent construction of element subtrees.

use crate::document::{Document, NodeId};

/// Shorthand for [`ElementBuilder::new`].
#[must_use]
pub fn el(tag: impl Into<String>) -> ElementBuilder {
    ElementBuilder::new(tag)
}

/// Builder for an element subtree.
///
/// # Example
///
/// ```
/// use weft_dom::{Document, el};
///
/// let mut doc = Document::new();
/// let surface = el("projection-surface")
///     .child(el("div").child(el("attach-widget").attr("data-widget-id", "nav")))
///     .build(&mut doc);
/// # let _ = surface;
/// ```
#[derive(Debug)]
pub struct ElementBuilder {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<ElementBuilder>,
}

impl ElementBuilder {
    /// Starts a builder for the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Adds a child subtree.
    #[must_use]
    pub fn child(mut self, child: ElementBuilder) -> Self {
        self.children.push(child);
        self
    }

    /// Materializes the subtree into `doc` and returns its root id.
    pub fn build(self, doc: &mut Document) -> NodeId {
        let id = doc.create_element(self.tag);
        for (name, value) in self.attributes {
            doc.set_attribute(id, name, value);
        }
        for child in self.children {
            let child_id = child.build(doc);
            doc.append_child(id, child_id);
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_tree() {
        let mut doc = Document::new();
        let root = el("projection-surface")
            .child(el("foo-bar").attr("is", "foo-bar"))
            .child(el("div"))
            .build(&mut doc);

        assert_eq!(doc.children(root).len(), 2);
        let first = doc.children(root)[0];
        assert_eq!(doc.tag(first), "foo-bar");
        assert_eq!(doc.attribute(first, "is"), Some("foo-bar"));
    }
}
