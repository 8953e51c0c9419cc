//! Projection-surface forest reconstruction.
//!
//! The document is scanned flat, in document order, and the forest of custom
//! elements is rebuilt in a single pass with an explicit stack of currently
//! open nodes. Plain elements are transparent: a custom element's logical
//! parent is its nearest custom ancestor, however many plain wrappers sit in
//! between.

use weft_dom::{Document, NodeId};
use weft_registry::{ATTACH_WIDGET, CombinedRegistry, PROJECTION_SURFACE};

use crate::error::RealizeError;

/// A custom element recovered from the document.
///
/// Lives only for the duration of one `realize` call. `children` are indices
/// into the owning [`SurfaceForest`] arena.
#[derive(Debug)]
pub struct CustomElement {
    /// The underlying document element.
    pub element: NodeId,
    /// Effective identity: the `is` attribute as written, or the
    /// ASCII-lowercased tag name.
    pub is: String,
    /// Child custom elements, in document order.
    pub children: Vec<usize>,
}

/// The reconstructed forest over one subtree.
#[derive(Debug, Default)]
pub struct SurfaceForest {
    /// Arena of custom elements, in document order.
    pub nodes: Vec<CustomElement>,
    /// Arena indices of the projection-surface roots.
    pub surfaces: Vec<usize>,
}

impl SurfaceForest {
    /// The document elements of a node's immediate children.
    #[must_use]
    pub fn child_elements(&self, index: usize) -> Vec<NodeId> {
        self.nodes[index]
            .children
            .iter()
            .map(|&c| self.nodes[c].element)
            .collect()
    }
}

/// Computes an element's effective custom-element identity, or `None` when
/// the element is plain.
///
/// The `is` attribute takes precedence and is matched case-sensitively; the
/// tag name is folded with ASCII lowercasing only. Unicode case folding must
/// not happen here — a Turkish dotted capital I in a tag name stays distinct.
fn effective_identity(
    doc: &Document,
    element: NodeId,
    registry: &CombinedRegistry,
) -> Option<String> {
    let is = match doc.attribute(element, "is") {
        Some(value) => value.to_string(),
        None => doc.tag(element).to_ascii_lowercase(),
    };
    let custom = is == ATTACH_WIDGET
        || is == PROJECTION_SURFACE
        || registry.has_custom_element_factory(&is);
    custom.then_some(is)
}

/// Scans the subtree under `root` and reconstructs the projection-surface
/// forest.
///
/// # Errors
///
/// Returns [`RealizeError::UnrootedCustomTag`] when a custom element has no
/// enclosing projection surface, and [`RealizeError::NestedSurface`] when a
/// surface sits inside another. Both are fatal for the scan.
pub fn custom_elements_by_surface(
    doc: &Document,
    root: NodeId,
    registry: &CombinedRegistry,
) -> Result<SurfaceForest, RealizeError> {
    let mut forest = SurfaceForest::default();
    // Currently open nodes, deepest last.
    let mut open: Vec<usize> = Vec::new();

    for element in doc.descendants(root) {
        let Some(is) = effective_identity(doc, element, registry) else {
            continue;
        };

        // Close every open node that does not contain this element. The
        // check is topological containment, not adjacency: plain elements
        // between the two do not matter.
        while let Some(&top) = open.last() {
            if doc.contains(forest.nodes[top].element, element) {
                break;
            }
            open.pop();
        }

        let index = forest.nodes.len();
        let is_surface = is == PROJECTION_SURFACE;
        match open.last() {
            None => {
                if !is_surface {
                    return Err(RealizeError::UnrootedCustomTag);
                }
                forest.surfaces.push(index);
            }
            Some(&parent) => {
                if is_surface {
                    return Err(RealizeError::NestedSurface);
                }
                forest.nodes[parent].children.push(index);
            }
        }
        forest.nodes.push(CustomElement {
            element,
            is,
            children: Vec::new(),
        });
        open.push(index);
    }

    Ok(forest)
}
