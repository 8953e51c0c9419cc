//! Arena-backed markup document model.
//!
//! `weft_dom` is the "raw DOM" that the realization engine scans and mutates.
//! It is deliberately small: elements, attributes, ordered children, and the
//! handful of structural queries the engines need (document-order traversal,
//! containment, positional replacement). There is no text content, no event
//! system, and no diffing — those concerns belong to the rendering driver.
//!
//! # Example
//!
//! ```
//! use weft_dom::{Document, el};
//!
//! let mut doc = Document::new();
//! let root = el("projection-surface")
//!     .child(el("attach-widget").attr("id", "greeting"))
//!     .build(&mut doc);
//!
//! assert_eq!(doc.tag(root), "projection-surface");
//! assert_eq!(doc.children(root).len(), 1);
//! ```

mod builder;
mod document;

pub use builder::{ElementBuilder, el};
pub use document::{Document, DomError, NodeId};

use std::sync::Arc;

use parking_lot::RwLock;

/// A document shared between an application and its rendering driver.
///
/// The realization engine holds one of these for the duration of a call and
/// takes the write lock only around actual mutations (append, swap).
pub type SharedDocument = Arc<RwLock<Document>>;

/// Wraps a [`Document`] for shared ownership.
#[must_use]
pub fn shared(doc: Document) -> SharedDocument {
    Arc::new(RwLock::new(doc))
}
