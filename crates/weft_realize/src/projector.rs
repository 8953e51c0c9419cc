//! The rendering-driver contract and the built-in DOM driver.
//!
//! Rendering itself is not this crate's business: the engine only needs to
//! hand each surface's top-level widgets to a projector, attach it in
//! merge-with-existing-DOM mode, and learn when the first render completed.
//! [`DomDriver`] is the concrete collaborator shipped with weft — it renders
//! widget subtrees straight into the shared document.

use async_trait::async_trait;
use weft_dom::{NodeId, SharedDocument};
use weft_registry::{ArcWidget, Widget};

use crate::error::RealizeError;

/// One surface's rendering driver.
#[async_trait]
pub trait Projector: Send + Sync {
    /// Queues a top-level widget, after any previously appended ones.
    fn append(&mut self, widget: ArcWidget);

    /// Attaches to the surface root in merge mode.
    ///
    /// Resolves when the first render completes; the rendered output must
    /// sit at the tail of the surface root's children, one node per
    /// appended widget, in append order.
    async fn merge(&mut self) -> Result<(), RealizeError>;

    /// Tears the projector down. Idempotent.
    fn destroy(&mut self);
}

/// Creates projectors bound to surface roots.
pub trait RenderDriver: Send + Sync {
    /// Creates a projector that renders into `doc` under `surface_root`.
    fn create_projector(&self, doc: SharedDocument, surface_root: NodeId) -> Box<dyn Projector>;
}

/// The built-in driver: widgets render themselves into the document.
#[derive(Debug, Default, Clone, Copy)]
pub struct DomDriver;

impl RenderDriver for DomDriver {
    fn create_projector(&self, doc: SharedDocument, surface_root: NodeId) -> Box<dyn Projector> {
        Box::new(DomProjector {
            doc,
            root: surface_root,
            widgets: Vec::new(),
        })
    }
}

struct DomProjector {
    doc: SharedDocument,
    root: NodeId,
    widgets: Vec<ArcWidget>,
}

#[async_trait]
impl Projector for DomProjector {
    fn append(&mut self, widget: ArcWidget) {
        self.widgets.push(widget);
    }

    async fn merge(&mut self) -> Result<(), RealizeError> {
        let mut doc = self.doc.write();
        for widget in &self.widgets {
            let rendered = widget.render(&mut doc);
            doc.append_child(self.root, rendered);
        }
        Ok(())
    }

    fn destroy(&mut self) {
        self.widgets.clear();
    }
}
