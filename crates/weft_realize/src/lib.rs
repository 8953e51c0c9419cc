//! Markup realization engine.
//!
//! `weft_realize` turns declarative markup into live widgets: it scans a
//! document subtree for custom elements, rebuilds the projection-surface
//! forest from the flat document-order list, resolves every element to a
//! widget through the combined registry, assembles the widget hierarchy, and
//! swaps placeholder elements for rendered output.
//!
//! # Core Concepts
//!
//! - [`realize`] - The engine entry point
//! - [`SurfaceForest`] / [`custom_elements_by_surface`] - Tree reconstruction
//! - [`Projector`] / [`RenderDriver`] - The rendering contract; [`DomDriver`]
//!   is the built-in document renderer
//! - [`RealizationHandle`] - Owns projectors and factory-created widgets
//!
//! # Example
//!
//! ```ignore
//! let handle = realize(&app.combined(), &doc, root, &DomDriver).await?;
//! // ... later:
//! handle.destroy();
//! ```

mod engine;
mod error;
mod handle;
mod projector;
mod tree;

pub use engine::realize;
pub use error::RealizeError;
pub use handle::RealizationHandle;
pub use projector::{DomDriver, Projector, RenderDriver};
pub use tree::{CustomElement, SurfaceForest, custom_elements_by_surface};
