//! Application facade for weft.
//!
//! `weft_app` ties the member crates together behind one [`Application`]
//! type: per-instance registries, declarative definition loading, and markup
//! realization. The [`telemetry`] module carries the tracing-subscriber
//! bootstrap for binaries that want weft to own logging setup.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use weft_app::Application;
//! use weft_dom::{el, shared, Document};
//! use weft_realize::DomDriver;
//! use weft_registry::stock::BlockWidget;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let app = Application::new();
//! app.register_widget("masthead", BlockWidget::with_id("header", "masthead"))?;
//!
//! let mut doc = Document::new();
//! let root = el("projection-surface")
//!     .child(el("attach-widget").attr("id", "masthead"))
//!     .build(&mut doc);
//! let doc = shared(doc);
//!
//! let handle = app.realize(&doc, root, &DomDriver).await?;
//! handle.destroy();
//! # Ok(())
//! # }
//! ```

/// The application facade.
pub mod application;

/// Tracing subscriber bootstrap.
pub mod telemetry;

pub use application::Application;
pub use telemetry::{TelemetryConfig, TelemetryFormat};
