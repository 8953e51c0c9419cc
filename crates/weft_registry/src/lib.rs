//! Building-block registries with lazy, promise-based resolution.
//!
//! `weft_registry` is the registry/resolution engine of weft. Applications
//! register actions, stores, and widgets — eagerly as instances or lazily as
//! factories — under unique identifiers, and resolve them asynchronously on
//! demand. Custom-element names map to widget factories in a separate
//! namespace.
//!
//! # Core Concepts
//!
//! - [`BlockRegistry`] - Identifier-keyed registry with at-most-once factory
//!   invocation and shared in-flight resolution
//! - [`CustomElementRegistry`] - Name-keyed widget factories with the
//!   custom-element naming rule
//! - [`RegistrySet`] / [`CombinedRegistry`] - One application's registries and
//!   the read-only facade handed to factories and hooks
//! - [`Handle`] - Disposable capability over one registration (or batch)
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use weft_registry::{RegistrySet, stock::MemoryStore};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let set = RegistrySet::new();
//! let handle = set.stores().register("prefs", Arc::new(MemoryStore::default()))?;
//!
//! assert!(set.stores().has("prefs"));
//! handle.destroy();
//! assert!(!set.stores().has("prefs"));
//! # Ok(())
//! # }
//! ```

/// Building-block traits and capability contracts.
pub mod block;

/// Post-resolution store/listener bindings for widgets.
pub mod binding;

/// Registry set and the read-only combined facade.
pub mod combined;

/// Custom-element name registry.
pub mod custom;

/// Error types for registration and resolution.
pub mod error;

/// Disposable registration handles.
pub mod handle;

/// Shared duplicate-check namespace.
pub mod namespace;

/// The generic identifier-keyed registry.
pub mod registry;

/// Reference block implementations for demos and tests.
pub mod stock;

pub use block::{
    Action, Appendable, ArcAction, ArcStore, ArcWidget, BlockFactory, BlockFuture,
    CustomElementFactory, Disposable, EventTarget, NoopGuard, StateObservable, Store, Widget,
};
pub use binding::{BindingGuards, WidgetBindings};
pub use combined::{CombinedRegistry, RegistrySet};
pub use custom::{ATTACH_WIDGET, CustomElementRegistry, PROJECTION_SURFACE};
pub use error::{BlockError, BlockKind, RegistryError, ResolveError};
pub use handle::Handle;
pub use namespace::Namespace;
pub use registry::{BlockRegistry, ResolveHook};
