//! Declarative application-definition loading.
//!
//! `weft_loader` turns an [`ApplicationDefinition`] — ordered lists of
//! action, store, widget, and custom-element definitions — into live
//! registrations against a [`RegistrySet`](weft_registry::RegistrySet).
//! Each entry provides its block inline or behind an opaque module
//! identifier resolved lazily through a [`ModuleResolver`] on first use.
//!
//! # Core Concepts
//!
//! - [`ApplicationDefinition`] and the per-kind definition entries
//! - [`DefinitionLoader`] - Validates shapes, registers the batch, wires
//!   `stateFrom`/`listeners` bindings
//! - [`ModuleResolver`] / [`ModuleExport`] - The host's module boundary
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use weft_loader::{ApplicationDefinition, DefinitionLoader, StoreDef, StaticResolver};
//! use weft_registry::{RegistrySet, stock::MemoryStore};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let set = RegistrySet::new();
//! let loader = DefinitionLoader::new(Arc::new(StaticResolver::new()));
//!
//! let definition = ApplicationDefinition::new()
//!     .store(StoreDef::instance("prefs", Arc::new(MemoryStore::default())));
//! let handle = loader.load(&set, definition)?;
//!
//! assert!(set.stores().has("prefs"));
//! handle.destroy();
//! assert!(!set.stores().has("prefs"));
//! # Ok(())
//! # }
//! ```

/// Definition entry types.
pub mod definition;

/// Definition-loading errors.
pub mod error;

/// Batch registration.
pub mod loader;

/// Module-identifier resolution.
pub mod module;

pub use definition::{
    ActionDef, ApplicationDefinition, CustomElementDef, OptionFactory, SourceRef, StoreDef,
    WidgetDef,
};
pub use error::DefinitionError;
pub use loader::DefinitionLoader;
pub use module::{ModuleExport, ModuleResolver, StaticResolver};
