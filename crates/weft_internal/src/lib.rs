//! # Weft Internal Library
//!
//! Re-exports the core weft crates for convenience.

/// Arena-backed markup documents.
pub use weft_dom;

/// Building-block registries and lazy resolution.
pub use weft_registry;

/// Declarative definition loading.
pub use weft_loader;

/// The markup realization engine.
pub use weft_realize;

/// The application facade and telemetry bootstrap.
pub use weft_app;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use weft_app::{Application, TelemetryConfig, TelemetryFormat};
    pub use weft_dom::{Document, ElementBuilder, NodeId, SharedDocument, el, shared};
    pub use weft_loader::{
        ActionDef, ApplicationDefinition, CustomElementDef, DefinitionError, DefinitionLoader,
        ModuleExport, ModuleResolver, StaticResolver, StoreDef, WidgetDef,
    };
    pub use weft_realize::{DomDriver, RealizationHandle, RealizeError, realize};
    pub use weft_registry::{
        Action, ArcAction, ArcStore, ArcWidget, BlockError, CombinedRegistry, Handle,
        RegistryError, RegistrySet, ResolveError, Store, Widget, WidgetBindings,
    };
}
