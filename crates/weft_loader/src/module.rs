//! Module-identifier resolution.
//!
//! Definitions may point at blocks by opaque module identifier instead of
//! carrying the value inline. How an identifier maps to code is the host's
//! business; the loader only needs an async resolver producing a typed
//! export. Resolution is lazy: it runs inside the registered factory on the
//! first `get` (or first element, for custom-element factories), never at
//! load time.

use async_trait::async_trait;
use hashbrown::HashMap;
use parking_lot::Mutex;
use weft_registry::{
    Action, ArcAction, ArcStore, ArcWidget, CustomElementFactory, ResolveError, Store, Widget,
};

use crate::definition::OptionFactory;

/// What a module identifier resolved to.
#[derive(Clone)]
pub enum ModuleExport {
    /// An options-taking action factory.
    ActionFactory(OptionFactory<dyn Action>),
    /// A ready action instance.
    ActionInstance(ArcAction),
    /// An options-taking store factory.
    StoreFactory(OptionFactory<dyn Store>),
    /// A ready store instance.
    StoreInstance(ArcStore),
    /// An options-taking widget factory.
    WidgetFactory(OptionFactory<dyn Widget>),
    /// A ready widget instance.
    WidgetInstance(ArcWidget),
    /// A custom-element widget factory.
    CustomElementFactory(CustomElementFactory),
}

/// Resolves opaque module identifiers to block exports.
#[async_trait]
pub trait ModuleResolver: Send + Sync {
    /// Resolves `id` to its export.
    ///
    /// # Errors
    ///
    /// Rejects when the identifier is unknown or loading fails; the error
    /// flows through to the `get` caller unchanged.
    async fn resolve(&self, id: &str) -> Result<ModuleExport, ResolveError>;
}

/// A resolver over a fixed identifier-to-export table.
///
/// The demo application and the test suites use this in place of a real
/// module loader.
#[derive(Default)]
pub struct StaticResolver {
    modules: Mutex<HashMap<String, ModuleExport>>,
}

impl StaticResolver {
    /// An empty resolver; every lookup rejects.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `id` to `export`, replacing any earlier mapping.
    pub fn insert(&self, id: impl Into<String>, export: ModuleExport) {
        self.modules.lock().insert(id.into(), export);
    }
}

#[async_trait]
impl ModuleResolver for StaticResolver {
    async fn resolve(&self, id: &str) -> Result<ModuleExport, ResolveError> {
        self.modules
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| ResolveError::failure(format!("no module registered for '{id}'")))
    }
}
