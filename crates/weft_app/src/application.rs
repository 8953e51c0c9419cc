//! The application facade.

use std::sync::Arc;

use tracing::info;
use weft_dom::{NodeId, SharedDocument};
use weft_loader::{ApplicationDefinition, DefinitionError, DefinitionLoader, ModuleResolver, StaticResolver};
use weft_realize::{RealizationHandle, RealizeError, RenderDriver, realize};
use weft_registry::{
    ArcAction, ArcStore, ArcWidget, CombinedRegistry, CustomElementFactory, Handle, RegistryError,
    RegistrySet,
};

/// One composed application instance.
///
/// Owns its registry set outright — two applications in one process never
/// share identifiers, reserved names, or resolution state. Everything the
/// rest of weft does flows through here: registration (direct or via a
/// declarative definition) and realization of markup subtrees.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use weft_app::Application;
/// use weft_registry::stock::MemoryStore;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let app = Application::new();
/// app.register_store("prefs", Arc::new(MemoryStore::default()))?;
/// assert!(app.combined().has_store("prefs"));
/// # Ok(())
/// # }
/// ```
pub struct Application {
    set: RegistrySet,
    loader: DefinitionLoader,
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

impl Application {
    /// An application with no module resolver; definitions may only carry
    /// inline values.
    #[must_use]
    pub fn new() -> Self {
        Self::with_resolver(Arc::new(StaticResolver::new()))
    }

    /// An application resolving definition module identifiers through
    /// `resolver`.
    #[must_use]
    pub fn with_resolver(resolver: Arc<dyn ModuleResolver>) -> Self {
        info!("creating application");
        Self {
            set: RegistrySet::new(),
            loader: DefinitionLoader::new(resolver),
        }
    }

    /// The underlying registry set.
    #[must_use]
    pub fn registry(&self) -> &RegistrySet {
        &self.set
    }

    /// The read-only facade handed to factories, hooks, and realization.
    #[must_use]
    pub fn combined(&self) -> CombinedRegistry {
        self.set.combined()
    }

    /// Registers an action instance.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateId`] when `id` is taken.
    pub fn register_action(&self, id: &str, action: ArcAction) -> Result<Handle, RegistryError> {
        self.set.actions().register(id, action)
    }

    /// Registers a store instance.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateId`] when `id` is taken.
    pub fn register_store(&self, id: &str, store: ArcStore) -> Result<Handle, RegistryError> {
        self.set.stores().register(id, store)
    }

    /// Registers a widget instance.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateId`] when `id` is taken.
    pub fn register_widget(&self, id: &str, widget: ArcWidget) -> Result<Handle, RegistryError> {
        self.set.widgets().register(id, widget)
    }

    /// Registers a custom-element widget factory under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidCustomElementName`] for names
    /// violating the naming rule and [`RegistryError::DuplicateName`] for
    /// taken names.
    pub fn register_custom_element(
        &self,
        name: &str,
        factory: CustomElementFactory,
    ) -> Result<Handle, RegistryError> {
        self.set.custom_elements().register_factory(name, factory)
    }

    /// Loads a declarative definition as one batch.
    ///
    /// # Errors
    ///
    /// Returns the first shape violation or registry rejection; earlier
    /// entries stay registered.
    pub fn load_definition(
        &self,
        definition: ApplicationDefinition,
    ) -> Result<Handle, DefinitionError> {
        self.loader.load(&self.set, definition)
    }

    /// Realizes the markup subtree under `root`, rendering through `driver`.
    ///
    /// # Errors
    ///
    /// See [`realize`].
    pub async fn realize(
        &self,
        doc: &SharedDocument,
        root: NodeId,
        driver: &dyn RenderDriver,
    ) -> Result<RealizationHandle, RealizeError> {
        realize(&self.combined(), doc, root, driver).await
    }
}
