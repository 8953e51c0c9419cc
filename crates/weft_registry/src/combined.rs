//! One application's registries and the read-only combined facade.

use core::fmt;
use std::sync::{Arc, Weak};

use futures::FutureExt;
use futures::future;

use crate::block::{Action, ArcAction, BlockFuture, CustomElementFactory, Store, Widget};
use crate::custom::CustomElementRegistry;
use crate::error::{BlockKind, ResolveError};
use crate::namespace::Namespace;
use crate::registry::{BlockRegistry, ResolveHook};

struct SetInner {
    actions: BlockRegistry<dyn Action>,
    stores: BlockRegistry<dyn Store>,
    widgets: BlockRegistry<dyn Widget>,
    custom_elements: CustomElementRegistry,
}

/// The registries owned by one application instance.
///
/// The action, store, and widget registries share one duplicate-check
/// [`Namespace`]; custom-element names live in their own namespace. Every
/// set owns its registries outright — nothing here is process-global.
///
/// # Example
///
/// ```
/// use weft_registry::RegistrySet;
///
/// let set = RegistrySet::new();
/// let combined = set.combined();
/// assert!(!combined.has_widget("nav"));
/// ```
pub struct RegistrySet {
    inner: Arc<SetInner>,
}

impl fmt::Debug for RegistrySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrySet")
            .field("actions", &self.inner.actions)
            .field("stores", &self.inner.stores)
            .field("widgets", &self.inner.widgets)
            .finish()
    }
}

impl Default for RegistrySet {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrySet {
    /// Creates an empty registry set.
    #[must_use]
    pub fn new() -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<SetInner>| {
            let combined = CombinedRegistry {
                inner: weak.clone(),
            };
            let namespace = Namespace::new();

            // Actions run their configure hook after every resolution.
            let configure: ResolveHook<dyn Action> = Arc::new(
                |action: ArcAction, combined: CombinedRegistry| {
                    async move {
                        action
                            .configure(&combined)
                            .await
                            .map_err(ResolveError::from)
                    }
                    .boxed()
                },
            );

            SetInner {
                actions: BlockRegistry::with_base_hook(
                    BlockKind::Action,
                    namespace.clone(),
                    combined.clone(),
                    configure,
                ),
                stores: BlockRegistry::new(BlockKind::Store, namespace.clone(), combined.clone()),
                widgets: BlockRegistry::new(BlockKind::Widget, namespace, combined),
                custom_elements: CustomElementRegistry::new(),
            }
        });
        Self { inner }
    }

    /// The action registry.
    #[must_use]
    pub fn actions(&self) -> &BlockRegistry<dyn Action> {
        &self.inner.actions
    }

    /// The store registry.
    #[must_use]
    pub fn stores(&self) -> &BlockRegistry<dyn Store> {
        &self.inner.stores
    }

    /// The widget registry.
    #[must_use]
    pub fn widgets(&self) -> &BlockRegistry<dyn Widget> {
        &self.inner.widgets
    }

    /// The custom-element name registry.
    #[must_use]
    pub fn custom_elements(&self) -> &CustomElementRegistry {
        &self.inner.custom_elements
    }

    /// Returns the read-only facade over this set.
    #[must_use]
    pub fn combined(&self) -> CombinedRegistry {
        CombinedRegistry {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

/// Read-only union of one application's registries.
///
/// Handed to every factory and post-resolution hook so registered blocks can
/// cross-resolve without coupling to the concrete registries. Holds only a
/// weak reference: a facade that outlives its application observes every
/// lookup as failed rather than keeping the registries alive.
#[derive(Clone)]
pub struct CombinedRegistry {
    inner: Weak<SetInner>,
}

impl fmt::Debug for CombinedRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombinedRegistry")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl CombinedRegistry {
    /// A facade bound to no registry set.
    ///
    /// Every `has_*` returns false and every `get_*` rejects. Useful for
    /// exercising a [`BlockRegistry`] in isolation.
    #[must_use]
    pub fn disconnected() -> Self {
        Self { inner: Weak::new() }
    }

    /// Returns whether an action is registered under `id`.
    #[must_use]
    pub fn has_action(&self, id: &str) -> bool {
        self.inner.upgrade().is_some_and(|s| s.actions.has(id))
    }

    /// Resolves the action registered under `id`.
    pub fn get_action(&self, id: &str) -> BlockFuture<dyn Action> {
        match self.inner.upgrade() {
            Some(set) => set.actions.get(id),
            None => future::ready(Err(ResolveError::RegistryGone)).boxed(),
        }
    }

    /// Returns whether a store is registered under `id`.
    #[must_use]
    pub fn has_store(&self, id: &str) -> bool {
        self.inner.upgrade().is_some_and(|s| s.stores.has(id))
    }

    /// Resolves the store registered under `id`.
    pub fn get_store(&self, id: &str) -> BlockFuture<dyn Store> {
        match self.inner.upgrade() {
            Some(set) => set.stores.get(id),
            None => future::ready(Err(ResolveError::RegistryGone)).boxed(),
        }
    }

    /// Returns whether a widget is registered under `id`.
    #[must_use]
    pub fn has_widget(&self, id: &str) -> bool {
        self.inner.upgrade().is_some_and(|s| s.widgets.has(id))
    }

    /// Resolves the widget registered under `id`.
    pub fn get_widget(&self, id: &str) -> BlockFuture<dyn Widget> {
        match self.inner.upgrade() {
            Some(set) => set.widgets.get(id),
            None => future::ready(Err(ResolveError::RegistryGone)).boxed(),
        }
    }

    /// Returns whether a custom-element factory is registered for `name`.
    #[must_use]
    pub fn has_custom_element_factory(&self, name: &str) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|s| s.custom_elements.has(name))
    }

    /// Returns the raw factory registered for `name`, if any.
    ///
    /// The caller decides when and how often to invoke it; the registry does
    /// not memoize invocation results.
    #[must_use]
    pub fn get_custom_element_factory(&self, name: &str) -> Option<CustomElementFactory> {
        self.inner
            .upgrade()
            .and_then(|s| s.custom_elements.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stock::MemoryStore;

    #[test]
    fn namespace_spans_all_three_kinds() {
        let set = RegistrySet::new();
        set.stores()
            .register("shared", Arc::new(MemoryStore::default()))
            .unwrap();

        // Same id in a sibling registry is a duplicate.
        let factory: crate::BlockFactory<dyn Widget> = Arc::new(|_| {
            future::ready(Err(ResolveError::failure("unused"))).boxed()
        });
        assert!(set.widgets().register_factory("shared", factory).is_err());
    }

    #[test]
    fn facade_outliving_the_set_goes_dark() {
        let set = RegistrySet::new();
        set.stores()
            .register("prefs", Arc::new(MemoryStore::default()))
            .unwrap();
        let combined = set.combined();
        assert!(combined.has_store("prefs"));

        drop(set);
        assert!(!combined.has_store("prefs"));
    }

    #[tokio::test]
    async fn dead_facade_rejects_lookups() {
        let combined = CombinedRegistry::disconnected();
        let err = combined.get_store("prefs").await.unwrap_err();
        assert!(matches!(err, ResolveError::RegistryGone));
    }
}
