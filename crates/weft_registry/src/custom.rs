//! Custom-element name registry.
//!
//! Maps valid custom-element names to widget factories. Names form their own
//! namespace, separate from the action/store/widget identifier namespace.
//! Unlike [`BlockRegistry`](crate::BlockRegistry), `get` hands back the raw
//! factory — the caller decides when to invoke it and whether to memoize.

use core::fmt;
use std::sync::Arc;

use hashbrown::{HashMap, HashSet};
use parking_lot::Mutex;
use tracing::debug;

use crate::block::CustomElementFactory;
use crate::error::RegistryError;
use crate::handle::Handle;

/// Marker name for elements resolved against the widget registry.
pub const ATTACH_WIDGET: &str = "attach-widget";

/// Marker name for projection-surface roots.
pub const PROJECTION_SURFACE: &str = "projection-surface";

/// Names the platform reserves for its own custom elements.
const PLATFORM_RESERVED: [&str; 8] = [
    "annotation-xml",
    "color-profile",
    "font-face",
    "font-face-src",
    "font-face-uri",
    "font-face-format",
    "font-face-name",
    "missing-glyph",
];

/// Name-keyed registry of widget factories.
pub struct CustomElementRegistry {
    // Built per instance so each application owns its reserved set.
    reserved: HashSet<&'static str>,
    factories: Arc<Mutex<HashMap<String, CustomElementFactory>>>,
}

impl fmt::Debug for CustomElementRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomElementRegistry")
            .field("factories", &self.factories.lock().len())
            .finish()
    }
}

impl Default for CustomElementRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomElementRegistry {
    /// Creates an empty registry with the reserved-name set.
    #[must_use]
    pub fn new() -> Self {
        let mut reserved: HashSet<&'static str> = PLATFORM_RESERVED.into_iter().collect();
        reserved.insert(ATTACH_WIDGET);
        reserved.insert(PROJECTION_SURFACE);
        Self {
            reserved,
            factories: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Registers `factory` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidCustomElementName`] when `name`
    /// violates the naming rule or is reserved, and
    /// [`RegistryError::DuplicateName`] when the name is taken.
    pub fn register_factory(
        &self,
        name: &str,
        factory: CustomElementFactory,
    ) -> Result<Handle, RegistryError> {
        if !valid_name(name) || self.reserved.contains(name) {
            return Err(RegistryError::InvalidCustomElementName {
                name: name.to_string(),
            });
        }
        {
            let mut factories = self.factories.lock();
            if factories.contains_key(name) {
                return Err(RegistryError::DuplicateName {
                    name: name.to_string(),
                });
            }
            factories.insert(name.to_string(), factory);
        }
        debug!(name, "registered custom element factory");

        let factories = Arc::clone(&self.factories);
        let name = name.to_string();
        Ok(Handle::new(move || {
            factories.lock().remove(&name);
        }))
    }

    /// Returns whether a factory is registered for `name`.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.factories.lock().contains_key(name)
    }

    /// Returns the raw factory for `name`, if registered.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<CustomElementFactory> {
        self.factories.lock().get(name).cloned()
    }
}

/// The custom-element naming rule: non-empty, starts with an ASCII lowercase
/// letter, contains a hyphen, and has no ASCII uppercase letters. Only ASCII
/// case matters — no Unicode folding.
fn valid_name(name: &str) -> bool {
    let starts_lower = name.as_bytes().first().is_some_and(u8::is_ascii_lowercase);
    starts_lower && name.contains('-') && !name.bytes().any(|b| b.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::ArcWidget;
    use crate::error::ResolveError;
    use futures::FutureExt;
    use futures::future;

    fn factory() -> CustomElementFactory {
        Arc::new(|| {
            future::ready(Err::<ArcWidget, _>(ResolveError::failure("unused"))).boxed()
        })
    }

    #[test]
    fn rejects_invalid_names() {
        let registry = CustomElementRegistry::new();
        for name in ["", "a", "a-A", "Foo-bar", "1-up", "-leading"] {
            let err = registry.register_factory(name, factory()).unwrap_err();
            assert!(
                matches!(err, RegistryError::InvalidCustomElementName { .. }),
                "expected {name:?} to be invalid"
            );
        }
    }

    #[test]
    fn rejects_reserved_names() {
        let registry = CustomElementRegistry::new();
        for name in ["font-face", "missing-glyph", "attach-widget", "projection-surface"] {
            let err = registry.register_factory(name, factory()).unwrap_err();
            assert_eq!(err.to_string(), format!("'{name}' is not a valid custom element name"));
        }
    }

    #[test]
    fn accepts_valid_names() {
        let registry = CustomElementRegistry::new();
        let handle = registry.register_factory("foo-bar", factory()).unwrap();
        assert!(registry.has("foo-bar"));
        assert!(registry.get("foo-bar").is_some());

        handle.destroy();
        assert!(!registry.has("foo-bar"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let registry = CustomElementRegistry::new();
        registry.register_factory("foo-bar", factory()).unwrap();
        let err = registry.register_factory("foo-bar", factory()).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName { .. }));
    }
}
