//! Duplicate-check namespace shared across registries.

use std::sync::Arc;

use hashbrown::HashSet;
use parking_lot::Mutex;

use crate::error::RegistryError;

/// The set of identifiers claimed by the action, store, and widget
/// registries of one application.
///
/// The three registries share a single clone of this namespace so that an
/// identifier can be registered at most once across all of them. Claims are
/// synchronous and immediately visible.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    ids: Arc<Mutex<HashSet<String>>>,
}

impl Namespace {
    /// Creates an empty namespace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `id`, failing if it is already taken.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateId`] when the identifier is taken.
    pub fn claim(&self, id: &str) -> Result<(), RegistryError> {
        let mut ids = self.ids.lock();
        if !ids.insert(id.to_string()) {
            return Err(RegistryError::DuplicateId { id: id.to_string() });
        }
        Ok(())
    }

    /// Releases `id` so it can be registered again. No-op when unclaimed.
    pub fn release(&self, id: &str) {
        self.ids.lock().remove(id);
    }

    /// Returns whether `id` is currently claimed.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.lock().contains(id)
    }
}
