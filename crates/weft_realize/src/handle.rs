//! The destroy handle a realization returns.

use parking_lot::Mutex;
use weft_registry::{ArcWidget, Disposable};

use crate::projector::Projector;

struct Realized {
    projectors: Vec<Box<dyn Projector>>,
    managed: Vec<ArcWidget>,
}

/// Owns everything one `realize` call created.
///
/// Destroying the handle tears down every projector and every managed widget
/// (those produced by custom-element factories during the call). Attached
/// widgets — pre-existing, registry-owned instances — are never destroyed
/// here. Destroy is idempotent.
pub struct RealizationHandle {
    inner: Mutex<Option<Realized>>,
}

impl RealizationHandle {
    pub(crate) fn new(projectors: Vec<Box<dyn Projector>>, managed: Vec<ArcWidget>) -> Self {
        Self {
            inner: Mutex::new(Some(Realized {
                projectors,
                managed,
            })),
        }
    }

    /// Number of widgets this handle owns. Zero after destroy.
    #[must_use]
    pub fn managed_count(&self) -> usize {
        self.inner.lock().as_ref().map_or(0, |r| r.managed.len())
    }

    /// Destroys every projector and managed widget. No-op on repeat calls.
    pub fn destroy(&self) {
        let realized = self.inner.lock().take();
        if let Some(mut realized) = realized {
            for projector in &mut realized.projectors {
                projector.destroy();
            }
            for widget in realized.managed {
                widget.destroy();
            }
        }
    }
}

impl core::fmt::Debug for RealizationHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RealizationHandle")
            .field("live", &self.inner.lock().is_some())
            .finish()
    }
}
