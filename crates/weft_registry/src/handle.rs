//! Disposable registration handles.

use core::fmt;

use parking_lot::Mutex;

type Teardown = Box<dyn FnOnce() + Send>;

/// A disposable capability representing one registration or a batch of
/// registrations.
///
/// The first `destroy` runs every teardown the handle holds; repeated calls
/// are no-ops. Dropping a handle without destroying it leaves the
/// registrations in place.
#[derive(Default)]
pub struct Handle {
    teardowns: Mutex<Vec<Teardown>>,
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("pending", &self.teardowns.lock().len())
            .finish()
    }
}

impl Handle {
    /// Creates a handle over a single teardown.
    #[must_use]
    pub fn new(teardown: impl FnOnce() + Send + 'static) -> Self {
        Self {
            teardowns: Mutex::new(vec![Box::new(teardown)]),
        }
    }

    /// Creates a handle with no teardowns (useful as a batch accumulator).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds a teardown to run on destroy.
    pub fn push(&self, teardown: impl FnOnce() + Send + 'static) {
        self.teardowns.lock().push(Box::new(teardown));
    }

    /// Folds `other` into this handle; destroying this handle then covers
    /// both.
    pub fn absorb(&self, other: Handle) {
        let mut mine = self.teardowns.lock();
        mine.append(&mut other.teardowns.lock());
    }

    /// Runs all teardowns. Idempotent.
    pub fn destroy(&self) {
        let teardowns = {
            let mut guard = self.teardowns.lock();
            core::mem::take(&mut *guard)
        };
        for teardown in teardowns {
            teardown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn destroy_runs_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let handle = Handle::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        handle.destroy();
        handle.destroy();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn absorb_covers_batch() {
        let count = Arc::new(AtomicUsize::new(0));
        let batch = Handle::empty();
        for _ in 0..3 {
            let c = Arc::clone(&count);
            batch.absorb(Handle::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            }));
        }

        batch.destroy();
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }
}
