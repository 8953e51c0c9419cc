//! The generic identifier-keyed registry.
//!
//! One [`BlockRegistry`] exists per block kind (action, store, widget); all
//! three share a [`Namespace`] for duplicate detection. Entries move from
//! unresolved (instance or uninvoked factory) through an in-flight shared
//! resolution to a cached instance. Concurrent `get` calls issued before a
//! resolution settles share the same in-flight future, so a factory is
//! invoked at most once on the success path. A failed resolution reverts the
//! entry so a later `get` retries in full.

use core::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
use futures::future::{self, BoxFuture, Shared};
use hashbrown::HashMap;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::block::{BlockFactory, BlockFuture};
use crate::combined::CombinedRegistry;
use crate::error::{BlockKind, RegistryError, ResolveError};
use crate::handle::Handle;
use crate::namespace::Namespace;

/// A side effect run after an instance is produced and before `get`
/// resolves. Actions use this for `configure`; widgets for store/listener
/// bindings supplied at registration.
pub type ResolveHook<T> =
    Arc<dyn Fn(Arc<T>, CombinedRegistry) -> BoxFuture<'static, Result<(), ResolveError>> + Send + Sync>;

type SharedResolve<T> = Shared<BlockFuture<T>>;

enum Source<T: ?Sized> {
    Instance(Arc<T>),
    Factory(BlockFactory<T>),
}

impl<T: ?Sized> Clone for Source<T> {
    fn clone(&self) -> Self {
        match self {
            Source::Instance(instance) => Source::Instance(Arc::clone(instance)),
            Source::Factory(factory) => Source::Factory(Arc::clone(factory)),
        }
    }
}

enum EntryState<T: ?Sized> {
    /// Registered but never resolved (or reverted after a failure).
    Unresolved {
        source: Source<T>,
        hook: Option<ResolveHook<T>>,
    },
    /// A resolution is in flight; concurrent callers share `shared`.
    ///
    /// `source` and `hook` are retained so a failure can revert the entry.
    Resolving {
        shared: SharedResolve<T>,
        generation: u64,
        source: Source<T>,
        hook: Option<ResolveHook<T>>,
    },
    /// Settled; every future `get` resolves to this instance.
    Resolved(Arc<T>),
}

/// Identifier-keyed registry over one block kind.
///
/// See the [crate docs](crate) for the resolution contract. Registration and
/// deregistration are synchronous; resolution is asynchronous and shared.
pub struct BlockRegistry<T: ?Sized + Send + Sync + 'static> {
    kind: BlockKind,
    namespace: Namespace,
    context: CombinedRegistry,
    base_hook: Option<ResolveHook<T>>,
    entries: Arc<Mutex<HashMap<String, EntryState<T>>>>,
    generation: AtomicU64,
}

impl<T: ?Sized + Send + Sync + 'static> fmt::Debug for BlockRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockRegistry")
            .field("kind", &self.kind)
            .field("entries", &self.entries.lock().len())
            .finish()
    }
}

impl<T: ?Sized + Send + Sync + 'static> BlockRegistry<T> {
    /// Creates a registry for `kind` sharing `namespace` with its siblings.
    #[must_use]
    pub fn new(kind: BlockKind, namespace: Namespace, context: CombinedRegistry) -> Self {
        Self {
            kind,
            namespace,
            context,
            base_hook: None,
            entries: Arc::new(Mutex::new(HashMap::new())),
            generation: AtomicU64::new(0),
        }
    }

    /// Like [`new`](Self::new), with a hook run after every resolution in
    /// this registry (the action registry wires `configure` through this).
    #[must_use]
    pub fn with_base_hook(
        kind: BlockKind,
        namespace: Namespace,
        context: CombinedRegistry,
        hook: ResolveHook<T>,
    ) -> Self {
        let mut registry = Self::new(kind, namespace, context);
        registry.base_hook = Some(hook);
        registry
    }

    /// The block kind this registry holds.
    #[must_use]
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    /// Registers an eagerly-provided instance.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateId`] when `id` is taken anywhere in
    /// the combined action/store/widget namespace.
    pub fn register(&self, id: &str, instance: Arc<T>) -> Result<Handle, RegistryError> {
        self.insert(id, Source::Instance(instance), None)
    }

    /// Registers an instance with a per-entry post-resolution hook.
    ///
    /// # Errors
    ///
    /// Same as [`register`](Self::register).
    pub fn register_with(
        &self,
        id: &str,
        instance: Arc<T>,
        hook: ResolveHook<T>,
    ) -> Result<Handle, RegistryError> {
        self.insert(id, Source::Instance(instance), Some(hook))
    }

    /// Registers a lazily-invoked factory. The factory is not invoked until
    /// the first `get`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateId`] when `id` is taken.
    pub fn register_factory(&self, id: &str, factory: BlockFactory<T>) -> Result<Handle, RegistryError> {
        self.insert(id, Source::Factory(factory), None)
    }

    /// Registers a factory with a per-entry post-resolution hook.
    ///
    /// # Errors
    ///
    /// Same as [`register_factory`](Self::register_factory).
    pub fn register_factory_with(
        &self,
        id: &str,
        factory: BlockFactory<T>,
        hook: ResolveHook<T>,
    ) -> Result<Handle, RegistryError> {
        self.insert(id, Source::Factory(factory), Some(hook))
    }

    /// Returns whether an entry exists under `id`, in any resolution state.
    #[must_use]
    pub fn has(&self, id: &str) -> bool {
        self.entries.lock().contains_key(id)
    }

    /// Resolves the entry under `id`.
    ///
    /// Eager instances resolve immediately (after their hooks, on first
    /// call). Factories are invoked on the first call; concurrent callers
    /// share the in-flight resolution. The settled instance is cached for
    /// all future calls. A failure rejects only the in-flight callers and
    /// reverts the entry, so the next call re-invokes in full.
    pub fn get(&self, id: &str) -> BlockFuture<T> {
        let mut entries = self.entries.lock();
        let Some(state) = entries.get_mut(id) else {
            let err = ResolveError::NotFound {
                kind: self.kind,
                id: id.to_string(),
            };
            return future::ready(Err(err)).boxed();
        };
        match state {
            EntryState::Resolved(instance) => future::ready(Ok(Arc::clone(instance))).boxed(),
            EntryState::Resolving { shared, .. } => shared.clone().boxed(),
            EntryState::Unresolved { source, hook } => {
                let source = source.clone();
                let hook = hook.clone();
                let generation = self.generation.fetch_add(1, Ordering::Relaxed);
                let shared = self.resolve(id, source.clone(), hook.clone(), generation);
                *state = EntryState::Resolving {
                    shared: shared.clone(),
                    generation,
                    source,
                    hook,
                };
                shared.boxed()
            }
        }
    }

    fn insert(
        &self,
        id: &str,
        source: Source<T>,
        hook: Option<ResolveHook<T>>,
    ) -> Result<Handle, RegistryError> {
        self.namespace.claim(id)?;
        self.entries
            .lock()
            .insert(id.to_string(), EntryState::Unresolved { source, hook });
        debug!(kind = %self.kind, id, "registered block");

        let entries = Arc::clone(&self.entries);
        let namespace = self.namespace.clone();
        let id = id.to_string();
        Ok(Handle::new(move || {
            entries.lock().remove(&id);
            namespace.release(&id);
        }))
    }

    /// Builds the shared in-flight future for one resolution attempt.
    fn resolve(
        &self,
        id: &str,
        source: Source<T>,
        hook: Option<ResolveHook<T>>,
        generation: u64,
    ) -> SharedResolve<T> {
        let kind = self.kind;
        let id = id.to_string();
        let entries = Arc::clone(&self.entries);
        let combined = self.context.clone();
        let base_hook = self.base_hook.clone();

        async move {
            let produced = match source {
                Source::Instance(instance) => Ok(instance),
                Source::Factory(factory) => factory(combined.clone()).await,
            };
            let result = match produced {
                Ok(instance) => {
                    let mut outcome = Ok(());
                    if let Some(h) = &base_hook {
                        outcome = h(Arc::clone(&instance), combined.clone()).await;
                    }
                    if outcome.is_ok() {
                        if let Some(h) = &hook {
                            outcome = h(Arc::clone(&instance), combined.clone()).await;
                        }
                    }
                    outcome.map(|()| instance)
                }
                Err(err) => Err(err),
            };
            if let Err(err) = &result {
                warn!(kind = %kind, id, error = %err, "block resolution failed");
            }
            Self::settle(&entries, &id, generation, &result);
            result
        }
        .boxed()
        .shared()
    }

    /// Transitions the entry once its in-flight resolution settles.
    ///
    /// The generation check skips entries that were deregistered or
    /// re-registered while the resolution was in flight: the in-flight
    /// callers still get their result, but the map is left alone.
    fn settle(
        entries: &Mutex<HashMap<String, EntryState<T>>>,
        id: &str,
        generation: u64,
        result: &Result<Arc<T>, ResolveError>,
    ) {
        let mut map = entries.lock();
        let current = matches!(
            map.get(id),
            Some(EntryState::Resolving { generation: g, .. }) if *g == generation
        );
        if !current {
            return;
        }
        if let Some(EntryState::Resolving { source, hook, .. }) = map.remove(id) {
            let next = match result {
                Ok(instance) => EntryState::Resolved(Arc::clone(instance)),
                Err(_) => EntryState::Unresolved { source, hook },
            };
            map.insert(id.to_string(), next);
        }
    }
}
