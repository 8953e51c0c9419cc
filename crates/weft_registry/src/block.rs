//! Building-block traits.
//!
//! Blocks are structurally typed capability bundles. Each consumer depends
//! only on the capabilities it needs: the realization engine sees widgets as
//! [`Appendable`] + [`Disposable`], the registry runs [`Action::configure`]
//! after resolution, and store/listener bindings go through
//! [`StateObservable`] and [`EventTarget`]. The optional capabilities carry
//! no-op default bodies so most implementations opt in with an empty `impl`.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;
use weft_dom::{Document, NodeId};

use crate::combined::CombinedRegistry;
use crate::error::{BlockError, ResolveError};

/// A resolved action shared across the application.
pub type ArcAction = Arc<dyn Action>;

/// A resolved store shared across the application.
pub type ArcStore = Arc<dyn Store>;

/// A resolved widget shared across the application.
pub type ArcWidget = Arc<dyn Widget>;

/// The future a registry `get` call returns.
pub type BlockFuture<T> = BoxFuture<'static, Result<Arc<T>, ResolveError>>;

/// A lazily-invoked block producer.
///
/// Factories receive the application's [`CombinedRegistry`] so registered
/// blocks can reference each other without coupling to the concrete
/// registries. A factory may complete synchronously (an immediately-ready
/// future) or asynchronously.
pub type BlockFactory<T> = Arc<dyn Fn(CombinedRegistry) -> BlockFuture<T> + Send + Sync>;

/// A no-argument widget factory registered under a custom-element name.
pub type CustomElementFactory =
    Arc<dyn Fn() -> BoxFuture<'static, Result<ArcWidget, ResolveError>> + Send + Sync>;

/// A resource that can be torn down exactly once.
///
/// Repeated `destroy` calls must be no-ops.
pub trait Disposable: Send + Sync {
    /// Releases the resource.
    fn destroy(&self);
}

/// A [`Disposable`] that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopGuard;

impl Disposable for NoopGuard {
    fn destroy(&self) {}
}

/// Ordered-append capability: a widget that accepts child widgets.
pub trait Appendable: Send + Sync {
    /// Appends `child` after any existing children.
    ///
    /// Implementations must record themselves as the child's parent so a
    /// later attachment attempt can detect it.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::ChildrenUnsupported`] when the widget cannot
    /// hold children.
    fn append(&self, child: ArcWidget) -> Result<(), BlockError>;
}

/// State-binding capability: a widget that can observe a store.
pub trait StateObservable: Send + Sync {
    /// Binds the widget to the store registered under `id`.
    ///
    /// The returned guard undoes the binding; implementations that do not
    /// observe state keep the default no-op body.
    fn observe_state(&self, id: &str, store: ArcStore) -> Box<dyn Disposable> {
        let _ = (id, store);
        Box::new(NoopGuard)
    }
}

/// Listener capability: a widget that can route an event to an action.
pub trait EventTarget: Send + Sync {
    /// Wires `event` to `action`. The returned guard removes the listener.
    fn on(&self, event: &str, action: ArcAction) -> Box<dyn Disposable> {
        let _ = (event, action);
        Box::new(NoopGuard)
    }
}

/// Invokable behavior registered in the action namespace.
///
/// Actions carry [`StateObservable`] so a definition can bind one to a store
/// the same way widgets do; the default body ignores the binding.
#[async_trait]
pub trait Action: StateObservable {
    /// Handles one dispatched payload.
    async fn invoke(&self, payload: Value) -> Result<Value, BlockError>;

    /// Called once after resolution, before the action is handed to any
    /// `get` caller. A failure rejects that resolution.
    async fn configure(&self, registry: &CombinedRegistry) -> Result<(), BlockError> {
        let _ = registry;
        Ok(())
    }
}

impl fmt::Debug for dyn Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn Action")
    }
}

/// Shared state container registered in the store namespace.
pub trait Store: Send + Sync {
    /// Returns the current state.
    fn get(&self) -> Value;

    /// Replaces the current state.
    fn put(&self, state: Value);
}

impl fmt::Debug for dyn Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn Store")
    }
}

/// A renderable UI unit registered in the widget namespace.
///
/// The realization engine itself only uses the [`Appendable`] and
/// [`Disposable`] supertraits plus parent bookkeeping; `render` exists for
/// rendering drivers that materialize widgets into a document.
pub trait Widget: Appendable + Disposable + StateObservable + EventTarget {
    /// Stable identifier for this widget instance.
    fn widget_id(&self) -> &str;

    /// Identifier of the widget currently owning this one, if any.
    fn parent_id(&self) -> Option<String>;

    /// Records (or clears) the owning parent.
    ///
    /// Called by [`Appendable::append`] implementations; not intended for
    /// direct use.
    fn set_parent(&self, parent: Option<&str>);

    /// Renders this widget's subtree into `doc`, returning its root element.
    fn render(&self, doc: &mut Document) -> NodeId;
}

impl fmt::Debug for dyn Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn Widget")
    }
}
