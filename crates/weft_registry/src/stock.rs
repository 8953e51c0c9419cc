//! Reference block implementations.
//!
//! Small, fully-instrumented implementations of the block traits, used by
//! the demo application and throughout the test suites. Real applications
//! bring their own.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use nanoid::nanoid;
use parking_lot::Mutex;
use serde_json::Value;
use weft_dom::{Document, NodeId};

use crate::block::{
    Action, Appendable, ArcAction, ArcStore, ArcWidget, Disposable, EventTarget, NoopGuard,
    StateObservable, Store, Widget,
};
use crate::combined::CombinedRegistry;
use crate::error::BlockError;

// ─────────────────────────────────────────────────────────────────────────────
// BlockWidget
// ─────────────────────────────────────────────────────────────────────────────

/// A widget that renders one element and tracks everything done to it.
pub struct BlockWidget {
    id: String,
    tag: String,
    children: Mutex<Vec<ArcWidget>>,
    parent: Mutex<Option<String>>,
    destroyed: AtomicBool,
    observed: Mutex<Vec<String>>,
    wired: Mutex<Vec<String>>,
}

impl BlockWidget {
    /// Creates a widget rendering a `tag` element, with a generated id.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Arc<Self> {
        Self::with_id(tag, nanoid!())
    }

    /// Creates a widget with an explicit instance id.
    #[must_use]
    pub fn with_id(tag: impl Into<String>, id: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            tag: tag.into(),
            children: Mutex::new(Vec::new()),
            parent: Mutex::new(None),
            destroyed: AtomicBool::new(false),
            observed: Mutex::new(Vec::new()),
            wired: Mutex::new(Vec::new()),
        })
    }

    /// Returns whether `destroy` has been called.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    /// Instance ids of appended children, in order.
    #[must_use]
    pub fn child_ids(&self) -> Vec<String> {
        self.children
            .lock()
            .iter()
            .map(|c| c.widget_id().to_string())
            .collect()
    }

    /// Store ids this widget has been bound to.
    #[must_use]
    pub fn observed_stores(&self) -> Vec<String> {
        self.observed.lock().clone()
    }

    /// Event names wired to actions on this widget.
    #[must_use]
    pub fn wired_events(&self) -> Vec<String> {
        self.wired.lock().clone()
    }
}

impl Appendable for BlockWidget {
    fn append(&self, child: ArcWidget) -> Result<(), BlockError> {
        child.set_parent(Some(&self.id));
        self.children.lock().push(child);
        Ok(())
    }
}

impl Disposable for BlockWidget {
    fn destroy(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
    }
}

impl StateObservable for BlockWidget {
    fn observe_state(&self, id: &str, _store: ArcStore) -> Box<dyn Disposable> {
        self.observed.lock().push(id.to_string());
        Box::new(NoopGuard)
    }
}

impl EventTarget for BlockWidget {
    fn on(&self, event: &str, _action: ArcAction) -> Box<dyn Disposable> {
        self.wired.lock().push(event.to_string());
        Box::new(NoopGuard)
    }
}

impl Widget for BlockWidget {
    fn widget_id(&self) -> &str {
        &self.id
    }

    fn parent_id(&self) -> Option<String> {
        self.parent.lock().clone()
    }

    fn set_parent(&self, parent: Option<&str>) {
        *self.parent.lock() = parent.map(str::to_string);
    }

    fn render(&self, doc: &mut Document) -> NodeId {
        let element = doc.create_element(self.tag.clone());
        doc.set_attribute(element, "data-widget", self.id.clone());
        for child in self.children.lock().iter() {
            let rendered = child.render(doc);
            doc.append_child(element, rendered);
        }
        element
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FnAction
// ─────────────────────────────────────────────────────────────────────────────

/// An action backed by a plain function over JSON payloads.
pub struct FnAction {
    handler: Box<dyn Fn(Value) -> Value + Send + Sync>,
}

impl FnAction {
    /// Wraps `handler` as an action.
    #[must_use]
    pub fn new(handler: impl Fn(Value) -> Value + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
        })
    }
}

impl StateObservable for FnAction {}

#[async_trait]
impl Action for FnAction {
    async fn invoke(&self, payload: Value) -> Result<Value, BlockError> {
        Ok((self.handler)(payload))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ConfiguredAction
// ─────────────────────────────────────────────────────────────────────────────

/// An action whose `configure` records the stores visible at resolve time.
///
/// Exists to exercise the resolve → configure → get sequencing.
#[derive(Default)]
pub struct ConfiguredAction {
    configured: AtomicBool,
    seen_store: Mutex<Option<String>>,
    wants_store: Mutex<Option<String>>,
}

impl ConfiguredAction {
    /// An action that checks for `store_id` during `configure`.
    #[must_use]
    pub fn expecting_store(store_id: impl Into<String>) -> Arc<Self> {
        let action = Self::default();
        *action.wants_store.lock() = Some(store_id.into());
        Arc::new(action)
    }

    /// Returns whether `configure` has completed.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.configured.load(Ordering::SeqCst)
    }

    /// The store id found during `configure`, if any.
    #[must_use]
    pub fn seen_store(&self) -> Option<String> {
        self.seen_store.lock().clone()
    }
}

impl StateObservable for ConfiguredAction {
    fn observe_state(&self, id: &str, _store: ArcStore) -> Box<dyn Disposable> {
        *self.seen_store.lock() = Some(id.to_string());
        Box::new(NoopGuard)
    }
}

#[async_trait]
impl Action for ConfiguredAction {
    async fn invoke(&self, payload: Value) -> Result<Value, BlockError> {
        Ok(payload)
    }

    async fn configure(&self, registry: &CombinedRegistry) -> Result<(), BlockError> {
        let wanted = self.wants_store.lock().clone();
        if let Some(store_id) = wanted
            && registry.has_store(&store_id)
        {
            *self.seen_store.lock() = Some(store_id);
        }
        self.configured.store(true, Ordering::SeqCst);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MemoryStore
// ─────────────────────────────────────────────────────────────────────────────

/// An in-memory JSON store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<Value>,
}

impl MemoryStore {
    /// A store seeded with `state`.
    #[must_use]
    pub fn with_state(state: Value) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(state),
        })
    }
}

impl Store for MemoryStore {
    fn get(&self) -> Value {
        self.state.lock().clone()
    }

    fn put(&self, state: Value) {
        *self.state.lock() = state;
    }
}
