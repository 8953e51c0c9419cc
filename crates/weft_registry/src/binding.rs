//! Store and listener bindings applied after widget resolution.
//!
//! A widget definition may name a store (`state_from`) and a set of
//! event-to-action listeners. Those references are forwarded here as a
//! post-resolution hook: once the widget instance exists, the referenced
//! store and actions are resolved through the combined registry and bound
//! via [`StateObservable`](crate::StateObservable) / [`EventTarget`](crate::EventTarget).
//! The guards the widget hands back are collected so the registration handle
//! can tear the bindings down.

use std::sync::Arc;

use futures::FutureExt;
use parking_lot::Mutex;

use crate::block::{ArcWidget, Disposable, EventTarget, StateObservable};
use crate::combined::CombinedRegistry;
use crate::error::ResolveError;
use crate::registry::ResolveHook;

/// Bindings requested when a widget was registered.
#[derive(Debug, Default, Clone)]
pub struct WidgetBindings {
    state_from: Option<String>,
    listeners: Vec<(String, String)>,
}

impl WidgetBindings {
    /// No bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the widget's state to the store registered under `store_id`.
    #[must_use]
    pub fn state_from(mut self, store_id: impl Into<String>) -> Self {
        self.state_from = Some(store_id.into());
        self
    }

    /// Routes `event` to the action registered under `action_id`.
    #[must_use]
    pub fn listener(mut self, event: impl Into<String>, action_id: impl Into<String>) -> Self {
        self.listeners.push((event.into(), action_id.into()));
        self
    }

    /// Returns whether no bindings were requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state_from.is_none() && self.listeners.is_empty()
    }

    /// Converts the bindings into a post-resolution hook plus the guard
    /// collection the hook fills in. Attach the guards to the registration
    /// handle so destroying it unbinds the widget.
    #[must_use]
    pub fn into_hook(self) -> (ResolveHook<dyn crate::block::Widget>, BindingGuards) {
        let guards = BindingGuards::default();
        let hook_guards = guards.clone();
        let hook: ResolveHook<dyn crate::block::Widget> = Arc::new(
            move |widget: ArcWidget, combined: CombinedRegistry| {
                let state_from = self.state_from.clone();
                let listeners = self.listeners.clone();
                let guards = hook_guards.clone();
                async move {
                    if let Some(store_id) = state_from {
                        let store = combined.get_store(&store_id).await?;
                        guards.push(widget.observe_state(&store_id, store));
                    }
                    for (event, action_id) in listeners {
                        let action = combined.get_action(&action_id).await?;
                        guards.push(widget.on(&event, action));
                    }
                    Ok::<(), ResolveError>(())
                }
                .boxed()
            },
        );
        (hook, guards)
    }
}

/// Guards produced by applied bindings, owned by the registration handle.
#[derive(Default, Clone)]
pub struct BindingGuards {
    guards: Arc<Mutex<Vec<Box<dyn Disposable>>>>,
}

impl BindingGuards {
    /// Adds a guard to be destroyed with the rest.
    pub fn push(&self, guard: Box<dyn Disposable>) {
        self.guards.lock().push(guard);
    }

    /// Number of live binding guards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.guards.lock().len()
    }

    /// Returns whether no bindings have been applied yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guards.lock().is_empty()
    }

    /// Destroys every collected guard. Idempotent.
    pub fn destroy_all(&self) {
        let drained: Vec<_> = {
            let mut guards = self.guards.lock();
            guards.drain(..).collect()
        };
        for guard in drained {
            guard.destroy();
        }
    }
}
