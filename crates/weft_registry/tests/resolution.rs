//! Integration tests for the resolution lifecycle: shared in-flight
//! resolution, at-most-once factory invocation, failure retry, hook
//! sequencing, and deregistration during flight.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::FutureExt;
use futures::future;
use tokio::sync::Semaphore;

use weft_registry::stock::{BlockWidget, ConfiguredAction, MemoryStore};
use weft_registry::{
    ArcWidget, BlockFactory, RegistrySet, ResolveError, Widget, WidgetBindings,
};

/// A widget factory that counts invocations and holds its result until the
/// test adds a permit, so tests can pile up concurrent `get` calls.
fn gated_factory(
    invocations: Arc<AtomicUsize>,
    gate: Arc<Semaphore>,
) -> BlockFactory<dyn Widget> {
    Arc::new(move |_| {
        invocations.fetch_add(1, Ordering::SeqCst);
        let gate = Arc::clone(&gate);
        async move {
            let permit = gate.acquire().await.map_err(|e| ResolveError::failure(e.to_string()))?;
            permit.forget();
            Ok(BlockWidget::new("div") as ArcWidget)
        }
        .boxed()
    })
}

#[tokio::test]
async fn concurrent_gets_share_one_invocation() {
    let set = RegistrySet::new();
    let invocations = Arc::new(AtomicUsize::new(0));
    let gate = Arc::new(Semaphore::new(0));

    set.widgets()
        .register_factory("nav", gated_factory(Arc::clone(&invocations), Arc::clone(&gate)))
        .unwrap();

    // All three callers are issued before the factory can complete.
    let first = set.widgets().get("nav");
    let second = set.widgets().get("nav");
    let third = set.widgets().get("nav");
    gate.add_permits(3);

    let (a, b, c) = tokio::join!(first, second, third);
    let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());

    assert_eq!(invocations.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&b, &c));
}

#[tokio::test]
async fn resolved_instance_is_cached() {
    let set = RegistrySet::new();
    let invocations = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&invocations);

    let factory: BlockFactory<dyn Widget> = Arc::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        future::ready(Ok(BlockWidget::new("div") as ArcWidget)).boxed()
    });
    set.widgets().register_factory("nav", factory).unwrap();

    let first = set.widgets().get("nav").await.unwrap();
    let second = set.widgets().get("nav").await.unwrap();

    assert_eq!(invocations.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn failed_factory_reverts_and_retries() {
    let set = RegistrySet::new();
    let invocations = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&invocations);

    let factory: BlockFactory<dyn Widget> = Arc::new(move |_| {
        let attempt = counter.fetch_add(1, Ordering::SeqCst);
        if attempt == 0 {
            future::ready(Err(ResolveError::failure("backend offline"))).boxed()
        } else {
            future::ready(Ok(BlockWidget::new("div") as ArcWidget)).boxed()
        }
    });
    set.widgets().register_factory("nav", factory).unwrap();

    let err = set.widgets().get("nav").await.unwrap_err();
    assert_eq!(err.to_string(), "backend offline");

    // The entry survives the failure; the next get re-invokes.
    assert!(set.widgets().has("nav"));
    set.widgets().get("nav").await.unwrap();
    assert_eq!(invocations.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn factory_can_cross_resolve_through_the_combined_registry() {
    let set = RegistrySet::new();
    set.stores()
        .register("prefs", MemoryStore::with_state(serde_json::json!({"tag": "aside"})))
        .unwrap();

    let factory: BlockFactory<dyn Widget> = Arc::new(|combined| {
        async move {
            let store = combined.get_store("prefs").await?;
            let tag = store.get()["tag"].as_str().unwrap_or("div").to_string();
            Ok(BlockWidget::new(tag) as ArcWidget)
        }
        .boxed()
    });
    set.widgets().register_factory("sidebar", factory).unwrap();

    let widget = set.widgets().get("sidebar").await.unwrap();
    let mut doc = weft_dom::Document::new();
    let root = widget.render(&mut doc);
    assert_eq!(doc.tag(root), "aside");
}

#[tokio::test]
async fn configure_completes_before_get_resolves() {
    let set = RegistrySet::new();
    set.stores()
        .register("prefs", Arc::new(MemoryStore::default()))
        .unwrap();

    let action = ConfiguredAction::expecting_store("prefs");
    set.actions().register("save", action.clone()).unwrap();

    assert!(!action.is_configured());
    set.actions().get("save").await.unwrap();
    assert!(action.is_configured());
    assert_eq!(action.seen_store(), Some("prefs".to_string()));
}

#[tokio::test]
async fn configure_runs_once_across_gets() {
    let set = RegistrySet::new();
    let action = ConfiguredAction::expecting_store("prefs");
    set.actions().register("save", action.clone()).unwrap();

    set.actions().get("save").await.unwrap();
    let seen_before = action.is_configured();
    set.actions().get("save").await.unwrap();

    assert!(seen_before);
    // Still configured, and the instance is the cached one.
    let a = set.actions().get("save").await.unwrap();
    let b = set.actions().get("save").await.unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[tokio::test]
async fn widget_bindings_apply_after_resolution() {
    let set = RegistrySet::new();
    set.stores()
        .register("prefs", Arc::new(MemoryStore::default()))
        .unwrap();
    set.actions()
        .register("save", weft_registry::stock::FnAction::new(|v| v))
        .unwrap();

    let widget = BlockWidget::with_id("form", "settings-form");
    let (hook, guards) = WidgetBindings::new()
        .state_from("prefs")
        .listener("submit", "save")
        .into_hook();
    set.widgets()
        .register_with("settings", widget.clone(), hook)
        .unwrap();

    assert!(widget.observed_stores().is_empty());
    set.widgets().get("settings").await.unwrap();

    assert_eq!(widget.observed_stores(), vec!["prefs"]);
    assert_eq!(widget.wired_events(), vec!["submit"]);
    assert_eq!(guards.len(), 2);
}

#[tokio::test]
async fn binding_against_missing_store_rejects_and_retries() {
    let set = RegistrySet::new();
    let widget = BlockWidget::with_id("form", "settings-form");
    let (hook, _guards) = WidgetBindings::new().state_from("prefs").into_hook();
    set.widgets()
        .register_with("settings", widget.clone(), hook)
        .unwrap();

    let err = set.widgets().get("settings").await.unwrap_err();
    assert!(matches!(err, ResolveError::NotFound { .. }));

    // Register the store and the next get binds successfully.
    set.stores()
        .register("prefs", Arc::new(MemoryStore::default()))
        .unwrap();
    set.widgets().get("settings").await.unwrap();
    assert_eq!(widget.observed_stores(), vec!["prefs"]);
}

#[tokio::test]
async fn deregistration_during_flight_lets_callers_finish() {
    let set = RegistrySet::new();
    let invocations = Arc::new(AtomicUsize::new(0));
    let gate = Arc::new(Semaphore::new(0));

    let handle = set
        .widgets()
        .register_factory("nav", gated_factory(Arc::clone(&invocations), Arc::clone(&gate)))
        .unwrap();

    let pending = set.widgets().get("nav");
    handle.destroy();
    assert!(!set.widgets().has("nav"));
    gate.add_permits(1);

    // The in-flight caller still completes; later lookups observe removal.
    pending.await.unwrap();
    let err = set.widgets().get("nav").await.unwrap_err();
    assert!(matches!(err, ResolveError::NotFound { .. }));
}
