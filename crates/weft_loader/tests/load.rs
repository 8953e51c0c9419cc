//! Definition loading: shape validation, lazy module resolution, bindings,
//! and batch teardown.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use futures::FutureExt;
use futures::future;
use serde_json::{Value, json};

use weft_loader::{
    ActionDef, ApplicationDefinition, CustomElementDef, DefinitionLoader, ModuleExport,
    ModuleResolver, OptionFactory, StaticResolver, StoreDef, WidgetDef,
};
use weft_registry::stock::{BlockWidget, ConfiguredAction, FnAction, MemoryStore};
use weft_registry::{
    Action, ArcAction, ArcStore, ArcWidget, CustomElementFactory, RegistrySet, ResolveError,
    Store, Widget,
};

fn loader() -> DefinitionLoader {
    DefinitionLoader::new(Arc::new(StaticResolver::new()))
}

fn store_factory(state: Value) -> OptionFactory<dyn Store> {
    Arc::new(move |_, _| {
        let store: ArcStore = MemoryStore::with_state(state.clone());
        future::ready(Ok(store)).boxed()
    })
}

/// Counts how often the inner resolver is consulted.
struct CountingResolver {
    inner: StaticResolver,
    calls: AtomicUsize,
}

#[async_trait]
impl ModuleResolver for CountingResolver {
    async fn resolve(&self, id: &str) -> Result<ModuleExport, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve(id).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shape validation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn entry_without_provider_is_rejected() {
    let set = RegistrySet::new();
    let definition = ApplicationDefinition::new().action(ActionDef {
        id: "noop".to_string(),
        ..ActionDef::default()
    });

    let err = loader().load(&set, definition).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Action definitions must specify either the factory or instance option"
    );
}

#[test]
fn entry_with_both_providers_is_rejected() {
    let set = RegistrySet::new();
    let mut def = StoreDef::instance("prefs", Arc::new(MemoryStore::default()));
    def.factory = StoreDef::factory("prefs", store_factory(Value::Null)).factory;

    let err = loader()
        .load(&set, ApplicationDefinition::new().store(def))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Store definitions must specify either the factory or instance option"
    );
}

#[test]
fn options_with_instance_is_rejected() {
    let set = RegistrySet::new();
    let def = StoreDef::instance("prefs", Arc::new(MemoryStore::default()))
        .options(json!({ "seed": 1 }));

    let err = loader()
        .load(&set, ApplicationDefinition::new().store(def))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot specify options when store definition points directly at an instance"
    );
}

#[test]
fn listeners_with_instance_is_rejected() {
    let set = RegistrySet::new();
    let widget: ArcWidget = BlockWidget::with_id("nav", "w");
    let def = WidgetDef::instance("w", widget).listener("click", "noop");

    let err = loader()
        .load(&set, ApplicationDefinition::new().widget(def))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot specify listeners when widget definition points directly at an instance"
    );
}

#[test]
fn reserved_keys_in_widget_options_are_rejected() {
    let set = RegistrySet::new();
    let factory: OptionFactory<dyn Widget> = Arc::new(|_, _| {
        let widget: ArcWidget = BlockWidget::new("nav");
        future::ready(Ok(widget)).boxed()
    });
    let def = WidgetDef::factory("w", factory).options(json!({ "stateFrom": "prefs" }));

    let err = loader()
        .load(&set, ApplicationDefinition::new().widget(def))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Widget options must not contain the 'stateFrom' key"
    );
}

#[test]
fn earlier_entries_survive_a_later_failure() {
    let set = RegistrySet::new();
    let definition = ApplicationDefinition::new()
        .store(StoreDef::instance("prefs", Arc::new(MemoryStore::default())))
        .store(StoreDef {
            id: "broken".to_string(),
            ..StoreDef::default()
        });

    assert!(loader().load(&set, definition).is_err());
    assert!(set.stores().has("prefs"));
    assert!(!set.stores().has("broken"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Registration and resolution
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn instances_register_and_resolve() {
    let set = RegistrySet::new();
    let definition = ApplicationDefinition::new()
        .store(StoreDef::instance(
            "prefs",
            MemoryStore::with_state(json!({ "theme": "dark" })),
        ))
        .action(ActionDef::instance(
            "echo",
            FnAction::new(|payload| payload),
        ));

    loader().load(&set, definition).unwrap();

    let store = set.combined().get_store("prefs").await.unwrap();
    assert_eq!(store.get()["theme"], "dark");
    let action = set.combined().get_action("echo").await.unwrap();
    assert_eq!(action.invoke(json!(7)).await.unwrap(), json!(7));
}

#[tokio::test]
async fn factories_receive_their_options_payload() {
    let set = RegistrySet::new();
    let factory: OptionFactory<dyn Store> = Arc::new(|_, options: Value| {
        let store: ArcStore = MemoryStore::with_state(options);
        future::ready(Ok(store)).boxed()
    });
    let def = StoreDef::factory("prefs", factory).options(json!({ "theme": "light" }));

    loader()
        .load(&set, ApplicationDefinition::new().store(def))
        .unwrap();

    let store = set.combined().get_store("prefs").await.unwrap();
    assert_eq!(store.get()["theme"], "light");
}

#[tokio::test]
async fn widget_bindings_are_applied_after_resolution() {
    let set = RegistrySet::new();
    let panel = BlockWidget::with_id("section", "panel");
    let probe = Arc::clone(&panel);
    let factory: OptionFactory<dyn Widget> = Arc::new(move |_, _| {
        let widget: ArcWidget = Arc::clone(&panel) as ArcWidget;
        future::ready(Ok(widget)).boxed()
    });

    let definition = ApplicationDefinition::new()
        .action(ActionDef::instance("save", FnAction::new(|p| p)))
        .store(StoreDef::instance("prefs", Arc::new(MemoryStore::default())))
        .widget(
            WidgetDef::factory("panel", factory)
                .state_from("prefs")
                .listener("click", "save"),
        );

    loader().load(&set, definition).unwrap();
    set.combined().get_widget("panel").await.unwrap();

    assert_eq!(probe.observed_stores(), vec!["prefs"]);
    assert_eq!(probe.wired_events(), vec!["click"]);
}

#[tokio::test]
async fn action_state_from_binds_after_configure() {
    let set = RegistrySet::new();
    let action = Arc::new(ConfiguredAction::default());
    let probe = Arc::clone(&action);
    let factory: OptionFactory<dyn Action> = Arc::new(move |_, _| {
        let action: ArcAction = Arc::clone(&action) as ArcAction;
        future::ready(Ok(action)).boxed()
    });

    let definition = ApplicationDefinition::new()
        .store(StoreDef::instance("prefs", Arc::new(MemoryStore::default())))
        .action(ActionDef::factory("sync", factory).state_from("prefs"));

    loader().load(&set, definition).unwrap();
    set.combined().get_action("sync").await.unwrap();

    assert!(probe.is_configured());
    assert_eq!(probe.seen_store(), Some("prefs".to_string()));
}

// ─────────────────────────────────────────────────────────────────────────────
// Module resolution
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn module_resolution_is_lazy_and_retries_after_failure() {
    let set = RegistrySet::new();
    let resolver = Arc::new(StaticResolver::new());
    let loader = DefinitionLoader::new(Arc::clone(&resolver) as Arc<dyn ModuleResolver>);

    // The module is unknown at load time; loading still succeeds.
    let definition = ApplicationDefinition::new()
        .store(StoreDef::instance_module("prefs", "mod:prefs"));
    loader.load(&set, definition).unwrap();

    let err = set.combined().get_store("prefs").await.unwrap_err();
    assert_eq!(err.to_string(), "no module registered for 'mod:prefs'");

    // A failed resolution reverts the entry, so fixing the module fixes get.
    resolver.insert(
        "mod:prefs",
        ModuleExport::StoreInstance(MemoryStore::with_state(json!({ "ok": true }))),
    );
    let store = set.combined().get_store("prefs").await.unwrap();
    assert_eq!(store.get()["ok"], true);
}

#[tokio::test]
async fn wrong_export_kind_names_the_expected_shape() {
    let set = RegistrySet::new();
    let resolver = Arc::new(StaticResolver::new());
    resolver.insert(
        "mod:thing",
        ModuleExport::StoreInstance(Arc::new(MemoryStore::default())),
    );
    let loader = DefinitionLoader::new(Arc::clone(&resolver) as Arc<dyn ModuleResolver>);

    let definition = ApplicationDefinition::new()
        .action(ActionDef::factory_module("act", "mod:thing"))
        .widget(WidgetDef::instance_module("wid", "mod:thing"));
    loader.load(&set, definition).unwrap();

    let err = set.combined().get_action("act").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Could not resolve 'mod:thing' to an action factory function"
    );
    let err = set.combined().get_widget("wid").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Could not resolve 'mod:thing' to a widget instance"
    );
}

#[tokio::test]
async fn module_custom_element_factory_is_cached_per_name() {
    let set = RegistrySet::new();
    let resolver = Arc::new(CountingResolver {
        inner: StaticResolver::new(),
        calls: AtomicUsize::new(0),
    });
    let element_factory: CustomElementFactory = Arc::new(|| {
        let widget: ArcWidget = BlockWidget::new("ul");
        future::ready(Ok(widget)).boxed()
    });
    resolver
        .inner
        .insert("mod:menu", ModuleExport::CustomElementFactory(element_factory));
    let loader = DefinitionLoader::new(Arc::clone(&resolver) as Arc<dyn ModuleResolver>);

    let definition = ApplicationDefinition::new()
        .custom_element(CustomElementDef::factory_module("app-menu", "mod:menu"));
    loader.load(&set, definition).unwrap();
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);

    let factory = set.combined().get_custom_element_factory("app-menu").unwrap();
    factory().await.unwrap();
    factory().await.unwrap();
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Batch teardown
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn destroying_the_batch_handle_deregisters_everything() {
    let set = RegistrySet::new();
    let element_factory: CustomElementFactory = Arc::new(|| {
        let widget: ArcWidget = BlockWidget::new("ul");
        future::ready(Ok(widget)).boxed()
    });
    let definition = ApplicationDefinition::new()
        .store(StoreDef::instance("prefs", Arc::new(MemoryStore::default())))
        .action(ActionDef::instance("echo", FnAction::new(|p| p)))
        .widget(WidgetDef::instance("panel", BlockWidget::with_id("nav", "panel")))
        .custom_element(CustomElementDef::factory("app-menu", element_factory));

    let handle = loader().load(&set, definition).unwrap();
    assert!(set.stores().has("prefs"));
    assert!(set.actions().has("echo"));
    assert!(set.widgets().has("panel"));
    assert!(set.custom_elements().has("app-menu"));

    handle.destroy();
    assert!(!set.stores().has("prefs"));
    assert!(!set.actions().has("echo"));
    assert!(!set.widgets().has("panel"));
    assert!(!set.custom_elements().has("app-menu"));
}
