//! Batch registration of application definitions.
//!
//! [`DefinitionLoader::load`] validates each entry's shape, registers it
//! against the target [`RegistrySet`], wires `stateFrom`/`listeners`
//! references as post-resolution hooks, and returns one handle covering the
//! whole batch. Registration is synchronous; module identifiers defer to the
//! resolver inside the registered factory, so a broken module is observed on
//! first `get`, not at load time.
//!
//! A failing entry stops the batch at that entry. Earlier registrations are
//! not rolled back.

use std::sync::Arc;

use futures::FutureExt;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;
use weft_registry::{
    Action, ArcAction, BindingGuards, BlockFactory, BlockRegistry, CombinedRegistry,
    CustomElementFactory, Handle, RegistrySet, ResolveError, ResolveHook, StateObservable, Store,
    Widget, WidgetBindings,
};

use crate::definition::{ApplicationDefinition, CustomElementDef, OptionFactory, SourceRef};
use crate::error::DefinitionError;
use crate::module::{ModuleExport, ModuleResolver};

/// Keys that must be sibling fields of a widget definition, never `options`
/// entries.
const RESERVED_OPTION_KEYS: [&str; 3] = ["id", "listeners", "stateFrom"];

/// Loads declarative definitions into a registry set.
pub struct DefinitionLoader {
    resolver: Arc<dyn ModuleResolver>,
}

impl DefinitionLoader {
    /// A loader resolving module identifiers through `resolver`.
    #[must_use]
    pub fn new(resolver: Arc<dyn ModuleResolver>) -> Self {
        Self { resolver }
    }

    /// Registers every entry of `definition` against `set`, in order:
    /// actions, stores, widgets, custom elements.
    ///
    /// The returned handle deregisters everything this call registered and
    /// releases any bindings applied along the way.
    ///
    /// # Errors
    ///
    /// Returns the first shape violation or registry rejection encountered.
    /// Entries registered before the failure stay registered.
    pub fn load(
        &self,
        set: &RegistrySet,
        definition: ApplicationDefinition,
    ) -> Result<Handle, DefinitionError> {
        debug!(
            actions = definition.actions.len(),
            stores = definition.stores.len(),
            widgets = definition.widgets.len(),
            custom_elements = definition.custom_elements.len(),
            "loading application definition"
        );
        let batch = Handle::empty();
        let guards = BindingGuards::default();

        for def in definition.actions {
            validate_provider(def.factory.is_some(), def.instance.is_some(), "Action")?;
            if def.instance.is_some() {
                forbid_with_instance(def.options.is_some(), "options", "action")?;
                forbid_with_instance(def.state_from.is_some(), "stateFrom", "action")?;
            }
            let hook = def
                .state_from
                .map(|store_id| action_state_hook(store_id, guards.clone()));
            batch.absorb(register_block(
                set.actions(),
                &self.resolver,
                &def.id,
                def.factory,
                def.instance,
                def.options,
                hook,
                action_factory_export,
                action_instance_export,
                "an action",
            )?);
        }

        for def in definition.stores {
            validate_provider(def.factory.is_some(), def.instance.is_some(), "Store")?;
            if def.instance.is_some() {
                forbid_with_instance(def.options.is_some(), "options", "store")?;
            }
            batch.absorb(register_block(
                set.stores(),
                &self.resolver,
                &def.id,
                def.factory,
                def.instance,
                def.options,
                None,
                store_factory_export,
                store_instance_export,
                "a store",
            )?);
        }

        for def in definition.widgets {
            validate_provider(def.factory.is_some(), def.instance.is_some(), "Widget")?;
            if def.instance.is_some() {
                forbid_with_instance(def.options.is_some(), "options", "widget")?;
                forbid_with_instance(!def.listeners.is_empty(), "listeners", "widget")?;
                forbid_with_instance(def.state_from.is_some(), "stateFrom", "widget")?;
            }
            validate_widget_options(def.options.as_ref())?;

            let mut bindings = WidgetBindings::new();
            if let Some(store_id) = def.state_from {
                bindings = bindings.state_from(store_id);
            }
            for (event, action_id) in def.listeners {
                bindings = bindings.listener(event, action_id);
            }
            let hook = if bindings.is_empty() {
                None
            } else {
                let (hook, widget_guards) = bindings.into_hook();
                batch.push({
                    let widget_guards = widget_guards.clone();
                    move || widget_guards.destroy_all()
                });
                Some(hook)
            };
            batch.absorb(register_block(
                set.widgets(),
                &self.resolver,
                &def.id,
                def.factory,
                def.instance,
                def.options,
                hook,
                widget_factory_export,
                widget_instance_export,
                "a widget",
            )?);
        }

        for def in definition.custom_elements {
            batch.absorb(self.register_custom_element(set, def)?);
        }

        batch.push(move || guards.destroy_all());
        Ok(batch)
    }

    fn register_custom_element(
        &self,
        set: &RegistrySet,
        def: CustomElementDef,
    ) -> Result<Handle, DefinitionError> {
        let factory = match def.factory {
            SourceRef::Direct(factory) => factory,
            SourceRef::Module(module) => {
                memoized_module_factory(Arc::clone(&self.resolver), module)
            }
        };
        Ok(set.custom_elements().register_factory(&def.name, factory)?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shape validation
// ─────────────────────────────────────────────────────────────────────────────

fn validate_provider(
    has_factory: bool,
    has_instance: bool,
    kind: &'static str,
) -> Result<(), DefinitionError> {
    if has_factory == has_instance {
        return Err(DefinitionError::MissingProvider { kind });
    }
    Ok(())
}

fn forbid_with_instance(
    present: bool,
    option: &'static str,
    kind: &'static str,
) -> Result<(), DefinitionError> {
    if present {
        return Err(DefinitionError::OptionWithInstance { option, kind });
    }
    Ok(())
}

fn validate_widget_options(options: Option<&Value>) -> Result<(), DefinitionError> {
    if let Some(Value::Object(map)) = options {
        for key in RESERVED_OPTION_KEYS {
            if map.contains_key(key) {
                return Err(DefinitionError::ReservedOptionKey {
                    key: key.to_string(),
                });
            }
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Registration plumbing
// ─────────────────────────────────────────────────────────────────────────────

fn unresolvable(module: &str, kind_phrase: &str, export: &str) -> ResolveError {
    ResolveError::failure(format!(
        "Could not resolve '{module}' to {kind_phrase} {export}"
    ))
}

/// Registers one action/store/widget entry, deferring module resolution into
/// the registered factory.
fn register_block<T: ?Sized + Send + Sync + 'static>(
    registry: &BlockRegistry<T>,
    resolver: &Arc<dyn ModuleResolver>,
    id: &str,
    factory: Option<SourceRef<OptionFactory<T>>>,
    instance: Option<SourceRef<Arc<T>>>,
    options: Option<Value>,
    hook: Option<ResolveHook<T>>,
    factory_export: fn(ModuleExport) -> Option<OptionFactory<T>>,
    instance_export: fn(ModuleExport) -> Option<Arc<T>>,
    kind_phrase: &'static str,
) -> Result<Handle, DefinitionError> {
    let options = options.unwrap_or(Value::Null);
    let handle = match (factory, instance) {
        (Some(SourceRef::Direct(factory)), None) => {
            let block_factory: BlockFactory<T> =
                Arc::new(move |combined| factory(combined, options.clone()));
            registered(registry, id, block_factory, hook)?
        }
        (Some(SourceRef::Module(module)), None) => {
            let resolver = Arc::clone(resolver);
            let block_factory: BlockFactory<T> = Arc::new(move |combined| {
                let resolver = Arc::clone(&resolver);
                let module = module.clone();
                let options = options.clone();
                async move {
                    let export = resolver.resolve(&module).await?;
                    let Some(factory) = factory_export(export) else {
                        return Err(unresolvable(&module, kind_phrase, "factory function"));
                    };
                    factory(combined, options).await
                }
                .boxed()
            });
            registered(registry, id, block_factory, hook)?
        }
        (None, Some(SourceRef::Direct(block))) => match hook {
            Some(hook) => registry.register_with(id, block, hook)?,
            None => registry.register(id, block)?,
        },
        (None, Some(SourceRef::Module(module))) => {
            let resolver = Arc::clone(resolver);
            let block_factory: BlockFactory<T> = Arc::new(move |_| {
                let resolver = Arc::clone(&resolver);
                let module = module.clone();
                async move {
                    let export = resolver.resolve(&module).await?;
                    instance_export(export)
                        .ok_or_else(|| unresolvable(&module, kind_phrase, "instance"))
                }
                .boxed()
            });
            registered(registry, id, block_factory, hook)?
        }
        // validate_provider has already rejected these.
        (Some(_), Some(_)) | (None, None) => {
            return Err(DefinitionError::MissingProvider { kind: "Block" });
        }
    };
    Ok(handle)
}

fn registered<T: ?Sized + Send + Sync + 'static>(
    registry: &BlockRegistry<T>,
    id: &str,
    factory: BlockFactory<T>,
    hook: Option<ResolveHook<T>>,
) -> Result<Handle, weft_registry::RegistryError> {
    match hook {
        Some(hook) => registry.register_factory_with(id, factory, hook),
        None => registry.register_factory(id, factory),
    }
}

/// Resolves the referenced store after the action resolves and applies the
/// state binding.
fn action_state_hook(store_id: String, guards: BindingGuards) -> ResolveHook<dyn Action> {
    Arc::new(move |action: ArcAction, combined: CombinedRegistry| {
        let store_id = store_id.clone();
        let guards = guards.clone();
        async move {
            let store = combined.get_store(&store_id).await?;
            guards.push(action.observe_state(&store_id, store));
            Ok(())
        }
        .boxed()
    })
}

/// Wraps a module-backed custom-element factory. The loaded factory is
/// cached after the first successful resolution, so later elements with this
/// name skip the resolver.
fn memoized_module_factory(
    resolver: Arc<dyn ModuleResolver>,
    module: String,
) -> CustomElementFactory {
    let cached: Arc<Mutex<Option<CustomElementFactory>>> = Arc::default();
    Arc::new(move || {
        let resolver = Arc::clone(&resolver);
        let module = module.clone();
        let cached = Arc::clone(&cached);
        async move {
            let hit = cached.lock().clone();
            let factory = match hit {
                Some(factory) => factory,
                None => {
                    let export = resolver.resolve(&module).await?;
                    let ModuleExport::CustomElementFactory(factory) = export else {
                        return Err(unresolvable(
                            &module,
                            "a custom element",
                            "factory function",
                        ));
                    };
                    *cached.lock() = Some(factory.clone());
                    factory
                }
            };
            factory().await
        }
        .boxed()
    })
}

fn action_factory_export(export: ModuleExport) -> Option<OptionFactory<dyn Action>> {
    match export {
        ModuleExport::ActionFactory(factory) => Some(factory),
        _ => None,
    }
}

fn action_instance_export(export: ModuleExport) -> Option<ArcAction> {
    match export {
        ModuleExport::ActionInstance(instance) => Some(instance),
        _ => None,
    }
}

fn store_factory_export(export: ModuleExport) -> Option<OptionFactory<dyn Store>> {
    match export {
        ModuleExport::StoreFactory(factory) => Some(factory),
        _ => None,
    }
}

fn store_instance_export(export: ModuleExport) -> Option<Arc<dyn Store>> {
    match export {
        ModuleExport::StoreInstance(instance) => Some(instance),
        _ => None,
    }
}

fn widget_factory_export(export: ModuleExport) -> Option<OptionFactory<dyn Widget>> {
    match export {
        ModuleExport::WidgetFactory(factory) => Some(factory),
        _ => None,
    }
}

fn widget_instance_export(export: ModuleExport) -> Option<Arc<dyn Widget>> {
    match export {
        ModuleExport::WidgetInstance(instance) => Some(instance),
        _ => None,
    }
}
