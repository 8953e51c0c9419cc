//! The declarative definition shape.
//!
//! An [`ApplicationDefinition`] lists the blocks one application is composed
//! of, in registration order. Each entry provides its block either directly
//! (an instance or an options-taking factory) or by naming a module
//! identifier the loader resolves lazily through a
//! [`ModuleResolver`](crate::ModuleResolver) on first `get`.

use std::sync::Arc;

use serde_json::Value;
use weft_registry::{
    Action, ArcAction, ArcStore, ArcWidget, BlockFuture, CombinedRegistry, CustomElementFactory,
    Store, Widget,
};

/// A factory that receives the definition's `options` payload alongside the
/// combined registry.
pub type OptionFactory<T> =
    Arc<dyn Fn(CombinedRegistry, Value) -> BlockFuture<T> + Send + Sync>;

/// A value supplied inline or deferred behind a module identifier.
pub enum SourceRef<T> {
    /// The value itself.
    Direct(T),
    /// A module identifier resolved through the loader's resolver on first
    /// use.
    Module(String),
}

impl<T: Clone> Clone for SourceRef<T> {
    fn clone(&self) -> Self {
        match self {
            SourceRef::Direct(value) => SourceRef::Direct(value.clone()),
            SourceRef::Module(id) => SourceRef::Module(id.clone()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Definition entries
// ─────────────────────────────────────────────────────────────────────────────

/// One action registration.
#[derive(Clone, Default)]
pub struct ActionDef {
    /// Registry identifier.
    pub id: String,
    /// Lazy provider. Exactly one of `factory`/`instance` must be set.
    pub factory: Option<SourceRef<OptionFactory<dyn Action>>>,
    /// Eager provider.
    pub instance: Option<SourceRef<ArcAction>>,
    /// JSON payload handed to the factory on invocation.
    pub options: Option<Value>,
    /// Store to bind the action to after resolution.
    pub state_from: Option<String>,
}

impl ActionDef {
    /// An action built by `factory` on first `get`.
    #[must_use]
    pub fn factory(id: impl Into<String>, factory: OptionFactory<dyn Action>) -> Self {
        Self {
            id: id.into(),
            factory: Some(SourceRef::Direct(factory)),
            ..Self::default()
        }
    }

    /// An action provided up front.
    #[must_use]
    pub fn instance(id: impl Into<String>, instance: ArcAction) -> Self {
        Self {
            id: id.into(),
            instance: Some(SourceRef::Direct(instance)),
            ..Self::default()
        }
    }

    /// An action whose factory lives behind `module` identifier.
    #[must_use]
    pub fn factory_module(id: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            factory: Some(SourceRef::Module(module.into())),
            ..Self::default()
        }
    }

    /// An action instance loaded from `module` on first `get`.
    #[must_use]
    pub fn instance_module(id: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            instance: Some(SourceRef::Module(module.into())),
            ..Self::default()
        }
    }

    /// Sets the factory options payload.
    #[must_use]
    pub fn options(mut self, options: Value) -> Self {
        self.options = Some(options);
        self
    }

    /// Binds the action to the store registered under `store_id`.
    #[must_use]
    pub fn state_from(mut self, store_id: impl Into<String>) -> Self {
        self.state_from = Some(store_id.into());
        self
    }
}

/// One store registration.
#[derive(Clone, Default)]
pub struct StoreDef {
    /// Registry identifier.
    pub id: String,
    /// Lazy provider. Exactly one of `factory`/`instance` must be set.
    pub factory: Option<SourceRef<OptionFactory<dyn Store>>>,
    /// Eager provider.
    pub instance: Option<SourceRef<ArcStore>>,
    /// JSON payload handed to the factory on invocation.
    pub options: Option<Value>,
}

impl StoreDef {
    /// A store built by `factory` on first `get`.
    #[must_use]
    pub fn factory(id: impl Into<String>, factory: OptionFactory<dyn Store>) -> Self {
        Self {
            id: id.into(),
            factory: Some(SourceRef::Direct(factory)),
            ..Self::default()
        }
    }

    /// A store provided up front.
    #[must_use]
    pub fn instance(id: impl Into<String>, instance: ArcStore) -> Self {
        Self {
            id: id.into(),
            instance: Some(SourceRef::Direct(instance)),
            ..Self::default()
        }
    }

    /// A store whose factory lives behind `module` identifier.
    #[must_use]
    pub fn factory_module(id: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            factory: Some(SourceRef::Module(module.into())),
            ..Self::default()
        }
    }

    /// A store instance loaded from `module` on first `get`.
    #[must_use]
    pub fn instance_module(id: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            instance: Some(SourceRef::Module(module.into())),
            ..Self::default()
        }
    }

    /// Sets the factory options payload.
    #[must_use]
    pub fn options(mut self, options: Value) -> Self {
        self.options = Some(options);
        self
    }
}

/// One widget registration.
#[derive(Clone, Default)]
pub struct WidgetDef {
    /// Registry identifier.
    pub id: String,
    /// Lazy provider. Exactly one of `factory`/`instance` must be set.
    pub factory: Option<SourceRef<OptionFactory<dyn Widget>>>,
    /// Eager provider.
    pub instance: Option<SourceRef<ArcWidget>>,
    /// JSON payload handed to the factory on invocation. Must not contain
    /// `id`, `listeners`, or `stateFrom` keys; those are sibling fields.
    pub options: Option<Value>,
    /// Event-to-action bindings applied after resolution.
    pub listeners: Vec<(String, String)>,
    /// Store to bind the widget's state to after resolution.
    pub state_from: Option<String>,
}

impl WidgetDef {
    /// A widget built by `factory` on first `get`.
    #[must_use]
    pub fn factory(id: impl Into<String>, factory: OptionFactory<dyn Widget>) -> Self {
        Self {
            id: id.into(),
            factory: Some(SourceRef::Direct(factory)),
            ..Self::default()
        }
    }

    /// A widget provided up front.
    #[must_use]
    pub fn instance(id: impl Into<String>, instance: ArcWidget) -> Self {
        Self {
            id: id.into(),
            instance: Some(SourceRef::Direct(instance)),
            ..Self::default()
        }
    }

    /// A widget whose factory lives behind `module` identifier.
    #[must_use]
    pub fn factory_module(id: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            factory: Some(SourceRef::Module(module.into())),
            ..Self::default()
        }
    }

    /// A widget instance loaded from `module` on first `get`.
    #[must_use]
    pub fn instance_module(id: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            instance: Some(SourceRef::Module(module.into())),
            ..Self::default()
        }
    }

    /// Sets the factory options payload.
    #[must_use]
    pub fn options(mut self, options: Value) -> Self {
        self.options = Some(options);
        self
    }

    /// Routes `event` to the action registered under `action_id`.
    #[must_use]
    pub fn listener(mut self, event: impl Into<String>, action_id: impl Into<String>) -> Self {
        self.listeners.push((event.into(), action_id.into()));
        self
    }

    /// Binds the widget's state to the store registered under `store_id`.
    #[must_use]
    pub fn state_from(mut self, store_id: impl Into<String>) -> Self {
        self.state_from = Some(store_id.into());
        self
    }
}

/// One custom-element factory registration.
#[derive(Clone)]
pub struct CustomElementDef {
    /// Custom-element name; must satisfy the naming rule.
    pub name: String,
    /// The widget factory invoked per element during realization.
    pub factory: SourceRef<CustomElementFactory>,
}

impl CustomElementDef {
    /// Registers `factory` under `name`.
    #[must_use]
    pub fn factory(name: impl Into<String>, factory: CustomElementFactory) -> Self {
        Self {
            name: name.into(),
            factory: SourceRef::Direct(factory),
        }
    }

    /// Registers a factory loaded from `module` on first invocation and
    /// cached for later elements with the same name.
    #[must_use]
    pub fn factory_module(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            factory: SourceRef::Module(module.into()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ApplicationDefinition
// ─────────────────────────────────────────────────────────────────────────────

/// The full declarative composition of one application.
///
/// Entries register in field order: actions, stores, widgets, custom
/// elements; within a field, in list order.
#[derive(Clone, Default)]
pub struct ApplicationDefinition {
    /// Action registrations.
    pub actions: Vec<ActionDef>,
    /// Store registrations.
    pub stores: Vec<StoreDef>,
    /// Widget registrations.
    pub widgets: Vec<WidgetDef>,
    /// Custom-element factory registrations.
    pub custom_elements: Vec<CustomElementDef>,
}

impl ApplicationDefinition {
    /// An empty definition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action definition.
    #[must_use]
    pub fn action(mut self, def: ActionDef) -> Self {
        self.actions.push(def);
        self
    }

    /// Appends a store definition.
    #[must_use]
    pub fn store(mut self, def: StoreDef) -> Self {
        self.stores.push(def);
        self
    }

    /// Appends a widget definition.
    #[must_use]
    pub fn widget(mut self, def: WidgetDef) -> Self {
        self.widgets.push(def);
        self
    }

    /// Appends a custom-element definition.
    #[must_use]
    pub fn custom_element(mut self, def: CustomElementDef) -> Self {
        self.custom_elements.push(def);
        self
    }
}
