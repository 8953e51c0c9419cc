//! Error types for registration and resolution.
//!
//! Registration errors are synchronous and returned directly from the
//! `register*` calls. Resolution errors surface only through the future a
//! `get` call returns. [`ResolveError`] is `Clone` because concurrent callers
//! share one in-flight resolution and each receives the settled result.

use core::fmt;

/// Which combined-namespace kind a block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// An action: invokable behavior, configured against the registry.
    Action,
    /// A store: shared state container.
    Store,
    /// A widget: a renderable, appendable UI unit.
    Widget,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Action => write!(f, "action"),
            BlockKind::Store => write!(f, "store"),
            BlockKind::Widget => write!(f, "widget"),
        }
    }
}

/// Synchronous registration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryError {
    /// The identifier is already taken in the combined action/store/widget
    /// namespace.
    #[error("'{id}' is already registered as an action, store, or widget")]
    DuplicateId {
        /// The identifier that was already registered.
        id: String,
    },

    /// A custom-element factory is already registered under this name.
    #[error("a custom element factory is already registered for '{name}'")]
    DuplicateName {
        /// The name that was already registered.
        name: String,
    },

    /// The name violates the custom-element naming rule or is reserved.
    #[error("'{name}' is not a valid custom element name")]
    InvalidCustomElementName {
        /// The offending name.
        name: String,
    },
}

/// Asynchronous resolution errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ResolveError {
    /// No entry exists under the identifier.
    #[error("no {kind} registered with id '{id}'")]
    NotFound {
        /// The namespace kind that was queried.
        kind: BlockKind,
        /// The identifier that was looked up.
        id: String,
    },

    /// The owning registry set was dropped while a resolution was in flight
    /// or a facade call was made against a dead application.
    #[error("application registry is no longer available")]
    RegistryGone,

    /// A factory or post-resolution hook failed.
    #[error("{message}")]
    Failure {
        /// The failure description, verbatim from the failing component.
        message: String,
    },
}

impl ResolveError {
    /// Creates a [`ResolveError::Failure`] from any message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        ResolveError::Failure {
            message: message.into(),
        }
    }
}

impl From<BlockError> for ResolveError {
    fn from(err: BlockError) -> Self {
        ResolveError::failure(err.to_string())
    }
}

/// Errors raised by block implementations themselves.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BlockError {
    /// The widget does not support the ordered-append capability.
    #[error("widget '{id}' does not accept children")]
    ChildrenUnsupported {
        /// The widget's instance identifier.
        id: String,
    },

    /// Implementation-defined failure.
    #[error("{message}")]
    Failed {
        /// The failure description.
        message: String,
    },
}

impl BlockError {
    /// Creates a [`BlockError::Failed`] from any message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        BlockError::Failed {
            message: message.into(),
        }
    }
}
