//! Realization errors.
//!
//! Structural errors abort the entire `realize` call. The message strings
//! are part of the public contract and asserted by tests.

use weft_dom::DomError;
use weft_registry::{BlockError, ResolveError};

/// Errors surfaced by a `realize` call.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RealizeError {
    /// A custom element was found outside any projection surface.
    #[error("Custom tags must be rooted in a projection-surface")]
    UnrootedCustomTag,

    /// A projection surface was nested inside another one.
    #[error("projection-surface cannot contain another projection-surface")]
    NestedSurface,

    /// An attach-widget element carries neither identifying attribute.
    #[error("Cannot resolve widget for a custom element without 'data-widget-id' or 'id' attributes")]
    MissingWidgetId,

    /// The same widget instance resolved for more than one element.
    #[error("Cannot attach a widget multiple times")]
    DuplicateWidget,

    /// A resolved widget already belongs to a hierarchy.
    #[error("Cannot attach a widget that already has a parent")]
    AlreadyParented,

    /// The factory for a scanned custom element disappeared before
    /// resolution.
    #[error("no custom element factory registered for '{name}'")]
    MissingFactory {
        /// The custom-element name in question.
        name: String,
    },

    /// The renderer produced fewer nodes than there are placeholders.
    #[error("renderer produced fewer nodes than placeholders under {surface}")]
    RenderShortfall {
        /// The surface root element.
        surface: weft_dom::NodeId,
    },

    /// A registry resolution failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A widget refused an append.
    #[error(transparent)]
    Block(#[from] BlockError),

    /// A document mutation failed.
    #[error(transparent)]
    Dom(#[from] DomError),
}
