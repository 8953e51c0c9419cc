//! Definition-loading errors.
//!
//! Shape violations are synchronous and stop the batch at the failing entry;
//! registrations performed before the failure stay in place. Module
//! resolution happens lazily inside registered factories, so its failures
//! surface as [`ResolveError`](weft_registry::ResolveError) rejections on
//! `get`, not here.

use weft_registry::RegistryError;

/// Synchronous errors from loading an application definition.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DefinitionError {
    /// The entry names neither a factory nor an instance, or names both.
    #[error("{kind} definitions must specify either the factory or instance option")]
    MissingProvider {
        /// The definition kind, capitalized ("Action", "Store", "Widget").
        kind: &'static str,
    },

    /// A factory-only option was combined with an instance provider.
    #[error("Cannot specify {option} when {kind} definition points directly at an instance")]
    OptionWithInstance {
        /// The offending option name as written in definitions.
        option: &'static str,
        /// The definition kind, lowercase.
        kind: &'static str,
    },

    /// A widget `options` object carried a key that must be a sibling field.
    #[error("Widget options must not contain the '{key}' key")]
    ReservedOptionKey {
        /// The offending key.
        key: String,
    },

    /// The underlying registry rejected the registration.
    #[error(transparent)]
    Registration(#[from] RegistryError),
}
