//! An application-composition framework where building blocks are
//! declaratively registered, lazily resolved, and woven into live markup.
//!

pub use weft_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use weft_internal::prelude::*;
}
