//! Typed intermediate model of an annotated native API.
//!
//! The scanner fills [`ApiClass`] entries in declaration order; [`ApiModel`]
//! freezes them together with a content hash that only depends on what the
//! API surface looks like, never on the order it was declared in.

pub mod hash;
pub mod ordered;
pub mod types;

pub use hash::{HashError, content_hash};
pub use ordered::{Keyed, OrderedMap};
pub use types::{ApiArgument, ApiClass, ApiFunction, ApiModel, ClassKind};
