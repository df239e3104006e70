//! Durable snapshot of the last generated API model, used to tell whether a
//! regeneration actually changed the public surface.

pub mod path;
pub mod snapshot;
pub mod store;

pub use snapshot::{ClassDiff, ModelSnapshot, StoredSnapshot};
pub use store::{SnapshotChange, SnapshotStore};
