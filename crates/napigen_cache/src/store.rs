use std::path::{Path, PathBuf};

use anyhow::Result;
use napigen_model::ApiModel;
use napigen_utils::write_atomic;
use tracing::{debug, warn};

use crate::path::snapshot_path;
use crate::snapshot::{ModelSnapshot, StoredSnapshot};

/// How a model compares to the snapshot already on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotChange {
    /// No readable snapshot existed.
    Created,
    Unchanged,
    Changed { previous: String },
}

impl SnapshotChange {
    /// Classifies `model` against `previous`, the snapshot read back from disk.
    pub fn between(previous: Option<&StoredSnapshot>, model: &ApiModel) -> Self {
        match previous {
            None => Self::Created,
            Some(stored) if stored.hash == model.content_hash() => Self::Unchanged,
            Some(stored) => Self::Changed {
                previous: stored.hash.clone(),
            },
        }
    }

    pub fn is_changed(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Owns the `api.json` snapshot inside one output directory.
///
/// Only one generator may write a given directory at a time; the store does no
/// locking of its own.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            path: snapshot_path(root.as_ref()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lookup(&self) -> Result<Option<StoredSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        StoredSnapshot::read_from_json(&self.path).map(Some)
    }

    /// Rewrites the snapshot with `model` and reports what changed. An
    /// unreadable previous snapshot is replaced rather than treated as fatal.
    pub fn store(&self, model: &ApiModel) -> Result<SnapshotChange> {
        let previous = self.lookup().unwrap_or_else(|err| {
            warn!(path = %self.path.display(), "discarding unreadable api snapshot: {err:#}");
            None
        });
        let change = SnapshotChange::between(previous.as_ref(), model);

        let json = ModelSnapshot::of(model).to_json()?;
        write_atomic(&self.path, &json)?;
        debug!(path = %self.path.display(), ?change, "api snapshot stored");

        Ok(change)
    }
}
