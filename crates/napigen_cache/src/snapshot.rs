use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use napigen_model::{ApiClass, ApiModel, OrderedMap};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Borrowed view of a model in its on-disk shape: `{hash, classes}`.
#[derive(Debug, Serialize)]
pub struct ModelSnapshot<'a> {
    pub hash: &'a str,
    pub classes: &'a OrderedMap<ApiClass>,
}

impl<'a> ModelSnapshot<'a> {
    pub fn of(model: &'a ApiModel) -> Self {
        Self {
            hash: model.content_hash(),
            classes: model.classes(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialise api snapshot")
    }
}

/// A snapshot read back from disk. Classes are kept untyped: readers only need
/// the hash and the class names.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredSnapshot {
    pub hash: String,
    #[serde(default)]
    pub classes: Map<String, Value>,
}

impl StoredSnapshot {
    pub fn read_from_json(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open api snapshot {}", path.display()))?;
        serde_json::from_reader(file)
            .with_context(|| format!("failed to deserialise api snapshot {}", path.display()))
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Classes that `model` adds to or removes from this snapshot.
    pub fn class_diff(&self, model: &ApiModel) -> ClassDiff {
        let current = model.classes();
        ClassDiff {
            added: current
                .keys()
                .filter(|name| !self.classes.contains_key(*name))
                .map(str::to_string)
                .collect(),
            removed: self
                .class_names()
                .filter(|name| current.get(name).is_none())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Class names present on one side of a snapshot comparison only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl ClassDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}
