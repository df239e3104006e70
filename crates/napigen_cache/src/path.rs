use std::path::{Path, PathBuf};

pub const SNAPSHOT_FILE_NAME: &str = "api.json";

pub fn snapshot_path(root: &Path) -> PathBuf {
    root.join(SNAPSHOT_FILE_NAME)
}
