use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Rewrites `\r\n` and lone `\r` line endings as `\n`.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Writes `contents` next to `path` first and renames it into place, so
/// readers never observe a half-written file. Parent directories are created.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, contents)
        .with_context(|| format!("failed to write {}", temp_path.display()))?;
    fs::rename(&temp_path, path).with_context(|| {
        format!(
            "failed to move {} into place at {}",
            temp_path.display(),
            path.display()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::{normalize_line_endings, read_text, write_atomic};

    #[test]
    fn normalizes_every_line_ending_style() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn atomic_write_creates_parents_and_leaves_no_temp_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let target = dir.path().join("nested").join("out.txt");

        write_atomic(&target, "first")?;
        write_atomic(&target, "second")?;

        assert_eq!(read_text(&target)?, "second");
        assert!(!dir.path().join("nested").join("out.txt.tmp").exists());
        Ok(())
    }
}
