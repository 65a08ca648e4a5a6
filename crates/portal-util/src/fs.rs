use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Walk up from `start` looking for a file named `filename`.
/// Returns the path to the directory containing the file, or `None`.
pub fn find_ancestor_with(start: &Path, filename: &str) -> Option<PathBuf> {
    let mut current = start;
    loop {
        let candidate = current.join(filename);
        if candidate.is_file() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

/// Ensure a directory exists, creating it and any parents if needed.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Copy a file or directory tree from `from` to `to`.
///
/// Every regular file's bytes pass through `process` before being written,
/// so callers can rewrite contents on the way. Returns the written file paths
/// in walk order.
pub fn copy_tree_with<F>(from: &Path, to: &Path, mut process: F) -> std::io::Result<Vec<PathBuf>>
where
    F: FnMut(&Path, Vec<u8>) -> Vec<u8>,
{
    let mut written = Vec::new();
    for entry in WalkDir::new(from).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::other)?;
        let rel = entry
            .path()
            .strip_prefix(from)
            .map_err(std::io::Error::other)?;
        let dest = if rel.as_os_str().is_empty() {
            to.to_path_buf()
        } else {
            to.join(rel)
        };

        if entry.file_type().is_dir() {
            ensure_dir(&dest)?;
            continue;
        }

        if let Some(parent) = dest.parent() {
            ensure_dir(parent)?;
        }
        let data = std::fs::read(entry.path())?;
        std::fs::write(&dest, process(&dest, data))?;
        written.push(dest);
    }
    Ok(written)
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix('~') {
        Some(rest) => home_dir().join(rest.trim_start_matches(['/', '\\'])),
        None => PathBuf::from(path),
    }
}

/// The current user's home directory, falling back to `.`.
pub fn home_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
}
