use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Lists files under `root` as root-relative paths in sorted order, pruning
/// hidden directories and any directory named in `excluded`.
pub fn list_files(root: &Path, excluded: &[String]) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_pruned_dir(entry, root, excluded))
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .ok()
                .map(Path::to_path_buf)
        })
        .collect()
}

fn is_pruned_dir(entry: &DirEntry, root: &Path, excluded: &[String]) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return true;
    }
    let relative = entry
        .path()
        .strip_prefix(root)
        .map(display_path)
        .unwrap_or_default();
    excluded
        .iter()
        .any(|dir| dir.as_str() == name || *dir == relative)
}

/// Reads a file as UTF-8 text. Missing, unreadable, oversized and non-UTF-8
/// files all come back as `None`.
pub fn read_text(path: &Path, max_bytes: u64) -> Option<String> {
    let metadata = std::fs::metadata(path).ok()?;
    if !metadata.is_file() || metadata.len() > max_bytes {
        return None;
    }
    std::fs::read_to_string(path).ok()
}

pub fn display_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
