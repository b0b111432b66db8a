//! Path utilities
//!
//! Relative paths written into output headers always use '/' as separator.

use std::collections::BTreeSet;
use std::path::{Component, Path};

/// Render `path` with '/' separators
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// `path` relative to `root` as a header string, None when outside `root`
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// False if any segment of `path` is exactly one of the blacklisted names
pub fn is_path_allowed(path: &Path, blacklist: &BTreeSet<String>) -> bool {
    !path.components().any(|component| match component {
        Component::Normal(segment) => segment
            .to_str()
            .map(|s| blacklist.contains(s))
            .unwrap_or(false),
        _ => false,
    })
}

/// Directory that receives output files, or None when `base` is a filesystem root
pub fn output_parent(base: &Path) -> Option<&Path> {
    base.parent().filter(|parent| *parent != base)
}
