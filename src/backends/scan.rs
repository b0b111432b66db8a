//! Folder enumeration
//!
//! Walks a source folder with walkdir (or the ignore crate when ignore files are
//! honoured) and returns the files that survive the extension and blacklist
//! policy, sorted for stable output.

use ignore::WalkBuilder;
use log::{debug, trace, warn};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::config::{CollateConfig, ExtensionSet};
use crate::core::error::CollateError;
use crate::core::paths::is_path_allowed;

/// What a file must satisfy to be collated
#[derive(Debug, Clone, Copy)]
pub struct ScanPolicy<'a> {
    pub extensions: &'a ExtensionSet,
    pub blacklist: &'a BTreeSet<String>,
    pub respect_ignore_files: bool,
}

impl<'a> ScanPolicy<'a> {
    pub fn from_config(config: &'a CollateConfig) -> Self {
        Self {
            extensions: &config.extensions,
            blacklist: &config.blacklist,
            respect_ignore_files: config.respect_ignore_files,
        }
    }

    /// Extension and blacklist check for a path relative to the source folder
    pub fn accepts(&self, relative: &Path) -> bool {
        let ext_ok = relative
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.matches(e))
            .unwrap_or(false);

        ext_ok && is_path_allowed(relative, self.blacklist)
    }
}

/// Recursively collect candidate files under `source`, sorted by path
///
/// `source` must be an existing directory. Unreadable entries below it are
/// logged and skipped; an unreadable `source` is an error.
pub fn collect_candidates(
    source: &Path,
    policy: &ScanPolicy<'_>,
) -> Result<Vec<PathBuf>, CollateError> {
    fs::read_dir(source).map_err(|e| CollateError::Walk {
        path: source.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut files = if policy.respect_ignore_files {
        walk_with_ignore_files(source, policy)
    } else {
        walk_plain(source, policy)
    };

    files.sort();
    debug!(
        "Found {} candidate(s) under {}",
        files.len(),
        source.display()
    );
    Ok(files)
}

fn walk_plain(source: &Path, policy: &ScanPolicy<'_>) -> Vec<PathBuf> {
    let blacklist = policy.blacklist;
    let walker = WalkDir::new(source)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            let keep = entry.depth() == 0 || !is_blacklisted_name(entry.file_name(), blacklist);
            if !keep {
                debug!("Skipping blacklisted path {}", entry.path().display());
            }
            keep
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Cannot access path while scanning: {}", e);
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }
        if let Some(path) = accept(source, entry.path(), policy) {
            files.push(path);
        }
    }
    files
}

fn walk_with_ignore_files(source: &Path, policy: &ScanPolicy<'_>) -> Vec<PathBuf> {
    let blacklist = policy.blacklist.clone();
    let mut builder = WalkBuilder::new(source);
    builder
        .hidden(false)
        .ignore(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .require_git(false)
        .follow_links(false)
        .filter_entry(move |entry| {
            entry.depth() == 0 || !is_blacklisted_name(entry.file_name(), &blacklist)
        });

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Cannot access path while scanning: {}", e);
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }
        if let Some(path) = accept(source, entry.path(), policy) {
            files.push(path);
        }
    }
    files
}

fn is_blacklisted_name(name: &std::ffi::OsStr, blacklist: &BTreeSet<String>) -> bool {
    name.to_str().map(|n| blacklist.contains(n)).unwrap_or(false)
}

/// Regular files only; symlinks are resolved so a link to a file counts
fn accept(source: &Path, path: &Path, policy: &ScanPolicy<'_>) -> Option<PathBuf> {
    if !path.is_file() {
        return None;
    }
    let relative = path.strip_prefix(source).ok()?;
    if policy.accepts(relative) {
        trace!("Candidate {}", path.display());
        Some(path.to_path_buf())
    } else {
        None
    }
}
