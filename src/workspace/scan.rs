//! File-store scanning: walk a workspace root into engine entries.

use crate::error::StorageError;
use crate::tree::{Entry, Graph};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// What the scanner keeps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Lowercased extensions without the dot; empty keeps every file
    pub extensions: Vec<String>,
    pub follow_symlinks: bool,
}

impl ScanOptions {
    pub fn with_extensions<S: AsRef<str>>(extensions: &[S]) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|e| e.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
            follow_symlinks: false,
        }
    }

    /// Directories are always kept; files only when their extension is wanted.
    pub fn accepts(&self, extension: Option<&str>) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        extension
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}

/// Canonical form of a workspace root, without the `\\?\` prefix on Windows.
pub fn canonical_root(root: &Path) -> Result<PathBuf, StorageError> {
    let canonical = dunce::canonicalize(root)?;
    if !canonical.is_dir() {
        return Err(StorageError::InvalidPath(format!(
            "workspace root is not a directory: {}",
            canonical.display()
        )));
    }
    Ok(canonical)
}

/// Walk everything below `root` (the root itself excluded) into entries, sorted by
/// path. Unreadable subtrees are logged and skipped; an unreadable root is an error.
pub fn scan_entries(root: &Path, options: &ScanOptions) -> Result<Vec<Entry>, StorageError> {
    let root = canonical_root(root)?;
    let mut entries = Vec::new();
    let mut skipped = 0usize;

    let walker = WalkDir::new(&root)
        .min_depth(1)
        .follow_links(options.follow_symlinks)
        .sort_by_file_name();

    for result in walker {
        let dir_entry = match result {
            Ok(entry) => entry,
            Err(e) if e.depth() > 0 => {
                warn!(error = %e, "Skipping unreadable path");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let path = dir_entry.path().to_path_buf();
        let parent = path.parent().map(Path::to_path_buf).unwrap_or_else(|| root.clone());

        if dir_entry.file_type().is_dir() {
            entries.push(Entry::directory(path, parent));
            continue;
        }
        let extension = path.extension().map(|e| e.to_string_lossy().into_owned());
        if !options.accepts(extension.as_deref()) {
            skipped += 1;
            continue;
        }
        entries.push(Entry::file(path, parent, extension.as_deref()));
    }

    debug!(
        root = %root.display(),
        entries = entries.len(),
        skipped,
        "Scanned workspace"
    );
    Ok(entries)
}

/// Creation time of every physical file in `graph`, falling back to the modification
/// time where the platform does not record creation. Unreadable files are left out.
pub fn creation_times(graph: &Graph) -> HashMap<PathBuf, SystemTime> {
    graph
        .nodes()
        .filter(|node| !node.is_directory)
        .flat_map(|node| node.physical_paths())
        .filter_map(|path| {
            let metadata = std::fs::metadata(path).ok()?;
            let time = metadata.created().or_else(|_| metadata.modified()).ok()?;
            Some((path.clone(), time))
        })
        .collect()
}
