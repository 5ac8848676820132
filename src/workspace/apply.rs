//! Executing rename and create plans on disk.

use crate::error::StorageError;
use crate::links::{rewrite_all_links, should_rewrite};
use crate::plan::{CreatePlan, RenamePlan};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// What [`apply_plan`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub renamed: Vec<(PathBuf, PathBuf)>,
    /// Files whose wiki links were rewritten, with the number of links changed
    pub rewritten: Vec<(PathBuf, usize)>,
}

/// Perform the renames of `plan` in order, then rewrite wiki links in every linked
/// text file below `root`.
///
/// A rename that would overwrite an existing path, or that fails, stops the run and
/// undoes the renames already done, newest first, before the error is returned.
pub fn apply_plan(root: &Path, plan: &RenamePlan) -> Result<ApplyReport, StorageError> {
    let mut report = ApplyReport::default();

    for op in &plan.ops {
        if let Err(e) = rename_one(&op.from, &op.to) {
            roll_back(&report.renamed);
            return Err(e);
        }
        debug!(from = %op.from.display(), to = %op.to.display(), "Renamed");
        report.renamed.push((op.from.clone(), op.to.clone()));
    }

    let changes = plan.link_changes();
    if !changes.is_empty() {
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable path during link rewrite");
                    continue;
                }
            };
            let path = entry.path();
            let linked = entry.file_type().is_file()
                && path
                    .extension()
                    .map(|ext| should_rewrite(&ext.to_string_lossy()))
                    .unwrap_or(false);
            if !linked {
                continue;
            }
            let Ok(content) = fs::read_to_string(path) else {
                debug!(path = %path.display(), "Skipping non-UTF-8 file");
                continue;
            };
            let (updated, count) = rewrite_all_links(&content, &changes);
            if count > 0 {
                fs::write(path, updated)?;
                report.rewritten.push((path.to_path_buf(), count));
            }
        }
    }

    info!(
        renamed = report.renamed.len(),
        rewritten = report.rewritten.len(),
        "Applied rename plan"
    );
    Ok(report)
}

fn rename_one(from: &Path, to: &Path) -> Result<(), StorageError> {
    if to.exists() {
        return Err(StorageError::InvalidPath(format!(
            "refusing to overwrite existing path: {}",
            to.display()
        )));
    }
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::rename(from, to)?;
    Ok(())
}

fn roll_back(done: &[(PathBuf, PathBuf)]) {
    for (from, to) in done.iter().rev() {
        match fs::rename(to, from) {
            Ok(()) => debug!(from = %to.display(), to = %from.display(), "Rolled back"),
            Err(e) => warn!(
                path = %to.display(),
                original = %from.display(),
                error = %e,
                "Could not roll back rename"
            ),
        }
    }
}

/// Create the empty file planned by `plan`, and any missing folders above it.
/// Never overwrites.
pub fn create_note(plan: &CreatePlan) -> Result<PathBuf, StorageError> {
    if let Some(parent) = plan.path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&plan.path)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => StorageError::InvalidPath(format!(
                "refusing to overwrite existing path: {}",
                plan.path.display()
            )),
            _ => StorageError::IoError(e),
        })?;
    info!(path = %plan.path.display(), identifier = %plan.identifier, "Created note");
    Ok(plan.path.clone())
}
