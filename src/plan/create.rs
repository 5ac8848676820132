//! Planning a new note under a parent.

use super::destination_folder;
use crate::allocator::ChildAllocator;
use crate::error::PlanError;
use crate::tree::Graph;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

/// Where a new note goes and what it is called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePlan {
    pub path: PathBuf,
    pub identifier: String,
    pub display_name: String,
}

/// Plan a note named `display_name` as the next child of the node at `parent`.
///
/// The file lands inside `parent` when it is a folder, next to it otherwise (at the
/// root for placeholder parents). `extension` is given without the dot; `None` or
/// an empty string creates a file without one.
pub fn plan_create(
    graph: &Graph,
    parent: &Path,
    display_name: &str,
    extension: Option<&str>,
) -> Result<CreatePlan, PlanError> {
    let parent_node = graph
        .node(parent)
        .ok_or_else(|| PlanError::NotFound(parent.to_path_buf()))?;

    let display_name: String = display_name.trim().nfc().collect();
    if display_name.is_empty() || display_name.contains(['/', '\\']) {
        return Err(PlanError::InvalidName(display_name));
    }

    let identifier = ChildAllocator::for_parent(graph, parent)?.next_id()?;
    let mut file_name = format!("{} {}", identifier, display_name);
    if let Some(ext) = extension.map(|e| e.trim_start_matches('.')).filter(|e| !e.is_empty()) {
        file_name.push('.');
        file_name.push_str(ext);
    }
    let path = destination_folder(graph, parent_node).join(file_name);

    debug!(parent = %parent.display(), path = %path.display(), "Planned new note");
    Ok(CreatePlan {
        path,
        identifier,
        display_name,
    })
}
