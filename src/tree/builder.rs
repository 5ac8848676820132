//! Hierarchy construction from a flat entry list.
//!
//! Two passes over the path-sorted entries:
//!
//! 1. materialize logical nodes, merging files that share display name and identifier;
//! 2. attach each node, preferring identifier ancestry over folder ancestry, and
//!    synthesizing surrogates for ancestor identifiers nothing carries.

use super::entry::{parse_entry_name, Entry};
use super::graph::Graph;
use super::ignore::IgnoreMatcher;
use super::node::Node;
use crate::identifier::{is_valid_identifier, parent_of};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

/// Builds a fresh [`Graph`] from entries on every call.
#[derive(Debug, Clone)]
pub struct HierarchyBuilder {
    root: PathBuf,
    ignore: IgnoreMatcher,
}

/// Node waiting for attachment, with the physical folder of its first entry.
struct Pending {
    slot: usize,
    folder: PathBuf,
}

/// Lookup tables filled while materializing nodes.
#[derive(Default)]
struct Indexes {
    /// (display name, identifier) -> file node
    merge: HashMap<(String, Option<String>), usize>,
    /// identifier -> first node carrying it, in path order
    identifier: HashMap<String, usize>,
}

impl HierarchyBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignore: IgnoreMatcher::empty(),
        }
    }

    pub fn with_ignore_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignore = IgnoreMatcher::new(patterns);
        self
    }

    pub fn with_ignore_matcher(mut self, matcher: IgnoreMatcher) -> Self {
        self.ignore = matcher;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ignore(&self) -> &IgnoreMatcher {
        &self.ignore
    }

    /// Build the hierarchy. Never fails; bad names degrade to plain names.
    pub fn build(&self, entries: &[Entry]) -> Graph {
        let mut graph = Graph::new(&self.root);

        let mut kept: Vec<&Entry> = entries
            .iter()
            .filter(|e| e.path != self.root)
            .filter(|e| {
                let ignored = self.ignore.is_match(&e.path);
                if ignored {
                    trace!(path = %e.path.display(), "Ignored by pattern");
                }
                !ignored
            })
            .collect();
        kept.sort_by(|a, b| a.path.cmp(&b.path));

        let mut indexes = Indexes::default();
        let pending = materialize(&mut graph, &mut indexes, &kept);

        let mut visited: HashSet<String> = HashSet::new();
        for item in &pending {
            attach(
                &mut graph,
                &mut indexes.identifier,
                &mut visited,
                item.slot,
                Some(&item.folder),
            );
        }

        info!(
            root = %self.root.display(),
            entries = entries.len(),
            ignored = entries.len() - kept.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            surrogates = graph.surrogates().count(),
            "Built hierarchy"
        );
        graph
    }
}

/// Build with a one-off builder.
pub fn build<S: AsRef<str>>(
    root: impl Into<PathBuf>,
    entries: &[Entry],
    ignore_patterns: &[S],
) -> Graph {
    HierarchyBuilder::new(root)
        .with_ignore_patterns(ignore_patterns)
        .build(entries)
}

fn materialize(graph: &mut Graph, indexes: &mut Indexes, entries: &[&Entry]) -> Vec<Pending> {
    let mut pending = Vec::with_capacity(entries.len());

    for entry in entries {
        if graph.contains(&entry.path) {
            warn!(path = %entry.path.display(), "Duplicate entry path; keeping the first");
            continue;
        }

        let parsed = parse_entry_name(&entry.base_name());

        if !entry.is_directory {
            let key = (parsed.display_name.clone(), parsed.identifier.clone());
            if let Some(&slot) = indexes.merge.get(&key) {
                graph.node_at_mut(slot).absorb(entry);
                graph.alias(&entry.path, slot);
                debug!(
                    path = %entry.path.display(),
                    into = %graph.node_at(slot).path.display(),
                    "Merged into existing node"
                );
                continue;
            }
            let identifier = parsed.identifier.clone();
            let slot = graph.insert(Node::from_entry(entry, parsed));
            indexes.merge.insert(key, slot);
            if let Some(id) = identifier {
                indexes.identifier.entry(id).or_insert(slot);
            }
            pending.push(Pending {
                slot,
                folder: entry.parent.clone(),
            });
        } else {
            let identifier = parsed.identifier.clone();
            let slot = graph.insert(Node::from_entry(entry, parsed));
            if let Some(id) = identifier {
                indexes.identifier.entry(id).or_insert(slot);
            }
            pending.push(Pending {
                slot,
                folder: entry.parent.clone(),
            });
        }
    }

    pending
}

/// Attach the node at `slot`. `visited` holds the identifiers already placed by
/// identifier in this pass; a second node with the same identifier falls back to
/// folder placement.
fn attach(
    graph: &mut Graph,
    by_identifier: &mut HashMap<String, usize>,
    visited: &mut HashSet<String>,
    slot: usize,
    folder: Option<&Path>,
) {
    let node = graph.node_at(slot);
    let path = node.path.clone();
    let identifier = node.identifier.clone();
    let mut linked = false;

    if let Some(id) = identifier {
        if !visited.insert(id.clone()) {
            warn!(
                identifier = %id,
                path = %path.display(),
                "Identifier already placed in this build; placing by folder instead"
            );
        } else if let Some(parent_id) = parent_of(&id) {
            if let Some(parent) = resolve_parent(graph, by_identifier, visited, parent_id, folder) {
                if graph.would_cycle(parent, slot) {
                    warn!(
                        identifier = %id,
                        parent = %graph.node_at(parent).path.display(),
                        "Identifier parent is a descendant of this node; ignoring identifier edge"
                    );
                } else {
                    linked = graph.link(parent, slot);
                    trace!(path = %path.display(), parent = parent_id, "Attached by identifier");
                }
            }
        }
    }

    if !linked {
        if let Some(folder) = folder.filter(|f| *f != graph.root()) {
            match graph.slot(folder) {
                Some(folder_slot) if !graph.would_cycle(folder_slot, slot) => {
                    linked = graph.link(folder_slot, slot);
                    trace!(
                        path = %path.display(),
                        folder = %folder.display(),
                        "Attached by folder"
                    );
                }
                Some(_) => {
                    warn!(path = %path.display(), "Folder placement would close a cycle");
                }
                None => {
                    debug!(
                        path = %path.display(),
                        folder = %folder.display(),
                        "Folder is not part of the graph; placing at root"
                    );
                }
            }
        }
    }

    if !linked && !graph.is_attached(slot) {
        graph.link(0, slot);
        trace!(path = %path.display(), "Attached at root");
    }
}

/// Node that should parent a child whose identifier's parent is `parent_id`,
/// synthesizing (and attaching) a surrogate chain when no node carries it.
fn resolve_parent(
    graph: &mut Graph,
    by_identifier: &mut HashMap<String, usize>,
    visited: &mut HashSet<String>,
    parent_id: &str,
    folder: Option<&Path>,
) -> Option<usize> {
    if let Some(folder_slot) = folder.and_then(|f| graph.slot(f)) {
        if graph.node_at(folder_slot).identifier.as_deref() == Some(parent_id) {
            return Some(folder_slot);
        }
    }

    if let Some(&slot) = by_identifier.get(parent_id) {
        return Some(slot);
    }

    if !is_valid_identifier(parent_id) {
        return None;
    }

    let slot = graph.insert(Node::surrogate(parent_id));
    by_identifier.insert(parent_id.to_string(), slot);
    debug!(identifier = parent_id, "Synthesized surrogate ancestor");
    attach(graph, by_identifier, visited, slot, None);
    Some(slot)
}
