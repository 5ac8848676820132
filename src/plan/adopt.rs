//! Adoption of untagged and duplicate-numbered notes.
//!
//! Two passes over a built graph, both producing plain renames:
//!
//! 1. Files sharing an identifier: the oldest keeps it, every later one gets the next
//!    free identifier under the same parent.
//! 2. Files without an identifier: inside an identified folder they get the next
//!    identifier under that folder and stay put; anywhere else they move into the
//!    inbox folder under the root with the next identifier under the inbox. Hidden
//!    files (a leading `.`) are left alone.

use super::{with_role, Planner, RenamePlan};
use crate::allocator::ChildAllocator;
use crate::error::PlanError;
use crate::identifier::{parent_of, structural_base};
use crate::tree::{parse_entry_name, Graph, Node};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::{debug, info};

/// Inbox folder name used when none is configured.
pub const DEFAULT_INBOX: &str = "00 Inbox";

/// Inputs to [`plan_adopt`] that do not come from the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdoptOptions {
    /// Folder under the root for notes outside any identified folder. Its name must
    /// start with an identifier.
    pub inbox: String,
    /// Creation time per physical path. Paths missing here count as newest, ties
    /// fall back to path order.
    pub created: HashMap<PathBuf, SystemTime>,
}

impl Default for AdoptOptions {
    fn default() -> Self {
        Self {
            inbox: DEFAULT_INBOX.to_string(),
            created: HashMap::new(),
        }
    }
}

/// Plan identifiers for every untagged file and every duplicate-numbered file.
pub fn plan_adopt(graph: &Graph, options: &AdoptOptions) -> Result<RenamePlan, PlanError> {
    let inbox_identifier = parse_entry_name(&options.inbox)
        .identifier
        .ok_or_else(|| PlanError::InvalidIdentifier(options.inbox.clone()))?;

    let mut adoption = Adoption {
        planner: Planner::new(graph),
        allocators: HashMap::new(),
    };
    let duplicates = adoption.separate_duplicates(options)?;
    let untagged = adoption.adopt_untagged(options, &inbox_identifier)?;

    info!(duplicates, untagged, "Planned adoption");
    adoption.planner.finish()
}

struct Adoption<'g> {
    planner: Planner<'g>,
    /// One allocator per base, so ids handed out earlier stay taken
    allocators: HashMap<String, ChildAllocator>,
}

impl<'g> Adoption<'g> {
    fn next_id(&mut self, base: &str) -> Result<String, PlanError> {
        let graph = self.planner.graph;
        let allocator = self
            .allocators
            .entry(base.to_string())
            .or_insert_with(|| ChildAllocator::for_identifier(graph, base));
        Ok(allocator.next_id()?)
    }

    fn separate_duplicates(&mut self, options: &AdoptOptions) -> Result<usize, PlanError> {
        let graph = self.planner.graph;
        let mut groups: BTreeMap<&'g str, Vec<&'g Node>> = BTreeMap::new();
        for node in graph.nodes().filter(|n| is_plain_file(n)) {
            if let Some(id) = node.identifier.as_deref() {
                groups.entry(id).or_default().push(node);
            }
        }

        let mut renamed = 0;
        for (identifier, mut nodes) in groups.into_iter().filter(|(_, n)| n.len() > 1) {
            nodes.sort_by_key(|n| {
                let created = created_at(n, options);
                (created.is_none(), created, n.path.clone())
            });
            let base = parent_of(structural_base(identifier)).unwrap_or_default().to_string();
            debug!(
                identifier,
                keeper = %nodes[0].path.display(),
                copies = nodes.len() - 1,
                "Separating duplicate identifier"
            );
            for node in nodes.into_iter().skip(1) {
                let fresh = with_role(self.next_id(&base)?, node);
                self.planner.rename_node(node, Some(&fresh), None);
                renamed += 1;
            }
        }
        Ok(renamed)
    }

    fn adopt_untagged(
        &mut self,
        options: &AdoptOptions,
        inbox_identifier: &str,
    ) -> Result<usize, PlanError> {
        let graph = self.planner.graph;
        let inbox = graph.root().join(&options.inbox);
        let mut untagged: Vec<&'g Node> = graph
            .nodes()
            .filter(|n| is_plain_file(n) && n.identifier.is_none() && !is_hidden(n))
            .filter(|n| !self.planner.handled.contains(&n.path))
            .collect();
        untagged.sort_by(|a, b| a.path.cmp(&b.path));

        for node in &untagged {
            let folder_identifier = node
                .folder()
                .and_then(|folder| graph.node(folder))
                .filter(|folder| folder.is_directory)
                .and_then(Node::structural_identifier);
            match folder_identifier {
                Some(base) => {
                    let fresh = self.next_id(base)?;
                    self.planner.rename_node(node, Some(&fresh), None);
                }
                None => {
                    let fresh = self.next_id(structural_base(inbox_identifier))?;
                    self.planner.rename_node(node, Some(&fresh), Some(&inbox));
                }
            }
        }
        Ok(untagged.len())
    }
}

fn is_plain_file(node: &Node) -> bool {
    !node.is_directory && !node.is_surrogate
}

fn is_hidden(node: &Node) -> bool {
    node.path
        .file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// Earliest known creation time over every physical path of `node`.
fn created_at(node: &Node, options: &AdoptOptions) -> Option<SystemTime> {
    node.physical_paths()
        .filter_map(|path| options.created.get(path))
        .min()
        .copied()
}
