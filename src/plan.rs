//! Rename planning for moves and renumbering.
//!
//! Plans are computed from a built [`Graph`] and never touch it or the disk. Applying
//! a plan (and rebuilding afterwards) is up to the caller; see
//! `workspace::apply_plan`.

use crate::allocator::ChildAllocator;
use crate::error::PlanError;
use crate::identifier::{is_digit, is_valid_identifier, structural_base};
use crate::links::LinkTarget;
use crate::tree::{Graph, Node};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

mod adopt;
mod create;

pub use adopt::{plan_adopt, AdoptOptions, DEFAULT_INBOX};
pub use create::{plan_create, CreatePlan};

/// Rename of one physical path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameOp {
    pub from: PathBuf,
    pub to: PathBuf,
    pub old_identifier: Option<String>,
    pub new_identifier: Option<String>,
    pub display_name: String,
}

/// Ordered renames; earlier ops may move folders that later `from` paths already
/// account for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamePlan {
    pub ops: Vec<RenameOp>,
}

impl RenamePlan {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Link retargets implied by identifier changes, one per logical node.
    pub fn link_changes(&self) -> Vec<(LinkTarget, LinkTarget)> {
        let mut seen = HashSet::new();
        self.ops
            .iter()
            .filter(|op| op.old_identifier != op.new_identifier)
            .map(|op| {
                (
                    LinkTarget::new(op.old_identifier.as_deref(), &op.display_name),
                    LinkTarget::new(op.new_identifier.as_deref(), &op.display_name),
                )
            })
            .filter(|change| seen.insert(change.clone()))
            .collect()
    }
}

/// Plan moving `sources` under `target`.
///
/// When the target carries an identifier each source is given the next free child
/// identifier (keeping its role marker) and its identifier descendants are
/// re-prefixed where they are. Otherwise sources only change folder.
pub fn plan_move(
    graph: &Graph,
    sources: &[PathBuf],
    target: &Path,
) -> Result<RenamePlan, PlanError> {
    let target_node = graph
        .node(target)
        .ok_or_else(|| PlanError::NotFound(target.to_path_buf()))?;
    let destination = destination_folder(graph, target_node);
    let mut allocator = match target_node.identifier {
        Some(_) => Some(ChildAllocator::for_parent(graph, target)?),
        None => None,
    };

    let mut planner = Planner::new(graph);
    for source in sources {
        let node = planner.movable(source)?;
        if node.path == target_node.path || graph.is_ancestor(&node.path, &target_node.path) {
            return Err(PlanError::IntoDescendant(source.clone()));
        }
        if planner.handled.contains(&node.path) {
            continue;
        }

        let new_identifier = match allocator.as_mut() {
            Some(alloc) => Some(with_role(alloc.next_id()?, node)),
            None => node.identifier.clone(),
        };

        planner.rename_node(node, new_identifier.as_deref(), Some(&destination));
        if let (Some(old), Some(new)) = (node.identifier.as_deref(), new_identifier.as_deref()) {
            if old != new {
                planner.renumber_descendants(structural_base(old), structural_base(new))?;
            }
        }
    }

    debug!(
        target = %target.display(),
        sources = sources.len(),
        ops = planner.plan.len(),
        "Planned move"
    );
    planner.finish()
}

/// Plan giving the node at `path` a new identifier and re-prefixing every identifier
/// descendant to match. Nothing changes folder.
///
/// The new identifier must not already be carried by another node, placeholder
/// nodes included.
pub fn plan_renumber(
    graph: &Graph,
    path: &Path,
    new_identifier: &str,
) -> Result<RenamePlan, PlanError> {
    if !is_valid_identifier(new_identifier) {
        return Err(PlanError::InvalidIdentifier(new_identifier.to_string()));
    }
    let mut planner = Planner::new(graph);
    let node = planner.movable(path)?;

    let new_base = structural_base(new_identifier);
    let same_slot = node
        .structural_identifier()
        .map(|old| old.eq_ignore_ascii_case(new_base))
        .unwrap_or(false);
    if !same_slot && identifier_in_use(graph, new_base) {
        return Err(PlanError::IdentifierInUse(new_identifier.to_string()));
    }

    planner.rename_node(node, Some(new_identifier), None);
    if let Some(old) = node.identifier.as_deref() {
        planner.renumber_descendants(structural_base(old), new_base)?;
    }

    debug!(
        path = %path.display(),
        identifier = new_identifier,
        ops = planner.plan.len(),
        "Planned renumber"
    );
    planner.finish()
}

fn identifier_in_use(graph: &Graph, base: &str) -> bool {
    graph.nodes().any(|n| {
        n.structural_identifier()
            .map(|id| id.eq_ignore_ascii_case(base))
            .unwrap_or(false)
    })
}

/// Folder a node filed under `target` ends up in.
fn destination_folder(graph: &Graph, target: &Node) -> PathBuf {
    if target.is_directory {
        return target.path.clone();
    }
    target
        .folder()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| graph.root().to_path_buf())
}

/// `identifier` with the role marker of `node` appended.
fn with_role(mut identifier: String, node: &Node) -> String {
    if let Some(role) = node.role {
        identifier.push(role.marker());
    }
    identifier
}

fn ends_in_digit(identifier: &str) -> bool {
    identifier.chars().last().map(is_digit).unwrap_or(false)
}

struct Planner<'g> {
    graph: &'g Graph,
    plan: RenamePlan,
    /// Folder renames already planned, in order
    relocated: Vec<(PathBuf, PathBuf)>,
    /// Primary paths of nodes already planned
    handled: HashSet<PathBuf>,
}

impl<'g> Planner<'g> {
    fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            plan: RenamePlan::default(),
            relocated: Vec::new(),
            handled: HashSet::new(),
        }
    }

    fn movable(&self, path: &Path) -> Result<&'g Node, PlanError> {
        let node = self
            .graph
            .node(path)
            .ok_or_else(|| PlanError::NotFound(path.to_path_buf()))?;
        if node.path == self.graph.root() {
            return Err(PlanError::Root);
        }
        if node.is_surrogate {
            return Err(PlanError::Surrogate(node.full_name()));
        }
        Ok(node)
    }

    /// The finished plan. Every identifier it hands out must be well formed.
    fn finish(self) -> Result<RenamePlan, PlanError> {
        let invalid = self
            .plan
            .ops
            .iter()
            .filter_map(|op| op.new_identifier.as_deref())
            .find(|id| !is_valid_identifier(id))
            .map(str::to_string);
        if let Some(id) = invalid {
            return Err(PlanError::InvalidIdentifier(id));
        }
        Ok(self.plan)
    }

    /// Where `path` will be once the folder renames planned so far have run.
    fn current_location(&self, path: &Path) -> PathBuf {
        let mut current = path.to_path_buf();
        for (old, new) in &self.relocated {
            if let Ok(rest) = current.strip_prefix(old) {
                current = if rest.as_os_str().is_empty() {
                    new.clone()
                } else {
                    new.join(rest)
                };
            }
        }
        current
    }

    fn rename_node(
        &mut self,
        node: &Node,
        new_identifier: Option<&str>,
        destination: Option<&Path>,
    ) {
        self.handled.insert(node.path.clone());
        let keep_name = node.identifier.as_deref() == new_identifier;

        for physical in node.physical_paths() {
            let from = self.current_location(physical);
            let folder = match destination {
                Some(dest) => self.current_location(dest),
                None => from.parent().map(Path::to_path_buf).unwrap_or_default(),
            };
            let file_name = if keep_name {
                from.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| node.full_name())
            } else {
                compose_file_name(node, new_identifier, &from)
            };
            let to = folder.join(file_name);
            if to == from {
                continue;
            }
            if node.is_directory {
                self.relocated.push((from.clone(), to.clone()));
            }
            self.plan.ops.push(RenameOp {
                from,
                to,
                old_identifier: node.identifier.clone(),
                new_identifier: new_identifier.map(str::to_string),
                display_name: node.display_name.clone(),
            });
        }
    }

    /// Move every real node whose structural identifier extends `old_base` under
    /// `new_base`, where it is.
    fn renumber_descendants(&mut self, old_base: &str, new_base: &str) -> Result<(), PlanError> {
        let graph = self.graph;
        let mut pending: Vec<&'g Node> = graph
            .nodes()
            .filter(|n| !n.is_surrogate && !self.handled.contains(&n.path))
            .filter(|n| {
                n.structural_identifier()
                    .map(|id| id.len() > old_base.len() && id.starts_with(old_base))
                    .unwrap_or(false)
            })
            .collect();
        pending.sort_by(|a, b| a.path.cmp(&b.path));
        self.renumber_level(&pending, old_base, new_base)
    }

    /// One identifier level below `old_base`.
    ///
    /// Suffixes carry over verbatim while both bases end in the same kind of
    /// character. When they differ (`01a01` becoming `02b`) the old suffixes no
    /// longer fit the grammar, so each child slot is reallocated under the new base
    /// in old order and the walk continues one level down.
    fn renumber_level(
        &mut self,
        pending: &[&'g Node],
        old_base: &str,
        new_base: &str,
    ) -> Result<(), PlanError> {
        let keep_suffixes = ends_in_digit(old_base) == ends_in_digit(new_base);
        let width = if ends_in_digit(old_base) { 1 } else { 2 };
        let mut allocator = ChildAllocator::for_identifier(self.graph, new_base);

        let mut slots: BTreeMap<String, Vec<&'g Node>> = BTreeMap::new();
        for &node in pending {
            let slot = node
                .structural_identifier()
                .and_then(|id| id.get(..old_base.len() + width));
            match slot {
                Some(slot) => slots.entry(slot.to_string()).or_default().push(node),
                None => debug!(path = %node.path.display(), "Skipping malformed descendant"),
            }
        }

        for (old_slot, nodes) in slots {
            let new_slot = if keep_suffixes {
                format!("{}{}", new_base, &old_slot[old_base.len()..])
            } else {
                allocator.next_id()?
            };
            let (here, deeper): (Vec<&'g Node>, Vec<&'g Node>) = nodes
                .into_iter()
                .partition(|n| n.structural_identifier() == Some(old_slot.as_str()));
            for node in here {
                let renamed = with_role(new_slot.clone(), node);
                self.rename_node(node, Some(&renamed), None);
            }
            if !deeper.is_empty() {
                self.renumber_level(&deeper, &old_slot, &new_slot)?;
            }
        }
        Ok(())
    }
}

fn compose_file_name(node: &Node, identifier: Option<&str>, from: &Path) -> String {
    let stem = match identifier {
        Some(id) => format!("{} {}", id, node.display_name),
        None => node.display_name.clone(),
    };
    if node.is_directory {
        return stem;
    }
    match from.extension() {
        Some(ext) => format!("{}.{}", stem, ext.to_string_lossy()),
        None => stem,
    }
}
