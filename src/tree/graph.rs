//! The hierarchy graph produced by one build.

use super::node::Node;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Immutable forest of logical nodes under a root sentinel.
///
/// Nodes live in an arena; every physical path (plus surrogate keys and the root)
/// indexes into it, so merged files resolve to the same node. Edges are recorded
/// between primary paths only.
#[derive(Debug, Clone)]
pub struct Graph {
    root: PathBuf,
    arena: Vec<Node>,
    index: BTreeMap<PathBuf, usize>,
    edges: BTreeMap<PathBuf, BTreeSet<PathBuf>>,
    parents: BTreeMap<PathBuf, PathBuf>,
}

/// Serializable view of a graph: node data keyed by primary path plus edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub root: PathBuf,
    pub nodes: BTreeMap<PathBuf, Node>,
    pub edges: BTreeMap<PathBuf, BTreeSet<PathBuf>>,
}

impl Graph {
    pub(crate) fn new(root: &Path) -> Self {
        let mut graph = Self {
            root: root.to_path_buf(),
            arena: Vec::new(),
            index: BTreeMap::new(),
            edges: BTreeMap::new(),
            parents: BTreeMap::new(),
        };
        graph.insert(Node::root(root));
        graph
    }

    // --- construction (builder only) ---

    pub(crate) fn insert(&mut self, node: Node) -> usize {
        let slot = self.arena.len();
        self.index.insert(node.path.clone(), slot);
        self.edges.entry(node.path.clone()).or_default();
        self.arena.push(node);
        slot
    }

    pub(crate) fn alias(&mut self, path: &Path, slot: usize) {
        self.index.insert(path.to_path_buf(), slot);
    }

    pub(crate) fn slot(&self, path: &Path) -> Option<usize> {
        self.index.get(path).copied()
    }

    pub(crate) fn node_at(&self, slot: usize) -> &Node {
        &self.arena[slot]
    }

    pub(crate) fn node_at_mut(&mut self, slot: usize) -> &mut Node {
        &mut self.arena[slot]
    }

    pub(crate) fn is_attached(&self, slot: usize) -> bool {
        self.parents.contains_key(&self.arena[slot].path)
    }

    /// Would `parent -> child` close a cycle.
    pub(crate) fn would_cycle(&self, parent: usize, child: usize) -> bool {
        let child_path = &self.arena[child].path;
        let mut current = &self.arena[parent].path;
        loop {
            if current == child_path {
                return true;
            }
            match self.parents.get(current) {
                Some(next) => current = next,
                None => return false,
            }
        }
    }

    /// Record `parent -> child`. A child keeps its first parent.
    pub(crate) fn link(&mut self, parent: usize, child: usize) -> bool {
        let parent_path = self.arena[parent].path.clone();
        let child_path = self.arena[child].path.clone();
        if let Some(existing) = self.parents.get(&child_path) {
            warn!(
                child = %child_path.display(),
                parent = %existing.display(),
                "Node already attached; keeping first parent"
            );
            return false;
        }
        self.edges
            .entry(parent_path.clone())
            .or_default()
            .insert(child_path.clone());
        self.parents.insert(child_path, parent_path);
        true
    }

    // --- queries ---

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn root_node(&self) -> &Node {
        &self.arena[0]
    }

    /// Node for any physical path, alias, surrogate key, or the root.
    pub fn node(&self, path: &Path) -> Option<&Node> {
        self.slot(path).map(|slot| &self.arena[slot])
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.index.contains_key(path)
    }

    /// Each logical node once, in creation order (root first).
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.arena.iter()
    }

    /// Every key known to the graph (physical paths, aliases, surrogate keys, root).
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.index.keys().map(PathBuf::as_path)
    }

    /// Parent primary path to child primary paths.
    pub fn edges(&self) -> &BTreeMap<PathBuf, BTreeSet<PathBuf>> {
        &self.edges
    }

    /// Primary paths of the children of the node at `path`.
    pub fn child_paths(&self, path: &Path) -> Option<&BTreeSet<PathBuf>> {
        let node = self.node(path)?;
        self.edges.get(&node.path)
    }

    /// Children of the node at `path`, in path order.
    pub fn children<'a>(&'a self, path: &Path) -> impl Iterator<Item = &'a Node> + 'a {
        self.child_paths(path)
            .into_iter()
            .flatten()
            .filter_map(move |child| self.node(child))
    }

    /// Parent of the node at `path`; `None` for the root and unknown paths.
    pub fn parent(&self, path: &Path) -> Option<&Node> {
        let node = self.node(path)?;
        self.parents.get(&node.path).and_then(|p| self.node(p))
    }

    /// Nodes from the parent of `path` up to the root, nearest first.
    pub fn ancestors(&self, path: &Path) -> Vec<&Node> {
        let mut chain = Vec::new();
        let mut current = self.parent(path);
        while let Some(node) = current {
            chain.push(node);
            current = self.parent(&node.path);
        }
        chain
    }

    /// All nodes below `path`, depth-first pre-order, excluding `path` itself.
    pub fn descendants(&self, path: &Path) -> Vec<&Node> {
        let mut out = Vec::new();
        let mut stack: Vec<&Node> = self.children(path).collect();
        stack.reverse();
        while let Some(node) = stack.pop() {
            out.push(node);
            let mut next: Vec<&Node> = self.children(&node.path).collect();
            next.reverse();
            stack.extend(next);
        }
        out
    }

    /// Is `ancestor` a strict ancestor of `path`.
    pub fn is_ancestor(&self, ancestor: &Path, path: &Path) -> bool {
        let Some(target) = self.node(ancestor) else {
            return false;
        };
        self.ancestors(path).iter().any(|n| n.path == target.path)
    }

    /// First node (in path order) carrying exactly `identifier`.
    pub fn find_by_identifier(&self, identifier: &str) -> Option<&Node> {
        self.arena
            .iter()
            .filter(|n| n.identifier.as_deref() == Some(identifier))
            .min_by(|a, b| a.path.cmp(&b.path))
    }

    pub fn surrogates(&self) -> impl Iterator<Item = &Node> {
        self.arena.iter().filter(|n| n.is_surrogate)
    }

    /// Number of logical nodes, root included.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn edge_count(&self) -> usize {
        self.parents.len()
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            root: self.root.clone(),
            nodes: self
                .arena
                .iter()
                .map(|n| (n.path.clone(), n.clone()))
                .collect(),
            edges: self.edges.clone(),
        }
    }
}
