//! Report types shared by the command layer and formatters.

use crate::identifier::{
    ancestors_of, depth, is_valid_identifier, parent_of, role_of, structural_base, Role,
};
use crate::tree::Graph;
use serde::{Deserialize, Serialize};

/// Counts describing one built hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyStatus {
    pub root: String,
    pub nodes: usize,
    pub edges: usize,
    pub files: usize,
    pub directories: usize,
    pub surrogates: usize,
    /// Nodes with more than one physical file
    pub merged: usize,
    pub with_identifier: usize,
}

impl HierarchyStatus {
    pub fn from_graph(graph: &Graph) -> Self {
        let mut status = Self {
            root: graph.root().display().to_string(),
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            files: 0,
            directories: 0,
            surrogates: 0,
            merged: 0,
            with_identifier: 0,
        };
        for node in graph.nodes().filter(|n| n.path != graph.root()) {
            if node.is_surrogate {
                status.surrogates += 1;
            } else if node.is_directory {
                status.directories += 1;
            } else {
                status.files += node.paths.len();
                if node.paths.len() > 1 {
                    status.merged += 1;
                }
            }
            if node.identifier.is_some() {
                status.with_identifier += 1;
            }
        }
        status
    }
}

/// Grammar facts about one identifier token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierReport {
    pub identifier: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structural: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<usize>,
    /// Nearest first
    pub ancestors: Vec<String>,
}

impl IdentifierReport {
    pub fn new(identifier: &str) -> Self {
        let valid = is_valid_identifier(identifier);
        if !valid {
            return Self {
                identifier: identifier.to_string(),
                valid,
                role: None,
                structural: None,
                parent: None,
                depth: None,
                ancestors: Vec::new(),
            };
        }
        Self {
            identifier: identifier.to_string(),
            valid,
            role: role_of(identifier),
            structural: Some(structural_base(identifier).to_string()),
            parent: parent_of(identifier).map(str::to_string),
            depth: depth(identifier),
            ancestors: ancestors_of(identifier).into_iter().map(str::to_string).collect(),
        }
    }
}
