//! Logical hierarchy nodes.

use super::entry::{Entry, ParsedName};
use crate::identifier::{structural_base, Role};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Prefix of the synthetic keys given to surrogate nodes.
pub const SURROGATE_SCHEME: &str = "surrogate://";

/// Synthetic key of the surrogate standing in for `identifier`.
pub fn surrogate_path(identifier: &str) -> PathBuf {
    PathBuf::from(format!("{}{}", SURROGATE_SCHEME, identifier))
}

/// One logical node: a folder, a surrogate, or one or more files sharing
/// display name and identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Primary physical path, the key edges are recorded under
    pub path: PathBuf,
    pub display_name: String,
    pub identifier: Option<String>,
    pub role: Option<Role>,
    pub extensions: BTreeSet<String>,
    /// Every physical path merged into this node
    pub paths: BTreeSet<PathBuf>,
    pub is_directory: bool,
    pub is_surrogate: bool,
}

impl Node {
    pub(crate) fn root(path: &Path) -> Self {
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            path: path.to_path_buf(),
            display_name,
            identifier: None,
            role: None,
            extensions: BTreeSet::new(),
            paths: BTreeSet::from([path.to_path_buf()]),
            is_directory: true,
            is_surrogate: false,
        }
    }

    pub(crate) fn from_entry(entry: &Entry, parsed: ParsedName) -> Self {
        let mut extensions = BTreeSet::new();
        if let Some(ext) = &entry.extension {
            extensions.insert(ext.clone());
        }
        Self {
            path: entry.path.clone(),
            display_name: parsed.display_name,
            identifier: parsed.identifier,
            role: parsed.role,
            extensions,
            paths: BTreeSet::from([entry.path.clone()]),
            is_directory: entry.is_directory,
            is_surrogate: false,
        }
    }

    pub(crate) fn surrogate(identifier: &str) -> Self {
        let path = surrogate_path(identifier);
        Self {
            path: path.clone(),
            display_name: format!("[{}]", identifier),
            identifier: Some(identifier.to_string()),
            role: None,
            extensions: BTreeSet::new(),
            paths: BTreeSet::from([path]),
            is_directory: false,
            is_surrogate: true,
        }
    }

    /// Fold another physical file of the same note into this node.
    pub(crate) fn absorb(&mut self, entry: &Entry) {
        if let Some(ext) = &entry.extension {
            self.extensions.insert(ext.clone());
        }
        self.paths.insert(entry.path.clone());
    }

    /// Identifier without its role marker.
    pub fn structural_identifier(&self) -> Option<&str> {
        self.identifier.as_deref().map(structural_base)
    }

    /// `<identifier> <display name>`, or just the display name.
    pub fn full_name(&self) -> String {
        match &self.identifier {
            Some(id) => format!("{} {}", id, self.display_name),
            None => self.display_name.clone(),
        }
    }

    /// Physical folder holding this node, `None` for surrogates.
    pub fn folder(&self) -> Option<&Path> {
        if self.is_surrogate {
            return None;
        }
        self.path.parent()
    }

    /// Every physical path of this node, excluding surrogate keys.
    pub fn physical_paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.paths.iter().filter(move |_| !self.is_surrogate)
    }
}
