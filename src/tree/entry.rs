//! File-store entries and name parsing.

use crate::identifier::{is_valid_identifier, split_role, Role};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Display name given to entries whose name is empty once the identifier is removed.
pub const PLACEHOLDER_NAME: &str = "Untitled";

/// One physical file-store entry, as supplied by a scanner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    /// Full path of the entry
    pub path: PathBuf,
    /// Immediate physical parent folder
    pub parent: PathBuf,
    pub is_directory: bool,
    /// Extension without the leading dot; always `None` for directories
    pub extension: Option<String>,
}

impl Entry {
    pub fn file(
        path: impl Into<PathBuf>,
        parent: impl Into<PathBuf>,
        extension: Option<&str>,
    ) -> Self {
        Self {
            path: path.into(),
            parent: parent.into(),
            is_directory: false,
            extension: extension
                .map(|e| e.trim_start_matches('.').to_string())
                .filter(|e| !e.is_empty()),
        }
    }

    pub fn directory(path: impl Into<PathBuf>, parent: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            parent: parent.into(),
            is_directory: true,
            extension: None,
        }
    }

    /// File entry whose parent and extension are read off the path itself.
    pub fn file_at(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned());
        Self::file(path, parent, extension.as_deref())
    }

    /// Directory entry whose parent is read off the path itself.
    pub fn directory_at(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::directory(path, parent)
    }

    /// Folder name, or file name without its extension.
    pub fn base_name(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.is_directory {
            return name;
        }
        match &self.extension {
            Some(ext) => name
                .strip_suffix(ext.as_str())
                .and_then(|stem| stem.strip_suffix('.'))
                .map(str::to_string)
                .unwrap_or(name),
            None => name,
        }
    }
}

/// Identifier, role and display name parsed from a base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub identifier: Option<String>,
    pub role: Option<Role>,
    pub display_name: String,
}

/// Parse `<identifier> <display name>`.
///
/// The leading token only counts as an identifier when something follows it, so a
/// file literally named `01.md` has the display name `01` and no identifier.
pub fn parse_entry_name(base_name: &str) -> ParsedName {
    let tokens: Vec<&str> = base_name.split_whitespace().collect();

    let (identifier, rest) = match tokens.split_first() {
        Some((first, rest)) if !rest.is_empty() && is_valid_identifier(first) => {
            (Some(first.to_string()), rest)
        }
        _ => (None, tokens.as_slice()),
    };

    let display_name: String = rest.join(" ").nfc().collect();
    let display_name = if display_name.is_empty() {
        PLACEHOLDER_NAME.to_string()
    } else {
        display_name
    };
    let role = identifier.as_deref().and_then(|id| split_role(id).1);

    ParsedName {
        identifier,
        role,
        display_name,
    }
}
