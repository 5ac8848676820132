//! Error types
//!
//! The hierarchy engine itself never fails: malformed names degrade to "no identifier"
//! and malformed ignore patterns degrade to "no match". Failures only surface from the
//! allocator, the rename planner, and the collaborators that touch the filesystem.

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the child identifier allocator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("Node not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Node has no identifier, cannot allocate a child under it: {}", .0.display())]
    NoIdentifier(PathBuf),

    #[error(
        "No free child identifier under {base}: all {capacity} slots are taken. \
         Renumber some children or file the new note under a different parent"
    )]
    AllocationExhausted { base: String, capacity: usize },
}

/// Failures while planning a move or renumbering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("Node not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Cannot rename a placeholder node, it has no file: {0}")]
    Surrogate(String),

    #[error("Not a valid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Identifier is already used in this vault: {0}")]
    IdentifierInUse(String),

    #[error("Not a usable note name: {0:?}")]
    InvalidName(String),

    #[error("Cannot move {} into itself or one of its descendants", .0.display())]
    IntoDescendant(PathBuf),

    #[error("The workspace root cannot be moved or renumbered")]
    Root,

    #[error(transparent)]
    Allocation(#[from] AllocationError),
}

/// Filesystem-facing failures of the workspace collaborators.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Top-level error for workspace and tooling operations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("Watch error: {0}")]
    WatchError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::StorageError(StorageError::IoError(err))
    }
}
