//! Hierarchy construction.
//!
//! Turns a flat list of file-store entries into a forest of logical nodes keyed by
//! physical path, using Folgezettel identifiers for ancestry and folders as fallback.

pub mod builder;
pub mod entry;
pub mod graph;
pub mod ignore;
pub mod node;

pub use builder::{build, HierarchyBuilder};
pub use entry::{parse_entry_name, Entry, ParsedName, PLACEHOLDER_NAME};
pub use graph::{Graph, GraphSnapshot};
pub use ignore::IgnoreMatcher;
pub use node::{surrogate_path, Node, SURROGATE_SCHEME};
