//! Zettelgraph: Folgezettel Hierarchies for Plain-File Vaults
//!
//! Builds a navigable hierarchy over a folder of notes whose names start with a
//! Folgezettel identifier (`01`, `01a`, `01a01`, ...). Identifier ancestry wins over
//! folder placement, missing ancestors are stood in for by surrogate nodes, and files
//! sharing identifier and name merge into one logical note.
//!
//! The engine (`identifier`, `tree`, `allocator`, `plan`, `links`) is pure. The
//! `workspace` module connects it to a real directory: scanning, rebuilding on change,
//! and applying rename and create plans.

pub mod allocator;
pub mod config;
pub mod error;
pub mod identifier;
pub mod links;
pub mod logging;
pub mod plan;
pub mod tooling;
pub mod tree;
pub mod workspace;

pub use allocator::{next_child_id, ChildAllocator};
pub use error::{AllocationError, ApiError, PlanError, StorageError};
pub use identifier::{is_valid_identifier, parent_of, Role};
pub use plan::{
    plan_adopt, plan_create, plan_move, plan_renumber, AdoptOptions, CreatePlan, RenameOp,
    RenamePlan,
};
pub use tree::{build, Entry, Graph, HierarchyBuilder, Node};
