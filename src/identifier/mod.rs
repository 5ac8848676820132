//! Folgezettel identifiers: grammar and parent arithmetic.
//!
//! Everything here is a pure string function with no graph lookups, so it is safe to
//! call from collaborators and during recursive ancestor synthesis.

mod grammar;
mod parent;

pub use grammar::{
    is_valid_identifier, role_of, split_role, structural_base, Role, MAPPING_MARKER,
    PLANNING_MARKER,
};
pub(crate) use grammar::is_digit;
pub use parent::{ancestors_of, depth, parent_of};
