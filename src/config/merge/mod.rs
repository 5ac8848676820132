//! Source composition and merge policy.

pub(crate) mod merge_policy;
pub mod service;
