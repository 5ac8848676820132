//! Child Identifier Allocation
//!
//! Picks the first free identifier under a parent: a letter after a digit-ending base,
//! a two-digit number after a letter-ending base. Gaps are filled before the range
//! is extended, so `01a01, 01a03` yields `01a02`.

use crate::error::AllocationError;
use crate::identifier::{is_digit, split_role, structural_base};
use crate::tree::Graph;
use std::collections::BTreeSet;
use std::path::Path;

const LETTER_CAPACITY: usize = 26;
const NUMBER_CAPACITY: usize = 99;

/// Next free child identifier under the node at `parent`.
pub fn next_child_id(graph: &Graph, parent: &Path) -> Result<String, AllocationError> {
    ChildAllocator::for_parent(graph, parent)?.next_id()
}

/// Hands out successive child identifiers under one parent, treating every
/// identifier it has already returned as taken.
#[derive(Debug, Clone)]
pub struct ChildAllocator {
    base: String,
    /// Lowercased suffixes in use directly after the base
    used: BTreeSet<String>,
}

impl ChildAllocator {
    pub fn for_parent(graph: &Graph, parent: &Path) -> Result<Self, AllocationError> {
        let node = graph
            .node(parent)
            .ok_or_else(|| AllocationError::NotFound(parent.to_path_buf()))?;
        let identifier = node
            .identifier
            .as_deref()
            .ok_or_else(|| AllocationError::NoIdentifier(parent.to_path_buf()))?;

        let base = structural_base(identifier).to_string();
        let children = graph
            .children(parent)
            .filter_map(|child| child.identifier.as_deref());
        let used = used_suffixes(&base, children);

        Ok(Self { base, used })
    }

    /// Allocator under a bare identifier `base`, counting every identifier in the
    /// graph that extends it, wherever it is placed. An empty base allocates root
    /// tokens `01`..`99`.
    pub fn for_identifier(graph: &Graph, base: &str) -> Self {
        let base = structural_base(base).to_string();
        let ids = graph.nodes().filter_map(|node| node.identifier.as_deref());
        let used = used_suffixes(&base, ids);
        Self { base, used }
    }

    /// Structural identifier new children are appended to.
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn next_id(&mut self) -> Result<String, AllocationError> {
        let suffix = if self.base_ends_in_digit() {
            ('a'..='z')
                .map(String::from)
                .find(|letter| !self.used.contains(letter))
                .ok_or_else(|| self.exhausted(LETTER_CAPACITY))?
        } else {
            (1..=NUMBER_CAPACITY)
                .map(|n| format!("{:02}", n))
                .find(|number| !self.used.contains(number))
                .ok_or_else(|| self.exhausted(NUMBER_CAPACITY))?
        };
        self.used.insert(suffix.clone());
        Ok(format!("{}{}", self.base, suffix))
    }

    fn base_ends_in_digit(&self) -> bool {
        self.base.chars().last().map(is_digit).unwrap_or(false)
    }

    fn exhausted(&self, capacity: usize) -> AllocationError {
        AllocationError::AllocationExhausted {
            base: self.base.clone(),
            capacity,
        }
    }
}

/// Suffix segment right after `base` for each child identifier extending it.
fn used_suffixes<'a>(base: &str, children: impl Iterator<Item = &'a str>) -> BTreeSet<String> {
    let digit_base = base.chars().last().map(is_digit).unwrap_or(false);
    let width = if digit_base { 1 } else { 2 };

    children
        .map(|id| split_role(id).0)
        .filter_map(|id| id.strip_prefix(base))
        .filter_map(|rest| rest.get(..width))
        .filter(|segment| segment.chars().count() == width)
        .map(str::to_ascii_lowercase)
        .collect()
}
