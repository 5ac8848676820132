//! Structural parent arithmetic on identifiers.

use super::grammar::{is_letter, is_valid_identifier, structural_base};

/// Structural parent of an identifier.
///
/// The role marker is dropped first, so `01a%` is a child of `01a`. Root tokens and
/// invalid input have no parent.
pub fn parent_of(identifier: &str) -> Option<&str> {
    if !is_valid_identifier(identifier) {
        return None;
    }
    let base = structural_base(identifier);
    if base.len() <= 2 {
        return None;
    }

    // valid identifiers are ASCII, byte offsets are char offsets
    let last = base.chars().last()?;
    if is_letter(last) {
        Some(&base[..base.len() - 1])
    } else {
        Some(&base[..base.len() - 2])
    }
}

/// Every structural ancestor, nearest first, ending with the root token.
pub fn ancestors_of(identifier: &str) -> Vec<&str> {
    let mut chain = Vec::new();
    let mut current = identifier;
    while let Some(parent) = parent_of(current) {
        chain.push(parent);
        current = parent;
    }
    chain
}

/// Number of segments below the root token (`01` is 0, `01a01` is 2).
pub fn depth(identifier: &str) -> Option<usize> {
    if !is_valid_identifier(identifier) {
        return None;
    }
    Some(ancestors_of(identifier).len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_of() {
        assert_eq!(parent_of("01a"), Some("01"));
        assert_eq!(parent_of("01a01"), Some("01a"));
        assert_eq!(parent_of("01a01b"), Some("01a01"));
        assert_eq!(parent_of("01a%"), Some("01a"));
        assert_eq!(parent_of("01a01&"), Some("01a01"));
        assert_eq!(parent_of("01"), None);
        assert_eq!(parent_of("01%"), None);
    }

    #[test]
    fn test_parent_of_invalid_is_none() {
        assert_eq!(parent_of("01ab"), None);
        assert_eq!(parent_of("1a"), None);
        assert_eq!(parent_of("Calculus"), None);
    }

    #[test]
    fn test_parent_keeps_casing() {
        assert_eq!(parent_of("01A01"), Some("01A"));
        assert_eq!(parent_of("01A01B"), Some("01A01"));
    }

    #[test]
    fn test_ancestors_of() {
        assert_eq!(ancestors_of("01a01b"), vec!["01a01", "01a", "01"]);
        assert_eq!(ancestors_of("01a%"), vec!["01a", "01"]);
        assert!(ancestors_of("01").is_empty());
        assert!(ancestors_of("nope").is_empty());
    }

    #[test]
    fn test_depth() {
        assert_eq!(depth("01"), Some(0));
        assert_eq!(depth("01a"), Some(1));
        assert_eq!(depth("01a01b%"), Some(3));
        assert_eq!(depth("x"), None);
    }
}
