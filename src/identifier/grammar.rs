//! Folgezettel identifier grammar.
//!
//! ```text
//! identifier := root segment* role?
//! root       := DIGIT DIGIT
//! segment    := LETTER | LETTER DIGIT DIGIT      (strictly alternating)
//! role       := '%' | '&'
//! ```
//!
//! `01`, `01a`, `01a01`, `01a01b`, `01a%` are valid; `1a`, `01ab`, `01a0` are not.

use serde::{Deserialize, Serialize};

/// Marker for a mapping (overview) node.
pub const MAPPING_MARKER: char = '%';

/// Marker for a planning node.
pub const PLANNING_MARKER: char = '&';

/// Special node kind carried by a trailing marker on the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Mapping,
    Planning,
}

impl Role {
    /// Role for a marker character. Only `%` and `&` are markers.
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            MAPPING_MARKER => Some(Role::Mapping),
            PLANNING_MARKER => Some(Role::Planning),
            _ => None,
        }
    }

    pub fn marker(self) -> char {
        match self {
            Role::Mapping => MAPPING_MARKER,
            Role::Planning => PLANNING_MARKER,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Mapping => f.write_str("mapping"),
            Role::Planning => f.write_str("planning"),
        }
    }
}

/// The one digit predicate used for identifier arithmetic.
#[inline]
pub(crate) fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// The one letter predicate used for identifier arithmetic.
#[inline]
pub(crate) fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
}

/// Split a trailing role marker off a token.
///
/// Does not validate the rest of the token.
pub fn split_role(token: &str) -> (&str, Option<Role>) {
    match token.chars().last().and_then(Role::from_marker) {
        // markers are single-byte ASCII
        Some(role) => (&token[..token.len() - 1], Some(role)),
        None => (token, None),
    }
}

/// Token with its trailing role marker removed (the structural base).
pub fn structural_base(token: &str) -> &str {
    split_role(token).0
}

/// Role of a valid identifier, `None` for plain or invalid identifiers.
pub fn role_of(token: &str) -> Option<Role> {
    if !is_valid_identifier(token) {
        return None;
    }
    split_role(token).1
}

/// Is `token` a well-formed identifier.
pub fn is_valid_identifier(token: &str) -> bool {
    let (body, _) = split_role(token);
    let chars: Vec<char> = body.chars().collect();

    if chars.len() < 2 || !is_digit(chars[0]) || !is_digit(chars[1]) {
        return false;
    }

    let mut pos = 2;
    loop {
        if pos == chars.len() {
            return true;
        }
        if !is_letter(chars[pos]) {
            return false;
        }
        pos += 1;

        if pos == chars.len() {
            return true;
        }
        if pos + 1 >= chars.len() || !is_digit(chars[pos]) || !is_digit(chars[pos + 1]) {
            return false;
        }
        pos += 2;
    }
}
