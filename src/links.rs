//! Wiki-link rewriting.
//!
//! Notes refer to each other as `[[01a Calculus]]`, `[[01a]]` or
//! `[[01a Calculus|see here]]`. When a note is renamed every such link must follow.
//! All replacements of one rewrite happen in a single pass, so chained renames
//! (`01a -> 01b`, `01b -> 01c`) never cascade.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::warn;

/// Extensions whose contents carry wiki links.
pub const LINKED_EXTENSIONS: &[&str] = &["md", "txt"];

/// What a link points at: `<identifier> <name>` or just `<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkTarget {
    pub identifier: Option<String>,
    pub name: String,
}

impl LinkTarget {
    pub fn new(identifier: Option<&str>, name: &str) -> Self {
        Self {
            identifier: identifier.map(str::to_string),
            name: name.to_string(),
        }
    }

    pub fn full_name(&self) -> String {
        match &self.identifier {
            Some(id) => format!("{} {}", id, self.name),
            None => self.name.clone(),
        }
    }
}

/// Should files with this extension have their links rewritten.
pub fn should_rewrite(extension: &str) -> bool {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();
    LINKED_EXTENSIONS.contains(&ext.as_str())
}

const LINK_PATTERN: &str = r"\[\[(?P<target>[^\]\|]+)(?P<alias>\|[^\]]*)?\]\]";

fn compile_pattern(source: &str) -> Option<Regex> {
    match Regex::new(source) {
        Ok(pattern) => Some(pattern),
        Err(e) => {
            warn!(error = %e, "Link pattern does not compile, links are left as they are");
            None
        }
    }
}

fn link_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| compile_pattern(LINK_PATTERN)).as_ref()
}

/// Rewrite links to `old` so they point at `new`. Returns the new content and the
/// number of links changed.
pub fn rewrite_links(content: &str, old: &LinkTarget, new: &LinkTarget) -> (String, usize) {
    rewrite_all_links(content, &[(old.clone(), new.clone())])
}

/// Rewrite every `(old, new)` pair in one pass.
pub fn rewrite_all_links(
    content: &str,
    changes: &[(LinkTarget, LinkTarget)],
) -> (String, usize) {
    let mut replacements: HashMap<String, String> = HashMap::new();
    for (old, new) in changes {
        replacements.insert(old.full_name(), new.full_name());
        if let Some(old_id) = &old.identifier {
            let new_id = new.identifier.clone().unwrap_or_else(|| new.full_name());
            replacements.entry(old_id.clone()).or_insert(new_id);
        }
    }
    let Some(pattern) = link_pattern().filter(|_| !replacements.is_empty()) else {
        return (content.to_string(), 0);
    };

    let mut count = 0;
    let rewritten = pattern.replace_all(content, |caps: &Captures| {
        let target = &caps["target"];
        let alias = caps.name("alias").map(|m| m.as_str()).unwrap_or("");
        match replacements.get(target) {
            Some(replacement) => {
                count += 1;
                format!("[[{}{}]]", replacement, alias)
            }
            None => caps[0].to_string(),
        }
    });
    (rewritten.into_owned(), count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrites_all_link_forms() {
        let old = LinkTarget::new(Some("01a"), "Calculus");
        let new = LinkTarget::new(Some("02b"), "Calculus");
        let content = "See [[01a Calculus]], [[01a]] and [[01a Calculus|the calculus note]].";
        let (out, count) = rewrite_links(content, &old, &new);
        assert_eq!(count, 3);
        assert_eq!(
            out,
            "See [[02b Calculus]], [[02b]] and [[02b Calculus|the calculus note]]."
        );
    }

    #[test]
    fn test_leaves_other_links_alone() {
        let old = LinkTarget::new(Some("01a"), "Calculus");
        let new = LinkTarget::new(Some("01b"), "Calculus");
        let content = "[[01a01 Limits]] [[01a Calculus II]] [[Calculus]] [not a link]";
        let (out, count) = rewrite_links(content, &old, &new);
        assert_eq!(count, 0);
        assert_eq!(out, content);
    }

    #[test]
    fn test_chained_renames_do_not_cascade() {
        let changes = vec![
            (
                LinkTarget::new(Some("01a"), "A"),
                LinkTarget::new(Some("01b"), "A"),
            ),
            (
                LinkTarget::new(Some("01b"), "B"),
                LinkTarget::new(Some("01c"), "B"),
            ),
        ];
        let (out, count) = rewrite_all_links("[[01a]] [[01b]] [[01b B]]", &changes);
        assert_eq!(count, 3);
        assert_eq!(out, "[[01b]] [[01c]] [[01c B]]");
    }

    #[test]
    fn test_uncompilable_pattern_is_reported_not_raised() {
        assert!(compile_pattern(r"\[\[(?P<target>").is_none());
        assert!(link_pattern().is_some());
    }

    #[test]
    fn test_gaining_an_identifier() {
        let old = LinkTarget::new(None, "Loose idea");
        let new = LinkTarget::new(Some("03a"), "Loose idea");
        let (out, count) = rewrite_links("[[Loose idea|idea]]", &old, &new);
        assert_eq!(count, 1);
        assert_eq!(out, "[[03a Loose idea|idea]]");
    }

    #[test]
    fn test_should_rewrite() {
        assert!(should_rewrite("md"));
        assert!(should_rewrite(".TXT"));
        assert!(!should_rewrite("py"));
        assert!(!should_rewrite("pdf"));
    }
}
