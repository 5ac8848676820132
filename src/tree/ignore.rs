//! Ignore patterns.
//!
//! Patterns are globs matched case-sensitively against full, `/`-separated paths.
//! Relative patterns are anchored anywhere (`*.tmp` behaves as `**/*.tmp`), and a
//! directory pattern ending in `/**` also matches the directory itself.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;
use tracing::warn;

/// Compiled set of ignore globs.
#[derive(Debug, Clone)]
pub struct IgnoreMatcher {
    set: GlobSet,
    patterns: Vec<String>,
}

impl IgnoreMatcher {
    /// Compile `patterns`. Malformed patterns are logged and never match.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut accepted = Vec::new();

        for raw in patterns {
            let raw = raw.as_ref();
            if raw.trim().is_empty() {
                continue;
            }
            let mut compiled = Vec::new();
            let mut failed = false;
            for expanded in expand_pattern(raw) {
                match GlobBuilder::new(&expanded).literal_separator(true).build() {
                    Ok(glob) => compiled.push(glob),
                    Err(e) => {
                        warn!(pattern = raw, error = %e, "Ignoring malformed ignore pattern");
                        failed = true;
                        break;
                    }
                }
            }
            if failed {
                continue;
            }
            for glob in compiled {
                builder.add(glob);
            }
            accepted.push(raw.to_string());
        }

        let set = builder.build().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to compile ignore patterns; nothing will be ignored");
            GlobSet::empty()
        });

        Self {
            set,
            patterns: accepted,
        }
    }

    /// Matcher that ignores nothing.
    pub fn empty() -> Self {
        Self {
            set: GlobSet::empty(),
            patterns: Vec::new(),
        }
    }

    pub fn is_match(&self, path: &Path) -> bool {
        if self.set.is_empty() {
            return false;
        }
        let normalized = path.to_string_lossy().replace('\\', "/");
        self.set.is_match(normalized.as_str())
    }

    /// Patterns that compiled successfully, as written.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl Default for IgnoreMatcher {
    fn default() -> Self {
        Self::empty()
    }
}

fn expand_pattern(raw: &str) -> Vec<String> {
    let normalized = raw.trim().replace('\\', "/");
    let anchored = if normalized.starts_with('/') || normalized.starts_with("**") {
        normalized
    } else {
        format!("**/{}", normalized)
    };

    let mut expanded = vec![anchored.clone()];
    if let Some(dir) = anchored.strip_suffix("/**") {
        if !dir.is_empty() {
            expanded.push(dir.to_string());
        }
    }
    expanded
}
