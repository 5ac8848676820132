//! Configuration
//!
//! `ZettelConfig` is assembled by the `config` crate from built-in defaults, the
//! global file, the workspace file and `ZETTELGRAPH__*` environment variables.

mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use crate::plan::DEFAULT_INBOX;
use crate::tree::IgnoreMatcher;
use crate::workspace::ScanOptions;
use serde::{Deserialize, Serialize};

/// Name of the per-workspace config file at the workspace root.
pub const WORKSPACE_CONFIG_FILE: &str = ".zettelgraph.toml";

pub(crate) fn default_ignore_patterns() -> Vec<String> {
    ["**/.git/**", "**/.obsidian/**", "**/.DS_Store", "**/*.swp", "**/*.tmp"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZettelConfig {
    /// Glob patterns excluded from the hierarchy
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,

    /// File extensions to scan, without the dot; empty scans every file
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Folder under the root that `adopt` files unplaced notes into
    #[serde(default = "default_inbox")]
    pub inbox: String,

    #[serde(default)]
    pub watch: WatchSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_inbox() -> String {
    DEFAULT_INBOX.to_string()
}

impl Default for ZettelConfig {
    fn default() -> Self {
        Self {
            ignore_patterns: default_ignore_patterns(),
            extensions: Vec::new(),
            inbox: default_inbox(),
            watch: WatchSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ZettelConfig {
    pub fn ignore_matcher(&self) -> IgnoreMatcher {
        IgnoreMatcher::new(&self.ignore_patterns)
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions::with_extensions(&self.extensions)
    }
}

/// The `[watch]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchSettings {
    /// Quiet period a path needs before its change is taken
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// How often settled changes are flushed into a rebuild
    #[serde(default = "default_batch_window_ms")]
    pub batch_window_ms: u64,
}

fn default_debounce_ms() -> u64 {
    200
}

fn default_batch_window_ms() -> u64 {
    50
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            batch_window_ms: default_batch_window_ms(),
        }
    }
}
