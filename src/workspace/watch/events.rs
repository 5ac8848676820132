//! Watch events, batching, and configuration.

use crate::config::ZettelConfig;
use crate::tree::IgnoreMatcher;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Watch mode configuration
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Workspace root directory
    pub workspace_root: PathBuf,
    /// Quiet period a path needs before its change is taken
    pub debounce_ms: u64,
    /// How often settled changes are flushed
    pub batch_window_ms: u64,
    /// Pending paths that force an early flush
    pub max_batch_size: usize,
    pub ignore_patterns: Vec<String>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self::from_config(Path::new("."), &ZettelConfig::default())
    }
}

impl WatchConfig {
    pub fn from_config(workspace_root: &Path, config: &ZettelConfig) -> Self {
        Self {
            workspace_root: workspace_root.to_path_buf(),
            debounce_ms: config.watch.debounce_ms,
            batch_window_ms: config.watch.batch_window_ms,
            max_batch_size: 100,
            ignore_patterns: config.ignore_patterns.clone(),
        }
    }
}

/// Filesystem change event
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeEvent {
    Created(PathBuf),
    Modified(PathBuf),
    Removed(PathBuf),
    Renamed { from: PathBuf, to: PathBuf },
}

impl ChangeEvent {
    pub fn path(&self) -> &Path {
        match self {
            ChangeEvent::Created(p) | ChangeEvent::Modified(p) | ChangeEvent::Removed(p) => p,
            ChangeEvent::Renamed { to, .. } => to,
        }
    }

    /// Paths whose ignore status decides whether the event matters.
    fn touched(&self) -> impl Iterator<Item = &Path> {
        let from = match self {
            ChangeEvent::Renamed { from, .. } => Some(from.as_path()),
            _ => None,
        };
        std::iter::once(self.path()).chain(from)
    }
}

/// Groups events per path and holds each back until the path has been quiet for the
/// debounce window.
pub(crate) struct EventBatcher {
    debounce: Duration,
    max_batch_size: usize,
    ignore: IgnoreMatcher,
    pending: HashMap<PathBuf, (ChangeEvent, Instant)>,
}

impl EventBatcher {
    pub(crate) fn new(config: &WatchConfig) -> Self {
        Self {
            debounce: Duration::from_millis(config.debounce_ms),
            max_batch_size: config.max_batch_size,
            ignore: IgnoreMatcher::new(&config.ignore_patterns),
            pending: HashMap::new(),
        }
    }

    /// Queue an event; later events for the same path replace earlier ones and
    /// restart its quiet period. Returns false when every touched path is ignored.
    pub(crate) fn add_event(&mut self, event: ChangeEvent, now: Instant) -> bool {
        if event.touched().all(|p| self.ignore.is_match(p)) {
            return false;
        }
        self.pending.insert(event.path().to_path_buf(), (event, now));
        true
    }

    pub(crate) fn is_full(&self) -> bool {
        self.pending.len() >= self.max_batch_size
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return the events whose path has been quiet for the debounce
    /// window, or every pending event when the batch is full.
    pub(crate) fn take_settled(&mut self, now: Instant) -> Vec<ChangeEvent> {
        let flush_all = self.is_full();
        let debounce = self.debounce;
        let settled: Vec<PathBuf> = self
            .pending
            .iter()
            .filter(|(_, (_, seen))| flush_all || now.saturating_duration_since(*seen) >= debounce)
            .map(|(path, _)| path.clone())
            .collect();

        let mut events: Vec<ChangeEvent> = settled
            .iter()
            .filter_map(|path| self.pending.remove(path).map(|(event, _)| event))
            .collect();
        events.sort_by(|a, b| a.path().cmp(b.path()));
        events
    }
}
