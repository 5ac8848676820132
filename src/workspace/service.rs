//! Hierarchy service: owns the current graph of one workspace.
//!
//! Builds run one at a time. Each finished build replaces the current `Arc<Graph>`
//! and is pushed to every live subscriber; readers keep whatever snapshot they hold.

use super::scan::{canonical_root, scan_entries, ScanOptions};
use crate::allocator;
use crate::config::ZettelConfig;
use crate::error::{AllocationError, ApiError};
use crate::tree::{Graph, HierarchyBuilder};
use parking_lot::{Mutex, RwLock};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

pub struct HierarchyService {
    root: PathBuf,
    config: ZettelConfig,
    builder: HierarchyBuilder,
    scan: ScanOptions,
    build_lock: Mutex<()>,
    current: RwLock<Arc<Graph>>,
    subscribers: Mutex<Vec<mpsc::Sender<Arc<Graph>>>>,
}

impl HierarchyService {
    /// Service for the workspace at `root`. The current graph starts out holding only
    /// the root until the first [`rebuild`](Self::rebuild).
    pub fn new(root: &Path, config: ZettelConfig) -> Result<Self, ApiError> {
        let root = canonical_root(root)?;
        let builder =
            HierarchyBuilder::new(root.clone()).with_ignore_matcher(config.ignore_matcher());
        let empty = builder.build(&[]);
        Ok(Self {
            scan: config.scan_options(),
            root,
            config,
            builder,
            build_lock: Mutex::new(()),
            current: RwLock::new(Arc::new(empty)),
            subscribers: Mutex::new(Vec::new()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ZettelConfig {
        &self.config
    }

    /// Scan and build, publish the result, and return it.
    pub fn rebuild(&self) -> Result<Arc<Graph>, ApiError> {
        let _guard = self.build_lock.lock();
        let started = Instant::now();

        let entries = scan_entries(&self.root, &self.scan)?;
        let graph = Arc::new(self.builder.build(&entries));
        *self.current.write() = Arc::clone(&graph);

        let delivered = {
            let mut subscribers = self.subscribers.lock();
            subscribers.retain(|tx| tx.send(Arc::clone(&graph)).is_ok());
            subscribers.len()
        };

        info!(
            nodes = graph.node_count(),
            subscribers = delivered,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Rebuilt hierarchy"
        );
        Ok(graph)
    }

    /// Latest published graph.
    pub fn current(&self) -> Arc<Graph> {
        Arc::clone(&self.current.read())
    }

    /// Receive every graph published from now on. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> mpsc::Receiver<Arc<Graph>> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.lock().push(tx);
        debug!("Added hierarchy subscriber");
        rx
    }

    /// Next free child identifier under `parent` in the current graph.
    pub fn next_child_id(&self, parent: &Path) -> Result<String, AllocationError> {
        allocator::next_child_id(&self.current(), &self.resolve(parent))
    }

    /// Absolute key for a user-supplied path: relative paths are taken from the root,
    /// absolute ones are canonicalized when they exist.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        }
        if path.as_os_str().is_empty() || path == Path::new(".") {
            return self.root.clone();
        }
        let joined = self.root.join(path);
        dunce::canonicalize(&joined).unwrap_or(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn workspace(files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for rel in files {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        dir
    }

    #[test]
    fn test_current_before_first_rebuild_is_root_only() {
        let dir = workspace(&["01 Note.md"]);
        let service = HierarchyService::new(dir.path(), ZettelConfig::default()).unwrap();
        assert_eq!(service.current().node_count(), 1);
    }

    #[test]
    fn test_rebuild_publishes_and_notifies() {
        let dir = workspace(&["01 Math.md", "01a Calculus.md"]);
        let service = HierarchyService::new(dir.path(), ZettelConfig::default()).unwrap();
        let rx = service.subscribe();

        let graph = service.rebuild().unwrap();
        assert!(Arc::ptr_eq(&graph, &service.current()));
        let received = rx.try_recv().unwrap();
        assert!(Arc::ptr_eq(&graph, &received));

        let calculus = service.resolve(Path::new("01a Calculus.md"));
        let parent = graph.parent(&calculus).unwrap();
        assert_eq!(parent.identifier.as_deref(), Some("01"));
    }

    #[test]
    fn test_old_snapshot_is_unaffected() {
        let dir = workspace(&["01 Math.md"]);
        let service = HierarchyService::new(dir.path(), ZettelConfig::default()).unwrap();
        let before = service.rebuild().unwrap();

        fs::write(dir.path().join("02 Physics.md"), "").unwrap();
        let after = service.rebuild().unwrap();

        assert_eq!(before.node_count(), 2);
        assert_eq!(after.node_count(), 3);
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let dir = workspace(&["01 Math.md"]);
        let service = HierarchyService::new(dir.path(), ZettelConfig::default()).unwrap();
        drop(service.subscribe());
        let kept = service.subscribe();

        service.rebuild().unwrap();
        assert_eq!(service.subscribers.lock().len(), 1);
        assert!(kept.try_recv().is_ok());
    }

    #[test]
    fn test_next_child_id_uses_current_graph() {
        let dir = workspace(&["01a Parent.md", "01a01 One.md", "01a03 Three.md"]);
        let service = HierarchyService::new(dir.path(), ZettelConfig::default()).unwrap();
        service.rebuild().unwrap();
        assert_eq!(service.next_child_id(Path::new("01a Parent.md")).unwrap(), "01a02");
    }

    #[test]
    fn test_config_ignore_patterns_apply() {
        let dir = workspace(&["01 Math.md", ".obsidian/workspace.json", "drafts/01b Draft.md"]);
        let config = ZettelConfig {
            ignore_patterns: vec!["**/.obsidian/**".to_string(), "drafts/**".to_string()],
            ..ZettelConfig::default()
        };
        let service = HierarchyService::new(dir.path(), config).unwrap();
        let graph = service.rebuild().unwrap();
        assert!(graph.nodes().all(|n| !n.path.to_string_lossy().contains("drafts")));
        assert!(graph.nodes().all(|n| !n.path.to_string_lossy().contains(".obsidian")));
    }
}
