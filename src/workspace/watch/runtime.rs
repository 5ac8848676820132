//! Watch daemon: turns settled filesystem changes into hierarchy rebuilds.

use super::events::{ChangeEvent, EventBatcher, WatchConfig};
use crate::error::ApiError;
use crate::workspace::HierarchyService;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use parking_lot::RwLock;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Watch mode daemon
pub struct WatchDaemon {
    service: Arc<HierarchyService>,
    config: WatchConfig,
    running: Arc<RwLock<bool>>,
}

impl WatchDaemon {
    pub fn new(service: Arc<HierarchyService>, config: WatchConfig) -> Self {
        Self {
            service,
            config,
            running: Arc::new(RwLock::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        *self.running.read()
    }

    /// Build once, then rebuild after every settled batch of changes until
    /// [`stop`](Self::stop) is called. Blocks the calling thread.
    pub fn start(&self) -> Result<(), ApiError> {
        *self.running.write() = true;

        info!("Building initial hierarchy");
        self.service.rebuild()?;

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            if let Err(e) = tx.send(res) {
                error!("Error sending watch event: {}", e);
            }
        })
        .map_err(|e| ApiError::WatchError(format!("Failed to create watcher: {}", e)))?;

        watcher
            .watch(&self.config.workspace_root, RecursiveMode::Recursive)
            .map_err(|e| ApiError::WatchError(format!("Failed to watch directory: {}", e)))?;

        info!(workspace = ?self.config.workspace_root, "Watching workspace");

        let mut batcher = EventBatcher::new(&self.config);
        let tick = Duration::from_millis(self.config.batch_window_ms.max(1));

        while self.is_running() {
            match rx.recv_timeout(tick) {
                Ok(Ok(event)) => {
                    for change in convert_event(event) {
                        let path = change.path().to_path_buf();
                        if !batcher.add_event(change, Instant::now()) {
                            debug!(path = %path.display(), "Ignored change");
                        }
                    }
                }
                Ok(Err(e)) => warn!("Watch error: {}", e),
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    error!("Watcher channel disconnected");
                    break;
                }
            }

            if !batcher.is_empty() {
                let settled = batcher.take_settled(Instant::now());
                if !settled.is_empty() {
                    self.process_events(&settled)?;
                }
            }
        }

        *self.running.write() = false;
        info!("Watch stopped");
        Ok(())
    }

    /// Ask a running daemon to return from [`start`](Self::start).
    pub fn stop(&self) {
        *self.running.write() = false;
    }

    fn process_events(&self, events: &[ChangeEvent]) -> Result<(), ApiError> {
        for event in events {
            debug!(event = ?event, "Settled change");
        }
        let graph = self.service.rebuild()?;
        info!(
            changes = events.len(),
            nodes = graph.node_count(),
            "Rebuilt after changes"
        );
        Ok(())
    }
}

fn convert_event(event: Event) -> Vec<ChangeEvent> {
    let mut paths = event.paths.into_iter();
    match event.kind {
        EventKind::Create(_) => paths.map(ChangeEvent::Created).collect(),
        EventKind::Modify(notify::event::ModifyKind::Name(_)) => {
            match (paths.next(), paths.next()) {
                (Some(from), Some(to)) => vec![ChangeEvent::Renamed { from, to }],
                (Some(path), None) => vec![ChangeEvent::Modified(path)],
                _ => Vec::new(),
            }
        }
        EventKind::Modify(_) => paths.map(ChangeEvent::Modified).collect(),
        EventKind::Remove(_) => paths.map(ChangeEvent::Removed).collect(),
        _ => Vec::new(),
    }
}
