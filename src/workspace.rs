//! Workspace domain: scanning, the hierarchy service, plan execution and the watch
//! runtime.

pub mod apply;
pub mod format;
pub mod scan;
pub mod service;
pub mod types;
pub mod watch;

pub use apply::{apply_plan, create_note, ApplyReport};
pub use scan::{canonical_root, creation_times, scan_entries, ScanOptions};
pub use service::HierarchyService;
pub use types::{HierarchyStatus, IdentifierReport};
pub use watch::{ChangeEvent, WatchConfig, WatchDaemon};
