//! Watch runtime: change events, batching and the daemon.

mod events;
mod runtime;

pub use events::{ChangeEvent, WatchConfig};
pub use runtime::WatchDaemon;
