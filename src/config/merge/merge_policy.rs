//! Built-in defaults every load starts from.

use crate::config::default_ignore_patterns;
use crate::plan::DEFAULT_INBOX;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Builder seeded with defaults so partial sources only override what they name.
pub(crate) fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("ignore_patterns", default_ignore_patterns())?
        .set_default("extensions", Vec::<String>::new())?
        .set_default("inbox", DEFAULT_INBOX)?
        .set_default("watch.debounce_ms", 200_i64)?
        .set_default("watch.batch_window_ms", 50_i64)
}
