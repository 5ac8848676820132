//! Environment variable source: ZETTELGRAPH__* with __ separator

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment};

pub const ENV_PREFIX: &str = "ZETTELGRAPH";

/// Add the environment overlay, e.g. `ZETTELGRAPH__WATCH__DEBOUNCE_MS=500` or
/// `ZETTELGRAPH__EXTENSIONS=md,txt`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("extensions")
            .with_list_parse_key("ignore_patterns"),
    ))
}
